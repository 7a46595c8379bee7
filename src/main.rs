//! Lucky Draw Engine
//!
//! Loads a draw snapshot exported by the backend and keeps the current cycle,
//! its countdown and the eligible participants up to date in the logs.

use anyhow::Context;
use luckydraw_engine::config::AppConfig;
use luckydraw_engine::cycle::CycleResolver;
use luckydraw_engine::error::AppError;
use luckydraw_engine::services::{CycleTicker, DrawService};
use luckydraw_engine::snapshot::DrawSnapshot;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env()
        .map_err(AppError::Config)
        .context("failed to load configuration")?;

    init_tracing(&config);

    info!("Lucky draw engine starting");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);

    let snapshot_path = config
        .snapshot_path
        .clone()
        .ok_or_else(|| AppError::Config("DRAW_SNAPSHOT_PATH is required".to_string()))?;

    let snapshot = DrawSnapshot::load(&snapshot_path)
        .with_context(|| format!("failed to load snapshot {}", snapshot_path.display()))?;

    let resolver = CycleResolver::new(config.cycle.month_policy);
    info!("Month policy: {}", resolver.month_policy().as_str());
    let service = Arc::new(DrawService::with_system_clock(snapshot, resolver));

    // Initial evaluation
    let status = service.cycle_status().await;
    if status.resolution.used_default() {
        warn!("Cycle computed from defaults: {:?}", status.resolution.fallbacks);
    }
    let summary = service.summary().await;
    info!(
        "{}: {} payments, {} verified ({}), {} pending",
        status.label,
        summary.total_payments,
        summary.verified_payments,
        summary.verified_amount,
        summary.pending_payments
    );

    let eligible = service.eligible_participants().await;
    if eligible.is_empty() {
        info!("No eligible participants for {}", status.label);
    } else {
        info!("{} eligible participants for {}", eligible.len(), status.label);
        for participant in &eligible {
            info!("  {} ({})", participant.name, participant.id);
        }
    }

    // Keep the cycle current
    let ticker = CycleTicker::new(service.clone()).with_interval(config.cycle.tick_interval());
    let mut updates = ticker.subscribe();
    let ticker_handle = tokio::spawn(async move {
        ticker.start().await;
    });
    info!("Cycle ticker started ({:?} interval)", config.cycle.tick_interval());

    let service_for_watch = service.clone();
    let watch_handle = tokio::spawn(async move {
        let mut last_cycle = status.cycle();
        while updates.changed().await.is_ok() {
            let cycle = match updates.borrow_and_update().as_ref() {
                Some(status) => status.cycle(),
                None => continue,
            };
            if cycle != last_cycle {
                last_cycle = cycle;
                let eligible = service_for_watch.eligible_participants().await;
                info!("{} eligible participants for cycle {}", eligible.len(), cycle);
            }
        }
    });

    info!("Press Ctrl+C to shutdown");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = ticker_handle => {
            error!("Cycle ticker exited unexpectedly");
        }
        _ = watch_handle => {
            error!("Cycle watcher exited unexpectedly");
        }
    }

    info!("Lucky draw engine shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("luckydraw_engine={}", config.log_level).into());

    if config.json_logs() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
