use crate::cycle::{CycleFallback, CycleStatus};
use crate::services::DrawService;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

/// Notable transition between two consecutive evaluations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleEvent {
    /// First evaluation
    Observed { label: String },
    Changed { from: u32, label: String },
    /// The final cycle's period has just run out
    Exhausted { cycle: u32 },
}

/// Transitions from `previous` to `current`. Exhaustion is reported on the
/// edge of the `exhausted` flag since the cycle number stays pinned.
pub fn cycle_events(previous: Option<&CycleStatus>, current: &CycleStatus) -> Vec<CycleEvent> {
    let mut events = Vec::new();

    match previous {
        None => events.push(CycleEvent::Observed {
            label: current.label.clone(),
        }),
        Some(prev) if prev.cycle() != current.cycle() => events.push(CycleEvent::Changed {
            from: prev.cycle(),
            label: current.label.clone(),
        }),
        Some(_) => {}
    }

    let was_exhausted = previous.map_or(false, |prev| prev.resolution.exhausted);
    if current.resolution.exhausted && !was_exhausted {
        events.push(CycleEvent::Exhausted {
            cycle: current.cycle(),
        });
    }

    events
}

/// Background task that keeps the displayed cycle current
pub struct CycleTicker {
    service: Arc<DrawService>,
    interval: Duration,
    tx: watch::Sender<Option<CycleStatus>>,
    /// Fallbacks already reported, so each is logged once
    warned: Mutex<HashSet<CycleFallback>>,
}

impl CycleTicker {
    /// Create a new ticker
    pub fn new(service: Arc<DrawService>) -> Self {
        let (tx, _) = watch::channel(None);

        Self {
            service,
            interval: Duration::from_secs(1), // Default: 1 second
            tx,
            warned: Mutex::new(HashSet::new()),
        }
    }

    /// Set tick interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Receiver that always holds the latest evaluation
    pub fn subscribe(&self) -> watch::Receiver<Option<CycleStatus>> {
        self.tx.subscribe()
    }

    /// Start re-evaluating the cycle on every interval
    pub async fn start(self) {
        let mut interval = time::interval(self.interval);
        info!("Cycle ticker started, evaluating every {:?}", self.interval);

        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    /// Evaluate once and publish the result
    pub async fn tick(&self) -> CycleStatus {
        let status = self.service.cycle_status().await;
        let events = cycle_events(self.tx.borrow().as_ref(), &status);

        if events.is_empty() {
            debug!("Cycle {} countdown {:?}", status.cycle(), status.countdown);
        }
        for event in &events {
            match event {
                CycleEvent::Observed { label } => info!("Current cycle: {}", label),
                CycleEvent::Changed { from, label } => info!("Cycle changed: {} -> {}", from, label),
                CycleEvent::Exhausted { cycle } => {
                    info!("Schedule exhausted, frozen on final cycle {}", cycle)
                }
            }
        }

        self.report_fallbacks(&status);
        self.tx.send_replace(Some(status.clone()));
        status
    }

    fn report_fallbacks(&self, status: &CycleStatus) {
        let mut warned = self.warned.lock().unwrap_or_else(|e| e.into_inner());
        for fallback in &status.resolution.fallbacks {
            if fallback.is_misconfiguration() && warned.insert(fallback.clone()) {
                warn!("Draw schedule misconfigured: {}", fallback);
            }
        }
    }
}
