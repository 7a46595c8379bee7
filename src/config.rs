use crate::cycle::MonthPolicy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Cycle evaluation configuration
#[derive(Debug, Clone)]
pub struct CycleConfig {
    pub tick_interval_ms: u64,
    pub month_policy: MonthPolicy,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cycle: CycleConfig,
    pub log_level: String,
    pub log_format: String,
    pub environment: String,
    pub snapshot_path: Option<PathBuf>,
}

impl CycleConfig {
    /// Create cycle config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let tick_interval_ms = env::var("CYCLE_TICK_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1000);

        let month_policy = match env::var("CYCLE_MONTH_POLICY") {
            Ok(s) => MonthPolicy::from_str(&s)?,
            Err(_) => MonthPolicy::default(),
        };

        // Validate configuration
        if tick_interval_ms == 0 {
            return Err("CYCLE_TICK_INTERVAL_MS must be greater than 0".to_string());
        }

        Ok(Self {
            tick_interval_ms,
            month_policy,
        })
    }

    /// Get tick interval as Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            month_policy: MonthPolicy::Approximate,
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let cycle = CycleConfig::from_env()?;

        let log_level = env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string());

        let log_format = env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string());

        let environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string());

        let snapshot_path = env::var("DRAW_SNAPSHOT_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        // Validate log format
        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&log_format.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_FORMAT: {}. Must be one of: {:?}",
                log_format, valid_log_formats
            ));
        }

        // Validate environment
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&environment.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                environment, valid_environments
            ));
        }

        Ok(Self {
            cycle,
            log_level: log_level.to_lowercase(),
            log_format: log_format.to_lowercase(),
            environment: environment.to_lowercase(),
            snapshot_path,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Check if logs should be emitted as JSON
    pub fn json_logs(&self) -> bool {
        self.log_format == "json"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cycle: CycleConfig::default(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            environment: "development".to_string(),
            snapshot_path: None,
        }
    }
}
