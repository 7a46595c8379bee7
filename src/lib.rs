//! Lucky Draw Engine Library
//!
//! Cycle resolution and eligibility filtering for recurring lucky draws.
//! Storage, winner selection and payment submission belong to the backend;
//! this crate only derives values from a snapshot of its data.

pub mod clock;
pub mod config;
pub mod cycle;
pub mod eligibility;
pub mod error;
pub mod models;
pub mod services;
pub mod snapshot;

// Re-export commonly used types
pub use config::AppConfig;
pub use cycle::{resolve_cycle, CycleResolution, CycleResolver, CycleStatus, MonthPolicy};
pub use eligibility::{eligible_participant_ids, filter_eligible};
pub use error::{AppError, AppResult};
pub use snapshot::DrawSnapshot;
