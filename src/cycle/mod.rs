//! Cycle resolution for recurring draws.
//!
//! Everything here is a pure function of a schedule and an instant.

pub mod label;
pub mod resolver;
pub mod status;
pub mod window;

pub use label::{format_countdown, format_cycle_label};
pub use resolver::{resolve_cycle, CycleFallback, CycleResolution, CycleResolver, MonthPolicy};
pub use status::CycleStatus;
pub use window::CycleWindow;
