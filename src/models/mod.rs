//! Domain models for the lucky-draw engine.
//!
//! These mirror the records the backend hands out; nothing here is persisted
//! by this crate.

pub mod entry;
pub mod participant;
pub mod payment;
pub mod schedule;

pub use entry::EligibilityRecord;
pub use participant::Participant;
pub use payment::PaymentRecord;
pub use schedule::{parse_timestamp, DrawSchedule, DurationUnit, MONTH_APPROX_DAYS};
