//! Which participants may be entered into the current cycle's draw.

pub mod filter;
pub mod summary;

pub use filter::{assess, build_records, eligible_participant_ids, filter_eligible, is_eligible, Ineligibility};
pub use summary::{summarize, CycleSummary};
