use crate::models::DrawSchedule;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::resolver::{CycleResolution, CycleResolver};

/// Time span covered by a resolved cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleWindow {
    pub cycle: u32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Time left until `ends_at`, zero once it has passed. Before the draw
    /// starts this counts down to `starts_at` instead.
    #[serde(serialize_with = "serialize_seconds")]
    pub remaining: chrono::Duration,
}

impl CycleWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.starts_at <= at && at < self.ends_at
    }

    pub fn has_ended(&self) -> bool {
        self.remaining <= chrono::Duration::zero()
    }
}

impl CycleResolver {
    /// Window of the resolved cycle, `None` when the schedule has no usable
    /// start date
    pub fn window(
        &self,
        schedule: &DrawSchedule,
        resolution: &CycleResolution,
        now: DateTime<Utc>,
    ) -> Option<CycleWindow> {
        let starts_at = self.cycle_start(schedule, resolution.cycle)?;
        let ends_at = self.cycle_end(schedule, resolution.cycle)?;
        let target = if resolution.is_not_started() {
            starts_at
        } else {
            ends_at
        };
        let remaining = (target - now).max(chrono::Duration::zero());

        Some(CycleWindow {
            cycle: resolution.cycle,
            starts_at,
            ends_at,
            remaining,
        })
    }
}

fn serialize_seconds<S>(duration: &chrono::Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(duration.num_seconds())
}
