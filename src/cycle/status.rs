use crate::models::DrawSchedule;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::label::format_countdown;
use super::resolver::{CycleResolution, CycleResolver};
use super::window::CycleWindow;

/// Everything a page needs to display the current cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStatus {
    pub resolution: CycleResolution,
    pub label: String,
    pub window: Option<CycleWindow>,
    /// Formatted time left in the current cycle, `None` without a start date
    pub countdown: Option<String>,
    pub evaluated_at: DateTime<Utc>,
}

impl CycleStatus {
    pub fn evaluate(resolver: &CycleResolver, schedule: &DrawSchedule, now: DateTime<Utc>) -> Self {
        let resolution = resolver.resolve(schedule, now);
        let window = resolver.window(schedule, &resolution, now);
        let countdown = window.as_ref().map(|w| format_countdown(w.remaining));

        Self {
            label: resolution.label(),
            resolution,
            window,
            countdown,
            evaluated_at: now,
        }
    }

    pub fn cycle(&self) -> u32 {
        self.resolution.cycle
    }
}
