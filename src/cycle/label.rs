use crate::models::DurationUnit;

/// Human-readable cycle label, e.g. "Week 3". Falls back to "Cycle 3" when the
/// schedule does not declare a unit.
pub fn format_cycle_label(unit: Option<DurationUnit>, cycle: u32) -> String {
    let prefix = unit.map(|u| u.label()).unwrap_or("Cycle");
    format!("{} {}", prefix, cycle)
}

/// Countdown text shown next to the cycle label.
///
/// `"2d 03:04:05"` when at least a day remains, `"03:04:05"` otherwise.
/// Negative durations render as zero.
pub fn format_countdown(remaining: chrono::Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}
