use crate::models::{parse_timestamp, DrawSchedule, DurationUnit};
use chrono::{DateTime, Datelike, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::label::format_cycle_label;

/// How "month" cycles are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthPolicy {
    /// Every month is exactly `MONTH_APPROX_DAYS` long. Keeps cycle numbers
    /// comparable with data produced by the existing backend.
    #[default]
    Approximate,
    /// Calendar months, so a draw started on the 15th rolls over on the 15th.
    Calendar,
}

impl MonthPolicy {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "approximate" | "approx" | "fixed" => Ok(MonthPolicy::Approximate),
            "calendar" => Ok(MonthPolicy::Calendar),
            _ => Err(format!("Invalid month policy: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MonthPolicy::Approximate => "approximate",
            MonthPolicy::Calendar => "calendar",
        }
    }
}

/// A default the resolver had to substitute for a missing or malformed input
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CycleFallback {
    MissingStart,
    UnparseableStart { raw: String },
    MissingUnit,
    UnknownUnit { raw: String },
    MissingValue,
    NonPositiveValue { value: i64 },
    /// `now` is before the schedule start; reported as cycle 1.
    NotStarted,
}

impl CycleFallback {
    /// Whether this fallback hides a configuration problem, as opposed to
    /// simply reflecting the current time
    pub fn is_misconfiguration(&self) -> bool {
        !matches!(self, CycleFallback::NotStarted)
    }
}

impl fmt::Display for CycleFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleFallback::MissingStart => write!(f, "start date missing, using cycle 1"),
            CycleFallback::UnparseableStart { raw } => {
                write!(f, "start date {:?} unparseable, using cycle 1", raw)
            }
            CycleFallback::MissingUnit => write!(f, "duration unit missing, using week"),
            CycleFallback::UnknownUnit { raw } => {
                write!(f, "duration unit {:?} unrecognised, using week", raw)
            }
            CycleFallback::MissingValue => write!(f, "duration value missing, using 1"),
            CycleFallback::NonPositiveValue { value } => {
                write!(f, "duration value {} is not positive, using 1", value)
            }
            CycleFallback::NotStarted => write!(f, "draw has not started yet"),
        }
    }
}

/// Outcome of resolving a schedule against a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleResolution {
    /// Current cycle, always within `1..=max_cycles`
    pub cycle: u32,
    /// Cycle length actually used
    pub unit: DurationUnit,
    /// Unit as declared by the schedule, `None` if missing or unrecognised
    pub declared_unit: Option<DurationUnit>,
    pub max_cycles: u32,
    /// The final cycle's period has elapsed and the result is pinned to it
    pub exhausted: bool,
    pub fallbacks: Vec<CycleFallback>,
}

impl CycleResolution {
    /// True when any input had to be replaced by a default
    pub fn used_default(&self) -> bool {
        self.fallbacks.iter().any(CycleFallback::is_misconfiguration)
    }

    pub fn is_not_started(&self) -> bool {
        self.fallbacks.contains(&CycleFallback::NotStarted)
    }

    /// Whether the resolved cycle is the last one the schedule will run
    pub fn is_final_cycle(&self) -> bool {
        self.cycle == self.max_cycles
    }

    /// Display label such as "Week 3"
    pub fn label(&self) -> String {
        format_cycle_label(self.declared_unit, self.cycle)
    }
}

/// Maps a draw schedule and the current time to the current cycle number.
///
/// The resolver holds no state besides its month policy; calling it twice with
/// the same inputs always yields the same result.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleResolver {
    month_policy: MonthPolicy,
}

impl CycleResolver {
    pub fn new(month_policy: MonthPolicy) -> Self {
        Self { month_policy }
    }

    pub fn month_policy(&self) -> MonthPolicy {
        self.month_policy
    }

    /// Resolve the current cycle. Never fails: malformed inputs degrade to
    /// defaults and are listed in [`CycleResolution::fallbacks`].
    pub fn resolve(&self, schedule: &DrawSchedule, now: DateTime<Utc>) -> CycleResolution {
        let mut fallbacks = Vec::new();

        let declared_unit = match schedule.duration_unit.as_deref() {
            None => {
                fallbacks.push(CycleFallback::MissingUnit);
                None
            }
            Some(raw) => match DurationUnit::from_str(raw) {
                Ok(unit) => Some(unit),
                Err(_) => {
                    fallbacks.push(CycleFallback::UnknownUnit {
                        raw: raw.to_string(),
                    });
                    None
                }
            },
        };
        let unit = declared_unit.unwrap_or(DurationUnit::Week);

        let max_cycles = match schedule.duration_value {
            None => {
                fallbacks.push(CycleFallback::MissingValue);
                1
            }
            Some(value) if value < 1 => {
                fallbacks.push(CycleFallback::NonPositiveValue { value });
                1
            }
            Some(value) => u32::try_from(value).unwrap_or(u32::MAX),
        };

        let mut resolution = CycleResolution {
            cycle: 1,
            unit,
            declared_unit,
            max_cycles,
            exhausted: false,
            fallbacks,
        };

        let start = match schedule.start_at.as_deref().map(str::trim) {
            None | Some("") => {
                resolution.fallbacks.push(CycleFallback::MissingStart);
                return Self::finish(schedule, resolution);
            }
            Some(raw) => match parse_timestamp(raw) {
                Some(start) => start,
                None => {
                    resolution.fallbacks.push(CycleFallback::UnparseableStart {
                        raw: raw.to_string(),
                    });
                    return Self::finish(schedule, resolution);
                }
            },
        };

        if now < start {
            resolution.fallbacks.push(CycleFallback::NotStarted);
            return Self::finish(schedule, resolution);
        }

        let current = self.elapsed_cycles(unit, start, now).saturating_add(1);
        let cap = u64::from(max_cycles);

        resolution.exhausted = current > cap;
        // min(cap) keeps the value within u32; max(1) guards the lower bound
        resolution.cycle = u32::try_from(current.min(cap).max(1)).unwrap_or(max_cycles);

        Self::finish(schedule, resolution)
    }

    /// Instant at which the given cycle begins, or `None` if the schedule has
    /// no usable start date
    pub fn cycle_start(&self, schedule: &DrawSchedule, cycle: u32) -> Option<DateTime<Utc>> {
        let start = schedule.start_at_utc()?;
        self.boundary(schedule.unit_or_default(), start, cycle.saturating_sub(1))
    }

    /// Instant at which the given cycle ends (the next cycle's start)
    pub fn cycle_end(&self, schedule: &DrawSchedule, cycle: u32) -> Option<DateTime<Utc>> {
        let start = schedule.start_at_utc()?;
        self.boundary(schedule.unit_or_default(), start, cycle)
    }

    /// Number of whole cycles between `start` and `now` (`now >= start`)
    fn elapsed_cycles(&self, unit: DurationUnit, start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
        match (unit, self.month_policy) {
            (DurationUnit::Month, MonthPolicy::Calendar) => calendar_months_between(start, now),
            _ => {
                let length_ms = unit.approx_length().num_milliseconds();
                let elapsed_ms = (now - start).num_milliseconds();
                u64::try_from(elapsed_ms / length_ms).unwrap_or(0)
            }
        }
    }

    /// `start` shifted forward by `cycles` whole cycles
    fn boundary(
        &self,
        unit: DurationUnit,
        start: DateTime<Utc>,
        cycles: u32,
    ) -> Option<DateTime<Utc>> {
        match (unit, self.month_policy) {
            (DurationUnit::Month, MonthPolicy::Calendar) => {
                start.checked_add_months(Months::new(cycles))
            }
            _ => {
                let length_ms = unit
                    .approx_length()
                    .num_milliseconds()
                    .checked_mul(i64::from(cycles))?;
                start.checked_add_signed(chrono::Duration::milliseconds(length_ms))
            }
        }
    }

    fn finish(schedule: &DrawSchedule, resolution: CycleResolution) -> CycleResolution {
        for fallback in &resolution.fallbacks {
            debug!("Schedule {}: {}", schedule.id, fallback);
        }
        resolution
    }
}

/// Resolve the current cycle with the default (30-day month) policy
pub fn resolve_cycle(schedule: &DrawSchedule, now: DateTime<Utc>) -> u32 {
    CycleResolver::default().resolve(schedule, now).cycle
}

fn calendar_months_between(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let span = (now.year() - start.year()) * 12 + (now.month() as i32 - start.month() as i32);
    let mut months = u32::try_from(span).unwrap_or(0);

    // Day-of-month and time may not have caught up yet
    while months > 0 {
        match start.checked_add_months(Months::new(months)) {
            Some(boundary) if boundary <= now => break,
            _ => months -= 1,
        }
    }

    u64::from(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn schedule(start: Option<&str>, unit: Option<&str>, value: Option<i64>) -> DrawSchedule {
        DrawSchedule {
            id: Uuid::new_v4(),
            name: "Test draw".to_string(),
            start_at: start.map(str::to_string),
            duration_unit: unit.map(str::to_string),
            duration_value: value,
        }
    }

    fn weekly() -> DrawSchedule {
        schedule(Some("2024-01-01T00:00:00Z"), Some("week"), Some(4))
    }

    #[test]
    fn test_cycle_one_at_start() {
        let s = weekly();
        assert_eq!(resolve_cycle(&s, at(2024, 1, 1, 0, 0, 0)), 1);
    }

    #[test]
    fn test_one_week_and_a_second() {
        let s = weekly();
        let resolution = CycleResolver::default().resolve(&s, at(2024, 1, 8, 0, 0, 1));
        assert_eq!(resolution.cycle, 2);
        assert!(!resolution.exhausted);
        assert!(resolution.fallbacks.is_empty());
        assert_eq!(resolution.label(), "Week 2");
    }

    #[test]
    fn test_cycle_boundary_is_exclusive() {
        let s = weekly();
        assert_eq!(resolve_cycle(&s, at(2024, 1, 7, 23, 59, 59)), 1);
        assert_eq!(resolve_cycle(&s, at(2024, 1, 8, 0, 0, 0)), 2);
    }

    #[test]
    fn test_clamped_to_duration_value() {
        let s = weekly();
        let resolution = CycleResolver::default().resolve(&s, at(2024, 2, 1, 0, 0, 0));
        assert_eq!(resolution.cycle, 4);
        assert!(resolution.exhausted);
        assert!(resolution.is_final_cycle());
        assert!(!resolution.used_default());
    }

    #[test]
    fn test_final_cycle_not_yet_exhausted() {
        let s = weekly();
        let resolution = CycleResolver::default().resolve(&s, at(2024, 1, 22, 0, 0, 0));
        assert_eq!(resolution.cycle, 4);
        assert!(!resolution.exhausted);
    }

    #[test]
    fn test_missing_start_is_cycle_one() {
        let s = schedule(None, Some("day"), Some(10));
        for now in [at(2000, 1, 1, 0, 0, 0), at(2030, 6, 1, 12, 0, 0)] {
            let resolution = CycleResolver::default().resolve(&s, now);
            assert_eq!(resolution.cycle, 1);
            assert_eq!(resolution.fallbacks, vec![CycleFallback::MissingStart]);
            assert!(resolution.used_default());
        }
    }

    #[test]
    fn test_unparseable_start_is_cycle_one() {
        let s = schedule(Some("soon"), Some("day"), Some(10));
        let resolution = CycleResolver::default().resolve(&s, at(2024, 5, 1, 0, 0, 0));
        assert_eq!(resolution.cycle, 1);
        assert_eq!(
            resolution.fallbacks,
            vec![CycleFallback::UnparseableStart {
                raw: "soon".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_unit_uses_week() {
        let s = schedule(Some("2024-01-01T00:00:00Z"), Some("fortnight"), Some(10));
        let resolution = CycleResolver::default().resolve(&s, at(2024, 1, 15, 0, 0, 0));
        assert_eq!(resolution.cycle, 3);
        assert_eq!(resolution.unit, DurationUnit::Week);
        assert_eq!(resolution.declared_unit, None);
        assert!(resolution.used_default());
        assert_eq!(resolution.label(), "Cycle 3");
    }

    #[test]
    fn test_non_positive_value_caps_at_one() {
        let s = schedule(Some("2024-01-01T00:00:00Z"), Some("day"), Some(-3));
        let resolution = CycleResolver::default().resolve(&s, at(2024, 3, 1, 0, 0, 0));
        assert_eq!(resolution.cycle, 1);
        assert_eq!(resolution.max_cycles, 1);
        assert!(resolution
            .fallbacks
            .contains(&CycleFallback::NonPositiveValue { value: -3 }));
    }

    #[test]
    fn test_before_start_never_below_one() {
        let s = weekly();
        let resolution = CycleResolver::default().resolve(&s, at(2023, 12, 1, 0, 0, 0));
        assert_eq!(resolution.cycle, 1);
        assert!(resolution.is_not_started());
        assert!(!resolution.used_default());
    }

    #[test]
    fn test_day_and_month_lengths() {
        let daily = schedule(Some("2024-01-01T00:00:00Z"), Some("day"), Some(100));
        assert_eq!(resolve_cycle(&daily, at(2024, 1, 3, 12, 0, 0)), 3);

        // 30-day months: Jan 31 is day 30 after Jan 1, so cycle 2 already
        let monthly = schedule(Some("2024-01-01T00:00:00Z"), Some("month"), Some(12));
        assert_eq!(resolve_cycle(&monthly, at(2024, 1, 30, 23, 59, 59)), 1);
        assert_eq!(resolve_cycle(&monthly, at(2024, 1, 31, 0, 0, 0)), 2);
    }

    #[test]
    fn test_calendar_month_policy() {
        let monthly = schedule(Some("2024-01-31T00:00:00Z"), Some("month"), Some(12));
        let resolver = CycleResolver::new(MonthPolicy::Calendar);

        assert_eq!(resolver.resolve(&monthly, at(2024, 2, 28, 0, 0, 0)).cycle, 1);
        assert_eq!(resolver.resolve(&monthly, at(2024, 2, 29, 0, 0, 0)).cycle, 2);
        assert_eq!(resolver.resolve(&monthly, at(2024, 3, 30, 23, 0, 0)).cycle, 2);
        assert_eq!(resolver.resolve(&monthly, at(2024, 3, 31, 0, 0, 0)).cycle, 3);

        // Policy only affects month cycles
        let s = weekly();
        assert_eq!(resolver.resolve(&s, at(2024, 1, 8, 0, 0, 1)).cycle, 2);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let schedules = [
            weekly(),
            schedule(Some("2024-01-01T00:00:00Z"), Some("day"), Some(45)),
            schedule(Some("2024-01-01T00:00:00Z"), Some("month"), Some(5)),
            schedule(Some("2024-01-01T00:00:00Z"), Some("bogus"), Some(3)),
        ];

        for policy in [MonthPolicy::Approximate, MonthPolicy::Calendar] {
            let resolver = CycleResolver::new(policy);
            for s in &schedules {
                let mut now = at(2023, 12, 25, 0, 0, 0);
                let mut previous = 0;
                while now < at(2024, 8, 1, 0, 0, 0) {
                    let resolution = resolver.resolve(s, now);
                    assert!(resolution.cycle >= 1);
                    assert!(resolution.cycle <= resolution.max_cycles);
                    assert!(resolution.cycle >= previous);
                    previous = resolution.cycle;
                    now += chrono::Duration::hours(13);
                }
            }
        }
    }

    #[test]
    fn test_cycle_start_and_end() {
        let s = weekly();
        let resolver = CycleResolver::default();
        assert_eq!(resolver.cycle_start(&s, 1), Some(at(2024, 1, 1, 0, 0, 0)));
        assert_eq!(resolver.cycle_start(&s, 3), Some(at(2024, 1, 15, 0, 0, 0)));
        assert_eq!(resolver.cycle_end(&s, 3), Some(at(2024, 1, 22, 0, 0, 0)));

        let missing = schedule(None, Some("week"), Some(4));
        assert_eq!(resolver.cycle_start(&missing, 1), None);
    }

    #[test]
    fn test_month_policy_parse() {
        assert_eq!(MonthPolicy::from_str("Calendar").unwrap(), MonthPolicy::Calendar);
        assert_eq!(MonthPolicy::from_str("approximate").unwrap(), MonthPolicy::Approximate);
        assert!(MonthPolicy::from_str("lunar").is_err());
        assert_eq!(MonthPolicy::default(), MonthPolicy::Approximate);
    }
}
