use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of days one "month" cycle lasts under the approximate month policy.
///
/// Historical cycle numbers were produced with this fixed length, so it is not
/// a calendar month.
pub const MONTH_APPROX_DAYS: i64 = 30;

/// Unit of time that defines the length of one draw cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Day,
    Week,
    Month,
}

impl DurationUnit {
    /// Strict conversion from the backend string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "day" | "days" | "daily" => Ok(DurationUnit::Day),
            "week" | "weeks" | "weekly" => Ok(DurationUnit::Week),
            "month" | "months" | "monthly" => Ok(DurationUnit::Month),
            _ => Err(format!("Invalid duration unit: {}", s)),
        }
    }

    /// Convert to backend string
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Day => "day",
            DurationUnit::Week => "week",
            DurationUnit::Month => "month",
        }
    }

    /// Capitalized name used in cycle labels
    pub fn label(&self) -> &'static str {
        match self {
            DurationUnit::Day => "Day",
            DurationUnit::Week => "Week",
            DurationUnit::Month => "Month",
        }
    }

    /// Fixed length of one cycle in days (months use [`MONTH_APPROX_DAYS`])
    pub fn approx_days(&self) -> i64 {
        match self {
            DurationUnit::Day => 1,
            DurationUnit::Week => 7,
            DurationUnit::Month => MONTH_APPROX_DAYS,
        }
    }

    /// Fixed length of one cycle as a chrono duration
    pub fn approx_length(&self) -> chrono::Duration {
        chrono::Duration::days(self.approx_days())
    }
}

impl From<DurationUnit> for String {
    fn from(unit: DurationUnit) -> Self {
        unit.as_str().to_string()
    }
}

/// Timing rules of one recurring draw, as delivered by the backend.
///
/// Fields are kept raw because the backend may send missing or malformed
/// values; interpretation happens in the accessors below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawSchedule {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub duration_unit: Option<String>,
    #[serde(default)]
    pub duration_value: Option<i64>,
}

impl DrawSchedule {
    /// Create a new schedule with a well-formed start date
    pub fn new(
        name: String,
        start_at: DateTime<Utc>,
        duration_unit: DurationUnit,
        duration_value: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            start_at: Some(start_at.to_rfc3339()),
            duration_unit: Some(duration_unit.as_str().to_string()),
            duration_value: Some(duration_value),
        }
    }

    /// Parsed start timestamp, `None` when absent or unparseable
    pub fn start_at_utc(&self) -> Option<DateTime<Utc>> {
        self.start_at.as_deref().and_then(parse_timestamp)
    }

    /// Duration unit if the backend sent a recognised one
    pub fn unit_enum(&self) -> Option<DurationUnit> {
        self.duration_unit
            .as_deref()
            .and_then(|s| DurationUnit::from_str(s).ok())
    }

    /// Duration unit with the Week fallback applied
    pub fn unit_or_default(&self) -> DurationUnit {
        self.unit_enum().unwrap_or(DurationUnit::Week)
    }

    /// Maximum number of cycles, at least 1
    pub fn max_cycles(&self) -> u32 {
        match self.duration_value {
            Some(v) if v >= 1 => u32::try_from(v).unwrap_or(u32::MAX),
            _ => 1,
        }
    }

    /// Apply an administrative edit of the cycle length and cap
    pub fn set_duration(&mut self, unit: DurationUnit, value: i64) -> Result<(), String> {
        if value < 1 {
            return Err("Duration value must be at least 1".to_string());
        }
        self.duration_unit = Some(unit.as_str().to_string());
        self.duration_value = Some(value);
        Ok(())
    }
}

/// Parse the timestamp formats the backend is known to emit.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
