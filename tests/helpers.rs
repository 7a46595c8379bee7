#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use luckydraw_engine::clock::FixedClock;
use luckydraw_engine::cycle::CycleResolver;
use luckydraw_engine::models::*;
use luckydraw_engine::services::DrawService;
use luckydraw_engine::snapshot::DrawSnapshot;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

pub const ALICE: &str = "a1111111-1111-4111-8111-111111111111";
pub const DAVID: &str = "d4444444-4444-4444-8444-444444444444";
pub const DAVID_PAYMENT: &str = "e0000000-0000-4000-8000-000000000005";

/// Path of a file under `fixtures/`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

/// The sample weekly draw starting 2024-01-01
pub fn sample_snapshot() -> DrawSnapshot {
    DrawSnapshot::load(&fixture_path("sample_draw.json")).expect("Failed to load sample snapshot")
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

pub fn uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap()
}

pub fn raw_schedule(start: Option<&str>, unit: Option<&str>, value: Option<i64>) -> DrawSchedule {
    DrawSchedule {
        id: Uuid::new_v4(),
        name: "Test draw".to_string(),
        start_at: start.map(str::to_string),
        duration_unit: unit.map(str::to_string),
        duration_value: value,
    }
}

/// Service over the sample snapshot with a controllable clock
pub fn sample_service(now: DateTime<Utc>) -> (Arc<DrawService>, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(now));
    let service = Arc::new(DrawService::new(
        sample_snapshot(),
        CycleResolver::default(),
        clock.clone(),
    ));
    (service, clock)
}
