pub mod draw_service;
pub mod ticker;

pub use draw_service::DrawService;
pub use ticker::{cycle_events, CycleEvent, CycleTicker};
