//! Draw data as exported by the backend.

use crate::error::AppResult;
use crate::models::{DrawSchedule, Participant, PaymentRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// One consistent view of a draw: its schedule, participants and payments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawSnapshot {
    pub schedule: DrawSchedule,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
}

impl DrawSnapshot {
    pub fn new(schedule: DrawSchedule) -> Self {
        Self {
            schedule,
            participants: Vec::new(),
            payments: Vec::new(),
        }
    }

    /// Parse a snapshot from its JSON form
    pub fn from_json(json: &str) -> AppResult<Self> {
        let snapshot: DrawSnapshot = serde_json::from_str(json)?;

        for payment in &snapshot.payments {
            if let Err(e) = payment.validate() {
                warn!("Payment {} in snapshot is inconsistent: {}", payment.id, e);
            }
        }

        Ok(snapshot)
    }

    /// Load a snapshot from a JSON file
    pub fn load(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path)?;

        let snapshot = Self::from_json(&json)?;
        info!(
            "Loaded draw snapshot {} ({} participants, {} payments)",
            snapshot.schedule.id,
            snapshot.participants.len(),
            snapshot.payments.len()
        );
        Ok(snapshot)
    }

    pub fn participant(&self, id: uuid::Uuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn payment_mut(&mut self, id: uuid::Uuid) -> Option<&mut PaymentRecord> {
        self.payments.iter_mut().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_from_json_minimal() {
        let json = r#"{
            "schedule": {
                "id": "0b7f5f0e-1a6f-4f59-9a62-0d8a1f6f3c11",
                "startAt": null,
                "durationUnit": "week"
            }
        }"#;
        let snapshot = DrawSnapshot::from_json(json).unwrap();
        assert!(snapshot.participants.is_empty());
        assert!(snapshot.payments.is_empty());
        assert!(snapshot.schedule.start_at.is_none());
        assert!(snapshot.schedule.duration_value.is_none());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = DrawSnapshot::from_json("{ not json").unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = DrawSnapshot::load(Path::new("/nonexistent/draw.json")).unwrap_err();
        match err {
            AppError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }
}
