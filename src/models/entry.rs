use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Participant, PaymentRecord};

/// Snapshot of one payment joined with its participant, as seen by the
/// eligibility filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRecord {
    pub payment_id: Uuid,
    pub participant_id: Uuid,
    pub cycle_number: i64,
    pub payment_verified: bool,
    pub participant_verified: bool,
    pub has_won: bool,
}

impl EligibilityRecord {
    pub fn from_parts(payment: &PaymentRecord, participant: &Participant) -> Self {
        Self {
            payment_id: payment.id,
            participant_id: participant.id,
            cycle_number: payment.cycle_number,
            payment_verified: payment.is_verified,
            participant_verified: participant.is_verified,
            has_won: participant.has_won,
        }
    }
}
