use crate::models::{EligibilityRecord, Participant, PaymentRecord};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;
use uuid::Uuid;

/// Reason a record cannot be entered into the current draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Ineligibility {
    WrongCycle { expected: u32, actual: i64 },
    PaymentUnverified,
    ParticipantUnverified,
    AlreadyWon,
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::WrongCycle { expected, actual } => {
                write!(f, "payment is for cycle {}, current cycle is {}", actual, expected)
            }
            Ineligibility::PaymentUnverified => write!(f, "payment not verified"),
            Ineligibility::ParticipantUnverified => write!(f, "participant not verified"),
            Ineligibility::AlreadyWon => write!(f, "participant has already won"),
        }
    }
}

/// Every reason `record` is excluded from the draw for `current_cycle`.
/// An empty list means the record is eligible.
pub fn assess(record: &EligibilityRecord, current_cycle: u32) -> Vec<Ineligibility> {
    let mut reasons = Vec::new();

    if record.cycle_number != i64::from(current_cycle) {
        reasons.push(Ineligibility::WrongCycle {
            expected: current_cycle,
            actual: record.cycle_number,
        });
    }
    if !record.payment_verified {
        reasons.push(Ineligibility::PaymentUnverified);
    }
    if !record.participant_verified {
        reasons.push(Ineligibility::ParticipantUnverified);
    }
    if record.has_won {
        reasons.push(Ineligibility::AlreadyWon);
    }

    reasons
}

pub fn is_eligible(record: &EligibilityRecord, current_cycle: u32) -> bool {
    record.cycle_number == i64::from(current_cycle)
        && record.payment_verified
        && record.participant_verified
        && !record.has_won
}

/// Records eligible for the current cycle's draw, in input order.
///
/// An empty result is a normal outcome ("no eligible participants").
pub fn filter_eligible(current_cycle: u32, records: &[EligibilityRecord]) -> Vec<EligibilityRecord> {
    records
        .iter()
        .filter(|record| is_eligible(record, current_cycle))
        .copied()
        .collect()
}

/// Participant ids eligible for the current cycle, in input order
pub fn eligible_participant_ids(current_cycle: u32, records: &[EligibilityRecord]) -> Vec<Uuid> {
    records
        .iter()
        .filter(|record| is_eligible(record, current_cycle))
        .map(|record| record.participant_id)
        .collect()
}

/// Join payments to their participants, keeping payment order.
///
/// Payments that reference an unknown participant are skipped.
pub fn build_records(payments: &[PaymentRecord], participants: &[Participant]) -> Vec<EligibilityRecord> {
    let by_id: HashMap<Uuid, &Participant> = participants.iter().map(|p| (p.id, p)).collect();

    payments
        .iter()
        .filter_map(|payment| match by_id.get(&payment.participant_id) {
            Some(participant) => Some(EligibilityRecord::from_parts(payment, participant)),
            None => {
                warn!(
                    "Payment {} references unknown participant {}, skipping",
                    payment.id, payment.participant_id
                );
                None
            }
        })
        .collect()
}
