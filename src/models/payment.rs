use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One participant's payment obligation for one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: Uuid,
    pub participant_id: Uuid,
    /// Cycle this payment was submitted for. Supplied by the backend and
    /// compared against the live cycle, never assumed to be current.
    pub cycle_number: i64,
    #[serde(default)]
    pub is_verified: bool,
    pub amount: Decimal,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl PaymentRecord {
    /// Create a new unverified payment
    pub fn new(participant_id: Uuid, cycle_number: i64, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            participant_id,
            cycle_number,
            is_verified: false,
            amount,
            submitted_at: Some(Utc::now()),
        }
    }

    /// Whether this payment belongs to the given cycle
    pub fn is_for_cycle(&self, cycle: u32) -> bool {
        self.cycle_number == i64::from(cycle)
    }

    /// Validate that the payment amounts are consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.cycle_number < 1 {
            return Err("Cycle number must be at least 1".to_string());
        }
        if self.amount < Decimal::ZERO {
            return Err("Amount must not be negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_payment_is_unverified() {
        let payment = PaymentRecord::new(Uuid::new_v4(), 2, Decimal::new(5000, 2));
        assert!(!payment.is_verified);
        assert!(payment.is_for_cycle(2));
        assert!(!payment.is_for_cycle(3));
        assert!(payment.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut payment = PaymentRecord::new(Uuid::new_v4(), 0, Decimal::new(10, 0));
        assert!(payment.validate().is_err());

        payment.cycle_number = 1;
        payment.amount = Decimal::new(-1, 0);
        assert!(payment.validate().is_err());
    }
}
