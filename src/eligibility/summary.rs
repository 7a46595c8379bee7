use crate::models::{EligibilityRecord, PaymentRecord};
use rust_decimal::Decimal;
use serde::Serialize;

use super::filter::is_eligible;

/// Payment tracking figures for one cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSummary {
    pub cycle: u32,
    pub total_payments: usize,
    pub verified_payments: usize,
    pub pending_payments: usize,
    pub verified_amount: Decimal,
    pub eligible_entries: usize,
}

/// Summarize payments and eligible entries for `cycle`
pub fn summarize(cycle: u32, payments: &[PaymentRecord], records: &[EligibilityRecord]) -> CycleSummary {
    let in_cycle: Vec<&PaymentRecord> = payments.iter().filter(|p| p.is_for_cycle(cycle)).collect();
    let verified: Vec<&&PaymentRecord> = in_cycle.iter().filter(|p| p.is_verified).collect();

    CycleSummary {
        cycle,
        total_payments: in_cycle.len(),
        verified_payments: verified.len(),
        pending_payments: in_cycle.len() - verified.len(),
        verified_amount: verified.iter().map(|p| p.amount).sum(),
        eligible_entries: records.iter().filter(|r| is_eligible(r, cycle)).count(),
    }
}
