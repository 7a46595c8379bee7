use crate::clock::{Clock, SystemClock};
use crate::cycle::{CycleResolution, CycleResolver, CycleStatus};
use crate::eligibility::{self, CycleSummary, Ineligibility};
use crate::error::{AppError, AppResult};
use crate::models::{DrawSchedule, DurationUnit, EligibilityRecord, Participant, PaymentRecord};
use crate::snapshot::DrawSnapshot;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Service answering cycle and eligibility questions for one draw
pub struct DrawService {
    snapshot: Arc<RwLock<DrawSnapshot>>,
    resolver: CycleResolver,
    clock: Arc<dyn Clock>,
}

impl DrawService {
    pub fn new(snapshot: DrawSnapshot, resolver: CycleResolver, clock: Arc<dyn Clock>) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
            resolver,
            clock,
        }
    }

    /// Create a service driven by the wall clock
    pub fn with_system_clock(snapshot: DrawSnapshot, resolver: CycleResolver) -> Self {
        Self::new(snapshot, resolver, Arc::new(SystemClock))
    }

    pub async fn schedule(&self) -> DrawSchedule {
        self.snapshot.read().await.schedule.clone()
    }

    /// Resolve the current cycle
    pub async fn current_cycle(&self) -> CycleResolution {
        let snapshot = self.snapshot.read().await;
        self.resolver.resolve(&snapshot.schedule, self.clock.now())
    }

    pub async fn cycle_label(&self) -> String {
        self.current_cycle().await.label()
    }

    /// Current cycle with its window and countdown
    pub async fn cycle_status(&self) -> CycleStatus {
        let snapshot = self.snapshot.read().await;
        CycleStatus::evaluate(&self.resolver, &snapshot.schedule, self.clock.now())
    }

    /// Records eligible for the current cycle's draw, in payment order
    pub async fn eligible_records(&self) -> Vec<EligibilityRecord> {
        let snapshot = self.snapshot.read().await;
        self.eligible_in(&snapshot)
    }

    /// Participants eligible for the current cycle, each listed once
    pub async fn eligible_participants(&self) -> Vec<Participant> {
        // Records and participant lookup must come from the same snapshot
        let snapshot = self.snapshot.read().await;
        let eligible = self.eligible_in(&snapshot);

        let mut seen = HashSet::new();
        eligible
            .iter()
            .filter(|record| seen.insert(record.participant_id))
            .filter_map(|record| snapshot.participant(record.participant_id).cloned())
            .collect()
    }

    fn eligible_in(&self, snapshot: &DrawSnapshot) -> Vec<EligibilityRecord> {
        let cycle = self.resolver.resolve(&snapshot.schedule, self.clock.now()).cycle;
        let records = eligibility::build_records(&snapshot.payments, &snapshot.participants);
        eligibility::filter_eligible(cycle, &records)
    }

    /// Why a payment's participant is or is not in the current draw
    pub async fn explain(&self, payment_id: Uuid) -> AppResult<Vec<Ineligibility>> {
        let snapshot = self.snapshot.read().await;
        let cycle = self.resolver.resolve(&snapshot.schedule, self.clock.now()).cycle;

        let payment = snapshot
            .payments
            .iter()
            .find(|p| p.id == payment_id)
            .ok_or_else(|| AppError::NotFound(format!("Payment {} not found", payment_id)))?;
        let participant = snapshot.participant(payment.participant_id).ok_or_else(|| {
            AppError::NotFound(format!("Participant {} not found", payment.participant_id))
        })?;

        let record = EligibilityRecord::from_parts(payment, participant);
        Ok(eligibility::assess(&record, cycle))
    }

    /// Payment tracking figures for the current cycle
    pub async fn summary(&self) -> CycleSummary {
        let snapshot = self.snapshot.read().await;
        let cycle = self.resolver.resolve(&snapshot.schedule, self.clock.now()).cycle;
        let records = eligibility::build_records(&snapshot.payments, &snapshot.participants);
        eligibility::summarize(cycle, &snapshot.payments, &records)
    }

    /// Verify or unverify a payment. This is the only way verification
    /// changes.
    pub async fn set_payment_verified(&self, payment_id: Uuid, verified: bool) -> AppResult<PaymentRecord> {
        let mut snapshot = self.snapshot.write().await;
        let payment = snapshot
            .payment_mut(payment_id)
            .ok_or_else(|| AppError::NotFound(format!("Payment {} not found", payment_id)))?;

        payment.is_verified = verified;
        info!(
            "Payment {} for cycle {} marked {}",
            payment_id,
            payment.cycle_number,
            if verified { "verified" } else { "unverified" }
        );
        Ok(payment.clone())
    }

    /// Edit the cycle length and cap. Later resolutions use the new values;
    /// cycle numbers already stored on payments are left untouched.
    pub async fn update_duration(&self, unit: &str, value: i64) -> AppResult<DrawSchedule> {
        let unit = DurationUnit::from_str(unit).map_err(AppError::Validation)?;

        let mut snapshot = self.snapshot.write().await;
        snapshot
            .schedule
            .set_duration(unit, value)
            .map_err(AppError::Validation)?;

        info!(
            "Schedule {} duration set to {} x {}",
            snapshot.schedule.id,
            value,
            unit.as_str()
        );
        Ok(snapshot.schedule.clone())
    }

    /// Swap in a fresh snapshot from the backend
    pub async fn replace_snapshot(&self, snapshot: DrawSnapshot) {
        let mut current = self.snapshot.write().await;
        info!(
            "Replacing draw snapshot {} ({} payments)",
            snapshot.schedule.id,
            snapshot.payments.len()
        );
        *current = snapshot;
    }
}
