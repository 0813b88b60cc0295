use crate::decimal::{Money, Rate};
use crate::types::PmiPolicy;

/// balance at or below which pmi is cancelled
pub fn cancellation_threshold(property_price: Money, cancellation_ltv: Rate) -> Money {
    property_price.apply(cancellation_ltv)
}

/// first period whose opening balance is at or below the threshold
///
/// `opening_balances` yields balances in period order starting at period 1.
pub fn first_cancellation_period<I>(opening_balances: I, threshold: Money) -> Option<u32>
where
    I: IntoIterator<Item = Money>,
{
    opening_balances
        .into_iter()
        .zip(1..)
        .find(|(balance, _)| *balance <= threshold)
        .map(|(_, period)| period)
}

/// whether pmi is charged in `period`
///
/// Under `CancelAtThreshold` pmi runs strictly before the first
/// cancellation period and stops from it onward. A threshold that is
/// never reached keeps pmi on for the whole schedule.
pub fn is_pmi_active(period: u32, policy: PmiPolicy, first_cancellation_period: Option<u32>) -> bool {
    match policy {
        PmiPolicy::ChargeForLife => true,
        PmiPolicy::CancelAtThreshold => match first_cancellation_period {
            Some(cancel_at) => period < cancel_at,
            None => true,
        },
    }
}

/// pmi decisions for a single schedule run
///
/// Balances only ever fall, so the first period that reaches the threshold
/// is fixed the moment it is observed.
#[derive(Debug, Clone)]
pub struct PmiTracker {
    policy: PmiPolicy,
    threshold: Option<Money>,
    enabled: bool,
    cancelled_at: Option<u32>,
}

impl PmiTracker {
    pub fn new(policy: PmiPolicy, monthly_pmi: Money, threshold: Option<Money>) -> Self {
        Self {
            policy,
            threshold,
            enabled: monthly_pmi.is_positive(),
            cancelled_at: None,
        }
    }

    /// record the opening balance of `period` and decide whether pmi applies
    pub fn observe(&mut self, period: u32, opening_balance: Money) -> bool {
        if !self.enabled {
            return false;
        }

        if self.cancelled_at.is_none() {
            if let Some(threshold) = self.threshold {
                self.cancelled_at = first_cancellation_period([opening_balance], threshold).map(|_| period);
            }
        }

        is_pmi_active(period, self.policy, self.cancelled_at)
    }

    /// period pmi stopped, if it applied and stopped within the run
    pub fn cancellation_period(&self) -> Option<u32> {
        match (self.enabled, self.policy) {
            (true, PmiPolicy::CancelAtThreshold) => self.cancelled_at,
            _ => None,
        }
    }
}
