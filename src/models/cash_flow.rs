//! Cash-flow series used by the effective-rate solver.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Equally spaced monthly cash flows, starting at time zero.
///
/// A loan series is one positive disbursement followed by negative
/// repayments. The series is built once and read by the solver.
///
/// # Example
///
/// ```
/// use estimator_engine::models::CashFlowSeries;
/// use rust_decimal_macros::dec;
///
/// let series = CashFlowSeries::loan(dec!(1000), dec!(110), 10);
/// assert_eq!(series.len(), 11);
/// assert_eq!(series.flows()[0], dec!(1000));
/// assert_eq!(series.flows()[10], dec!(-110));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSeries {
    flows: Vec<Decimal>,
}

impl CashFlowSeries {
    /// Wraps an arbitrary ordered series.
    pub fn new(flows: Vec<Decimal>) -> Self {
        Self { flows }
    }

    /// A disbursement followed by `periods` equal repayments.
    pub fn loan(disbursement: Decimal, repayment: Decimal, periods: u32) -> Self {
        let mut flows = Vec::with_capacity(periods as usize + 1);
        flows.push(disbursement);
        flows.extend(std::iter::repeat_n(-repayment, periods as usize));
        Self { flows }
    }

    /// Adds an amount to the final flow, e.g. a balloon paid with the last instalment.
    pub fn with_final_payment(mut self, amount: Decimal) -> Self {
        if self.flows.len() > 1 {
            if let Some(last) = self.flows.last_mut() {
                *last -= amount;
            }
        }
        self
    }

    /// The flows in time order.
    pub fn flows(&self) -> &[Decimal] {
        &self.flows
    }

    /// Number of flows, including time zero.
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Whether the series has no flows.
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balloon_is_added_to_last_repayment() {
        let series = CashFlowSeries::loan(dec!(1000), dec!(100), 3).with_final_payment(dec!(400));
        assert_eq!(
            series.flows(),
            &[dec!(1000), dec!(-100), dec!(-100), dec!(-500)]
        );
    }

    #[test]
    fn test_final_payment_ignored_without_repayments() {
        let series = CashFlowSeries::loan(dec!(1000), dec!(100), 0).with_final_payment(dec!(400));
        assert_eq!(series.flows(), &[dec!(1000)]);
    }
}
