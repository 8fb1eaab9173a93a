//! This file defines the aggregate summary returned by the dashboard endpoints.

use serde::{Deserialize, Serialize};

/// Aggregated income and expense totals for a user.
///
/// Sums with no matching transactions are 0.0, never absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// The sum of amounts of all income transactions.
    pub total_income: f64,
    /// The sum of amounts of all expense transactions.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
}

impl FinancialSummary {
    /// Create a summary from income and expense totals.
    pub fn new(total_income: f64, total_expense: f64) -> Self {
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}

impl Default for FinancialSummary {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod financial_summary_tests {
    use serde_json::json;

    use crate::models::FinancialSummary;

    #[test]
    fn balance_is_income_minus_expense() {
        let summary = FinancialSummary::new(100.0, 40.0);

        assert_eq!(summary.balance, 60.0);
    }

    #[test]
    fn empty_summary_serializes_to_zeroes() {
        let summary = FinancialSummary::default();

        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"total_income": 0.0, "total_expense": 0.0, "balance": 0.0})
        );
    }
}
