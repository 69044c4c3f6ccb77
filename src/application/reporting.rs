use serde::{Deserialize, Serialize};

use crate::domain::Cents;

/// Monthly aggregate over the transaction collection. Computed on demand,
/// never cached or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_income_cents: Cents,
    pub total_expenses_cents: Cents,
    pub net_balance_cents: Cents,
    /// Expense totals per category, in first-occurrence order. Consumers
    /// wanting a ranking sort by amount themselves.
    pub category_breakdown: Vec<CategoryAmount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category_id: String,
    pub amount_cents: Cents,
    /// Share of the month's total expenses, 0.0 when there are none.
    pub percentage: f64,
}

/// One row of a budget-vs-actual comparison: either side may be zero, but
/// a category appears as soon as it has a budget or spending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetComparison {
    /// Display name; falls back to the raw id for unknown categories.
    pub category: String,
    pub budget_cents: Cents,
    pub actual_cents: Cents,
    pub color: String,
}

/// Month-over-month percentage changes for the dashboard cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub income_change_pct: f64,
    pub expense_change_pct: f64,
    pub balance_change_pct: f64,
}

/// Expense totals for one day of a month, feeding daily bar charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySpending {
    pub day: u32,
    pub total_cents: Cents,
    /// Per-category totals for the day, in first-occurrence order.
    pub by_category: Vec<(String, Cents)>,
}

/// Percentage change from `previous` to `current`, measured against the
/// magnitude of `previous`; 0.0 when there is no previous value to
/// compare against.
pub fn percent_change(current: Cents, previous: Cents) -> f64 {
    if previous == 0 {
        0.0
    } else {
        (current - previous) as f64 / previous.abs() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(15000, 10000), 50.0);
        assert_eq!(percent_change(5000, 10000), -50.0);
        assert_eq!(percent_change(5000, 0), 0.0);
        // Negative previous balance: measured against its magnitude
        assert_eq!(percent_change(5000, -10000), 150.0);
    }
}
