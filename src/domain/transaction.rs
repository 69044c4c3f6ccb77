use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type TransactionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "expense" => Some(TransactionKind::Expense),
            "income" => Some(TransactionKind::Income),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single dated money movement, either income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Amount in cents (always positive; direction comes from `kind`)
    pub amount_cents: Cents,
    /// When the movement occurred, user-assigned
    pub date: DateTime<Utc>,
    pub description: String,
    /// Category id; unresolved ids are tolerated and displayed as "Unknown"
    pub category: String,
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction with a fresh id. `created_at` and
    /// `updated_at` start equal; only the store refreshes `updated_at`.
    pub fn new(
        amount_cents: Cents,
        date: DateTime<Utc>,
        description: impl Into<String>,
        category: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            amount_cents,
            date,
            description: description.into(),
            category: category.into(),
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }
}

/// Half-open UTC window covering one calendar month: the first instant of
/// the month up to (excluding) the first instant of the next month.
/// Gregorian month lengths and leap years fall out of chrono's calendar.
pub fn month_bounds(month: u32, year: i32) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = first_of_month(month, year);
    let end = if month == 12 {
        first_of_month(1, year + 1)
    } else {
        first_of_month(month + 1, year)
    };
    (start, end)
}

fn first_of_month(month: u32, year: i32) -> DateTime<Utc> {
    // Unreachable date only for out-of-range month/year; clamp to epoch so
    // callers get an empty window instead of a panic.
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

/// Number of days in the given calendar month.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    let (start, end) = month_bounds(month, year);
    (end - start).num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [TransactionKind::Expense, TransactionKind::Income] {
            assert_eq!(TransactionKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(TransactionKind::from_str("transfer"), None);
    }

    #[test]
    fn test_new_transaction_timestamps() {
        let tx = Transaction::new(
            1500,
            Utc::now(),
            "coffee beans",
            "food",
            TransactionKind::Expense,
        );
        assert_eq!(tx.created_at, tx.updated_at);
        assert!(tx.is_expense());
        assert!(!tx.is_income());
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(3, 2024);
        assert_eq!(start.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-01 00:00:00");
        assert_eq!(end.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-04-01 00:00:00");
    }

    #[test]
    fn test_month_bounds_december_wraps_year() {
        let (start, end) = month_bounds(12, 2023);
        assert_eq!(start.format("%Y-%m-%d").to_string(), "2023-12-01");
        assert_eq!(end.format("%Y-%m-%d").to_string(), "2024-01-01");
    }

    #[test]
    fn test_days_in_month_leap_year() {
        assert_eq!(days_in_month(2, 2024), 29);
        assert_eq!(days_in_month(2, 2023), 28);
        assert_eq!(days_in_month(4, 2024), 30);
        assert_eq!(days_in_month(1, 2024), 31);
    }
}
