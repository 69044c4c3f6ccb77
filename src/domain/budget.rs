use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, month_bounds};

pub type BudgetId = Uuid;

/// A spending limit for one category in a specific month and year.
/// At most one budget exists per (category, month, year); the store's
/// upsert enforces this, not the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub category: String,
    pub amount_cents: Cents,
    /// 1-12
    pub month: u32,
    /// >= 2000
    pub year: i32,
}

impl Budget {
    pub fn new(category: impl Into<String>, amount_cents: Cents, month: u32, year: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            amount_cents,
            month,
            year,
        }
    }

    /// True when this budget applies to the given month/year.
    pub fn covers(&self, month: u32, year: i32) -> bool {
        self.month == month && self.year == year
    }

    /// The calendar-month window this budget applies to.
    pub fn period(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        month_bounds(self.month, self.year)
    }
}
