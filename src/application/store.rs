use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::domain::{
    Budget, BudgetId, Category, Cents, DEFAULT_CATEGORY_COLOR, Transaction, TransactionId,
    TransactionKind, UNKNOWN_CATEGORY_NAME, days_in_month, month_bounds,
};
use crate::storage::{BUDGETS_KEY, DurableStore, TRANSACTIONS_KEY};

use super::reporting::{
    BudgetComparison, CategoryAmount, DailySpending, Summary, TrendReport, percent_change,
};

/// The ledger store owns the transaction and budget collections for the
/// lifetime of the process, persists them through a durable key-value
/// store, and derives all summary statistics on demand.
///
/// Construct one instance at startup and hand it to consumers; mutations
/// take `&mut self`, so exclusive access is enforced by ownership.
pub struct LedgerStore {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    store: Box<dyn DurableStore>,
}

impl LedgerStore {
    /// Open the ledger over a durable store, loading both collections.
    /// Absent, unreadable, or corrupt payloads leave the collection empty
    /// and are logged; opening never fails.
    pub fn open(store: Box<dyn DurableStore>) -> Self {
        let transactions = load_collection(store.as_ref(), TRANSACTIONS_KEY);
        let budgets = load_collection(store.as_ref(), BUDGETS_KEY);
        Self {
            transactions,
            budgets,
            store,
        }
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record a new transaction. The store assigns the id and sets
    /// `created_at == updated_at`. Returns the stored record.
    pub fn add_transaction(
        &mut self,
        amount_cents: Cents,
        date: DateTime<Utc>,
        description: impl Into<String>,
        category: impl Into<String>,
        kind: TransactionKind,
    ) -> Transaction {
        let transaction = Transaction::new(amount_cents, date, description, category, kind);
        self.transactions.push(transaction.clone());
        self.persist(TRANSACTIONS_KEY, &self.transactions);
        transaction
    }

    /// Replace the transaction with a matching id, taking every field from
    /// the supplied record except `updated_at`, which is refreshed.
    /// Returns false (and changes nothing) when no entry matches.
    pub fn update_transaction(&mut self, mut transaction: Transaction) -> bool {
        let Some(existing) = self
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction.id)
        else {
            return false;
        };
        transaction.updated_at = Utc::now();
        *existing = transaction;
        self.persist(TRANSACTIONS_KEY, &self.transactions);
        true
    }

    /// Remove a transaction by id; deleting an absent id is a no-op.
    pub fn delete_transaction(&mut self, id: TransactionId) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        if self.transactions.len() == before {
            return false;
        }
        self.persist(TRANSACTIONS_KEY, &self.transactions);
        true
    }

    pub fn get_transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// All transactions in insertion order. Readers sort by `date` before
    /// display; insertion order carries no meaning.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    // ========================
    // Budget operations
    // ========================

    /// Set the budget for a (category, month, year). When one already
    /// exists the call degrades to updating its amount in place, keeping
    /// the original id, so the tuple stays unique.
    pub fn add_budget(
        &mut self,
        category: impl Into<String>,
        amount_cents: Cents,
        month: u32,
        year: i32,
    ) -> Budget {
        let category = category.into();
        if let Some(existing) = self
            .budgets
            .iter_mut()
            .find(|b| b.category == category && b.covers(month, year))
        {
            existing.amount_cents = amount_cents;
            let updated = existing.clone();
            self.persist(BUDGETS_KEY, &self.budgets);
            return updated;
        }

        let budget = Budget::new(category, amount_cents, month, year);
        self.budgets.push(budget.clone());
        self.persist(BUDGETS_KEY, &self.budgets);
        budget
    }

    /// Replace the budget with a matching id; false when no entry matches.
    pub fn update_budget(&mut self, budget: Budget) -> bool {
        let Some(existing) = self.budgets.iter_mut().find(|b| b.id == budget.id) else {
            return false;
        };
        *existing = budget;
        self.persist(BUDGETS_KEY, &self.budgets);
        true
    }

    /// Remove a budget by id; deleting an absent id is a no-op.
    pub fn delete_budget(&mut self, id: BudgetId) -> bool {
        let before = self.budgets.len();
        self.budgets.retain(|b| b.id != id);
        if self.budgets.len() == before {
            return false;
        }
        self.persist(BUDGETS_KEY, &self.budgets);
        true
    }

    pub fn get_budget(&self, category: &str, month: u32, year: i32) -> Option<&Budget> {
        self.budgets
            .iter()
            .find(|b| b.category == category && b.covers(month, year))
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    // ========================
    // Derived queries (pure reads, no persistence)
    // ========================

    /// Transactions whose date falls within the given calendar month.
    pub fn transactions_by_month(&self, month: u32, year: i32) -> Vec<&Transaction> {
        let (start, end) = month_bounds(month, year);
        self.transactions
            .iter()
            .filter(|t| t.date >= start && t.date < end)
            .collect()
    }

    /// Monthly totals and per-category expense breakdown. Breakdown
    /// entries appear in first-occurrence order with their share of total
    /// expenses (0.0 when the month has no expenses).
    pub fn summary(&self, month: u32, year: i32) -> Summary {
        let monthly = self.transactions_by_month(month, year);

        let total_income_cents: Cents = monthly
            .iter()
            .filter(|t| t.is_income())
            .map(|t| t.amount_cents)
            .sum();
        let total_expenses_cents: Cents = monthly
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.amount_cents)
            .sum();

        let expense_totals = accumulate_by_category(monthly.iter().copied());
        let category_breakdown = expense_totals
            .into_iter()
            .map(|(category_id, amount_cents)| CategoryAmount {
                category_id,
                amount_cents,
                percentage: if total_expenses_cents == 0 {
                    0.0
                } else {
                    amount_cents as f64 / total_expenses_cents as f64 * 100.0
                },
            })
            .collect();

        Summary {
            total_income_cents,
            total_expenses_cents,
            net_balance_cents: total_income_cents - total_expenses_cents,
            category_breakdown,
        }
    }

    /// Budgeted vs actual spending per category for one month: the union
    /// of categories with a budget and categories with expense spending,
    /// so a budget with no spending and spending with no budget both show
    /// up with a zero on the empty side.
    pub fn budget_vs_actual(&self, month: u32, year: i32) -> Vec<BudgetComparison> {
        let monthly = self.transactions_by_month(month, year);
        let mut categories = accumulate_by_category(monthly.iter().copied());

        for budget in self.budgets.iter().filter(|b| b.covers(month, year)) {
            if !categories.iter().any(|(id, _)| *id == budget.category) {
                categories.push((budget.category.clone(), 0));
            }
        }

        categories
            .into_iter()
            .map(|(category_id, actual_cents)| {
                let budget_cents = self
                    .get_budget(&category_id, month, year)
                    .map(|b| b.amount_cents)
                    .unwrap_or(0);
                let (name, color) = match Category::find(&category_id) {
                    Some(c) => (c.name.to_string(), c.color.to_string()),
                    None => (category_id.clone(), DEFAULT_CATEGORY_COLOR.to_string()),
                };
                BudgetComparison {
                    category: name,
                    budget_cents,
                    actual_cents,
                    color,
                }
            })
            .collect()
    }

    /// The most recent transactions by date, newest first.
    pub fn recent_transactions(&self, limit: usize) -> Vec<&Transaction> {
        let mut recent: Vec<&Transaction> = self.transactions.iter().collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent.truncate(limit);
        recent
    }

    /// Percentage change of income, expenses and net balance against the
    /// previous calendar month.
    pub fn month_trend(&self, month: u32, year: i32) -> TrendReport {
        let (prev_month, prev_year) = if month == 1 {
            (12, year - 1)
        } else {
            (month - 1, year)
        };

        let current = self.summary(month, year);
        let previous = self.summary(prev_month, prev_year);

        TrendReport {
            income_change_pct: percent_change(
                current.total_income_cents,
                previous.total_income_cents,
            ),
            expense_change_pct: percent_change(
                current.total_expenses_cents,
                previous.total_expenses_cents,
            ),
            balance_change_pct: percent_change(
                current.net_balance_cents,
                previous.net_balance_cents,
            ),
        }
    }

    /// Expense totals per day of the month, with per-category splits.
    /// Days without spending are included with zero totals.
    pub fn daily_expenses(&self, month: u32, year: i32) -> Vec<DailySpending> {
        let monthly = self.transactions_by_month(month, year);

        (1..=days_in_month(month, year))
            .map(|day| {
                let day_transactions = monthly.iter().copied().filter(|t| t.date.day() == day);
                let by_category = accumulate_by_category(day_transactions);
                let total_cents = by_category.iter().map(|(_, cents)| cents).sum();
                DailySpending {
                    day,
                    total_cents,
                    by_category,
                }
            })
            .collect()
    }

    /// Display name for a category id; "Unknown" for unresolved ids.
    pub fn category_name(&self, id: &str) -> &'static str {
        Category::find(id).map_or(UNKNOWN_CATEGORY_NAME, |c| c.name)
    }

    /// Display color for a category id; neutral gray for unresolved ids.
    pub fn category_color(&self, id: &str) -> &'static str {
        Category::find(id).map_or(DEFAULT_CATEGORY_COLOR, |c| c.color)
    }

    /// Serialize a collection and write it out, replacing the stored
    /// payload wholesale. Failures are logged and swallowed; persistence
    /// problems must never take down the ledger.
    fn persist<T: Serialize>(&self, key: &str, items: &[T]) {
        let payload = match serde_json::to_string(items) {
            Ok(payload) => payload,
            Err(err) => {
                error!(key, %err, "failed to serialize collection");
                return;
            }
        };
        if let Err(err) = self.store.write(key, &payload) {
            error!(key, %err, "failed to persist collection");
        }
    }
}

/// Sum expense amounts per category, preserving first-occurrence order.
/// Collections are small; a linear scan beats pulling in an ordered map.
fn accumulate_by_category<'a>(
    transactions: impl Iterator<Item = &'a Transaction>,
) -> Vec<(String, Cents)> {
    let mut totals: Vec<(String, Cents)> = Vec::new();
    for t in transactions.filter(|t| t.is_expense()) {
        match totals.iter_mut().find(|(id, _)| *id == t.category) {
            Some((_, cents)) => *cents += t.amount_cents,
            None => totals.push((t.category.clone(), t.amount_cents)),
        }
    }
    totals
}

fn load_collection<T: DeserializeOwned>(store: &dyn DurableStore, key: &str) -> Vec<T> {
    match store.read(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                warn!(key, %err, "stored collection is unreadable, starting empty");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!(key, %err, "failed to read stored collection, starting empty");
            Vec::new()
        }
    }
}
