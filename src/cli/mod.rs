use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::LedgerStore;
use crate::domain::{CATEGORIES, TransactionKind, format_cents, parse_cents};
use crate::storage::FileStore;

/// Moneta - Personal Finance Tracker
#[derive(Parser)]
#[command(name = "moneta")]
#[command(about = "A local-first personal finance tracker")]
#[command(version)]
pub struct Cli {
    /// Directory where ledger data is stored
    #[arg(short, long, default_value = "moneta-data")]
    pub data_dir: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new transaction
    Add {
        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// What the money was for
        description: String,

        /// Category id (see `moneta categories`)
        #[arg(short, long)]
        category: String,

        /// Record as income instead of expense
        #[arg(long)]
        income: bool,

        /// Date of the transaction (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List transactions for a month
    Transactions {
        /// Month 1-12 (defaults to current)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to current)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Show the most recent transactions across all months
    Recent {
        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show a single transaction
    Show {
        /// Transaction ID
        id: String,
    },

    /// Edit an existing transaction
    Edit {
        /// Transaction ID
        id: String,

        /// New amount
        #[arg(long)]
        amount: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New category id
        #[arg(long)]
        category: Option<String>,

        /// New kind: expense or income
        #[arg(long)]
        kind: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Monthly summary: totals and category breakdown
    Summary {
        /// Month 1-12 (defaults to current)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to current)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Current month at a glance: totals, trends, recent activity
    Dashboard,

    /// Daily expense totals for a month
    Daily {
        /// Month 1-12 (defaults to current)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to current)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List the category reference table
    Categories,
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the budget for a category in a month (overwrites an existing one)
    Set {
        /// Category id
        category: String,

        /// Budget amount (e.g., "400" or "400.00")
        amount: String,

        /// Month 1-12 (defaults to current)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to current)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List all budgets
    List,

    /// Compare budgets against actual spending for a month
    Compare {
        /// Month 1-12 (defaults to current)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to current)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let store = FileStore::new(&self.data_dir);
        let mut ledger = LedgerStore::open(Box::new(store));

        match self.command {
            Commands::Add {
                amount,
                description,
                category,
                income,
                date,
            } => {
                let amount_cents = parse_amount(&amount)?;
                if description.trim().len() < 3 {
                    bail!("Description must be at least 3 characters");
                }
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => Utc::now(),
                };
                let kind = if income {
                    TransactionKind::Income
                } else {
                    TransactionKind::Expense
                };

                let tx = ledger.add_transaction(amount_cents, date, description, category, kind);
                println!(
                    "Recorded {}: {} \"{}\" ({})",
                    tx.kind,
                    format_cents(tx.amount_cents),
                    tx.description,
                    tx.id
                );
            }

            Commands::Transactions { month, year } => {
                let (month, year) = resolve_month(month, year)?;
                let mut transactions = ledger.transactions_by_month(month, year);
                transactions.sort_by(|a, b| b.date.cmp(&a.date));

                if transactions.is_empty() {
                    println!("No transactions for {}-{:02}", year, month);
                } else {
                    for tx in transactions {
                        print_transaction_row(&ledger, tx);
                    }
                }
            }

            Commands::Recent { limit } => {
                let recent = ledger.recent_transactions(limit);
                if recent.is_empty() {
                    println!("No transactions recorded yet");
                } else {
                    for tx in recent {
                        print_transaction_row(&ledger, tx);
                    }
                }
            }

            Commands::Show { id } => {
                let id = parse_id(&id)?;
                match ledger.get_transaction(id) {
                    Some(tx) => {
                        println!("ID:          {}", tx.id);
                        println!("Kind:        {}", tx.kind);
                        println!("Amount:      {}", format_cents(tx.amount_cents));
                        println!("Date:        {}", tx.date.format("%Y-%m-%d"));
                        println!("Description: {}", tx.description);
                        println!(
                            "Category:    {} ({})",
                            ledger.category_name(&tx.category),
                            tx.category
                        );
                        println!("Created:     {}", tx.created_at.format("%Y-%m-%d %H:%M:%S"));
                        println!("Updated:     {}", tx.updated_at.format("%Y-%m-%d %H:%M:%S"));
                    }
                    None => println!("Transaction not found: {}", id),
                }
            }

            Commands::Edit {
                id,
                amount,
                description,
                category,
                kind,
                date,
            } => {
                let id = parse_id(&id)?;
                let Some(mut tx) = ledger.get_transaction(id).cloned() else {
                    println!("Transaction not found: {}", id);
                    return Ok(());
                };

                if let Some(amount) = amount {
                    tx.amount_cents = parse_amount(&amount)?;
                }
                if let Some(description) = description {
                    if description.trim().len() < 3 {
                        bail!("Description must be at least 3 characters");
                    }
                    tx.description = description;
                }
                if let Some(category) = category {
                    tx.category = category;
                }
                if let Some(kind) = kind {
                    tx.kind = TransactionKind::from_str(&kind)
                        .with_context(|| format!("Invalid kind '{}'. Use expense or income", kind))?;
                }
                if let Some(date_str) = date {
                    tx.date = parse_date(&date_str)?;
                }

                ledger.update_transaction(tx);
                println!("Updated transaction {}", id);
            }

            Commands::Delete { id } => {
                let id = parse_id(&id)?;
                if ledger.delete_transaction(id) {
                    println!("Deleted transaction {}", id);
                } else {
                    println!("Transaction not found: {}", id);
                }
            }

            Commands::Budget(cmd) => run_budget_command(&mut ledger, cmd)?,

            Commands::Summary { month, year } => {
                let (month, year) = resolve_month(month, year)?;
                print_summary(&ledger, month, year);
            }

            Commands::Dashboard => {
                let now = Utc::now();
                let (month, year) = (now.month(), now.year());

                print_summary(&ledger, month, year);

                let trend = ledger.month_trend(month, year);
                println!();
                println!("vs last month:");
                println!("  Income   {:+.1}%", trend.income_change_pct);
                println!("  Expenses {:+.1}%", trend.expense_change_pct);
                println!("  Balance  {:+.1}%", trend.balance_change_pct);

                let recent = ledger.recent_transactions(5);
                if !recent.is_empty() {
                    println!();
                    println!("Recent transactions:");
                    for tx in recent {
                        print_transaction_row(&ledger, tx);
                    }
                }
            }

            Commands::Daily { month, year } => {
                let (month, year) = resolve_month(month, year)?;
                for day in ledger.daily_expenses(month, year) {
                    if day.total_cents == 0 {
                        continue;
                    }
                    let categories: Vec<String> = day
                        .by_category
                        .iter()
                        .map(|(id, cents)| {
                            format!("{} {}", ledger.category_name(id), format_cents(*cents))
                        })
                        .collect();
                    println!(
                        "{:04}-{:02}-{:02}  {:>10}  ({})",
                        year,
                        month,
                        day.day,
                        format_cents(day.total_cents),
                        categories.join(", ")
                    );
                }
            }

            Commands::Categories => {
                for category in CATEGORIES {
                    println!("{:<16} {:<16} {}", category.id, category.name, category.color);
                }
            }
        }

        Ok(())
    }
}

fn run_budget_command(ledger: &mut LedgerStore, cmd: BudgetCommands) -> Result<()> {
    match cmd {
        BudgetCommands::Set {
            category,
            amount,
            month,
            year,
        } => {
            let amount_cents = parse_amount(&amount)?;
            let (month, year) = resolve_month(month, year)?;
            let budget = ledger.add_budget(category, amount_cents, month, year);
            println!(
                "Budget for {} in {}-{:02}: {} ({})",
                ledger.category_name(&budget.category),
                budget.year,
                budget.month,
                format_cents(budget.amount_cents),
                budget.id
            );
        }

        BudgetCommands::List => {
            let budgets = ledger.budgets();
            if budgets.is_empty() {
                println!("No budgets set");
                return Ok(());
            }
            for budget in budgets {
                println!(
                    "{}-{:02}  {:<16} {:>10}  ({})",
                    budget.year,
                    budget.month,
                    budget.category,
                    format_cents(budget.amount_cents),
                    budget.id
                );
            }
        }

        BudgetCommands::Compare { month, year } => {
            let (month, year) = resolve_month(month, year)?;
            let rows = ledger.budget_vs_actual(month, year);
            if rows.is_empty() {
                println!("Nothing budgeted or spent in {}-{:02}", year, month);
                return Ok(());
            }
            println!(
                "{:<20} {:>10} {:>10} {:>10}",
                "Category", "Budget", "Actual", "Left"
            );
            for row in rows {
                println!(
                    "{:<20} {:>10} {:>10} {:>10}",
                    row.category,
                    format_cents(row.budget_cents),
                    format_cents(row.actual_cents),
                    format_cents(row.budget_cents - row.actual_cents)
                );
            }
        }

        BudgetCommands::Delete { id } => {
            let id = parse_id(&id)?;
            if ledger.delete_budget(id) {
                println!("Deleted budget {}", id);
            } else {
                println!("Budget not found: {}", id);
            }
        }
    }

    Ok(())
}

fn print_summary(ledger: &LedgerStore, month: u32, year: i32) {
    let summary = ledger.summary(month, year);

    println!("Summary for {}-{:02}", year, month);
    println!("  Income   {:>10}", format_cents(summary.total_income_cents));
    println!("  Expenses {:>10}", format_cents(summary.total_expenses_cents));
    println!("  Balance  {:>10}", format_cents(summary.net_balance_cents));

    if !summary.category_breakdown.is_empty() {
        println!();
        println!("Spending by category:");
        // The store leaves breakdown entries unordered; rank them here.
        let mut breakdown = summary.category_breakdown;
        breakdown.sort_by(|a, b| b.amount_cents.cmp(&a.amount_cents));
        for entry in breakdown {
            println!(
                "  {:<20} {:>10}  {:>5.1}%",
                ledger.category_name(&entry.category_id),
                format_cents(entry.amount_cents),
                entry.percentage
            );
        }
    }
}

fn print_transaction_row(ledger: &LedgerStore, tx: &crate::domain::Transaction) {
    let signed = match tx.kind {
        TransactionKind::Income => format!("+{}", format_cents(tx.amount_cents)),
        TransactionKind::Expense => format!("-{}", format_cents(tx.amount_cents)),
    };
    println!(
        "{}  {:>10}  {:<16} {}  ({})",
        tx.date.format("%Y-%m-%d"),
        signed,
        ledger.category_name(&tx.category),
        tx.description,
        tx.id
    );
}

/// Parse and validate a positive amount; the ledger assumes well-formed
/// input, so the minimum-amount rule is applied here.
fn parse_amount(input: &str) -> Result<i64> {
    let cents = parse_cents(input).context("Invalid amount format. Use '50.00' or '50'")?;
    if cents < 1 {
        bail!("Amount must be at least 0.01");
    }
    Ok(cents)
}

fn parse_id(input: &str) -> Result<Uuid> {
    Uuid::parse_str(input).context("Invalid ID format (expected UUID)")
}

fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", input))?;
    Ok(date
        .and_hms_opt(12, 0, 0)
        .context("Invalid time of day")?
        .and_utc())
}

/// Default to the current month/year, validating explicit values the way
/// the form layer would.
fn resolve_month(month: Option<u32>, year: Option<i32>) -> Result<(u32, i32)> {
    let now = Utc::now();
    let month = month.unwrap_or_else(|| now.month());
    let year = year.unwrap_or_else(|| now.year());
    if !(1..=12).contains(&month) {
        bail!("Month must be between 1 and 12");
    }
    if year < 2000 {
        bail!("Year must be 2000 or later");
    }
    Ok((month, year))
}
