//! Balance sheets and analytics derived from recorded entries.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;
use uuid::Uuid;

use crate::currency::month_label;
use crate::domain::{Entry, EntryKind};
use crate::ledger::Ledger;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BalanceTotals {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
}

impl BalanceTotals {
    fn record(&mut self, entry: &Entry) {
        match entry.kind {
            EntryKind::Income => self.total_income += entry.amount,
            EntryKind::Expense => self.total_expenses += entry.amount,
        }
        self.net_balance = self.total_income - self.total_expenses;
    }

    fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut totals = Self::default();
        for entry in entries {
            totals.record(entry);
        }
        totals
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBalance {
    pub month: u32,
    pub label: &'static str,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyBalance {
    pub year: i32,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectBalance {
    pub project_id: Uuid,
    pub project_name: String,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSummary {
    pub overall: BalanceTotals,
    pub project_wise: Vec<ProjectBalance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IncomeVsExpense {
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyExpense {
    pub year: i32,
    pub month: u32,
    pub amount: f64,
}

/// Aggregates entries into balance summaries.
pub struct SummaryService;

impl SummaryService {
    pub fn totals(ledger: &Ledger, project_id: Uuid) -> BalanceTotals {
        BalanceTotals::from_entries(ledger.entries_for(project_id))
    }

    /// Months of `year` with activity, in calendar order.
    pub fn monthly(ledger: &Ledger, project_id: Uuid, year: i32) -> Vec<MonthlyBalance> {
        let mut months: BTreeMap<u32, BalanceTotals> = BTreeMap::new();
        for entry in ledger
            .entries_for(project_id)
            .filter(|entry| entry.date.year() == year)
        {
            months.entry(entry.date.month()).or_default().record(entry);
        }
        months
            .into_iter()
            .map(|(month, totals)| MonthlyBalance {
                month,
                label: month_label(month),
                income: totals.total_income,
                expenses: totals.total_expenses,
                balance: totals.net_balance,
            })
            .collect()
    }

    /// Years with activity, ascending.
    pub fn yearly(ledger: &Ledger, project_id: Uuid) -> Vec<YearlyBalance> {
        let mut years: BTreeMap<i32, BalanceTotals> = BTreeMap::new();
        for entry in ledger.entries_for(project_id) {
            years.entry(entry.date.year()).or_default().record(entry);
        }
        years
            .into_iter()
            .map(|(year, totals)| YearlyBalance {
                year,
                income: totals.total_income,
                expenses: totals.total_expenses,
                balance: totals.net_balance,
            })
            .collect()
    }

    /// Totals across every project of `owner`, plus a per-project breakdown.
    pub fn overall(ledger: &Ledger, owner: &str) -> OverallSummary {
        let mut overall = BalanceTotals::default();
        let mut project_wise = Vec::new();
        for project in ledger.projects.iter().filter(|p| p.owner == owner) {
            let totals = Self::totals(ledger, project.id);
            overall.total_income += totals.total_income;
            overall.total_expenses += totals.total_expenses;
            project_wise.push(ProjectBalance {
                project_id: project.id,
                project_name: project.name.clone(),
                income: totals.total_income,
                expenses: totals.total_expenses,
                balance: totals.net_balance,
            });
        }
        overall.net_balance = overall.total_income - overall.total_expenses;
        OverallSummary {
            overall,
            project_wise,
        }
    }

    /// Expense totals per category, largest first.
    pub fn category_expenses(ledger: &Ledger, project_id: Uuid) -> Vec<CategoryTotal> {
        let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
        for entry in ledger
            .entries_for(project_id)
            .filter(|entry| entry.kind == EntryKind::Expense)
        {
            let key = if entry.category.trim().is_empty() {
                "Uncategorized".to_string()
            } else {
                entry.category.clone()
            };
            *by_category.entry(key).or_default() += entry.amount;
        }
        let mut rows: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, amount)| CategoryTotal { category, amount })
            .collect();
        rows.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        rows
    }

    pub fn income_vs_expense(ledger: &Ledger, project_id: Uuid) -> IncomeVsExpense {
        let totals = Self::totals(ledger, project_id);
        IncomeVsExpense {
            income: totals.total_income,
            expense: totals.total_expenses,
        }
    }

    /// Expense totals per calendar month, oldest first.
    pub fn monthly_expenses(ledger: &Ledger, project_id: Uuid) -> Vec<MonthlyExpense> {
        let mut months: BTreeMap<(i32, u32), f64> = BTreeMap::new();
        for entry in ledger
            .entries_for(project_id)
            .filter(|entry| entry.kind == EntryKind::Expense)
        {
            *months
                .entry((entry.date.year(), entry.date.month()))
                .or_default() += entry.amount;
        }
        months
            .into_iter()
            .map(|((year, month), amount)| MonthlyExpense {
                year,
                month,
                amount,
            })
            .collect()
    }
}
