use std::collections::BTreeMap;

use ledgerlens_core::{Money, Transaction, UNCATEGORIZED};
use serde::{Deserialize, Serialize};

use crate::series::{self, Granularity, SeriesBucket};

/// Which side of the ledger a category total belongs to. A zero-amount
/// transaction counts on the expense side with zero magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub label: String,
    pub flow: Flow,
    pub count: usize,
    /// Sum of magnitudes within the category.
    pub total: Money,
    /// Percentage of the category's flow partition, 0–100. Zero when the
    /// whole partition sums to zero.
    pub share: f64,
}

/// The full analysis output: headline totals, per-category rollups with
/// partition shares, a zero-filled time series, and the classified
/// transactions retained for drill-down.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub total_income: Money,
    pub total_expense: Money,
    pub net: Money,
    /// Ordered by flow (income first), then by label.
    pub categories: Vec<CategorySummary>,
    pub series: Vec<SeriesBucket>,
    pub uncategorized_count: usize,
    #[serde(skip)]
    transactions: Vec<Transaction>,
    #[serde(skip)]
    by_category: BTreeMap<(String, Flow), Vec<usize>>,
}

impl AnalysisResult {
    /// Drill-down into one category: transactions sorted by magnitude
    /// descending, original position ascending on ties.
    pub fn transactions_in(&self, label: &str, flow: Flow) -> Vec<&Transaction> {
        self.by_category
            .get(&(label.to_string(), flow))
            .map(|indices| indices.iter().map(|&i| &self.transactions[i]).collect())
            .unwrap_or_default()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

fn category_label(tx: &Transaction) -> &str {
    tx.category.as_deref().unwrap_or(UNCATEGORIZED)
}

fn flow_of(tx: &Transaction) -> Flow {
    if tx.is_inflow() {
        Flow::Income
    } else {
        Flow::Expense
    }
}

/// Aggregate classified transactions into an [`AnalysisResult`]. Pure and
/// deterministic: identical input always yields identical output.
pub fn aggregate(transactions: Vec<Transaction>, granularity: Granularity) -> AnalysisResult {
    let mut total_income = Money::zero();
    let mut total_expense = Money::zero();
    let mut rollups: BTreeMap<(String, Flow), (usize, Money)> = BTreeMap::new();
    let mut by_category: BTreeMap<(String, Flow), Vec<usize>> = BTreeMap::new();
    let mut uncategorized_count = 0;

    for (index, tx) in transactions.iter().enumerate() {
        let flow = flow_of(tx);
        let magnitude = tx.magnitude();
        match flow {
            Flow::Income => total_income += magnitude,
            Flow::Expense => total_expense += magnitude,
        }

        let label = category_label(tx);
        if label == UNCATEGORIZED {
            uncategorized_count += 1;
        }

        let key = (label.to_string(), flow);
        let entry = rollups.entry(key.clone()).or_insert((0, Money::zero()));
        entry.0 += 1;
        entry.1 += magnitude;
        by_category.entry(key).or_default().push(index);
    }

    for indices in by_category.values_mut() {
        indices.sort_by(|&a, &b| {
            transactions[b]
                .magnitude()
                .cmp(&transactions[a].magnitude())
                .then(transactions[a].source_index.cmp(&transactions[b].source_index))
        });
    }

    let categories = rollups
        .into_iter()
        .map(|((label, flow), (count, total))| {
            let partition = match flow {
                Flow::Income => total_income,
                Flow::Expense => total_expense,
            };
            let share = if partition.is_zero() {
                0.0
            } else {
                total.to_f64() / partition.to_f64() * 100.0
            };
            CategorySummary { label, flow, count, total, share }
        })
        .collect();

    let series = series::build(&transactions, granularity);

    AnalysisResult {
        total_income,
        total_expense,
        net: total_income - total_expense,
        categories,
        series,
        uncategorized_count,
        transactions,
        by_category,
    }
}
