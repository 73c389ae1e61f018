//! The statement analysis pipeline: parse raw bytes, normalize rows into
//! canonical transactions, classify each one, aggregate into a report.
//! Synchronous and single-pass; one call analyzes one statement.

use ledgerlens_analytics::aggregate;
use ledgerlens_ingest::{normalize, parse};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use ledgerlens_analytics::{
    AnalysisResult, CategorySummary, Flow, Granularity, SeriesBucket,
};
pub use ledgerlens_classify::{CategoryRule, RuleEngine, RuleLoadError};
pub use ledgerlens_core::{AnomalyReason, Money, RowAnomaly, Transaction};
pub use ledgerlens_ingest::{ParseError, SchemaError, SourceFormat};

/// Fatal failures. Anything recoverable lands in [`StatementReport`] as a
/// warning or anomaly instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("parsing failed: {0}")]
    Parse(#[from] ParseError),
    #[error("normalization failed: {0}")]
    Normalize(#[from] SchemaError),
    #[error("rule table rejected: {0}")]
    Rules(#[from] RuleLoadError),
}

/// Everything one analysis run produces: the aggregate result plus the
/// non-fatal problems encountered along the way.
#[derive(Debug)]
pub struct StatementReport {
    pub analysis: AnalysisResult,
    /// Per-row normalization problems, in row order.
    pub anomalies: Vec<RowAnomaly>,
    /// Parser-level warnings (ragged rows, skipped lines).
    pub warnings: Vec<String>,
    /// Transactions that made it through normalization.
    pub transaction_count: usize,
}

/// A configured analysis run. The default carries the built-in rule table
/// and monthly series buckets.
#[derive(Debug)]
pub struct Pipeline {
    rules: RuleEngine,
    granularity: Granularity,
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline {
            rules: RuleEngine::default(),
            granularity: Granularity::Monthly,
        }
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline::default()
    }

    pub fn with_rules(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the built-in table with rules loaded from TOML.
    pub fn with_rules_toml(self, content: &str) -> Result<Self, PipelineError> {
        Ok(self.with_rules(RuleEngine::from_toml(content)?))
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn run(&self, data: &[u8], format: SourceFormat) -> Result<StatementReport, PipelineError> {
        debug!(%format, bytes = data.len(), "parsing statement");
        let parsed = parse(data, format)?;
        for warning in &parsed.warnings {
            warn!(%format, "{warning}");
        }

        let normalized = normalize(&parsed.rows)?;
        for anomaly in &normalized.anomalies {
            warn!("{anomaly}");
        }

        let classified: Vec<Transaction> = normalized
            .transactions
            .into_iter()
            .map(|tx| {
                let category = self.rules.classify(&tx.description, tx.amount());
                tx.with_category(category)
            })
            .collect();
        let transaction_count = classified.len();

        let analysis = aggregate(classified, self.granularity);
        info!(
            transactions = transaction_count,
            anomalies = normalized.anomalies.len(),
            uncategorized = analysis.uncategorized_count,
            "statement analyzed"
        );

        Ok(StatementReport {
            analysis,
            anomalies: normalized.anomalies,
            warnings: parsed.warnings,
            transaction_count,
        })
    }
}

/// One-shot convenience over [`Pipeline::default`].
pub fn analyze(data: &[u8], format: SourceFormat) -> Result<StatementReport, PipelineError> {
    Pipeline::default().run(data, format)
}
