use ledgerlens_pipeline::{
    analyze, AnomalyReason, Flow, Granularity, Pipeline, PipelineError, SourceFormat,
};

const STATEMENT_CSV: &[u8] = b"\
Date,Narration,Debit,Credit
01/04/2024,SALARY APR,,50000
03/04/2024,SWIGGY ORDER 998,450,
05/04/2024,ATM WITHDRAWAL MUMBAI,2000,
";

#[test]
fn delimited_statement_end_to_end() {
    let report = analyze(STATEMENT_CSV, SourceFormat::Delimited).unwrap();
    assert_eq!(report.transaction_count, 3);
    assert!(report.anomalies.is_empty());
    assert!(report.warnings.is_empty());

    let analysis = &report.analysis;
    assert_eq!(analysis.total_income.to_cents(), 5_000_000);
    assert_eq!(analysis.total_expense.to_cents(), 245_000);
    assert_eq!(analysis.net.to_cents(), 4_755_000);
    assert_eq!(analysis.uncategorized_count, 0);

    let salary = find(analysis, "Income - Salary", Flow::Income);
    assert_eq!(salary.count, 1);
    assert!((salary.share - 100.0).abs() < 1e-9);

    let food = find(analysis, "Expenses - Food & Dining", Flow::Expense);
    assert_eq!(food.total.to_cents(), 45_000);
    assert!((food.share - 18.367_346_938_775_51).abs() < 1e-6);

    let cash = find(analysis, "Cash Withdrawal - Mumbai", Flow::Expense);
    assert_eq!(cash.total.to_cents(), 200_000);
    assert!((cash.share - 81.632_653_061_224_49).abs() < 1e-6);
}

#[test]
fn drill_down_from_report() {
    let report = analyze(STATEMENT_CSV, SourceFormat::Delimited).unwrap();
    let entries = report
        .analysis
        .transactions_in("Cash Withdrawal - Mumbai", Flow::Expense);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].description, "ATM WITHDRAWAL MUMBAI");
    assert_eq!(
        entries[0].category.as_deref(),
        Some("Cash Withdrawal - Mumbai")
    );
}

#[test]
fn monthly_series_covers_statement_range() {
    let data = b"\
Date,Narration,Amount
15/01/2024,SALARY JAN,50000
15/03/2024,SWIGGY ORDER,-450
";
    let report = analyze(data, SourceFormat::Delimited).unwrap();
    let labels: Vec<&str> = report
        .analysis
        .series
        .iter()
        .map(|b| b.label.as_str())
        .collect();
    assert_eq!(labels, vec!["2024-01", "2024-02", "2024-03"]);
    assert_eq!(report.analysis.series[1].income.to_cents(), 0);
}

#[test]
fn yearly_granularity_is_honored() {
    let report = Pipeline::new()
        .with_granularity(Granularity::Yearly)
        .run(STATEMENT_CSV, SourceFormat::Delimited)
        .unwrap();
    assert_eq!(report.analysis.series.len(), 1);
    assert_eq!(report.analysis.series[0].label, "2024");
}

#[test]
fn analysis_is_deterministic() {
    let a = analyze(STATEMENT_CSV, SourceFormat::Delimited).unwrap();
    let b = analyze(STATEMENT_CSV, SourceFormat::Delimited).unwrap();
    assert_eq!(a.analysis.categories, b.analysis.categories);
    assert_eq!(a.analysis.series, b.analysis.series);
}

#[test]
fn unknown_merchant_falls_back_to_uncategorized() {
    let data = b"\
Date,Narration,Amount
01/04/2024,XK99 TOTALLY UNKNOWN,-100
";
    let report = analyze(data, SourceFormat::Delimited).unwrap();
    assert_eq!(report.analysis.uncategorized_count, 1);
    let entries = report
        .analysis
        .transactions_in("Uncategorized", Flow::Expense);
    assert_eq!(entries.len(), 1);
}

#[test]
fn bad_rows_become_anomalies_not_errors() {
    let data = b"\
Date,Narration,Debit,Credit
not-a-date,MYSTERY,100,
02/04/2024,BOTH SIDES,100,200
03/04/2024,SWIGGY ORDER,450,
";
    let report = analyze(data, SourceFormat::Delimited).unwrap();
    // Unparseable date excluded; both-sides row kept but flagged.
    assert_eq!(report.transaction_count, 2);
    assert_eq!(report.anomalies.len(), 2);
    assert_eq!(report.anomalies[0].reason, AnomalyReason::UnparseableDate);
    assert_eq!(report.anomalies[1].reason, AnomalyReason::MalformedRow);
}

#[test]
fn unrecognized_header_is_fatal() {
    let data = b"\
Foo,Bar
1,2
";
    let err = analyze(data, SourceFormat::Delimited).unwrap_err();
    assert!(matches!(err, PipelineError::Normalize(_)));
}

#[test]
fn empty_input_is_fatal() {
    let err = analyze(b"", SourceFormat::Delimited).unwrap_err();
    assert!(matches!(err, PipelineError::Parse(_)));
}

#[test]
fn custom_toml_rules_replace_builtin_table() {
    let rules = r#"
        [[rules]]
        category = "Takeaway"
        matchers = [{ contains = "swiggy" }]
    "#;
    let report = Pipeline::new()
        .with_rules_toml(rules)
        .unwrap()
        .run(STATEMENT_CSV, SourceFormat::Delimited)
        .unwrap();
    let takeaway = find(&report.analysis, "Takeaway", Flow::Expense);
    assert_eq!(takeaway.total.to_cents(), 45_000);
    // Everything outside the single custom rule now misses.
    assert_eq!(report.analysis.uncategorized_count, 2);
}

#[test]
fn invalid_toml_rules_are_rejected() {
    let err = Pipeline::new().with_rules_toml("rules = [ nope").unwrap_err();
    assert!(matches!(err, PipelineError::Rules(_)));
}

#[test]
fn document_text_statement_end_to_end() {
    let fragments = serde_json::json!([
        {"x": 10.0, "y": 10.0, "text": "Date"},
        {"x": 120.0, "y": 10.0, "text": "Narration"},
        {"x": 300.0, "y": 10.0, "text": "Debit"},
        {"x": 400.0, "y": 10.0, "text": "Credit"},
        {"x": 10.0, "y": 30.0, "text": "01/04/2024"},
        {"x": 120.0, "y": 30.0, "text": "SALARY APR"},
        {"x": 400.0, "y": 30.0, "text": "50000"},
        {"x": 10.0, "y": 50.0, "text": "03/04/2024"},
        {"x": 120.0, "y": 50.0, "text": "SWIGGY ORDER"},
        {"x": 300.0, "y": 50.0, "text": "450"},
    ]);
    let data = serde_json::to_vec(&fragments).unwrap();
    let report = analyze(&data, SourceFormat::DocumentText).unwrap();
    assert_eq!(report.transaction_count, 2);
    assert_eq!(report.analysis.total_income.to_cents(), 5_000_000);
    assert_eq!(report.analysis.total_expense.to_cents(), 45_000);
}

fn find<'a>(
    analysis: &'a ledgerlens_pipeline::AnalysisResult,
    label: &str,
    flow: Flow,
) -> &'a ledgerlens_pipeline::CategorySummary {
    analysis
        .categories
        .iter()
        .find(|c| c.label == label && c.flow == flow)
        .unwrap_or_else(|| panic!("missing category {label}"))
}
