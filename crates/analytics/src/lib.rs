pub mod series;
pub mod summary;

pub use series::{Granularity, SeriesBucket};
pub use summary::{aggregate, AnalysisResult, CategorySummary, Flow};
