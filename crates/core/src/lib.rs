pub mod anomaly;
pub mod money;
pub mod period;
pub mod row;
pub mod transaction;

pub use anomaly::{AnomalyReason, RowAnomaly};
pub use money::Money;
pub use period::{Month, MonthRange};
pub use row::{CellValue, RawRow};
pub use transaction::{Transaction, UNCATEGORIZED};
