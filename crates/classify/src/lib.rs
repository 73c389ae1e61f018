pub mod engine;
pub mod table;

pub use engine::{
    CategoryRule, Matcher, RuleEngine, RuleLoadError, SignConstraint, SubClassifier, SubEntry,
};
pub use table::builtin_rules;
