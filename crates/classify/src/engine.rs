use ledgerlens_core::{Money, UNCATEGORIZED};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A text matcher against the transaction description. `Contains` is a
/// case-insensitive substring; `Pattern` a case-insensitive regex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    Contains(String),
    Pattern(String),
}

/// Sign constraint on the signed amount. Zero satisfies only `Either`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignConstraint {
    CreditOnly,
    DebitOnly,
    #[default]
    Either,
}

impl SignConstraint {
    fn allows(self, amount: Money) -> bool {
        match self {
            SignConstraint::CreditOnly => amount > Money::zero(),
            SignConstraint::DebitOnly => amount < Money::zero(),
            SignConstraint::Either => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubEntry {
    pub label: String,
    pub matchers: Vec<Matcher>,
}

/// Optional sub-classification applied only after the parent rule fires.
/// A matching entry yields `"{prefix} - {label}"`; no match leaves the
/// parent rule's own category standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubClassifier {
    pub prefix: String,
    pub entries: Vec<SubEntry>,
}

/// One ordered rule. Table position is the precedence contract: the engine
/// stops at the first rule whose sign constraint and any matcher hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    #[serde(default)]
    pub sign: SignConstraint,
    pub matchers: Vec<Matcher>,
    #[serde(default)]
    pub sub: Option<SubClassifier>,
}

#[derive(Error, Debug)]
pub enum RuleLoadError {
    #[error("failed to parse rule table: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Deserialize)]
struct RuleTableFile {
    #[serde(default)]
    rules: Vec<CategoryRule>,
}

// ── Compiled form ────────────────────────────────────────────────────────────

#[derive(Debug)]
enum Compiled {
    /// Needle pre-lowered at construction.
    Contains(String),
    /// `None` when the pattern failed to compile; such a matcher never fires.
    Pattern(Option<regex::Regex>),
}

impl Compiled {
    fn build(matcher: &Matcher) -> Self {
        match matcher {
            Matcher::Contains(needle) => Compiled::Contains(needle.to_lowercase()),
            Matcher::Pattern(pattern) => Compiled::Pattern(
                RegexBuilder::new(pattern).case_insensitive(true).build().ok(),
            ),
        }
    }

    fn matches(&self, lowered: &str, original: &str) -> bool {
        match self {
            Compiled::Contains(needle) => lowered.contains(needle),
            Compiled::Pattern(re) => re.as_ref().is_some_and(|re| re.is_match(original)),
        }
    }
}

#[derive(Debug)]
struct CompiledSub {
    prefix: String,
    entries: Vec<(String, Vec<Compiled>)>,
}

#[derive(Debug)]
struct CompiledRule {
    category: String,
    sign: SignConstraint,
    matchers: Vec<Compiled>,
    sub: Option<CompiledSub>,
}

/// The classification engine: a fixed, ordered rule list evaluated
/// first-match-wins. Pure function of (description, amount).
#[derive(Debug)]
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        RuleEngine::new(crate::table::builtin_rules())
    }
}

impl RuleEngine {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CompiledRule {
                matchers: rule.matchers.iter().map(Compiled::build).collect(),
                sub: rule.sub.map(|sub| CompiledSub {
                    prefix: sub.prefix,
                    entries: sub
                        .entries
                        .into_iter()
                        .map(|e| (e.label, e.matchers.iter().map(Compiled::build).collect()))
                        .collect(),
                }),
                category: rule.category,
                sign: rule.sign,
            })
            .collect();
        RuleEngine { rules }
    }

    /// Load a custom rule table from TOML, preserving file order.
    pub fn from_toml(content: &str) -> Result<Self, RuleLoadError> {
        let file: RuleTableFile = toml::from_str(content)?;
        Ok(RuleEngine::new(file.rules))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Assign exactly one category label. Deterministic and side-effect-free;
    /// falls back to `"Uncategorized"` when no rule matches.
    pub fn classify(&self, description: &str, amount: Money) -> String {
        let lowered = description.to_lowercase();
        for rule in &self.rules {
            if !rule.sign.allows(amount) {
                continue;
            }
            if !rule.matchers.iter().any(|m| m.matches(&lowered, description)) {
                continue;
            }
            if let Some(sub) = &rule.sub {
                for (label, matchers) in &sub.entries {
                    if matchers.iter().any(|m| m.matches(&lowered, description)) {
                        return format!("{} - {}", sub.prefix, label);
                    }
                }
            }
            return rule.category.clone();
        }
        UNCATEGORIZED.to_string()
    }
}
