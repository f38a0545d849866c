// In crates/rules/src/lib.rs

pub mod default_rules;
pub mod error;
pub mod rule_set;
pub mod types;

// Re-export public types
pub use default_rules::default_rules;
pub use error::{Error, Result};
pub use rule_set::RuleSet;
pub use types::{Analysis, Rule};

use wallet_metrics::DetailedMetrics;

/// The interface for anything that classifies a metrics snapshot.
///
/// Implementations must be pure: the same snapshot always yields the same
/// `Analysis`, and no state is carried between calls.
pub trait MetricsAnalyzer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Evaluates the snapshot.
    ///
    /// # Returns
    ///
    /// * `Ok(Analysis)`: patterns, risks, sorted recommendations and the overall score.
    /// * `Err(Error::InvalidOutput)`: a rule produced an impact or confidence
    ///   outside its range. The whole analysis is abandoned.
    fn analyze(&self, metrics: &DetailedMetrics) -> Result<Analysis>;
}

impl RuleSet {
    /// The built-in rule table, validated.
    pub fn with_default_rules() -> Result<Self> {
        Self::new(default_rules())
    }
}
