// In crates/rules/src/types.rs

use serde::Serialize;
use wallet_metrics::{DetailedMetrics, Finding, PredictionMetrics, Recommendation, RuleCategory};

pub type Condition = Box<dyn Fn(&DetailedMetrics) -> bool + Send + Sync>;
pub type Scorer = Box<dyn Fn(&DetailedMetrics) -> f64 + Send + Sync>;
pub type Advisor = Box<dyn Fn(&DetailedMetrics) -> Vec<String> + Send + Sync>;

/// A single entry of the rule table.
///
/// `impact` must land in `[-1, 1]` and `confidence` in `[0, 1]`; anything else
/// aborts the analysis.
pub struct Rule {
    pub id: String,
    pub category: RuleCategory,
    pub description: String,
    pub priority: u32,
    /// Rules that must trigger before this one is considered.
    pub dependencies: Vec<String>,
    pub condition: Condition,
    pub impact: Scorer,
    pub confidence: Scorer,
    pub recommendations: Advisor,
}

impl Rule {
    /// Starts a rule that never triggers, has zero impact and no advice.
    pub fn new(id: &str, category: RuleCategory, description: &str) -> Self {
        Self {
            id: id.to_string(),
            category,
            description: description.to_string(),
            priority: 1,
            dependencies: Vec::new(),
            condition: Box::new(|_| false),
            impact: Box::new(|_| 0.0),
            confidence: Box::new(|_| 1.0),
            recommendations: Box::new(|_| Vec::new()),
        }
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn depends_on(mut self, rule_id: &str) -> Self {
        self.dependencies.push(rule_id.to_string());
        self
    }

    pub fn when(mut self, condition: impl Fn(&DetailedMetrics) -> bool + Send + Sync + 'static) -> Self {
        self.condition = Box::new(condition);
        self
    }

    pub fn impact(mut self, impact: impl Fn(&DetailedMetrics) -> f64 + Send + Sync + 'static) -> Self {
        self.impact = Box::new(impact);
        self
    }

    pub fn confidence(mut self, confidence: impl Fn(&DetailedMetrics) -> f64 + Send + Sync + 'static) -> Self {
        self.confidence = Box::new(confidence);
        self
    }

    pub fn advise(mut self, advice: impl Fn(&DetailedMetrics) -> Vec<String> + Send + Sync + 'static) -> Self {
        self.recommendations = Box::new(advice);
        self
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("priority", &self.priority)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Outcome of one `analyze` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analysis {
    pub patterns: Vec<Finding>,
    pub risks: Vec<Finding>,
    /// Advice from every triggered rule, highest `priority * impact` first.
    pub recommendations: Vec<Recommendation>,
    /// 1 when nothing triggered, otherwise `1 + mean(impact * confidence)` clamped to `[0, 1]`.
    pub score: f64,
    /// Ids of every triggered rule, in evaluation order.
    pub triggered: Vec<String>,
}

impl From<Analysis> for PredictionMetrics {
    fn from(analysis: Analysis) -> Self {
        PredictionMetrics {
            score: analysis.score,
            patterns: analysis.patterns,
            risks: analysis.risks,
            recommendations: analysis.recommendations,
        }
    }
}
