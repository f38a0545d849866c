// In crates/rules/src/rule_set.rs

use crate::types::{Analysis, Rule};
use crate::{Error, MetricsAnalyzer, Result};
use std::collections::{BTreeSet, HashMap};
use wallet_metrics::{DetailedMetrics, Finding, Recommendation, RuleCategory};

/// A validated rule table with a precomputed evaluation order.
///
/// Construction rejects duplicate ids, dangling dependencies and cycles, so
/// `analyze` only ever walks a DAG.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
    /// Indices into `rules`, dependencies always before dependents.
    order: Vec<usize>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            if index.insert(rule.id.as_str(), i).is_some() {
                return Err(Error::DuplicateRule(rule.id.clone()));
            }
        }

        // Adjacency: dependency -> dependents.
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); rules.len()];
        let mut pending: Vec<usize> = vec![0; rules.len()];
        for (i, rule) in rules.iter().enumerate() {
            for dependency in &rule.dependencies {
                let &dep = index.get(dependency.as_str()).ok_or_else(|| Error::UnknownDependency {
                    rule: rule.id.clone(),
                    dependency: dependency.clone(),
                })?;
                dependents[dep].push(i);
                pending[i] += 1;
            }
        }

        // Kahn's algorithm; the ready set is ordered so ties keep table order.
        let mut ready: BTreeSet<usize> = (0..rules.len()).filter(|&i| pending[i] == 0).collect();
        let mut order = Vec::with_capacity(rules.len());
        while let Some(next) = ready.pop_first() {
            order.push(next);
            for &dependent in &dependents[next] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() != rules.len() {
            let stuck = rules
                .iter()
                .enumerate()
                .filter(|(i, _)| pending[*i] > 0)
                .map(|(_, rule)| rule.id.clone())
                .collect();
            return Err(Error::DependencyCycle(stuck));
        }

        Ok(Self { rules, order })
    }

    /// Rule ids in evaluation order.
    pub fn evaluation_order(&self) -> Vec<&str> {
        self.order.iter().map(|&i| self.rules[i].id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl MetricsAnalyzer for RuleSet {
    fn name(&self) -> &'static str {
        "RuleSet"
    }

    fn analyze(&self, metrics: &DetailedMetrics) -> Result<Analysis> {
        // Trigger results for this call only.
        let mut triggered: HashMap<&str, bool> = HashMap::with_capacity(self.rules.len());
        let mut fired: Vec<(&Rule, f64, f64)> = Vec::new();

        for &i in &self.order {
            let rule = &self.rules[i];
            let dependencies_met = rule
                .dependencies
                .iter()
                .all(|dep| triggered.get(dep.as_str()).copied().unwrap_or(false));
            let hit = dependencies_met && (rule.condition)(metrics);
            triggered.insert(rule.id.as_str(), hit);

            if hit {
                let impact = checked(rule, "impact", (rule.impact)(metrics), -1.0, 1.0)?;
                let confidence = checked(rule, "confidence", (rule.confidence)(metrics), 0.0, 1.0)?;
                tracing::debug!(rule = %rule.id, impact, confidence, "Rule triggered.");
                fired.push((rule, impact, confidence));
            }
        }

        let findings = |category: RuleCategory| -> Vec<Finding> {
            fired
                .iter()
                .filter(|(rule, _, _)| rule.category == category)
                .map(|(rule, impact, confidence)| Finding {
                    rule_id: rule.id.clone(),
                    category: rule.category,
                    description: rule.description.clone(),
                    impact: *impact,
                    confidence: *confidence,
                })
                .collect()
        };

        let mut recommendations: Vec<Recommendation> = fired
            .iter()
            .flat_map(|(rule, impact, _)| {
                (rule.recommendations)(metrics).into_iter().map(|text| Recommendation {
                    text,
                    rule_id: rule.id.clone(),
                    priority: rule.priority,
                    impact: impact.abs(),
                })
            })
            .collect();
        recommendations.sort_by(|a, b| weight(b).total_cmp(&weight(a)));

        let score = if fired.is_empty() {
            1.0
        } else {
            let mean = fired.iter().map(|(_, impact, confidence)| impact * confidence).sum::<f64>()
                / fired.len() as f64;
            (1.0 + mean).clamp(0.0, 1.0)
        };

        Ok(Analysis {
            patterns: findings(RuleCategory::Pattern),
            risks: findings(RuleCategory::Risk),
            recommendations,
            score,
            triggered: fired.iter().map(|(rule, _, _)| rule.id.clone()).collect(),
        })
    }
}

fn weight(recommendation: &Recommendation) -> f64 {
    recommendation.priority as f64 * recommendation.impact
}

fn checked(rule: &Rule, field: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidOutput {
            rule: rule.id.clone(),
            field,
            value,
        })
    }
}
