// In crates/engine/src/insights.rs

use crate::Result;
use api_client::LanguageModel;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use wallet_metrics::AiInsight;

const DEFAULT_PROMPT: &str = "Analyze this Solana wallet's trading activity and point out notable \
patterns, risks and opportunities.";

const RESPONSE_FORMAT: &str = "Respond with a JSON array only. Each element must be an object \
{\"type\": \"pattern\" | \"risk\" | \"opportunity\" | \"performance\", \"title\": string, \
\"description\": string, \"confidence\": number between 0 and 1}.";

/// Turns wallet metrics into short natural-language insights via a language model.
pub struct InsightFormatter {
    model: Arc<dyn LanguageModel>,
}

impl InsightFormatter {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Model failures propagate; an unreadable answer yields no insights.
    pub async fn generate(&self, prompt: &str, metrics: &Value) -> Result<Vec<AiInsight>> {
        let full_prompt = build_prompt(prompt, metrics);
        let raw = self.model.complete(&full_prompt).await?;
        let insights = parse_insights(&raw);
        info!(provider = self.model.name(), count = insights.len(), "Generated insights");
        Ok(insights)
    }
}

pub fn build_prompt(prompt: &str, metrics: &Value) -> String {
    let prompt = match prompt.trim() {
        "" => DEFAULT_PROMPT,
        p => p,
    };
    format!("{}\n\nWallet metrics:\n{}\n\n{}", prompt, metrics, RESPONSE_FORMAT)
}

/// Reads a JSON array of insights out of a model answer, tolerating markdown fences
/// and an `{"insights": [...]}` wrapper.
pub fn parse_insights(raw: &str) -> Vec<AiInsight> {
    let text = strip_fences(raw);

    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => match (text.find('['), text.rfind(']')) {
            (Some(start), Some(end)) if start < end => {
                serde_json::from_str(&text[start..=end]).unwrap_or(Value::Null)
            }
            _ => Value::Null,
        },
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("insights") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => {
            warn!("Model answer did not contain a JSON array of insights");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<AiInsight>(item).ok())
        .filter(|insight| !insight.title.is_empty() || !insight.description.is_empty())
        .map(|mut insight| {
            insight.confidence = if insight.confidence.is_finite() {
                insight.confidence.clamp(0.0, 1.0)
            } else {
                0.0
            };
            insight
        })
        .collect()
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
