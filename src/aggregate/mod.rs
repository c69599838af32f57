//! Merging per-video summaries into one final summary.

mod llm;

pub use llm::LlmAggregator;

use crate::error::Result;
use crate::pipeline::DepthLabel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One per-video summary handed to the merge step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledSummary {
    /// Display label, e.g. "Summary 2".
    #[serde(rename = "title")]
    pub label: String,
    /// Summary text.
    #[serde(rename = "content")]
    pub text: String,
}

impl LabeledSummary {
    /// Label texts "Summary 1", "Summary 2", ... in the given order.
    pub fn number(texts: impl IntoIterator<Item = String>) -> Vec<Self> {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Self {
                label: format!("Summary {}", i + 1),
                text,
            })
            .collect()
    }
}

/// Trait for the merge step.
#[async_trait]
pub trait Aggregator: Send + Sync {
    /// Merge `summaries` into one text. Implementations reject an empty list.
    async fn merge(
        &self,
        query: &str,
        depth: &DepthLabel,
        style: &str,
        summaries: &[LabeledSummary],
    ) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_labels_in_order() {
        let labeled = LabeledSummary::number(vec!["X".to_string(), "Z".to_string()]);
        assert_eq!(labeled[0].label, "Summary 1");
        assert_eq!(labeled[0].text, "X");
        assert_eq!(labeled[1].label, "Summary 2");
        assert_eq!(labeled[1].text, "Z");
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_string(&LabeledSummary {
            label: "Summary 1".to_string(),
            text: "body".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"title":"Summary 1","content":"body"}"#);
    }
}
