//! Progress events emitted by a run.
//!
//! This is the whole observable surface of the pipeline: CLI, HTTP and any
//! other consumer render from these events only. Events arrive in emission
//! order and a run always ends with exactly one [`ProgressEvent::Terminal`].

use crate::discovery::Locator;
use serde::{Deserialize, Serialize};

/// Pipeline stage. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Discovering,
    Summarizing,
    Aggregating,
    Done,
}

impl Stage {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Discovering => "Discovering",
            Stage::Summarizing => "Summarizing",
            Stage::Aggregating => "Aggregating",
            Stage::Done => "Done",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result slot for one discovered video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum ItemOutcome {
    Pending,
    Succeeded(String),
    Failed(String),
}

impl ItemOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, ItemOutcome::Pending)
    }

    /// Summary text, if this item succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            ItemOutcome::Succeeded(text) => Some(text),
            _ => None,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Terminal {
    /// Merged summary of every successful item.
    FinalSummary { text: String },
    /// Nothing usable: discovery found nothing or every item failed.
    NoResults,
    /// Discovery or aggregation failed.
    Error { reason: String },
}

/// One progress event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// The run entered a new stage.
    StageChanged { stage: Stage },
    /// `completed` of `total` items have settled.
    Counts { completed: usize, total: usize },
    /// One item settled. Always followed by a `Counts` event.
    ItemSettled {
        index: usize,
        locator: Locator,
        outcome: ItemOutcome,
    },
    /// Final event of every run.
    Terminal { outcome: Terminal },
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Terminal { .. })
    }
}

/// Run-level result. Distinct from [`ItemOutcome`]: an item failure never
/// becomes a run failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed {
        summary: String,
        items: Vec<ItemOutcome>,
    },
    NoResults {
        items: Vec<ItemOutcome>,
    },
    Aborted {
        reason: String,
        items: Vec<ItemOutcome>,
    },
}

impl RunOutcome {
    /// The terminal event payload for this outcome.
    pub fn terminal(&self) -> Terminal {
        match self {
            RunOutcome::Completed { summary, .. } => Terminal::FinalSummary {
                text: summary.clone(),
            },
            RunOutcome::NoResults { .. } => Terminal::NoResults,
            RunOutcome::Aborted { reason, .. } => Terminal::Error {
                reason: reason.clone(),
            },
        }
    }

    /// Per-item outcomes in discovery order.
    pub fn items(&self) -> &[ItemOutcome] {
        match self {
            RunOutcome::Completed { items, .. }
            | RunOutcome::NoResults { items }
            | RunOutcome::Aborted { items, .. } => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = ProgressEvent::Counts {
            completed: 2,
            total: 5,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"type":"counts","completed":2,"total":5}"#
        );

        let event = ProgressEvent::Terminal {
            outcome: Terminal::NoResults,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"type":"terminal","outcome":{"kind":"no_results"}}"#
        );

        let event = ProgressEvent::ItemSettled {
            index: 0,
            locator: Locator::new("u"),
            outcome: ItemOutcome::Failed("boom".to_string()),
        };
        let value: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["outcome"]["status"], "failed");
        assert_eq!(value["outcome"]["value"], "boom");
    }

    #[test]
    fn test_stage_order() {
        assert!(Stage::Discovering < Stage::Summarizing);
        assert!(Stage::Summarizing < Stage::Aggregating);
        assert!(Stage::Aggregating < Stage::Done);
    }

    #[test]
    fn test_outcome_to_terminal() {
        let outcome = RunOutcome::Aborted {
            reason: "upstream 500".to_string(),
            items: Vec::new(),
        };
        assert_eq!(
            outcome.terminal(),
            Terminal::Error {
                reason: "upstream 500".to_string()
            }
        );
        assert!(outcome.items().is_empty());
    }
}
