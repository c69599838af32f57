//! Depth labels.
//!
//! The numeric depth of a run picks how many videos to discover. Separately, a
//! [`DepthPolicy`] maps it to a coarse label that only the merge step sees.

use crate::config::{DepthRow, DepthSettings};
use serde::{Deserialize, Serialize};

/// Coarse verbosity hint passed to aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepthLabel(String);

impl DepthLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DepthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pure mapping from requested depth to a label.
pub trait DepthPolicy: Send + Sync {
    fn label(&self, depth: i64) -> DepthLabel;
}

impl<F> DepthPolicy for F
where
    F: Fn(i64) -> DepthLabel + Send + Sync,
{
    fn label(&self, depth: i64) -> DepthLabel {
        self(depth)
    }
}

/// Ordered threshold table: the last row whose `min` is `<= depth` wins.
/// Depths below every row take the first row's label.
#[derive(Debug, Clone)]
pub struct ThresholdTable {
    rows: Vec<(i64, DepthLabel)>,
}

impl ThresholdTable {
    /// Build a table from `(min, label)` rows in any order.
    ///
    /// An empty row set yields a table that labels everything "default".
    pub fn new(rows: impl IntoIterator<Item = (i64, DepthLabel)>) -> Self {
        let mut rows: Vec<_> = rows.into_iter().collect();
        rows.sort_by_key(|(min, _)| *min);
        if rows.is_empty() {
            rows.push((i64::MIN, DepthLabel::new("default")));
        }
        Self { rows }
    }

    pub fn from_settings(settings: &DepthSettings) -> Self {
        Self::new(
            settings
                .labels
                .iter()
                .map(|DepthRow { min, label }| (*min, DepthLabel::new(label.clone()))),
        )
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::from_settings(&DepthSettings::default())
    }
}

impl DepthPolicy for ThresholdTable {
    fn label(&self, depth: i64) -> DepthLabel {
        self.rows
            .iter()
            .rev()
            .find(|(min, _)| *min <= depth)
            .or_else(|| self.rows.first())
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| DepthLabel::new("default"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = ThresholdTable::default();
        assert_eq!(table.label(-2).as_str(), "low");
        assert_eq!(table.label(1).as_str(), "low");
        assert_eq!(table.label(4).as_str(), "low");
        assert_eq!(table.label(5).as_str(), "high");
        assert_eq!(table.label(50).as_str(), "high");
        assert_eq!(table.label(900).as_str(), "high");
    }

    #[test]
    fn test_rows_are_sorted() {
        let table = ThresholdTable::new([
            (20, DepthLabel::new("exhaustive")),
            (1, DepthLabel::new("brief")),
            (8, DepthLabel::new("detailed")),
        ]);
        assert_eq!(table.label(7).as_str(), "brief");
        assert_eq!(table.label(8).as_str(), "detailed");
        assert_eq!(table.label(25).as_str(), "exhaustive");
    }

    #[test]
    fn test_empty_table() {
        let table = ThresholdTable::new(Vec::new());
        assert_eq!(table.label(3).as_str(), "default");
    }

    #[test]
    fn test_same_depth_same_label() {
        let table = ThresholdTable::default();
        let first = table.label(5);
        for _ in 0..10 {
            assert_eq!(table.label(5), first);
        }
    }

    #[test]
    fn test_closure_policy() {
        let policy = |depth: i64| DepthLabel::new(if depth % 2 == 0 { "even" } else { "odd" });
        assert_eq!(DepthPolicy::label(&policy, 4).as_str(), "even");
        assert_eq!(DepthPolicy::label(&policy, 5).as_str(), "odd");
    }
}
