//! Consumer-side view of a run's progress.

use super::events::{ItemOutcome, ProgressEvent, Stage, Terminal};
use crate::discovery::Locator;

/// Folds progress events into what a UI needs to draw at any moment.
#[derive(Debug, Clone, Default)]
pub struct ProgressView {
    stage: Option<Stage>,
    completed: usize,
    total: usize,
    items: Vec<Option<(Locator, ItemOutcome)>>,
    terminal: Option<Terminal>,
}

impl ProgressView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Returns false if it was ignored because the run already ended.
    pub fn apply(&mut self, event: &ProgressEvent) -> bool {
        if self.terminal.is_some() {
            return false;
        }

        match event {
            ProgressEvent::StageChanged { stage } => {
                self.stage = Some(*stage);
            }
            ProgressEvent::Counts { completed, total } => {
                self.completed = *completed;
                self.total = *total;
                if self.items.len() < *total {
                    self.items.resize(*total, None);
                }
            }
            ProgressEvent::ItemSettled {
                index,
                locator,
                outcome,
            } => {
                if self.items.len() <= *index {
                    self.items.resize(index + 1, None);
                }
                self.items[*index] = Some((locator.clone(), outcome.clone()));
            }
            ProgressEvent::Terminal { outcome } => {
                self.stage = Some(Stage::Done);
                self.terminal = Some(outcome.clone());
            }
        }
        true
    }

    /// Label of the last stage seen.
    pub fn stage_label(&self) -> &'static str {
        self.stage.map(|s| s.label()).unwrap_or("Starting")
    }

    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `completed / total` as a whole percentage; 0 before any item is known.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed.min(self.total) * 100) / self.total) as u8
    }

    /// Settled items in discovery order.
    pub fn items(&self) -> impl Iterator<Item = (usize, &Locator, &ItemOutcome)> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|(l, o)| (i, l, o)))
    }

    /// Per-item summary texts received so far, in discovery order.
    pub fn summaries(&self) -> Vec<&str> {
        self.items().filter_map(|(_, _, o)| o.text()).collect()
    }

    pub fn terminal(&self) -> Option<&Terminal> {
        self.terminal.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.terminal.is_some()
    }

    /// The merged summary, once the run completed with one.
    pub fn final_summary(&self) -> Option<&str> {
        match &self.terminal {
            Some(Terminal::FinalSummary { text }) => Some(text),
            _ => None,
        }
    }
}
