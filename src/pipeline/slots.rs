//! Index-keyed outcome slots for the fan-out stage.

use super::events::ItemOutcome;

/// One slot per discovered item, written exactly once.
///
/// Completion order does not matter: results are read back by index.
#[derive(Debug)]
pub struct OutcomeSlots {
    slots: Vec<ItemOutcome>,
    completed: usize,
}

impl OutcomeSlots {
    pub fn new(total: usize) -> Self {
        Self {
            slots: vec![ItemOutcome::Pending; total],
            completed: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.slots.len()
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.slots.len()
    }

    /// Record the outcome for `index`. Returns false, leaving the slot untouched,
    /// if the index is out of range, already settled, or `outcome` is `Pending`.
    pub fn settle(&mut self, index: usize, outcome: ItemOutcome) -> bool {
        if outcome.is_pending() {
            return false;
        }
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_pending() => {
                *slot = outcome;
                self.completed += 1;
                true
            }
            _ => false,
        }
    }

    /// Succeeded texts in index order.
    pub fn successes(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter_map(|o| o.text().map(str::to_string))
            .collect()
    }

    pub fn into_outcomes(self) -> Vec<ItemOutcome> {
        self.slots
    }
}
