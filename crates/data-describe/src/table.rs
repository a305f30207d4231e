//! Aggregation of dataset summaries for one collection.
//!
//! Summaries are appended to a [`SummaryTableBuilder`] in discovery order and
//! frozen into a [`SummaryTable`] by [`SummaryTableBuilder::finalize`]. The
//! builder is consumed, so readers never observe a half-built table.

use crate::types::{DatasetSummary, TaskType};
use std::collections::HashMap;
use tracing::warn;

/// Collects summaries in discovery order.
#[derive(Debug)]
pub struct SummaryTableBuilder {
    task_type: TaskType,
    summaries: Vec<DatasetSummary>,
}

impl SummaryTableBuilder {
    pub fn new(task_type: TaskType) -> Self {
        Self {
            task_type,
            summaries: Vec::new(),
        }
    }

    /// Append a summary. Discovery order is the tie-break for equal sizes.
    pub fn add(&mut self, summary: DatasetSummary) {
        self.summaries.push(summary);
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Sort by size descending and build the name-keyed view.
    ///
    /// The sort is stable. In the keyed view a summary added later replaces
    /// an earlier one with the same name; the ordered view keeps both.
    /// Collisions are logged.
    pub fn finalize(self) -> SummaryTable {
        let mut indexed: Vec<(usize, DatasetSummary)> =
            self.summaries.into_iter().enumerate().collect();
        indexed.sort_by(|(_, a), (_, b)| b.size.cmp(&a.size));

        // discovery index -> sorted index
        let mut position = vec![0; indexed.len()];
        for (sorted, (discovered, _)) in indexed.iter().enumerate() {
            position[*discovered] = sorted;
        }
        let ordered: Vec<DatasetSummary> = indexed.into_iter().map(|(_, s)| s).collect();

        let mut by_name: HashMap<String, usize> = HashMap::with_capacity(ordered.len());
        for &index in &position {
            let summary = &ordered[index];
            if let Some(previous) = by_name.insert(summary.name.clone(), index) {
                warn!(
                    "Dataset name '{}' appears more than once ({} vs {} rows); keeping the later one in the keyed view",
                    summary.name, ordered[previous].size, summary.size
                );
            }
        }

        SummaryTable {
            task_type: self.task_type,
            ordered,
            by_name,
        }
    }
}

/// Frozen, sorted collection of summaries for one task type.
#[derive(Debug, Clone)]
pub struct SummaryTable {
    task_type: TaskType,
    ordered: Vec<DatasetSummary>,
    by_name: HashMap<String, usize>,
}

impl SummaryTable {
    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// All summaries, largest dataset first.
    pub fn ordered(&self) -> &[DatasetSummary] {
        &self.ordered
    }

    /// Look up a summary by dataset name (last write wins).
    pub fn get(&self, name: &str) -> Option<&DatasetSummary> {
        self.by_name.get(name).map(|&index| &self.ordered[index])
    }

    /// Summaries of the name-keyed view, in table order.
    ///
    /// This is what the typeset report renders: one row per distinct name.
    pub fn keyed(&self) -> Vec<&DatasetSummary> {
        self.ordered
            .iter()
            .enumerate()
            .filter(|(index, summary)| self.by_name.get(&summary.name) == Some(index))
            .map(|(_, summary)| summary)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
