//! Reflow of long class distributions across report rows.
//!
//! A fixed-width table cannot print a class distribution with hundreds of
//! values in one cell. [`paginate`] splits the distribution into chunks of at
//! most `max_values_per_row` values, and [`physical_rows`] turns one summary
//! into the rows a renderer prints:
//!
//! ```text
//! Dataset  Size  #Attr.  #Classes  Class distribution
//! letter   15    16      5         (5,4,
//!                                  3,2,
//!                                  1)
//! ```
//!
//! Concatenating the rendered chunks always yields the rendering of the full
//! distribution, so no value is lost, duplicated or reordered.

use crate::types::{DatasetSummary, TaskType};
use std::num::NonZeroUsize;

/// Where a chunk sits inside its distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkPosition {
    /// The whole distribution fits in one row.
    Only,
    /// Opens the list; more chunks follow.
    First,
    /// Neither opens nor closes the list.
    Middle,
    /// Closes the list.
    Last,
}

impl ChunkPosition {
    fn opens(self) -> bool {
        matches!(self, Self::Only | Self::First)
    }

    fn closes(self) -> bool {
        matches!(self, Self::Only | Self::Last)
    }
}

/// A contiguous slice of a class distribution assigned to one physical row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub values: &'a [u64],
    pub position: ChunkPosition,
}

impl Chunk<'_> {
    /// Render the chunk as report text.
    ///
    /// The opening chunk starts with `(`, the closing chunk ends with `)`,
    /// and every chunk that does not close the list ends with `,`.
    pub fn render(&self) -> String {
        let mut text = String::new();
        if self.position.opens() {
            text.push('(');
        }
        text.push_str(&join_values(self.values, ","));
        if self.position.closes() {
            text.push(')');
        } else {
            text.push(',');
        }
        text
    }
}

/// Join values with `separator`, e.g. `[3, 2, 1]` -> `"3,2,1"`.
pub fn join_values(values: &[u64], separator: &str) -> String {
    values
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Lazy iterator over the chunks of one distribution.
///
/// Created by [`paginate`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    values: &'a [u64],
    step: usize,
    offset: usize,
    finished: bool,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let start = self.offset;
        let end = (start + self.step).min(self.values.len());
        self.offset = end;

        let is_first = start == 0;
        let is_last = end == self.values.len();
        if is_last {
            self.finished = true;
        }

        let position = match (is_first, is_last) {
            (true, true) => ChunkPosition::Only,
            (true, false) => ChunkPosition::First,
            (false, false) => ChunkPosition::Middle,
            (false, true) => ChunkPosition::Last,
        };

        Some(Chunk {
            values: &self.values[start..end],
            position,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.finished {
            0
        } else {
            let left = self.values.len() - self.offset;
            // an empty distribution still yields one (empty) chunk
            left.div_ceil(self.step.max(1)).max(1)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Chunks<'_> {}

/// Split `values` into chunks of at most `capacity` values.
///
/// With `None` (unbounded) or when the distribution fits, exactly one
/// [`ChunkPosition::Only`] chunk is produced. Otherwise the chunks are
/// `First`, zero or more `Middle` and one `Last`; a length that is an exact
/// multiple of the capacity does not produce a trailing empty chunk.
pub fn paginate(values: &[u64], capacity: Option<NonZeroUsize>) -> Chunks<'_> {
    let step = capacity
        .map(NonZeroUsize::get)
        .filter(|&c| values.len() > c)
        .unwrap_or(values.len());

    Chunks {
        values,
        step,
        offset: 0,
        finished: false,
    }
}

/// One literal row of the typeset table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalRow {
    pub cells: Vec<String>,
}

impl PhysicalRow {
    /// Whether this row continues the distribution of a previous row.
    pub fn is_continuation(&self) -> bool {
        self.cells.first().is_some_and(String::is_empty)
    }
}

/// Lazy iterator over the physical rows of one summary.
///
/// Created by [`physical_rows`].
#[derive(Debug, Clone)]
pub struct PhysicalRows<'a> {
    summary: &'a DatasetSummary,
    chunks: Option<Chunks<'a>>,
    done: bool,
}

impl Iterator for PhysicalRows<'_> {
    type Item = PhysicalRow;

    fn next(&mut self) -> Option<Self::Item> {
        let summary = self.summary;
        match self.chunks.as_mut() {
            None => {
                if self.done {
                    return None;
                }
                self.done = true;
                Some(PhysicalRow {
                    cells: scalar_cells(summary),
                })
            }
            Some(chunks) => chunks.next().map(|chunk| {
                let mut cells = if chunk.position.opens() {
                    scalar_cells(summary)
                } else {
                    vec![String::new(); CLASSIFICATION_SCALAR_CELLS]
                };
                cells.push(chunk.render());
                PhysicalRow { cells }
            }),
        }
    }
}

/// Name, size, attributes and class count.
const CLASSIFICATION_SCALAR_CELLS: usize = 4;

fn scalar_cells(summary: &DatasetSummary) -> Vec<String> {
    let mut cells = vec![
        summary.name.clone(),
        summary.size.to_string(),
        summary.attribute_count.to_string(),
    ];
    if let Some(class_count) = summary.class_count() {
        cells.push(class_count.to_string());
    }
    cells
}

/// Reflow one summary into the physical rows of the typeset table.
///
/// Regression summaries always produce a single three-cell row.
/// Classification summaries produce five-cell rows: the first row carries
/// every field, continuation rows leave the first four cells empty.
pub fn physical_rows(
    summary: &DatasetSummary,
    max_values_per_row: Option<NonZeroUsize>,
) -> PhysicalRows<'_> {
    let chunks = match (summary.task_type, summary.class_distribution()) {
        (TaskType::Classification, Some(distribution)) => {
            Some(paginate(distribution, max_values_per_row))
        }
        _ => None,
    };

    PhysicalRows {
        summary,
        chunks,
        done: false,
    }
}
