//! Per-dataset statistics.
//!
//! This module reads one tabular file and produces a [`DatasetSummary`]:
//! - Size (row count) and attribute count (columns minus the target)
//! - For classification collections, the class count and the descending
//!   class-size distribution of the last column

mod reader;

use crate::error::{DescribeError, Result};
use crate::types::{ClassStats, DatasetSummary, TaskType};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, warn};

pub(crate) use reader::load_table;

/// Computes summary statistics of dataset files.
///
/// The target is always the last column.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsComputer {
    separator: u8,
}

impl Default for StatisticsComputer {
    fn default() -> Self {
        Self { separator: b',' }
    }
}

impl StatisticsComputer {
    pub fn new(separator: u8) -> Self {
        Self { separator }
    }

    /// Read `path` and summarize it as a dataset of `task_type`.
    ///
    /// The dataset name is the file name without its extension.
    pub fn describe_file(&self, path: &Path, task_type: TaskType) -> Result<DatasetSummary> {
        let name = dataset_name(path);
        let df = load_table(path, self.separator)?;
        self.describe_frame(&name, &df, task_type)
            .map_err(|e| match e {
                DescribeError::Parse { reason, .. } => DescribeError::parse(path, reason),
                other => DescribeError::parse(path, other),
            })
    }

    /// Summarize an already loaded DataFrame.
    pub fn describe_frame(
        &self,
        name: &str,
        df: &DataFrame,
        task_type: TaskType,
    ) -> Result<DatasetSummary> {
        let (size, columns) = df.shape();
        if columns == 0 {
            return Err(DescribeError::parse(name, "no columns found"));
        }
        let attribute_count = columns - 1;

        let classes = match task_type {
            TaskType::Classification => Some(Self::class_stats(df)?),
            TaskType::Regression => None,
        };
        if classes.as_ref().is_some_and(|c| c.class_count == 0) {
            warn!("{}: classification dataset has no rows, so it has no classes", name);
        }

        debug!(
            "{}: {} rows, {} attributes, classes: {:?}",
            name,
            size,
            attribute_count,
            classes.as_ref().map(|c| c.class_count)
        );

        Ok(DatasetSummary {
            name: name.to_string(),
            size,
            attribute_count,
            task_type,
            classes,
        })
    }

    /// Count rows per distinct value of the last column.
    ///
    /// Missing target values are counted as one more class, so the counts
    /// always add up to the row count.
    fn class_stats(df: &DataFrame) -> Result<ClassStats> {
        let target = df
            .get_columns()
            .last()
            .ok_or_else(|| DescribeError::parse("", "no target column"))?
            .as_materialized_series();

        if target.is_empty() {
            return Ok(ClassStats::from_counts(Vec::new()));
        }

        let value_counts = target.value_counts(false, false, "rows".into(), false)?;
        let counts_col = value_counts
            .get_columns()
            .last()
            .ok_or_else(|| DescribeError::parse(target.name().as_str(), "no class counts"))?
            .as_materialized_series()
            .cast(&DataType::UInt64)?;

        let counts: Vec<u64> = counts_col.u64()?.into_no_null_iter().collect();
        Ok(ClassStats::from_counts(counts))
    }
}

/// File name without its extension, e.g. `raw/iris.data` -> `iris`.
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
