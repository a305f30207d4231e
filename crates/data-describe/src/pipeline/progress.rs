//! Progress reporting for description runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use data_describe::Describer;
//!
//! let summary = Describer::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{}] {}", update.stage.display_name(), update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of a description run, repeated for every collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescribeStage {
    /// Looking for dataset files under a root
    Discovering,
    /// Computing per-dataset statistics
    Computing,
    /// Writing the CSV export and the typeset table
    Writing,
    /// All collections done
    Complete,
    /// The run stopped with an error
    Failed,
}

impl DescribeStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Discovering => "Discovering Files",
            Self::Computing => "Computing Statistics",
            Self::Writing => "Writing Reports",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }
}

/// A progress update emitted during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: DescribeStage,

    /// Root folder of the collection being processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    /// Human-readable message describing current activity
    pub message: String,

    /// Number of files processed in the current collection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_processed: Option<usize>,

    /// Total files in the current collection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_total: Option<usize>,
}

impl ProgressUpdate {
    /// Creates a progress update for a collection stage.
    pub fn new(
        stage: DescribeStage,
        collection: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            collection: Some(collection.into()),
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Creates a progress update with item counts.
    pub fn with_items(
        stage: DescribeStage,
        collection: impl Into<String>,
        current: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            items_processed: Some(current),
            items_total: Some(total),
            ..Self::new(stage, collection, message)
        }
    }

    /// Fraction of the current collection's files processed, if known.
    pub fn fraction(&self) -> Option<f32> {
        match (self.items_processed, self.items_total) {
            (Some(done), Some(total)) if total > 0 => Some(done as f32 / total as f32),
            _ => None,
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: DescribeStage::Complete,
            collection: None,
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: DescribeStage::Failed,
            collection: None,
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }
}

/// Trait for receiving progress updates during a run.
pub trait ProgressReporter: Send + Sync {
    /// Called once per stage change and once per dataset file.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}
