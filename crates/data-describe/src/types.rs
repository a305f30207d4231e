use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Kind of learning task a dataset collection belongs to.
///
/// The task type is a property of the collection (its root folder), not of
/// the individual file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Classification,
    Regression,
}

impl TaskType {
    /// Decide the task type of a root folder from its last path component.
    pub fn from_root(root: &Path) -> Self {
        let folder = root
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if folder.contains("classification") {
            Self::Classification
        } else {
            Self::Regression
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classification => "classification",
            Self::Regression => "regression",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class statistics of a classification dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStats {
    /// Number of distinct target values.
    pub class_count: usize,
    /// Rows per class, sorted descending. Labels are not kept.
    pub class_distribution: Vec<u64>,
}

impl ClassStats {
    /// Build class statistics from unordered per-class counts.
    pub fn from_counts(mut counts: Vec<u64>) -> Self {
        counts.sort_unstable_by(|a, b| b.cmp(a));
        Self {
            class_count: counts.len(),
            class_distribution: counts,
        }
    }

    /// Total number of rows across all classes.
    pub fn total(&self) -> u64 {
        self.class_distribution.iter().sum()
    }
}

/// Summary statistics of one dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// File base name without extension.
    pub name: String,
    /// Number of rows (observations).
    pub size: usize,
    /// Number of columns minus the target column.
    pub attribute_count: usize,
    pub task_type: TaskType,
    /// Present only for classification datasets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<ClassStats>,
}

impl DatasetSummary {
    pub fn class_count(&self) -> Option<usize> {
        self.classes.as_ref().map(|c| c.class_count)
    }

    pub fn class_distribution(&self) -> Option<&[u64]> {
        self.classes.as_ref().map(|c| c.class_distribution.as_slice())
    }
}

/// Outcome of describing one collection (root folder).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReport {
    pub root: String,
    pub task_type: TaskType,
    /// Number of files found under the root.
    pub files_found: usize,
    /// Number of datasets described (files found minus skipped files).
    pub datasets: usize,
    /// Files skipped because they could not be parsed.
    pub skipped_files: Vec<String>,
    pub csv_path: Option<String>,
    pub document_path: Option<String>,
    /// Set when the typeset backend failed after the CSV was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_error: Option<String>,
}

/// Outcome of a whole run over all configured roots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub collections: Vec<CollectionReport>,
    /// Roots skipped because they held no matching file.
    pub skipped_roots: Vec<String>,
}

impl RunSummary {
    /// Whether any collection's typeset backend failed.
    pub fn has_render_errors(&self) -> bool {
        self.collections.iter().any(|c| c.render_error.is_some())
    }
}
