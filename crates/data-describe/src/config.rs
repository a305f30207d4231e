//! Configuration types for dataset description runs.
//!
//! This module provides configuration options using the builder pattern.
//! A [`DescribeConfig`] is passed explicitly to the run entry point; there is
//! no process-wide state.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::error::{DescribeError, Result};

/// Configuration for a description run.
///
/// Use [`DescribeConfig::builder()`] to create a new configuration
/// with fluent API, or [`DescribeConfig::from_file`] to load a JSON file.
///
/// # Example
///
/// ```rust,ignore
/// use data_describe::config::DescribeConfig;
///
/// let config = DescribeConfig::builder()
///     .data_folders(["raw_data/classification", "raw_data/regression"])
///     .description("description")
///     .max_values_per_row(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeConfig {
    /// Root folders to scan, one collection per root.
    /// A root whose last path component contains "classification" is
    /// described as a classification collection, any other as regression.
    /// Default: ["raw_data/classification", "raw_data/regression"]
    pub data_folders: Vec<PathBuf>,

    /// Output directory. Each collection writes into a subfolder named
    /// after its root.
    /// Default: "description"
    pub description: PathBuf,

    /// Whether to wipe a collection's previous output before writing.
    /// Default: true
    pub remove_older: bool,

    /// File extension (without the dot) of dataset files.
    /// Default: "data"
    pub file_extension: String,

    /// Field separator of dataset files.
    /// Default: ','
    pub separator: char,

    /// Maximum number of class-distribution values per report row.
    /// `None` means unbounded (never paginate).
    /// Default: None
    pub max_values_per_row: Option<NonZeroUsize>,

    /// External LaTeX engine used to compile the typeset report to PDF.
    /// When `None`, only the `.tex` source is written.
    /// Default: None
    pub latex_engine: Option<String>,
}

impl Default for DescribeConfig {
    fn default() -> Self {
        Self {
            data_folders: vec![
                PathBuf::from("raw_data/classification"),
                PathBuf::from("raw_data/regression"),
            ],
            description: PathBuf::from("description"),
            remove_older: true,
            file_extension: "data".to_string(),
            separator: ',',
            max_values_per_row: None,
            latex_engine: None,
        }
    }
}

impl DescribeConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DescribeConfigBuilder {
        DescribeConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their default values. The loaded configuration
    /// is validated before it is returned.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DescribeError::Io(e).with_context(format!("Reading config {}", path.display()))
        })?;
        let config: DescribeConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.data_folders.is_empty() {
            return Err(DescribeError::InvalidConfig(
                "at least one data folder is required".to_string(),
            ));
        }

        if self.file_extension.is_empty() || self.file_extension.starts_with('.') {
            return Err(DescribeError::InvalidConfig(format!(
                "file_extension must be non-empty and given without a leading dot, got '{}'",
                self.file_extension
            )));
        }

        if !self.separator.is_ascii() {
            return Err(DescribeError::InvalidConfig(format!(
                "separator must be a single ASCII character, got '{}'",
                self.separator
            )));
        }

        Ok(())
    }

    /// The separator as the byte expected by the CSV reader.
    pub fn separator_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.separator as u8
    }
}

/// Builder for [`DescribeConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DescribeConfigBuilder {
    data_folders: Option<Vec<PathBuf>>,
    description: Option<PathBuf>,
    remove_older: Option<bool>,
    file_extension: Option<String>,
    separator: Option<char>,
    max_values_per_row: Option<Option<NonZeroUsize>>,
    latex_engine: Option<String>,
}

impl DescribeConfigBuilder {
    /// Start from an existing configuration (e.g. one loaded from a file).
    pub fn from_config(config: DescribeConfig) -> Self {
        Self {
            data_folders: Some(config.data_folders),
            description: Some(config.description),
            remove_older: Some(config.remove_older),
            file_extension: Some(config.file_extension),
            separator: Some(config.separator),
            max_values_per_row: Some(config.max_values_per_row),
            latex_engine: config.latex_engine,
        }
    }

    /// Set the root folders to scan.
    pub fn data_folders<I, P>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.data_folders = Some(folders.into_iter().map(Into::into).collect());
        self
    }

    /// Set the output directory.
    pub fn description(mut self, path: impl Into<PathBuf>) -> Self {
        self.description = Some(path.into());
        self
    }

    /// Enable or disable wiping previous output.
    pub fn remove_older(mut self, remove: bool) -> Self {
        self.remove_older = Some(remove);
        self
    }

    /// Set the dataset file extension (without the dot).
    pub fn file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = Some(extension.into());
        self
    }

    /// Set the field separator of dataset files.
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Set the number of class-distribution values per report row.
    ///
    /// Zero is treated as unbounded.
    pub fn max_values_per_row(mut self, capacity: usize) -> Self {
        self.max_values_per_row = Some(NonZeroUsize::new(capacity));
        self
    }

    /// Never paginate the class distribution.
    pub fn unbounded_values_per_row(mut self) -> Self {
        self.max_values_per_row = Some(None);
        self
    }

    /// Set the LaTeX engine used to compile the report to PDF.
    pub fn latex_engine(mut self, engine: impl Into<String>) -> Self {
        self.latex_engine = Some(engine.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `DescribeConfig` or an error if validation fails.
    pub fn build(self) -> Result<DescribeConfig> {
        let defaults = DescribeConfig::default();
        let config = DescribeConfig {
            data_folders: self.data_folders.unwrap_or(defaults.data_folders),
            description: self.description.unwrap_or(defaults.description),
            remove_older: self.remove_older.unwrap_or(defaults.remove_older),
            file_extension: self.file_extension.unwrap_or(defaults.file_extension),
            separator: self.separator.unwrap_or(defaults.separator),
            max_values_per_row: self
                .max_values_per_row
                .unwrap_or(defaults.max_values_per_row),
            latex_engine: self.latex_engine,
        };

        config.validate()?;
        Ok(config)
    }
}
