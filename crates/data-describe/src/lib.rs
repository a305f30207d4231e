//! Dataset Description Library
//!
//! Summarizes collections of tabular datasets and writes a report per
//! collection, built with Rust and Polars.
//!
//! # Overview
//!
//! For every configured root folder the library:
//!
//! - **Discovers** all dataset files with the configured extension, recursively
//! - **Computes** size, attribute count and, for classification, the class
//!   distribution of the last column
//! - **Orders** the datasets by size, largest first
//! - **Writes** a CSV export and a typeset (LaTeX) table, with long class
//!   distributions split over several physical rows
//!
//! A root whose last path component contains "classification" is described
//! as a classification collection; any other root as regression.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use data_describe::{DescribeConfig, Describer};
//!
//! let config = DescribeConfig::builder()
//!     .data_folders(["raw_data/classification", "raw_data/regression"])
//!     .description("description")
//!     .max_values_per_row(10)
//!     .latex_engine("pdflatex")
//!     .build()?;
//!
//! let summary = Describer::builder()
//!     .config(config)
//!     .on_progress(|update| println!("[{}] {}", update.stage.display_name(), update.message))
//!     .build()?
//!     .run()?;
//!
//! for collection in &summary.collections {
//!     println!("{}: {} datasets", collection.root, collection.datasets);
//! }
//! ```
//!
//! # Pagination
//!
//! [`paginate()`] splits a class distribution into chunks of at most
//! `max_values_per_row` values. Joined together the rendered chunks give
//! back the single-line form:
//!
//! ```rust,ignore
//! use data_describe::paginate::paginate;
//! use std::num::NonZeroUsize;
//!
//! let rendered: Vec<String> = paginate(&[5, 4, 3, 2, 1], NonZeroUsize::new(2))
//!     .map(|chunk| chunk.render())
//!     .collect();
//! assert_eq!(rendered, ["(5,4,", "3,2,", "1)"]);
//! ```
//!
//! # Acquisition
//!
//! With the `fetch` feature (on by default), [`fetch::Fetcher`] downloads the
//! datasets listed in per-dataset manifests into the raw data folder.

pub mod config;
pub mod discovery;
pub mod error;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod paginate;
pub mod pipeline;
pub mod reporting;
pub mod statistics;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{DescribeConfig, DescribeConfigBuilder};
pub use discovery::{discover_collection, discover_files};
pub use error::{DescribeError, Result as DescribeResult, ResultExt};
pub use paginate::{Chunk, ChunkPosition, PhysicalRow, paginate, physical_rows};
pub use pipeline::{
    ClosureProgressReporter, DescribeStage, Describer, DescriberBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use reporting::{LatexEngine, ReportArtifacts, ReportWriter, TypesetBackend};
pub use statistics::StatisticsComputer;
pub use table::{SummaryTable, SummaryTableBuilder};
pub use types::{ClassStats, CollectionReport, DatasetSummary, RunSummary, TaskType};
