//! Report generation module.
//!
//! This module writes the two artifacts of a described collection:
//!
//! - `data_description.csv`: the machine-readable table, every dataset of the
//!   ordered view, class distribution joined with `;`
//! - `data_description.tex`: a LaTeX `longtable` document built from the
//!   name-keyed view, long class distributions reflowed by
//!   [`crate::paginate::physical_rows`]; optionally compiled to PDF by a
//!   [`TypesetBackend`]
//!
//! The CSV is always written first. A failing typeset step returns
//! [`crate::DescribeError::Render`] carrying the path of the CSV that is
//! already on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use data_describe::reporting::{LatexEngine, ReportWriter};
//!
//! let writer = ReportWriter::new("description/classification", None)
//!     .with_backend(LatexEngine::new("pdflatex"));
//! let artifacts = writer.write(&table)?;
//! println!("{}", artifacts.csv_path.display());
//! ```

mod csv_export;
mod generator;
mod latex;

pub use csv_export::{CSV_FILE_NAME, write_csv};
pub use generator::{ReportArtifacts, ReportWriter};
pub use latex::{LatexEngine, TEX_FILE_STEM, TypesetBackend, escape_latex, render_document};
