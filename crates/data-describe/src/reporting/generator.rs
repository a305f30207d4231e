use super::csv_export::write_csv;
use super::latex::{TypesetBackend, write_tex};
use crate::error::{DescribeError, Result};
use crate::table::SummaryTable;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Paths of the artifacts written for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportArtifacts {
    /// The authoritative CSV export
    pub csv_path: PathBuf,
    /// LaTeX source of the typeset table
    pub tex_path: PathBuf,
    /// Compiled document, when a backend is configured
    pub document_path: Option<PathBuf>,
}

/// Writes the CSV export and the typeset table of a collection.
pub struct ReportWriter {
    output_dir: PathBuf,
    max_values_per_row: Option<NonZeroUsize>,
    backend: Option<Arc<dyn TypesetBackend>>,
}

impl ReportWriter {
    /// Create a writer for `output_dir`.
    ///
    /// Without a backend only the `.tex` source of the typeset table is
    /// produced.
    pub fn new(output_dir: impl Into<PathBuf>, max_values_per_row: Option<NonZeroUsize>) -> Self {
        Self {
            output_dir: output_dir.into(),
            max_values_per_row,
            backend: None,
        }
    }

    /// Compile the typeset table with `backend` after writing it.
    pub fn with_backend(mut self, backend: impl TypesetBackend + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    /// Like [`with_backend`](Self::with_backend), for a backend shared
    /// between several writers.
    pub fn with_shared_backend(mut self, backend: Arc<dyn TypesetBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    /// Write all artifacts of `table`.
    ///
    /// The CSV export is written first. If the typeset step fails afterwards
    /// the error is a [`DescribeError::Render`] that names the CSV path; the
    /// CSV file stays on disk.
    pub fn write(&self, table: &SummaryTable) -> Result<ReportArtifacts> {
        let csv_path = write_csv(table, &self.output_dir)?;

        let render_failed = |e: DescribeError| DescribeError::Render {
            csv_path: csv_path.clone(),
            reason: e.to_string(),
        };

        let tex_path =
            write_tex(table, self.max_values_per_row, &self.output_dir).map_err(render_failed)?;

        let document_path = match &self.backend {
            Some(backend) => {
                let document = backend.compile(&tex_path).map_err(|e| {
                    warn!("{} could not compile {}", backend.name(), tex_path.display());
                    render_failed(e)
                })?;
                info!("Report document saved: {}", document.display());
                Some(document)
            }
            None => None,
        };

        Ok(ReportArtifacts {
            csv_path,
            tex_path,
            document_path,
        })
    }
}
