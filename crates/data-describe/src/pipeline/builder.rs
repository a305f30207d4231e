//! Main description run.
//!
//! This module provides the `Describer` struct and builder that walk every
//! configured root, summarize its datasets and write its reports.

use crate::config::DescribeConfig;
use crate::discovery::discover_collection;
use crate::error::{DescribeError, Result};
use crate::pipeline::progress::{
    ClosureProgressReporter, DescribeStage, ProgressReporter, ProgressUpdate,
};
use crate::reporting::{LatexEngine, ReportWriter, TypesetBackend};
use crate::statistics::StatisticsComputer;
use crate::table::SummaryTableBuilder;
use crate::types::{CollectionReport, RunSummary, TaskType};
use crate::utils::{ensure_dir, folder_name, remove_dir_if_exists};
use chrono::Local;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Describes every configured dataset collection.
///
/// Use [`Describer::builder()`] to create one.
///
/// # Example
///
/// ```rust,ignore
/// use data_describe::{DescribeConfig, Describer};
///
/// let summary = Describer::builder()
///     .config(DescribeConfig::builder().max_values_per_row(10).build()?)
///     .build()?
///     .run()?;
///
/// for collection in &summary.collections {
///     println!("{}: {} datasets", collection.root, collection.datasets);
/// }
/// ```
pub struct Describer {
    config: DescribeConfig,
    computer: StatisticsComputer,
    backend: Option<Arc<dyn TypesetBackend>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl Describer {
    /// Create a new describer builder.
    pub fn builder() -> DescriberBuilder {
        DescriberBuilder::default()
    }

    pub fn config(&self) -> &DescribeConfig {
        &self.config
    }

    /// Describe every configured root, in configuration order.
    ///
    /// Roots without matching files and files that cannot be parsed are
    /// logged and skipped. A typeset failure is recorded in the collection's
    /// report (its CSV is already written) and the run continues. Any other
    /// error stops the run.
    pub fn run(&self) -> Result<RunSummary> {
        match self.run_internal() {
            Ok(summary) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Described {} collection(s)",
                    summary.collections.len()
                )));
                Ok(summary)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Description run failed: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self) -> Result<RunSummary> {
        ensure_dir(&self.config.description)?;

        let mut summary = RunSummary {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ..RunSummary::default()
        };

        for root in &self.config.data_folders {
            match self.describe_root(root) {
                Ok(report) => summary.collections.push(report),
                Err(e) if e.is_recoverable() => {
                    warn!("{}", e);
                    summary.skipped_roots.push(root.display().to_string());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    /// Describe one collection.
    pub fn describe_root(&self, root: &Path) -> Result<CollectionReport> {
        let collection = folder_name(root);
        let task_type = TaskType::from_root(root);

        self.report_progress(ProgressUpdate::new(
            DescribeStage::Discovering,
            &collection,
            format!("Scanning {}", root.display()),
        ));
        let files = discover_collection(root, &self.config.file_extension)?;
        info!(
            "Found {} .{} file(s) in {} ({})",
            files.len(),
            self.config.file_extension,
            root.display(),
            task_type
        );

        let output_dir = self.config.description.join(&collection);
        if self.config.remove_older {
            remove_dir_if_exists(&output_dir)?;
        }
        ensure_dir(&output_dir)?;

        let mut builder = SummaryTableBuilder::new(task_type);
        let mut skipped_files = Vec::new();
        for (index, file) in files.iter().enumerate() {
            self.report_progress(ProgressUpdate::with_items(
                DescribeStage::Computing,
                &collection,
                index,
                files.len(),
                format!("Reading {}", file.display()),
            ));
            match self.computer.describe_file(file, task_type) {
                Ok(summary) => builder.add(summary),
                Err(e) if e.is_recoverable() => {
                    warn!("Skipping file: {}", e);
                    skipped_files.push(file.display().to_string());
                }
                Err(e) => return Err(e),
            }
        }
        let table = builder.finalize();

        self.report_progress(ProgressUpdate::new(
            DescribeStage::Writing,
            &collection,
            format!("Writing {} dataset(s) to {}", table.len(), output_dir.display()),
        ));
        let mut writer = ReportWriter::new(&output_dir, self.config.max_values_per_row);
        if let Some(backend) = &self.backend {
            writer = writer.with_shared_backend(Arc::clone(backend));
        }

        let mut report = CollectionReport {
            root: root.display().to_string(),
            task_type,
            files_found: files.len(),
            datasets: table.len(),
            skipped_files,
            csv_path: None,
            document_path: None,
            render_error: None,
        };

        match writer.write(&table) {
            Ok(artifacts) => {
                report.csv_path = Some(artifacts.csv_path.display().to_string());
                report.document_path = Some(
                    artifacts
                        .document_path
                        .unwrap_or(artifacts.tex_path)
                        .display()
                        .to_string(),
                );
            }
            Err(DescribeError::Render { csv_path, reason }) => {
                error!("Report for {} failed: {}", collection, reason);
                report.csv_path = Some(csv_path.display().to_string());
                report.render_error = Some(reason);
            }
            Err(e) => return Err(e),
        }

        Ok(report)
    }
}

/// Builder for [`Describer`].
#[derive(Default)]
pub struct DescriberBuilder {
    config: Option<DescribeConfig>,
    backend: Option<Arc<dyn TypesetBackend>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl DescriberBuilder {
    /// Set the run configuration.
    pub fn config(mut self, config: DescribeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the typeset backend, overriding `latex_engine` from the config.
    pub fn typeset_backend(mut self, backend: Arc<dyn TypesetBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set a progress reporter for receiving updates during the run.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the describer.
    ///
    /// The configuration is validated; without one the defaults are used.
    pub fn build(self) -> Result<Describer> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let backend = self.backend.or_else(|| {
            config
                .latex_engine
                .as_ref()
                .map(|engine| Arc::new(LatexEngine::new(engine.clone())) as Arc<dyn TypesetBackend>)
        });

        Ok(Describer {
            computer: StatisticsComputer::new(config.separator_byte()),
            config,
            backend,
            progress_reporter: self.progress_reporter,
        })
    }
}
