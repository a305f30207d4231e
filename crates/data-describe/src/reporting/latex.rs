//! Typeset (LaTeX) rendering of a summary table.

use crate::error::{DescribeError, Result};
use crate::paginate::{PhysicalRow, physical_rows};
use crate::table::SummaryTable;
use crate::types::TaskType;
use chrono::Local;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

pub const TEX_FILE_STEM: &str = "data_description";

const CLASSIFICATION_HEADER: [&str; 5] =
    ["Dataset", "Size", "#Attr.", "#Classes", "Class distribution"];
const REGRESSION_HEADER: [&str; 3] = ["Dataset", "Size", "#Attr."];

/// Compiles a LaTeX source file into a printable document.
///
/// Implementations must leave the `.tex` file in place.
pub trait TypesetBackend: Send + Sync {
    /// Compile `tex_path` and return the path of the produced document.
    fn compile(&self, tex_path: &Path) -> Result<PathBuf>;

    /// Name used in log messages.
    fn name(&self) -> &str;
}

/// Runs an external LaTeX engine such as `pdflatex`.
#[derive(Debug, Clone)]
pub struct LatexEngine {
    program: String,
}

impl LatexEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl TypesetBackend for LatexEngine {
    fn compile(&self, tex_path: &Path) -> Result<PathBuf> {
        let output_dir = tex_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        // longtable needs a second pass to settle column widths
        for pass in 1..=2 {
            debug!("Running {} (pass {}) on {}", self.program, pass, tex_path.display());
            let output = Command::new(&self.program)
                .arg("-interaction=nonstopmode")
                .arg("-halt-on-error")
                .arg(format!("-output-directory={}", output_dir.display()))
                .arg(tex_path)
                .output()?;

            if !output.status.success() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let tail: Vec<&str> = stdout.lines().rev().take(5).collect();
                return Err(DescribeError::Typeset(format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
                )));
            }
        }

        Ok(tex_path.with_extension("pdf"))
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Escape LaTeX special characters in cell text.
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '~' => escaped.push_str(r"\textasciitilde{}"),
            '^' => escaped.push_str(r"\textasciicircum{}"),
            '\\' => escaped.push_str(r"\textbackslash{}"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn push_row(doc: &mut String, cells: &[String]) {
    let escaped: Vec<String> = cells.iter().map(|c| escape_latex(c)).collect();
    doc.push_str(&escaped.join("&"));
    doc.push_str("\\\\%\n");
}

/// Render the full LaTeX document of a table.
///
/// The document holds one `longtable` with page numbers and 1cm margins.
/// Rows come from the name-keyed view; classification rows are reflowed to
/// at most `max_values_per_row` distribution values per physical row.
pub fn render_document(table: &SummaryTable, max_values_per_row: Option<NonZeroUsize>) -> String {
    let header: &[&str] = match table.task_type() {
        TaskType::Classification => &CLASSIFICATION_HEADER,
        TaskType::Regression => &REGRESSION_HEADER,
    };
    let column_spec = vec!["l"; header.len()].join(" ");

    let mut doc = String::new();
    doc.push_str(&format!(
        "% {} description, generated {}\n",
        table.task_type(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    doc.push_str(
        "\\documentclass{article}%\n\
         \\usepackage[T1]{fontenc}%\n\
         \\usepackage[utf8]{inputenc}%\n\
         \\usepackage{lmodern}%\n\
         \\usepackage{textcomp}%\n\
         \\usepackage{lastpage}%\n\
         \\usepackage{geometry}%\n\
         \\geometry{margin=1.00cm,includeheadfoot=true}%\n\
         \\usepackage{longtable}%\n\
         %\n\
         \\begin{document}%\n\
         \\pagestyle{plain}%\n\
         \\normalsize%\n",
    );
    doc.push_str(&format!("\\begin{{longtable}}{{{column_spec}}}%\n"));
    doc.push_str("\\hline%\n");
    push_row(
        &mut doc,
        &header.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
    );
    doc.push_str("\\hline%\n\\hline%\n");

    for summary in table.keyed() {
        for PhysicalRow { cells } in physical_rows(summary, max_values_per_row) {
            push_row(&mut doc, &cells);
        }
    }

    doc.push_str("\\end{longtable}%\n\\end{document}\n");
    doc
}

/// Write the LaTeX source into `output_dir` and return its path.
pub(crate) fn write_tex(
    table: &SummaryTable,
    max_values_per_row: Option<NonZeroUsize>,
    output_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let tex_path = output_dir.join(format!("{TEX_FILE_STEM}.tex"));
    std::fs::write(&tex_path, render_document(table, max_values_per_row))?;
    info!("Typeset source saved: {}", tex_path.display());
    Ok(tex_path)
}
