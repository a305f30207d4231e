//! Machine-readable export of a summary table.

use crate::error::{Result, ResultExt};
use crate::paginate::join_values;
use crate::table::SummaryTable;
use crate::types::TaskType;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CSV_FILE_NAME: &str = "data_description.csv";

/// Build the export DataFrame: one row per dataset of the ordered view.
///
/// Columns are `Dataset, Size, Attributes` plus `Classes, Class distribution`
/// for classification tables. The distribution is joined with `;` and has no
/// parentheses.
pub(crate) fn export_frame(table: &SummaryTable) -> Result<DataFrame> {
    let rows = table.ordered();

    let mut columns = vec![
        Column::new(
            "Dataset".into(),
            rows.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Size".into(),
            rows.iter().map(|s| s.size as u64).collect::<Vec<_>>(),
        ),
        Column::new(
            "Attributes".into(),
            rows.iter().map(|s| s.attribute_count as u64).collect::<Vec<_>>(),
        ),
    ];

    if table.task_type() == TaskType::Classification {
        columns.push(Column::new(
            "Classes".into(),
            rows.iter()
                .map(|s| s.class_count().map(|c| c as u64))
                .collect::<Vec<_>>(),
        ));
        columns.push(Column::new(
            "Class distribution".into(),
            rows.iter()
                .map(|s| s.class_distribution().map(|d| join_values(d, ";")))
                .collect::<Vec<_>>(),
        ));
    }

    Ok(DataFrame::new(columns)?)
}

/// Write the CSV export into `output_dir`.
///
/// The file is written to a temporary name in the same folder and renamed
/// into place once complete, so a reader never sees a partial export.
pub fn write_csv(table: &SummaryTable, output_dir: &Path) -> Result<PathBuf> {
    let mut df = export_frame(table)?;

    fs::create_dir_all(output_dir)?;
    let final_path = output_dir.join(CSV_FILE_NAME);
    let tmp_path = output_dir.join(format!("{CSV_FILE_NAME}.tmp"));

    {
        let mut file = File::create(&tmp_path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)
            .context(format!("Writing {}", tmp_path.display()))?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, &final_path)?;

    info!("CSV export saved: {}", final_path.display());
    Ok(final_path)
}
