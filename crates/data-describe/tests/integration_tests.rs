//! Integration tests for description runs.
//!
//! These tests build small dataset collections in temporary folders and
//! verify the files written for each collection.

use data_describe::{
    DescribeConfig, DescribeError, DescribeStage, Describer, RunSummary, TaskType,
    TypesetBackend,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A classification file with two features and the given target column.
fn classification_data(targets: &[&str]) -> String {
    let mut content = String::from("f1,f2,class\n");
    for (i, target) in targets.iter().enumerate() {
        content.push_str(&format!("{}.5,{},{}\n", i, i * 2, target));
    }
    content
}

/// A regression file with `rows` rows and `columns` numeric columns.
fn regression_data(rows: usize, columns: usize) -> String {
    let header: Vec<String> = (0..columns).map(|c| format!("x{c}")).collect();
    let mut content = header.join(",");
    content.push('\n');
    for r in 0..rows {
        let row: Vec<String> = (0..columns).map(|c| format!("{}", r * columns + c)).collect();
        content.push_str(&row.join(","));
        content.push('\n');
    }
    content
}

fn config(workspace: &TempDir, roots: &[&str]) -> DescribeConfig {
    DescribeConfig::builder()
        .data_folders(roots.iter().map(|root| workspace.path().join(root)))
        .description(workspace.path().join("description"))
        .build()
        .unwrap()
}

fn run(config: DescribeConfig) -> RunSummary {
    Describer::builder()
        .config(config)
        .build()
        .unwrap()
        .run()
        .unwrap()
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn output_dir(workspace: &TempDir, collection: &str) -> PathBuf {
    workspace.path().join("description").join(collection)
}

// ============================================================================
// End-to-end Runs
// ============================================================================

#[test]
fn test_classification_collection() {
    let workspace = tempfile::tempdir().unwrap();
    let root = workspace.path().join("raw_data/classification");
    write_file(
        &root.join("toy/toy.data"),
        &classification_data(&["a", "a", "b", "a", "c", "b"]),
    );
    write_file(
        &root.join("iris/iris.data"),
        &classification_data(&["x", "y", "x", "y", "x", "y", "z", "x"]),
    );

    let summary = run(config(&workspace, &["raw_data/classification"]));

    assert_eq!(summary.collections.len(), 1);
    let collection = &summary.collections[0];
    assert_eq!(collection.task_type, TaskType::Classification);
    assert_eq!(collection.datasets, 2);
    assert!(collection.render_error.is_none());

    let csv = read_lines(&output_dir(&workspace, "classification").join("data_description.csv"));
    assert_eq!(
        csv,
        vec![
            "Dataset,Size,Attributes,Classes,Class distribution",
            "iris,8,2,3,4;3;1",
            "toy,6,2,3,3;2;1",
        ]
    );

    let tex = fs::read_to_string(output_dir(&workspace, "classification").join("data_description.tex"))
        .unwrap();
    assert!(tex.contains("Dataset&Size&\\#Attr.&\\#Classes&Class distribution\\\\%"));
    assert!(tex.contains("iris&8&2&3&(4,3,1)\\\\%"));
    assert!(tex.contains("toy&6&2&3&(3,2,1)\\\\%"));
    assert!(tex.find("iris&").unwrap() < tex.find("toy&").unwrap());
}

#[test]
fn test_regression_collection_has_no_class_fields() {
    let workspace = tempfile::tempdir().unwrap();
    write_file(
        &workspace.path().join("raw_data/regression/housing.data"),
        &regression_data(100, 9),
    );

    let summary = run(config(&workspace, &["raw_data/regression"]));
    assert_eq!(summary.collections[0].task_type, TaskType::Regression);

    let dir = output_dir(&workspace, "regression");
    let csv = read_lines(&dir.join("data_description.csv"));
    assert_eq!(csv, vec!["Dataset,Size,Attributes", "housing,100,8"]);

    let tex = fs::read_to_string(dir.join("data_description.tex")).unwrap();
    assert!(tex.contains("Dataset&Size&\\#Attr.\\\\%"));
    assert!(tex.contains("housing&100&8\\\\%"));
    assert!(!tex.contains("Classes"));
}

#[test]
fn test_long_distribution_is_split_over_rows() {
    let workspace = tempfile::tempdir().unwrap();
    let mut targets = Vec::new();
    for (class, count) in [("a", 5), ("b", 4), ("c", 3), ("d", 2), ("e", 1)] {
        targets.extend(std::iter::repeat(class).take(count));
    }
    write_file(
        &workspace.path().join("classification/five.data"),
        &classification_data(&targets),
    );

    let config = DescribeConfig::builder()
        .data_folders([workspace.path().join("classification")])
        .description(workspace.path().join("description"))
        .max_values_per_row(2)
        .build()
        .unwrap();
    run(config);

    let dir = output_dir(&workspace, "classification");
    let tex = read_lines(&dir.join("data_description.tex"));
    let rows: Vec<&String> = tex
        .iter()
        .filter(|line| line.starts_with("five&") || line.starts_with("&&&&"))
        .collect();
    assert_eq!(
        rows,
        vec![
            "five&15&2&5&(5,4,\\\\%",
            "&&&&3,2,\\\\%",
            "&&&&1)\\\\%",
        ]
    );

    // the CSV keeps the distribution on one line
    let csv = read_lines(&dir.join("data_description.csv"));
    assert_eq!(csv[1], "five,15,2,5,5;4;3;2;1");
}

#[test]
fn test_blank_lines_do_not_count_as_rows() {
    let workspace = tempfile::tempdir().unwrap();
    let root = workspace.path().join("classification");
    // UCI-style file ending with two empty lines
    let mut iris = classification_data(&["x", "y", "x", "z"]);
    iris.push_str("\n\n");
    write_file(&root.join("iris.data"), &iris);
    write_file(
        &root.join("gappy.data"),
        "f1,class\n1,a\n\n2,b\n   \n3,a\n",
    );

    let summary = run(config(&workspace, &["classification"]));
    assert_eq!(summary.collections[0].datasets, 2);
    assert!(summary.collections[0].skipped_files.is_empty());

    let csv = read_lines(&output_dir(&workspace, "classification").join("data_description.csv"));
    assert_eq!(
        csv,
        vec![
            "Dataset,Size,Attributes,Classes,Class distribution",
            "iris,4,2,3,2;1;1",
            "gappy,3,1,2,2;1",
        ]
    );
}

#[test]
fn test_duplicate_names_in_subfolders() {
    let workspace = tempfile::tempdir().unwrap();
    let root = workspace.path().join("classification");
    write_file(&root.join("a/iris.data"), &classification_data(&["x", "y", "x"]));
    write_file(
        &root.join("b/iris.data"),
        &classification_data(&["x", "y", "x", "y", "y"]),
    );

    run(config(&workspace, &["classification"]));

    let dir = output_dir(&workspace, "classification");
    let csv = read_lines(&dir.join("data_description.csv"));
    assert_eq!(
        csv,
        vec![
            "Dataset,Size,Attributes,Classes,Class distribution",
            "iris,5,2,2,3;2",
            "iris,3,2,2,2;1",
        ]
    );

    let tex = read_lines(&dir.join("data_description.tex"));
    let iris_rows: Vec<&String> = tex.iter().filter(|line| line.starts_with("iris&")).collect();
    assert_eq!(iris_rows, vec!["iris&5&2&2&(3,2)\\\\%"]);
}

#[test]
fn test_empty_root_is_skipped() {
    let workspace = tempfile::tempdir().unwrap();
    fs::create_dir_all(workspace.path().join("raw_data/classification")).unwrap();
    write_file(
        &workspace.path().join("raw_data/regression/housing.data"),
        &regression_data(10, 3),
    );

    let summary = run(config(
        &workspace,
        &["raw_data/classification", "raw_data/regression"],
    ));

    assert_eq!(summary.collections.len(), 1);
    assert_eq!(summary.collections[0].datasets, 1);
    assert_eq!(summary.skipped_roots.len(), 1);
    assert!(summary.skipped_roots[0].ends_with("classification"));
    assert!(!output_dir(&workspace, "classification").exists());
    assert!(output_dir(&workspace, "regression").join("data_description.csv").exists());
}

#[test]
fn test_unparsable_file_is_skipped() {
    let workspace = tempfile::tempdir().unwrap();
    let root = workspace.path().join("regression");
    write_file(&root.join("broken.data"), "");
    write_file(&root.join("good.data"), &regression_data(4, 2));

    let summary = run(config(&workspace, &["regression"]));

    let collection = &summary.collections[0];
    assert_eq!(collection.files_found, 2);
    assert_eq!(collection.datasets, 1);
    assert_eq!(collection.skipped_files.len(), 1);
    assert!(collection.skipped_files[0].ends_with("broken.data"));

    let csv = read_lines(&output_dir(&workspace, "regression").join("data_description.csv"));
    assert_eq!(csv, vec!["Dataset,Size,Attributes", "good,4,1"]);
}

#[test]
fn test_remove_older_wipes_previous_output() {
    let workspace = tempfile::tempdir().unwrap();
    write_file(
        &workspace.path().join("regression/housing.data"),
        &regression_data(4, 2),
    );
    let stale = output_dir(&workspace, "regression").join("stale.txt");
    write_file(&stale, "old");

    let keep = DescribeConfig::builder()
        .data_folders([workspace.path().join("regression")])
        .description(workspace.path().join("description"))
        .remove_older(false)
        .build()
        .unwrap();
    run(keep);
    assert!(stale.exists());

    run(config(&workspace, &["regression"]));
    assert!(!stale.exists());
    assert!(output_dir(&workspace, "regression").join("data_description.csv").exists());
}

// ============================================================================
// Typesetting and Progress
// ============================================================================

struct FailingBackend;

impl TypesetBackend for FailingBackend {
    fn compile(&self, _tex_path: &Path) -> data_describe::DescribeResult<PathBuf> {
        Err(DescribeError::Typeset("engine not installed".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[test]
fn test_render_failure_keeps_csv_and_continues() {
    let workspace = tempfile::tempdir().unwrap();
    write_file(
        &workspace.path().join("classification/toy.data"),
        &classification_data(&["a", "b", "a"]),
    );
    write_file(
        &workspace.path().join("regression/housing.data"),
        &regression_data(4, 2),
    );

    let summary = Describer::builder()
        .config(config(&workspace, &["classification", "regression"]))
        .typeset_backend(Arc::new(FailingBackend))
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert!(summary.has_render_errors());
    assert_eq!(summary.collections.len(), 2);
    for collection in &summary.collections {
        let reason = collection.render_error.as_deref().unwrap();
        assert!(reason.contains("engine not installed"));
        let csv = PathBuf::from(collection.csv_path.as_deref().unwrap());
        assert!(csv.exists());
    }
}

#[test]
fn test_progress_updates() {
    let workspace = tempfile::tempdir().unwrap();
    write_file(
        &workspace.path().join("regression/a.data"),
        &regression_data(3, 2),
    );
    write_file(
        &workspace.path().join("regression/b.data"),
        &regression_data(5, 2),
    );

    let stages = Arc::new(Mutex::new(Vec::new()));
    let stages_clone = Arc::clone(&stages);

    Describer::builder()
        .config(config(&workspace, &["regression"]))
        .on_progress(move |update| stages_clone.lock().unwrap().push(update.stage))
        .build()
        .unwrap()
        .run()
        .unwrap();

    let stages = stages.lock().unwrap();
    assert_eq!(
        *stages,
        vec![
            DescribeStage::Discovering,
            DescribeStage::Computing,
            DescribeStage::Computing,
            DescribeStage::Writing,
            DescribeStage::Complete,
        ]
    );
}

#[test]
fn test_run_summary_json() {
    let workspace = tempfile::tempdir().unwrap();
    write_file(
        &workspace.path().join("regression/housing.data"),
        &regression_data(4, 2),
    );

    let summary = run(config(&workspace, &["regression"]));
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["collections"][0]["task_type"], "regression");
    assert_eq!(json["collections"][0]["datasets"], 1);
    assert!(json["generated_at"].is_string());
}

#[test]
fn test_config_from_file() {
    let workspace = tempfile::tempdir().unwrap();
    let path = workspace.path().join("describe.json");
    fs::write(
        &path,
        r#"{"data_folders": ["data/classification"], "max_values_per_row": 10}"#,
    )
    .unwrap();

    let config = DescribeConfig::from_file(&path).unwrap();
    assert_eq!(config.data_folders, vec![PathBuf::from("data/classification")]);
    assert_eq!(config.max_values_per_row.map(|n| n.get()), Some(10));
    assert!(config.remove_older);
}
