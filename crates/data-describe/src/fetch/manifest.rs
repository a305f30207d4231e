//! Per-dataset download manifests and the acquisition configuration.

use crate::error::{DescribeError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the manifest inside each dataset folder.
pub const MANIFEST_FILE_NAME: &str = "dataset.json";

/// Where to download one dataset from and what to call it.
///
/// ```json
/// { "name": "iris.data", "data_url": "https://archive.ics.uci.edu/.../iris.data" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetManifest {
    /// Final file name of the dataset
    pub name: String,
    /// Download location
    pub data_url: String,
}

impl DatasetManifest {
    /// Load `<dataset_dir>/dataset.json`.
    pub fn load(dataset_dir: &Path) -> Result<Self> {
        let path = dataset_dir.join(MANIFEST_FILE_NAME);
        let content =
            fs::read_to_string(&path).context(format!("Reading {}", path.display()))?;
        let manifest: Self =
            serde_json::from_str(&content).context(format!("Parsing {}", path.display()))?;

        if manifest.name.is_empty() || manifest.name.contains(['/', '\\']) {
            return Err(DescribeError::InvalidConfig(format!(
                "{}: name must be a plain file name, got {:?}",
                path.display(),
                manifest.name
            )));
        }
        Ok(manifest)
    }

    /// Last segment of the URL, the name the download is stored under.
    pub fn download_name(&self) -> &str {
        let url = self
            .data_url
            .split(['?', '#'])
            .next()
            .unwrap_or(&self.data_url);
        url.trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Configuration for dataset acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Folders holding one subfolder (with a manifest) per dataset. The
    /// last path component names the task type folder under
    /// `raw_data_folder`.
    /// Default: ["datafiles/classification", "datafiles/regression"]
    pub config_folders: Vec<PathBuf>,

    /// Where fetched files are copied to.
    /// Default: "raw_data"
    pub raw_data_folder: PathBuf,

    /// Every processed URL is appended here.
    /// Default: "logs/db.txt"
    pub log_file: PathBuf,

    /// Wipe `raw_data_folder` before fetching.
    /// Default: true
    pub fresh: bool,

    /// HTTP timeout in seconds.
    /// Default: 300
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            config_folders: vec![
                PathBuf::from("datafiles/classification"),
                PathBuf::from("datafiles/regression"),
            ],
            raw_data_folder: PathBuf::from("raw_data"),
            log_file: PathBuf::from("logs/db.txt"),
            fresh: true,
            timeout_secs: 300,
        }
    }
}

impl FetchConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.config_folders.is_empty() {
            return Err(DescribeError::InvalidConfig(
                "at least one config folder is required".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(DescribeError::InvalidConfig(
                "timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
