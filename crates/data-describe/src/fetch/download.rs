//! Downloading, unpacking and collecting datasets.

use super::manifest::{DatasetManifest, FetchConfig, MANIFEST_FILE_NAME};
use crate::error::{DescribeError, Result, ResultExt};
use crate::utils::{ensure_dir, folder_name, remove_dir_if_exists};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tar::Archive;
use tracing::{debug, info, warn};

/// Outcome of acquiring one config folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchReport {
    pub config_folder: String,
    /// Folder the datasets were copied into
    pub raw_folder: String,
    /// File names now present in `raw_folder`
    pub fetched: Vec<String>,
    /// Dataset folders that failed, with the reason
    pub failed: Vec<String>,
}

/// Whether `name` is a gzip-compressed tarball.
pub fn is_archive(name: &str) -> bool {
    name.ends_with(".tar.gz") || name.ends_with(".tgz")
}

/// Depth-first search for a file called `name` below `tree`.
pub fn find_file(tree: &Path, name: &str) -> Option<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(tree)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in &entries {
        if path.is_file() && path.file_name().is_some_and(|f| f == name) {
            return Some(path.clone());
        }
    }
    entries
        .iter()
        .filter(|path| path.is_dir())
        .find_map(|dir| find_file(dir, name))
}

/// Unpack the gzip-compressed tarball `archive` into `into`.
pub fn extract_archive(archive: &Path, into: &Path) -> Result<()> {
    ensure_dir(into)?;
    let file = File::open(archive).context(format!("Opening {}", archive.display()))?;

    Archive::new(GzDecoder::new(file))
        .unpack(into)
        .map_err(|e| DescribeError::Fetch {
            url: archive.display().to_string(),
            reason: format!("cannot unpack archive: {e}"),
        })
}

/// Pull `expected` out of `archive`, leaving it at `dest_dir/expected`.
///
/// The archive and everything else it contained are removed.
pub fn unpack_expected(archive: &Path, expected: &str, dest_dir: &Path) -> Result<PathBuf> {
    let scratch = dest_dir.join(format!(".unpack-{}", folder_name(archive)));
    remove_dir_if_exists(&scratch)?;
    extract_archive(archive, &scratch)?;

    let target = dest_dir.join(expected);
    let outcome = match find_file(&scratch, expected) {
        Some(found) => fs::rename(&found, &target)
            .context(format!("Moving {}", found.display()))
            .map(|_| target),
        None => Err(DescribeError::Fetch {
            url: archive.display().to_string(),
            reason: format!("archive does not contain {expected}"),
        }),
    };

    remove_dir_if_exists(&scratch)?;
    if outcome.is_ok() {
        fs::remove_file(archive).context(format!("Removing {}", archive.display()))?;
    }
    outcome
}

/// Remove everything but the manifests from the dataset folders of
/// `config_folder`. Returns the number of entries removed.
pub fn clean_downloads(config_folder: &Path) -> Result<usize> {
    let mut removed = 0;
    for dataset in fs::read_dir(config_folder).context(format!("Listing {}", config_folder.display()))? {
        let dataset = dataset?.path();
        if !dataset.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&dataset)? {
            let path = entry?.path();
            if path.file_name().is_some_and(|f| f == MANIFEST_FILE_NAME) {
                continue;
            }
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
            debug!("Removed {}", path.display());
            removed += 1;
        }
    }
    Ok(removed)
}

/// Downloads the datasets listed in config folders.
pub struct Fetcher {
    config: FetchConfig,
    client: Client,
}

impl Fetcher {
    /// Create a fetcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: FetchConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Acquire every config folder.
    ///
    /// Starts a new URL log and, with `fresh`, an empty raw data folder.
    pub fn run(&self) -> Result<Vec<FetchReport>> {
        if self.config.fresh {
            remove_dir_if_exists(&self.config.raw_data_folder)?;
        }
        ensure_dir(&self.config.raw_data_folder)?;
        if let Some(parent) = self.config.log_file.parent() {
            ensure_dir(parent)?;
        }
        File::create(&self.config.log_file)
            .context(format!("Creating {}", self.config.log_file.display()))?;

        self.config
            .config_folders
            .iter()
            .map(|folder| self.acquire_collection(folder))
            .collect()
    }

    /// Fetch every dataset of `config_folder` and copy it to
    /// `<raw_data_folder>/<config folder name>/`.
    ///
    /// A dataset that fails is logged and listed in the report.
    pub fn acquire_collection(&self, config_folder: &Path) -> Result<FetchReport> {
        let raw_folder = self.config.raw_data_folder.join(folder_name(config_folder));
        ensure_dir(&raw_folder)?;

        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.log_file)
            .context(format!("Opening {}", self.config.log_file.display()))?;

        let mut datasets: Vec<PathBuf> = fs::read_dir(config_folder)
            .context(format!("Listing {}", config_folder.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        datasets.sort();

        let mut report = FetchReport {
            config_folder: config_folder.display().to_string(),
            raw_folder: raw_folder.display().to_string(),
            ..FetchReport::default()
        };

        for dataset_dir in &datasets {
            match self.acquire_dataset(dataset_dir, &raw_folder, &mut log) {
                Ok(name) => report.fetched.push(name),
                Err(e) => {
                    warn!("Skipping {}: {}", dataset_dir.display(), e);
                    report
                        .failed
                        .push(format!("{}: {}", dataset_dir.display(), e));
                }
            }
        }

        info!(
            "{}: {} fetched, {} failed",
            config_folder.display(),
            report.fetched.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn acquire_dataset(
        &self,
        dataset_dir: &Path,
        raw_folder: &Path,
        log: &mut File,
    ) -> Result<String> {
        let manifest = DatasetManifest::load(dataset_dir)?;
        writeln!(log, "{}", manifest.data_url)?;

        let local = dataset_dir.join(&manifest.name);
        if local.is_file() {
            debug!("{} already downloaded", manifest.name);
        } else {
            self.fetch(&manifest.data_url, &manifest.name, dataset_dir)?;
        }

        fs::copy(&local, raw_folder.join(&manifest.name))
            .context(format!("Copying {}", local.display()))?;
        Ok(manifest.name)
    }

    /// Download `url` into `dest_dir` and leave the result at
    /// `dest_dir/expected`, unpacking tarballs.
    pub fn fetch(&self, url: &str, expected: &str, dest_dir: &Path) -> Result<PathBuf> {
        let manifest = DatasetManifest {
            name: expected.to_string(),
            data_url: url.to_string(),
        };
        let download = dest_dir.join(manifest.download_name());

        info!("Downloading {}", url);
        let mut response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(DescribeError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let mut file =
            File::create(&download).context(format!("Creating {}", download.display()))?;
        response.copy_to(&mut file)?;
        file.flush()?;
        drop(file);

        let target = dest_dir.join(expected);
        if is_archive(manifest.download_name()) {
            unpack_expected(&download, expected, dest_dir)
        } else {
            if download != target {
                fs::rename(&download, &target)
                    .context(format!("Renaming {}", download.display()))?;
            }
            Ok(target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_archive() {
        assert!(is_archive("abalone.tar.gz"));
        assert!(is_archive("wine.tgz"));
        assert!(!is_archive("iris.data"));
        assert!(!is_archive("notes.tar"));
    }

    fn write_tarball(path: &Path, entries: &[(&str, &str)]) {
        let gz = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        let mut builder = tar::Builder::new(gz);
        for (name, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, content.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_unpack_expected_from_nested_folder() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("abalone.tar.gz");
        write_tarball(
            &archive,
            &[
                ("abalone/abalone.data", "1,2,3\n"),
                ("abalone/abalone.names", "notes"),
            ],
        );

        let target = unpack_expected(&archive, "abalone.data", dir.path()).unwrap();
        assert_eq!(target, dir.path().join("abalone.data"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "1,2,3\n");
        assert!(!archive.exists());

        let mut left: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left, vec!["abalone.data".to_string()]);
    }

    #[test]
    fn test_unpack_expected_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("wine.tgz");
        write_tarball(&archive, &[("wine/readme.txt", "x")]);

        let err = unpack_expected(&archive, "wine.data", dir.path()).unwrap_err();
        assert_eq!(err.error_code(), "FETCH_ERROR");
        // the archive is kept for inspection
        assert!(archive.exists());
    }

    #[test]
    fn test_extract_archive_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.tar.gz");
        fs::write(&archive, "not gzip").unwrap();

        let err = extract_archive(&archive, &dir.path().join("out")).unwrap_err();
        assert_eq!(err.error_code(), "FETCH_ERROR");
    }

    #[test]
    fn test_find_file_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("pkg/data");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("abalone.data"), "1,2\n").unwrap();
        fs::write(dir.path().join("readme.txt"), "x").unwrap();

        let found = find_file(dir.path(), "abalone.data").unwrap();
        assert_eq!(found, nested.join("abalone.data"));
        assert!(find_file(dir.path(), "missing.data").is_none());
    }

    #[test]
    fn test_clean_downloads_keeps_manifests() {
        let dir = tempfile::tempdir().unwrap();
        let iris = dir.path().join("iris");
        fs::create_dir_all(iris.join("leftover")).unwrap();
        fs::write(iris.join(MANIFEST_FILE_NAME), "{}").unwrap();
        fs::write(iris.join("iris.data"), "1,a\n").unwrap();
        fs::write(dir.path().join("index.csv"), "x").unwrap();

        let removed = clean_downloads(dir.path()).unwrap();
        assert_eq!(removed, 2);
        assert!(iris.join(MANIFEST_FILE_NAME).exists());
        assert!(!iris.join("iris.data").exists());
        assert!(dir.path().join("index.csv").exists());
    }

    #[test]
    fn test_acquire_collection_uses_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let config_folder = dir.path().join("datafiles/classification");
        let iris = config_folder.join("iris");
        fs::create_dir_all(&iris).unwrap();
        fs::write(
            iris.join(MANIFEST_FILE_NAME),
            r#"{"name": "iris.data", "data_url": "http://127.0.0.1:9/iris.data"}"#,
        )
        .unwrap();
        fs::write(iris.join("iris.data"), "5.1,setosa\n").unwrap();
        // no manifest: reported as failed
        fs::create_dir_all(config_folder.join("broken")).unwrap();

        let config = FetchConfig {
            config_folders: vec![config_folder.clone()],
            raw_data_folder: dir.path().join("raw_data"),
            log_file: dir.path().join("logs/db.txt"),
            ..FetchConfig::default()
        };
        let reports = Fetcher::new(config).unwrap().run().unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].fetched, vec!["iris.data".to_string()]);
        assert_eq!(reports[0].failed.len(), 1);
        assert!(dir.path().join("raw_data/classification/iris.data").exists());

        let log = fs::read_to_string(dir.path().join("logs/db.txt")).unwrap();
        assert_eq!(log, "http://127.0.0.1:9/iris.data\n");
    }
}
