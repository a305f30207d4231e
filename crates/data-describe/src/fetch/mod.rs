//! Dataset acquisition.
//!
//! Each dataset has its own folder with a [`DatasetManifest`]. The
//! [`Fetcher`] downloads what is missing, unpacks tarballs and copies the
//! results into the raw data folder that description runs read from.
//!
//! Only available with the `fetch` feature.

mod download;
mod manifest;

pub use download::{
    FetchReport, Fetcher, clean_downloads, extract_archive, find_file, is_archive,
    unpack_expected,
};
pub use manifest::{DatasetManifest, FetchConfig, MANIFEST_FILE_NAME};
