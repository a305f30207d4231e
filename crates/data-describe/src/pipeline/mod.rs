//! Description run.
//!
//! This module provides the [`Describer`] that drives discovery, statistics,
//! table assembly and report writing for every configured root.

mod builder;
pub mod progress;

pub use builder::{Describer, DescriberBuilder};
pub use progress::{ClosureProgressReporter, DescribeStage, ProgressReporter, ProgressUpdate};
