
use std::path::PathBuf;

use thiserror::Error;

pub mod compare;
pub mod config;
pub mod io;
pub mod logfile;
pub mod nmea;
pub mod types;

#[cfg(test)]
mod test_support;

pub use compare::align::{AlignmentError, AlignmentWindow};
pub use compare::aggregate::{AggregatedSeries, DeviceSeries};
pub use compare::{compare_logs, compare_logs_concurrent, Comparison};
pub use config::{ReferencePosition, RunConfig};

/// Anything that stops a multi-log run.  Malformed NMEA sentences never show up here; the decoder counts them instead.
#[derive(Debug, Error)]
pub enum GnssLogErr {
	#[error("unable to read log {}: {source}", .path.display())]
	UnreadableLog { path:PathBuf, source:std::io::Error },

	#[error("log {device} ({}) contains no epochs", .path.display())]
	EmptyLog { device:usize, path:PathBuf },

	#[error(transparent)]
	Alignment(#[from] AlignmentError),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("log reader task failed: {0}")]
	Worker(String),
}
