
use log::{info, warn};
use serde::{Serialize, Deserialize};
use tokio::task::JoinHandle;

use crate::GnssLogErr;
use crate::config::{ReferencePosition, RunConfig};
use crate::io;
use crate::logfile::{DeviceInfo, DeviceLog, LogReader};

/*	Multi-log comparison pipeline:
	- Read every log (sequentially, or one blocking task per log)
	- Align them on the window they all cover
	- Aggregate per-device metric series over that window
*/

pub mod aggregate;
pub mod align;


use self::aggregate::AggregatedSeries;
use self::align::AlignmentWindow;

/// Everything the plotting side needs, as plain data in device order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
	pub devices:Vec<DeviceInfo>,
	pub window:AlignmentWindow,
	pub series:AggregatedSeries,
}

pub fn compare_logs(config:&RunConfig) -> Result<Comparison, GnssLogErr> {
	config.validate()?;

	let reader = LogReader::new(config.talkers.as_slice());
	let logs:Vec<DeviceLog> = io::read_log_files(&config.logs, &reader)?;

	compare_device_logs(&logs, &config.reference)
}

pub async fn compare_logs_concurrent(config:&RunConfig) -> Result<Comparison, GnssLogErr> {
	config.validate()?;

	// Each task owns its own reader and decoder; nothing is shared between logs
	let handles:Vec<JoinHandle<Result<DeviceLog, GnssLogErr>>> = config.logs.iter().cloned().map(|path| {
		let talkers = config.talkers.clone();
		tokio::task::spawn_blocking(move || io::read_log_file(&path, &LogReader::new(talkers.as_slice())))
	}).collect();

	// Drain every task before reporting; the first error in device order wins
	let mut logs:Vec<DeviceLog> = Vec::with_capacity(handles.len());
	let mut failure:Option<GnssLogErr> = None;
	for handle in handles {
		let result = handle.await.map_err(|e| GnssLogErr::Worker(e.to_string())).and_then(|r| r);
		match result {
			Ok(log) => logs.push(log),
			Err(e) => if failure.is_none() { failure = Some(e); },
		}
	}
	if let Some(e) = failure { return Err(e); }

	compare_device_logs(&logs, &config.reference)
}

/// Align and aggregate logs that have already been read
pub fn compare_device_logs(logs:&[DeviceLog], reference:&ReferencePosition) -> Result<Comparison, GnssLogErr> {
	if let Some(device) = logs.iter().position(|log| log.is_empty()) {
		return Err(GnssLogErr::EmptyLog{ device, path: logs[device].path.clone().unwrap_or_default() });
	}

	let window = align::align(logs)?;
	info!("Common window {} - {}: {} epochs, start offsets {:?}",
		window.common_start, window.common_end, window.common_epoch_count, window.start_offsets);

	for (device, end) in window.end_offsets.iter().enumerate() {
		if end.is_none() {
			warn!("{} has no epoch at {}; its cadence may drift from the others", logs[device].label(device), window.common_end);
		}
	}

	let series = aggregate::aggregate(logs, &window, reference)?;

	Ok(Comparison{ devices: logs.iter().map(|log| log.info.clone()).collect(), window, series })
}
