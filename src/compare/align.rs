
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::logfile::DeviceLog;
use crate::types::TimeOfDay;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
	#[error("no logs to align")]
	NoLogs,

	#[error("log {device} contains no epochs")]
	EmptyLog { device:usize },

	#[error("logs do not overlap: log {start_device} starts at {start}, after log {end_device} stops at {end}")]
	NonOverlappingWindow { start:TimeOfDay, end:TimeOfDay, start_device:usize, end_device:usize },

	#[error("log {device} has no epoch at the common start {start}; its epochs are not on the same whole-second cadence")]
	MissingAlignmentEpoch { device:usize, start:TimeOfDay },

	#[error("log {device} only has {available} epochs after the common start, {required} are needed")]
	TruncatedLog { device:usize, available:usize, required:usize },

	#[error("window covers {window} logs but {logs} were supplied")]
	WindowMismatch { window:usize, logs:usize },
}

/// The stretch of time every log covers, and where it begins inside each log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentWindow {
	pub common_start:TimeOfDay,
	pub common_end:TimeOfDay,
	pub start_offsets:Vec<usize>,
	pub end_offsets:Vec<Option<usize>>,
	pub common_epoch_count:usize,
}

impl AlignmentWindow {

	/// Checks that every log can supply common_epoch_count epochs from its start offset
	pub fn check_coverage(&self, logs:&[DeviceLog]) -> Result<(), AlignmentError> {
		if self.start_offsets.len() != logs.len() {
			return Err(AlignmentError::WindowMismatch{ window: self.start_offsets.len(), logs: logs.len() });
		}

		for (device, (log, offset)) in logs.iter().zip(self.start_offsets.iter()).enumerate() {
			let available:usize = log.epochs.len().saturating_sub(*offset);
			if available < self.common_epoch_count {
				return Err(AlignmentError::TruncatedLog{ device, available, required: self.common_epoch_count });
			}
		}

		Ok(())
	}

}

pub fn align(logs:&[DeviceLog]) -> Result<AlignmentWindow, AlignmentError> {
	if logs.is_empty() { return Err(AlignmentError::NoLogs); }

	// Every log has to have something in it before any times get compared
	if let Some(device) = logs.iter().position(|log| log.epochs.is_empty()) {
		return Err(AlignmentError::EmptyLog{ device });
	}

	let firsts:Vec<TimeOfDay> = logs.iter().filter_map(|log| log.epochs.first()).map(|e| e.timestamp).collect();
	let lasts:Vec<TimeOfDay>  = logs.iter().filter_map(|log| log.epochs.last()).map(|e| e.timestamp).collect();

	// Ties go to the lowest device index
	let mut start_device:usize = 0;
	for (device, t) in firsts.iter().enumerate() {
		if *t > firsts[start_device] { start_device = device; }
	}
	let mut end_device:usize = 0;
	for (device, t) in lasts.iter().enumerate() {
		if *t < lasts[end_device] { end_device = device; }
	}

	let common_start:TimeOfDay = firsts[start_device];
	let common_end:TimeOfDay = lasts[end_device];

	if common_start > common_end {
		return Err(AlignmentError::NonOverlappingWindow{ start: common_start, end: common_end, start_device, end_device });
	}

	let mut start_offsets:Vec<usize> = Vec::with_capacity(logs.len());
	let mut end_offsets:Vec<Option<usize>> = Vec::with_capacity(logs.len());
	for (device, log) in logs.iter().enumerate() {
		match log.epochs.iter().position(|e| e.timestamp == common_start) {
			Some(idx) => start_offsets.push(idx),
			None => return Err(AlignmentError::MissingAlignmentEpoch{ device, start: common_start }),
		}
		end_offsets.push(log.epochs.iter().position(|e| e.timestamp == common_end));
	}

	let common_epoch_count:usize = common_start.seconds_until(&common_end) as usize;

	let window = AlignmentWindow{ common_start, common_end, start_offsets, end_offsets, common_epoch_count };
	window.check_coverage(logs)?;

	Ok(window)
}
