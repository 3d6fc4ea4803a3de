
use std::io::{self, BufRead};
use std::path::PathBuf;

use log::{info, warn};
use serde::{Serialize, Deserialize};

use crate::nmea::{CurrentFix, DecoderStats, SentenceDecoder};
use crate::types::EpochRecord;


pub const HEADER_MARKER:&str = "# Version:";
pub const FIX_MARKER:&str = "Fix,";
pub const NMEA_MARKER:&str = "NMEA,";

// Offsets into an NMEA line, e.g. "NMEA,$GPGGA,..."
const NMEA_SENTENCE_OFFSET:usize = 5;
const NMEA_TALKER_RANGE:std::ops::Range<usize> = 6..8;

pub const DEFAULT_TALKERS:[&str; 2] = ["GP", "GN"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
	Header,
	FixRecord,
	Nmea,
	Other,
}

impl LineKind {

	pub fn classify(line:&str) -> LineKind {
		if line.contains(HEADER_MARKER)       { LineKind::Header }
		else if line.starts_with(FIX_MARKER)  { LineKind::FixRecord }
		else if line.starts_with(NMEA_MARKER) { LineKind::Nmea }
		else                                  { LineKind::Other }
	}

}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
	pub version:Option<String>,
	pub platform:Option<String>,
	pub manufacturer:Option<String>,
	pub model:Option<String>,
}

impl DeviceInfo {

	/// "# Version: v2.0.0.1 Platform: 8.0.0 Manufacturer: Xiaomi Model: Mi A1"
	pub fn from_header_line(line:&str) -> DeviceInfo {
		let tokens:Vec<&str> = line.split_whitespace().collect();
		let model:Vec<&str> = tokens.iter().skip(8).cloned().collect();

		DeviceInfo{
			version:      tokens.get(2).map(|s| s.to_string()),
			platform:     tokens.get(4).map(|s| s.to_string()),
			manufacturer: tokens.get(6).map(|s| s.to_string()),
			model:        if model.is_empty() { None } else { Some(model.join(" ")) },
		}
	}

}

/// A "Fix," line from the Android location provider.  Kept raw; nothing downstream reads it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixRecord {
	pub fields:Vec<String>,
}

impl FixRecord {

	pub fn from_line(line:&str) -> FixRecord {
		let mut fields:Vec<String> = line.split(',').skip(1).map(|s| s.to_string()).collect();
		if fields.last().map(|s| s.trim().is_empty()).unwrap_or(false) { fields.pop(); }
		FixRecord{ fields }
	}

	pub fn provider(&self) -> Option<&str> { self.fields.get(0).map(|s| s.as_str()) }

}

#[derive(Debug, Clone, Default)]
pub struct DeviceLog {
	pub path:Option<PathBuf>,
	pub info:DeviceInfo,
	pub epochs:Vec<EpochRecord>,
	pub fix_records:Vec<FixRecord>,
	pub decoder_stats:DecoderStats,
	pub dropped_nmea_lines:usize,
}

impl DeviceLog {

	pub fn is_empty(&self) -> bool { self.epochs.is_empty() }

	/// Series label: the manufacturer if the header had one, otherwise the file name, otherwise the position in the run
	pub fn label(&self, device:usize) -> String {
		if let Some(m) = &self.info.manufacturer { return m.clone(); }
		match self.path.as_ref().and_then(|p| p.file_name()) {
			Some(name) => name.to_string_lossy().into_owned(),
			None => format!("device {}", device),
		}
	}

}

pub struct LogReader {
	talkers:Vec<String>,
}

impl LogReader {

	pub fn new<S: AsRef<str>>(talkers:&[S]) -> Self {
		Self{ talkers: talkers.iter().map(|t| t.as_ref().to_string()).collect() }
	}

	pub fn accepts(&self, talker:&str) -> bool {
		self.talkers.iter().any(|t| t == talker)
	}

	/// Drains the source into a DeviceLog.  A read or encoding error aborts the whole log.
	pub fn read<R: BufRead>(&self, src:R) -> io::Result<DeviceLog> {
		let mut device_log = DeviceLog::default();
		let mut decoder = SentenceDecoder::new();
		let mut fix = CurrentFix::default();
		let mut header_seen:bool = false;

		for line in src.lines() {
			let line = line?;

			match LineKind::classify(&line) {
				LineKind::Header => if !header_seen {
					device_log.info = DeviceInfo::from_header_line(&line);
					header_seen = true;
				},
				LineKind::FixRecord => device_log.fix_records.push(FixRecord::from_line(&line)),
				LineKind::Nmea => {
					let accepted:bool = line.get(NMEA_TALKER_RANGE).map(|t| self.accepts(t)).unwrap_or(false);
					if !accepted {
						device_log.dropped_nmea_lines += 1;
						continue;
					}

					let timestamp_before = fix.timestamp;
					for c in line[NMEA_SENTENCE_OFFSET..].chars() { decoder.feed(c, &mut fix); }
					decoder.feed('\n', &mut fix);

					if fix.timestamp != timestamp_before {
						if let Some(epoch) = fix.snapshot() {
							if let Some(last) = device_log.epochs.last() {
								if epoch.timestamp < last.timestamp {
									warn!("Epoch {} follows {}; log is out of order", epoch.timestamp, last.timestamp);
								}
							}
							device_log.epochs.push(epoch);
						}
					}
				},
				LineKind::Other => (),
			}
		}

		device_log.decoder_stats = decoder.stats();
		info!("Read {} epochs ({} fix records, {} NMEA lines dropped by talker, {:?})",
			device_log.epochs.len(), device_log.fix_records.len(), device_log.dropped_nmea_lines, device_log.decoder_stats);

		Ok(device_log)
	}

}

impl Default for LogReader {
	fn default() -> Self { Self::new(&DEFAULT_TALKERS[..]) }
}
