
use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

pub mod position;
pub mod time;

pub use self::position::{Coordinate, Hemisphere};
pub use self::time::{CalendarDate, TimeOfDay};

/// Satellite PRN as reported in GSV/GSA
pub type SatelliteId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SatelliteData {
	pub elevation_deg:Option<f64>,
	pub azimuth_deg:Option<f64>,
	pub snr_db_hz:Option<f64>,		// None for satellites in view but not tracked
}

/// Navigation mode from GSA
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FixType {
	NoFix,
	Fix2D,
	Fix3D,
}

impl FixType {

	pub fn from_code(code:u8) -> Option<FixType> {
		match code {
			1 => Some(FixType::NoFix),
			2 => Some(FixType::Fix2D),
			3 => Some(FixType::Fix3D),
			_ => None,
		}
	}

	pub fn code(&self) -> u8 {
		match self {
			FixType::NoFix => 1,
			FixType::Fix2D => 2,
			FixType::Fix3D => 3,
		}
	}

}

impl Default for FixType {
	fn default() -> Self { FixType::NoFix }
}

/// Immutable snapshot of the decoder state taken when a new timestamp shows up in a log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
	pub timestamp:TimeOfDay,
	pub date:Option<CalendarDate>,
	pub latitude:Option<Coordinate>,
	pub longitude:Option<Coordinate>,
	pub altitude_m:Option<f64>,
	pub geoid_height_m:Option<f64>,
	pub hdop:Option<f64>,
	pub pdop:Option<f64>,
	pub vdop:Option<f64>,
	pub satellites_in_use:Option<u32>,
	pub satellites_in_view:Option<u32>,
	pub satellites_used:Vec<SatelliteId>,
	pub fix_status:u8,
	pub fix_type:FixType,
	pub valid:bool,
	pub speed_knots:Option<f64>,
	pub course_deg:Option<f64>,
	pub satellites:BTreeMap<SatelliteId, SatelliteData>,
}

impl EpochRecord {

	/// Mean SNR over the satellites with a reported value, traversed in PRN order
	pub fn mean_snr(&self) -> Option<f64> {
		let (count, sum) = self.satellites.values()
			.filter_map(|sat| sat.snr_db_hz)
			.fold((0usize, 0.0), |(n, s), snr| (n + 1, s + snr));

		if count > 0 { Some(sum / (count as f64)) } else { None }
	}

	pub fn decimal_position(&self) -> Option<(f64, f64)> {
		match (self.latitude, self.longitude) {
			(Some(lat), Some(lon)) => Some((lat.decimal_degrees(), lon.decimal_degrees())),
			(_, _) => None,
		}
	}

}
