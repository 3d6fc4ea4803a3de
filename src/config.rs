
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::GnssLogErr;
use crate::logfile::DEFAULT_TALKERS;

/// Surveyed position the lat/lon errors are measured against.  All zeros means "no reference".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencePosition {
	pub latitude_deg:f64,
	pub longitude_deg:f64,
	pub altitude_m:f64,
}

impl ReferencePosition {

	pub fn new(latitude_deg:f64, longitude_deg:f64, altitude_m:f64) -> Self {
		Self{ latitude_deg, longitude_deg, altitude_m }
	}

	pub fn is_unset(&self) -> bool {
		self.latitude_deg == 0.0 && self.longitude_deg == 0.0 && self.altitude_m == 0.0
	}

	/// "lat,lon,alt" in decimal degrees and meters
	pub fn parse(s:&str) -> Result<ReferencePosition, GnssLogErr> {
		let parts:Vec<f64> = s.split(',').map(|p| p.trim().parse::<f64>())
			.collect::<Result<Vec<f64>, _>>()
			.map_err(|e| GnssLogErr::InvalidConfig(format!("reference position '{}': {}", s, e)))?;

		match parts.as_slice() {
			[lat, lon, alt] => Ok(ReferencePosition::new(*lat, *lon, *alt)),
			[lat, lon]      => Ok(ReferencePosition::new(*lat, *lon, 0.0)),
			_ => Err(GnssLogErr::InvalidConfig(format!("reference position '{}' needs lat,lon[,alt]", s))),
		}
	}

}

fn default_talkers() -> Vec<String> {
	DEFAULT_TALKERS.iter().map(|t| t.to_string()).collect()
}

/// Everything one comparison run needs.  Log order is device order in every output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
	pub logs:Vec<PathBuf>,
	#[serde(default)]
	pub reference:ReferencePosition,
	#[serde(default = "default_talkers")]
	pub talkers:Vec<String>,
}

impl RunConfig {

	pub fn new(logs:Vec<PathBuf>, reference:ReferencePosition) -> Self {
		Self{ logs, reference, talkers: default_talkers() }
	}

	pub fn from_json_file(path:&Path) -> Result<RunConfig, GnssLogErr> {
		let text = fs::read_to_string(path).map_err(|source| GnssLogErr::UnreadableLog{ path: path.to_path_buf(), source })?;
		Self::from_json(&text)
	}

	pub fn from_json(text:&str) -> Result<RunConfig, GnssLogErr> {
		let config:RunConfig = serde_json::from_str(text).map_err(|e| GnssLogErr::InvalidConfig(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), GnssLogErr> {
		if self.logs.is_empty() {
			return Err(GnssLogErr::InvalidConfig("at least one log file is required".to_string()));
		}
		if self.talkers.is_empty() {
			return Err(GnssLogErr::InvalidConfig("at least one talker id is required".to_string()));
		}
		if let Some(bad) = self.talkers.iter().find(|t| t.len() != 2 || !t.chars().all(|c| c.is_ascii_uppercase())) {
			return Err(GnssLogErr::InvalidConfig(format!("talker id '{}' must be two upper-case letters", bad)));
		}
		Ok(())
	}

}
