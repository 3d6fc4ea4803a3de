
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::GnssLogErr;
use crate::logfile::{DeviceLog, LogReader};

pub const BUFFER_SIZE:usize = 64 * 1024;

pub fn open_log(path:&Path) -> Result<BufReader<File>, GnssLogErr> {
	let file = File::open(path).map_err(|source| GnssLogErr::UnreadableLog{ path: path.to_path_buf(), source })?;
	Ok(BufReader::with_capacity(BUFFER_SIZE, file))
}

/// Opens, drains and closes one log.  Any failure along the way is reported against the path; there's no partial result.
pub fn read_log_file(path:&Path, reader:&LogReader) -> Result<DeviceLog, GnssLogErr> {
	let src = open_log(path)?;
	let mut log = reader.read(src).map_err(|source| GnssLogErr::UnreadableLog{ path: path.to_path_buf(), source })?;
	log.path = Some(path.to_path_buf());
	Ok(log)
}

pub fn read_log_files(paths:&[PathBuf], reader:&LogReader) -> Result<Vec<DeviceLog>, GnssLogErr> {
	paths.iter().map(|p| read_log_file(p, reader)).collect()
}
