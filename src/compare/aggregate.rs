
use serde::{Serialize, Deserialize};

use crate::config::ReferencePosition;
use crate::logfile::DeviceLog;
use crate::types::FixType;
use super::align::{AlignmentError, AlignmentWindow};

/// Per-device metrics, one entry per aligned epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSeries {
	pub label:String,
	pub hdop:Vec<Option<f64>>,
	pub sv_in_use:Vec<Option<u32>>,
	pub cn0:Vec<Option<f64>>,				// None where no satellite reported an SNR
	pub fix_quality:Vec<FixType>,
	pub altitude:Vec<Option<f64>>,
	pub lat_error:Option<Vec<Option<f64>>>,	// Whole series is None without a reference position
	pub lon_error:Option<Vec<Option<f64>>>,
}

impl DeviceSeries {

	/// The CN0 values that feed the signal-quality histogram; epochs without data are left out
	pub fn cn0_samples(&self) -> Vec<f64> {
		self.cn0.iter().filter_map(|x| *x).collect()
	}

}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
	pub epoch_count:usize,
	pub devices:Vec<DeviceSeries>,
}

pub fn aggregate(logs:&[DeviceLog], window:&AlignmentWindow, reference:&ReferencePosition) -> Result<AggregatedSeries, AlignmentError> {
	window.check_coverage(logs)?;

	let with_errors:bool = !reference.is_unset();
	let n:usize = window.common_epoch_count;

	let devices:Vec<DeviceSeries> = logs.iter().zip(window.start_offsets.iter()).enumerate().map(|(device, (log, offset))| {
		let epochs = &log.epochs[*offset..(*offset + n)];

		let positions:Vec<Option<(f64, f64)>> = epochs.iter().map(|e| e.decimal_position()).collect();

		let (lat_error, lon_error):(Option<Vec<Option<f64>>>, Option<Vec<Option<f64>>>) = if with_errors {
			(Some(positions.iter().map(|p| p.map(|(lat, _)| lat - reference.latitude_deg)).collect()),
			 Some(positions.iter().map(|p| p.map(|(_, lon)| lon - reference.longitude_deg)).collect()))
		} else { (None, None) };

		DeviceSeries{
			label:       log.label(device),
			hdop:        epochs.iter().map(|e| e.hdop).collect(),
			sv_in_use:   epochs.iter().map(|e| e.satellites_in_use).collect(),
			cn0:         epochs.iter().map(|e| e.mean_snr()).collect(),
			fix_quality: epochs.iter().map(|e| e.fix_type).collect(),
			altitude:    epochs.iter().map(|e| e.altitude_m).collect(),
			lat_error,
			lon_error,
		}
	}).collect();

	Ok(AggregatedSeries{ epoch_count: n, devices })
}

/// Normalised histogram data: the densities integrate to one over the binned range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
	pub label:String,
	pub lower_edge:f64,
	pub bin_width:f64,
	pub density:Vec<f64>,
}

pub const DEFAULT_HISTOGRAM_BINS:usize = 40;

pub fn cn0_histogram(series:&DeviceSeries, bins:usize) -> Option<Histogram> {
	let samples = series.cn0_samples();
	if samples.is_empty() || bins == 0 { return None; }

	let mut lo:f64 = samples.iter().cloned().fold(f64::INFINITY, f64::min);
	let mut hi:f64 = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
	if hi == lo {
		lo -= 0.5;
		hi += 0.5;
	}

	let bin_width:f64 = (hi - lo) / (bins as f64);
	let mut counts:Vec<usize> = vec![0; bins];
	for x in samples.iter() {
		// The top edge belongs to the last bin
		let idx:usize = (((x - lo) / bin_width) as usize).min(bins - 1);
		counts[idx] += 1;
	}

	let scale:f64 = 1.0 / ((samples.len() as f64) * bin_width);
	Some(Histogram{
		label: series.label.clone(),
		lower_edge: lo,
		bin_width,
		density: counts.iter().map(|c| (*c as f64) * scale).collect(),
	})
}

#[cfg(test)]
mod tests {

	use super::*;
	use crate::nmea::CurrentFix;
	use crate::types::{Coordinate, EpochRecord, Hemisphere, SatelliteData, TimeOfDay};
	use crate::compare::align::align;

	fn epoch(t:TimeOfDay, hdop:f64, snrs:&[Option<f64>]) -> EpochRecord {
		let mut fix = CurrentFix{ timestamp: Some(t), hdop: Some(hdop), satellites_in_use: Some(snrs.len() as u32),
			fix_type: FixType::Fix3D, altitude_m: Some(190.4), ..CurrentFix::default() };
		fix.latitude  = Some(Coordinate{ degrees: 55, minutes: 59.016, hemisphere: Hemisphere::North });
		fix.longitude = Some(Coordinate{ degrees: 37, minutes: 12.57,  hemisphere: Hemisphere::East  });
		for (prn, snr) in snrs.iter().enumerate() {
			fix.satellites.insert(prn as u32 + 1, SatelliteData{ elevation_deg: Some(30.0), azimuth_deg: Some(90.0), snr_db_hz: *snr });
		}
		fix.snapshot().unwrap()
	}

	fn device(start:u8, len:u8, snrs:&[Option<f64>]) -> DeviceLog {
		let epochs = (0..len).map(|k| epoch(TimeOfDay::new(12, 0, start + k), 0.5 + (k as f64) * 0.1, snrs)).collect();
		DeviceLog{ epochs, ..DeviceLog::default() }
	}

	#[test]
	fn series_lengths_match_window() {
		let logs = vec![device(0, 10, &[Some(30.0)]), device(2, 10, &[Some(40.0)]), device(1, 6, &[None])];
		let window = align(&logs).unwrap();
		assert_eq!(window.common_epoch_count, 4);

		let series = aggregate(&logs, &window, &ReferencePosition::new(55.983528048, 37.209562621, 190.4271)).unwrap();
		assert_eq!(series.epoch_count, 4);
		for d in series.devices.iter() {
			assert_eq!(d.hdop.len(), 4);
			assert_eq!(d.sv_in_use.len(), 4);
			assert_eq!(d.cn0.len(), 4);
			assert_eq!(d.fix_quality.len(), 4);
			assert_eq!(d.altitude.len(), 4);
			assert_eq!(d.lat_error.as_ref().map(|v| v.len()), Some(4));
			assert_eq!(d.lon_error.as_ref().map(|v| v.len()), Some(4));
		}

		// Device 0 starts two epochs before the common start
		assert_eq!(series.devices[0].hdop[0], Some(0.7));
		assert_eq!(series.devices[1].hdop[0], Some(0.5));
	}

	#[test]
	fn cn0_skips_missing_snr() {
		let logs = vec![device(0, 3, &[None, Some(35.2), Some(41.0)]), device(0, 3, &[None, None])];
		let window = align(&logs).unwrap();
		let series = aggregate(&logs, &window, &ReferencePosition::default()).unwrap();

		let cn0 = series.devices[0].cn0[0].unwrap();
		assert!((cn0 - 38.1).abs() < 1e-9);

		assert_eq!(series.devices[1].cn0, vec![None, None]);
		assert!(series.devices[1].cn0_samples().is_empty());
		assert!(cn0_histogram(&series.devices[1], DEFAULT_HISTOGRAM_BINS).is_none());
	}

	#[test]
	fn position_error_against_reference() {
		let logs = vec![device(0, 3, &[Some(30.0)])];
		let window = align(&logs).unwrap();
		let series = aggregate(&logs, &window, &ReferencePosition::new(55.983528048, 37.209562621, 190.4271)).unwrap();

		let lat_err = series.devices[0].lat_error.as_ref().unwrap()[0].unwrap();
		let lon_err = series.devices[0].lon_error.as_ref().unwrap()[0].unwrap();
		assert!((lat_err - 0.000071952).abs() < 1e-9);
		assert!((lon_err + 0.000062621).abs() < 1e-9);
	}

	#[test]
	fn zero_reference_skips_errors() {
		let logs = vec![device(0, 3, &[Some(30.0)])];
		let window = align(&logs).unwrap();
		let series = aggregate(&logs, &window, &ReferencePosition::new(0.0, 0.0, 0.0)).unwrap();
		assert_eq!(series.devices[0].lat_error, None);
		assert_eq!(series.devices[0].lon_error, None);
	}

	#[test]
	fn epochs_without_position_have_no_error() {
		let mut log = device(0, 3, &[Some(30.0)]);
		log.epochs[1].latitude = None;
		let logs = vec![log];
		let window = align(&logs).unwrap();
		let series = aggregate(&logs, &window, &ReferencePosition::new(55.98, 37.2, 0.0)).unwrap();
		assert_eq!(series.devices[0].lat_error.as_ref().unwrap()[1], None);
		assert_eq!(series.devices[0].lon_error.as_ref().unwrap()[1], None);
	}

	#[test]
	fn mismatched_window_is_an_error() {
		let logs = vec![device(0, 5, &[Some(30.0)]), device(0, 5, &[Some(30.0)])];
		let mut window = align(&logs).unwrap();
		window.common_epoch_count = 9;
		assert_eq!(aggregate(&logs, &window, &ReferencePosition::default()),
			Err(AlignmentError::TruncatedLog{ device: 0, available: 5, required: 9 }));

		window.start_offsets.pop();
		assert_eq!(aggregate(&logs, &window, &ReferencePosition::default()),
			Err(AlignmentError::WindowMismatch{ window: 1, logs: 2 }));
	}

	#[test]
	fn histogram_is_normalised() {
		let series = DeviceSeries{ label: "A".to_string(), hdop: vec![], sv_in_use: vec![], fix_quality: vec![], altitude: vec![],
			cn0: vec![Some(20.0), None, Some(30.0), Some(30.0), Some(40.0)], lat_error: None, lon_error: None };

		let h = cn0_histogram(&series, 4).unwrap();
		assert_eq!(h.lower_edge, 20.0);
		assert_eq!(h.bin_width, 5.0);
		assert_eq!(h.density.len(), 4);

		let area:f64 = h.density.iter().map(|d| d * h.bin_width).sum();
		assert!((area - 1.0).abs() < 1e-12);
		assert_eq!(h.density[0], 0.25 / 5.0);
		assert_eq!(h.density[3], 0.25 / 5.0);
		assert_eq!(h.density[2], 0.5 / 5.0);

		let flat = DeviceSeries{ cn0: vec![Some(33.0)], ..series };
		assert_eq!(cn0_histogram(&flat, 10).unwrap().lower_edge, 32.5);
	}

}
