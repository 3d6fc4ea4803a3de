
// Builders for GNSSLogger-style text used across the unit tests

use crate::nmea::checksum;
use crate::types::TimeOfDay;

pub struct SyntheticDevice {
	pub manufacturer:&'static str,
	pub model:&'static str,
	pub start:TimeOfDay,
	pub epochs:usize,
	pub hdop:f64,
	pub snrs:Vec<Option<f64>>,
	pub lat:&'static str,
	pub lon:&'static str,
}

impl SyntheticDevice {

	pub fn new(manufacturer:&'static str, start:TimeOfDay, epochs:usize) -> Self {
		Self{ manufacturer, model: "Test Phone", start, epochs, hdop: 0.9, snrs: vec![Some(30.0), Some(40.0)],
			lat: "5559.016", lon: "03712.570" }
	}

	pub fn render(&self) -> String {
		let mut out = String::new();
		out.push_str(&format!("# Version: v2.0.0.1 Platform: 8.0.0 Manufacturer: {} Model: {}\n", self.manufacturer, self.model));
		out.push_str("# Fix,Provider,Latitude,Longitude,Altitude,Speed,Accuracy,(UTC)TimeInMs\n");
		out.push_str("# NMEA,NMEA,(UTC)TimeInMs\n");

		for k in 0..self.epochs {
			let t = match self.start.plus_seconds(k as i64) {
				Some(t) => t,
				None => break,
			};
			let hhmmss = format!("{:02}{:02}{:02}.00", t.hour, t.minute, t.second);
			let millis:u64 = 1513000000000 + (t.seconds_of_day() as u64) * 1000;

			out.push_str(&nmea_line(&gsv_body(&self.snrs), millis));
			out.push_str(&nmea_line("GPGSA,A,3,05,12,15,29,,,,,,,,,1.8,1.0,1.5", millis));
			out.push_str(&nmea_line("GLGSV,1,1,01,70,30,100,25", millis));
			out.push_str(&nmea_line(&format!("GPGGA,{},{},N,{},E,1,08,{:.1},190.4,M,14.3,M,,", hhmmss, self.lat, self.lon, self.hdop), millis));
			out.push_str(&nmea_line(&format!("GPRMC,{},A,{},N,{},E,0.0,0.0,111217,,,A", hhmmss, self.lat, self.lon), millis));
			out.push_str(&format!("Fix,gps,55.9836,37.2095,190.4,0.0,4.0,{}\n", millis));
		}

		out
	}

}

pub fn nmea_line(body:&str, millis:u64) -> String {
	format!("NMEA,{},{}\n", checksum::encode(body), millis)
}

pub fn gsv_body(snrs:&[Option<f64>]) -> String {
	let mut body = format!("GPGSV,1,1,{:02}", snrs.len());
	for (i, snr) in snrs.iter().enumerate() {
		let snr_field = match snr {
			Some(x) => format!("{}", x),
			None => String::new(),
		};
		body.push_str(&format!(",{:02},{},{:03},{}", i + 1, 20 + i, 30 * i, snr_field));
	}
	body
}
