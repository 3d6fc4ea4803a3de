
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
	North,
	South,
	East,
	West,
}

impl Hemisphere {

	pub fn from_field(s:&str) -> Option<Hemisphere> {
		match s {
			"N" => Some(Hemisphere::North),
			"S" => Some(Hemisphere::South),
			"E" => Some(Hemisphere::East),
			"W" => Some(Hemisphere::West),
			_   => None,
		}
	}

	pub fn sign(&self) -> f64 {
		match self {
			Hemisphere::North | Hemisphere::East =>  1.0,
			Hemisphere::South | Hemisphere::West => -1.0,
		}
	}

}

/// A latitude or longitude kept the way NMEA transmits it: whole degrees plus decimal minutes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
	pub degrees:u16,
	pub minutes:f64,
	pub hemisphere:Hemisphere,
}

impl Coordinate {

	/// degrees + minutes/60, negative in the southern and western hemispheres
	pub fn decimal_degrees(&self) -> f64 {
		self.hemisphere.sign() * ((self.degrees as f64) + (self.minutes / 60.0))
	}

}

#[test]
fn combines_degrees_and_minutes() {
	let lat = Coordinate{ degrees: 55, minutes: 59.016, hemisphere: Hemisphere::North };
	let lon = Coordinate{ degrees: 37, minutes: 12.57,  hemisphere: Hemisphere::West  };

	assert!((lat.decimal_degrees() - 55.9836).abs()  < 1e-9);
	assert!((lon.decimal_degrees() + 37.2095).abs()  < 1e-9);
}
