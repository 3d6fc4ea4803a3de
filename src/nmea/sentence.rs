
use std::collections::BTreeMap;
use std::convert::{TryFrom, TryInto};

use serde::{Serialize, Deserialize};

use crate::types::{FixType, SatelliteData, SatelliteId};
use super::CurrentFix;
use super::fields::{self, field};

const GSV_FIRST_SATELLITE_FIELD:usize = 4;
const GSV_FIELDS_PER_SATELLITE:usize = 4;
const GSA_MAX_SATELLITES:usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentenceKind {
	Gga,
	Rmc,
	Gsa,
	Gsv,
	Gll,
	Vtg,
}

impl SentenceKind {

	/// Identifies a sentence by its address field, e.g. "GPGGA" or "GNRMC"; the talker is checked by the log reader
	pub fn identify(address:&str) -> Option<SentenceKind> {
		let formatter:&str = match address.len() {
			5 if address.is_char_boundary(2) => &address[2..],
			3 => address,
			_ => return None,
		};

		match formatter {
			"GGA" => Some(SentenceKind::Gga),
			"RMC" => Some(SentenceKind::Rmc),
			"GSA" => Some(SentenceKind::Gsa),
			"GSV" => Some(SentenceKind::Gsv),
			"GLL" => Some(SentenceKind::Gll),
			"VTG" => Some(SentenceKind::Vtg),
			_     => None,
		}
	}

	/// Updates only the slots this sentence type carries.  Every field is parsed before anything is written, so an
	/// Err leaves the fix exactly as it was.
	pub fn apply(&self, f:&[String], fix:&mut CurrentFix) -> Result<(), &'static str> {
		match self {
			SentenceKind::Gga => apply_gga(f, fix),
			SentenceKind::Rmc => apply_rmc(f, fix),
			SentenceKind::Gsa => apply_gsa(f, fix),
			SentenceKind::Gsv => apply_gsv(f, fix),
			SentenceKind::Gll => apply_gll(f, fix),
			SentenceKind::Vtg => apply_vtg(f, fix),
		}
	}

}

// $--GGA,hhmmss.ss,llll.ll,a,yyyyy.yy,a,q,nn,h.h,a.a,M,g.g,M,age,stn
fn apply_gga(f:&[String], fix:&mut CurrentFix) -> Result<(), &'static str> {
	let timestamp  = fields::time_of_day(field(f, 1))?;
	let fix_status:u8 = fields::count(field(f, 6))?.ok_or("GGA without fix quality")?
		.try_into().map_err(|_| "GGA fix quality out of range")?;
	let sats       = fields::count(field(f, 7))?;
	let hdop       = fields::number(field(f, 8))?;

	let position = if fix_status != 0 {
		let lat = fields::coordinate(field(f, 2), field(f, 3))?;
		let lon = fields::coordinate(field(f, 4), field(f, 5))?;
		Some((lat, lon, fields::lenient(field(f, 9)), fields::lenient(field(f, 11))))
	} else { None };

	if timestamp.is_some() { fix.timestamp = timestamp; }
	fix.fix_status = fix_status;
	fix.satellites_in_use = sats;
	fix.hdop = hdop;

	if let Some((lat, lon, altitude_m, geoid_height_m)) = position {
		fix.latitude  = lat;
		fix.longitude = lon;
		fix.altitude_m = altitude_m;
		fix.geoid_height_m = geoid_height_m;
	}

	Ok(())
}

// $--RMC,hhmmss.ss,A,llll.ll,a,yyyyy.yy,a,x.x,x.x,ddmmyy,x.x,a
fn apply_rmc(f:&[String], fix:&mut CurrentFix) -> Result<(), &'static str> {
	let timestamp = fields::time_of_day(field(f, 1))?;
	let valid:bool = field(f, 2) == "A";
	let date = fields::date(field(f, 9))?;

	let navigation = if valid {
		Some((
			fields::coordinate(field(f, 3), field(f, 4))?,
			fields::coordinate(field(f, 5), field(f, 6))?,
			fields::number(field(f, 7))?,
			fields::number(field(f, 8))?,
		))
	} else { None };

	if timestamp.is_some() { fix.timestamp = timestamp; }
	if date.is_some() { fix.date = date; }
	fix.valid = valid;

	match navigation {
		Some((lat, lon, speed_knots, course_deg)) => {
			fix.latitude = lat;
			fix.longitude = lon;
			fix.speed_knots = speed_knots;
			fix.course_deg = course_deg;
		},
		None => {
			fix.latitude = None;
			fix.longitude = None;
			fix.speed_knots = None;
			fix.course_deg = None;
		}
	}

	Ok(())
}

// $--GLL,llll.ll,a,yyyyy.yy,a,hhmmss.ss,A
fn apply_gll(f:&[String], fix:&mut CurrentFix) -> Result<(), &'static str> {
	let timestamp = fields::time_of_day(field(f, 5))?;
	let valid:bool = field(f, 6) == "A";

	let position = if valid {
		Some((fields::coordinate(field(f, 1), field(f, 2))?, fields::coordinate(field(f, 3), field(f, 4))?))
	} else { None };

	if timestamp.is_some() { fix.timestamp = timestamp; }
	fix.valid = valid;

	if let Some((lat, lon)) = position {
		fix.latitude = lat;
		fix.longitude = lon;
	}

	Ok(())
}

// $--GSA,a,x,xx,xx,xx,xx,xx,xx,xx,xx,xx,xx,xx,xx,p.p,h.h,v.v
fn apply_gsa(f:&[String], fix:&mut CurrentFix) -> Result<(), &'static str> {
	let code = fields::count(field(f, 2))?.ok_or("GSA without fix type")?;
	let fix_type = u8::try_from(code).ok().and_then(FixType::from_code).ok_or("Unknown GSA fix type")?;

	let mut used:Vec<SatelliteId> = vec![];
	for idx in 3..(3 + GSA_MAX_SATELLITES) {
		match fields::count(field(f, idx))? {
			Some(prn) => used.push(prn),
			None => break,
		}
	}

	let pdop = fields::number(field(f, 15))?;
	let hdop = fields::number(field(f, 16))?;
	let vdop = fields::number(field(f, 17))?;

	fix.fix_type = fix_type;
	fix.satellites_used = used;
	fix.pdop = pdop;
	fix.hdop = hdop;
	fix.vdop = vdop;

	Ok(())
}

// $--GSV,t,n,ss,{prn,elev,azim,snr}x(1..4)[,signal]
fn apply_gsv(f:&[String], fix:&mut CurrentFix) -> Result<(), &'static str> {
	let total  = fields::count(field(f, 1))?.ok_or("GSV without sentence count")?;
	let number = fields::count(field(f, 2))?.ok_or("GSV without sentence number")?;
	let in_view = fields::count(field(f, 3))?;

	let mut satellites:BTreeMap<SatelliteId, SatelliteData> = BTreeMap::new();
	if f.len() > GSV_FIRST_SATELLITE_FIELD {
		// A trailing NMEA 4.1 signal id leaves a short chunk at the end, which is skipped
		for group in f[GSV_FIRST_SATELLITE_FIELD..].chunks(GSV_FIELDS_PER_SATELLITE).filter(|g| g.len() == GSV_FIELDS_PER_SATELLITE) {
			let prn = match fields::count(&group[0])? {
				Some(prn) => prn,
				None => break,
			};

			satellites.insert(prn, SatelliteData{
				elevation_deg: fields::lenient(&group[1]),
				azimuth_deg:   fields::lenient(&group[2]),
				snr_db_hz:     fields::lenient(&group[3]),
			});
		}
	}

	fix.total_sv_sentences = Some(total);
	fix.last_sv_sentence = Some(number);
	fix.satellites_in_view = in_view;

	// The first sentence of a group starts a fresh table; later ones extend it
	if number == 1 {
		fix.satellites = satellites;
	} else {
		fix.satellites.extend(satellites);
	}

	Ok(())
}

// $--VTG,x.x,T,x.x,M,x.x,N,x.x,K
fn apply_vtg(f:&[String], fix:&mut CurrentFix) -> Result<(), &'static str> {
	let course_deg = fields::number(field(f, 1))?;
	let speed_knots = fields::number(field(f, 5))?;

	fix.course_deg = course_deg;
	fix.speed_knots = speed_knots;

	Ok(())
}
