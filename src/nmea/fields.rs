
use crate::types::{CalendarDate, Coordinate, Hemisphere, TimeOfDay};

/// Field at the given index, or an empty field if the sentence was shorter than expected
pub fn field<'a>(fields:&'a [String], idx:usize) -> &'a str {
	fields.get(idx).map(|s| s.as_str()).unwrap_or("")
}

/// Empty fields are unknown, not zero.  NaN and infinities are malformed.
pub fn number(s:&str) -> Result<Option<f64>, &'static str> {
	if s.is_empty() { return Ok(None); }
	match s.parse::<f64>() {
		Ok(x) if x.is_finite() => Ok(Some(x)),
		_ => Err("Malformed numeric field"),
	}
}

/// Like number, but for counts and enumerations; tolerates vendors that print them as "08" or "8.0"
pub fn count(s:&str) -> Result<Option<u32>, &'static str> {
	if s.is_empty() { return Ok(None); }
	if let Ok(n) = s.parse::<u32>() { return Ok(Some(n)); }

	match s.parse::<f64>() {
		Ok(x) if x >= 0.0 && x.fract() == 0.0 && x <= (u32::MAX as f64) => Ok(Some(x as u32)),
		_ => Err("Malformed count field"),
	}
}

/// Lenient variant used for per-satellite values, where garbage just means unknown
pub fn lenient(s:&str) -> Option<f64> {
	number(s).ok().and_then(|x| x)
}

/// hhmmss[.sss]; fractional seconds are dropped
pub fn time_of_day(s:&str) -> Result<Option<TimeOfDay>, &'static str> {
	if s.is_empty() { return Ok(None); }
	if s.len() < 6 || !s.is_char_boundary(6) || !s[..6].bytes().all(|b| b.is_ascii_digit()) {
		return Err("Malformed time field");
	}

	let hour:u8   = s[0..2].parse().map_err(|_| "Malformed hour")?;
	let minute:u8 = s[2..4].parse().map_err(|_| "Malformed minute")?;
	let second:f64 = s[4..].parse().map_err(|_| "Malformed second")?;

	// 60 is allowed for leap seconds
	if hour > 23 || minute > 59 || !(0.0..61.0).contains(&second) { return Err("Time out of range"); }

	Ok(Some(TimeOfDay{ hour, minute, second: second.trunc() as u8 }))
}

/// ddmmyy
pub fn date(s:&str) -> Result<Option<CalendarDate>, &'static str> {
	if s.is_empty() { return Ok(None); }
	if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) { return Err("Malformed date field"); }

	let day:u8   = s[0..2].parse().map_err(|_| "Malformed day")?;
	let month:u8 = s[2..4].parse().map_err(|_| "Malformed month")?;
	let year:u8  = s[4..6].parse().map_err(|_| "Malformed year")?;

	Ok(Some(CalendarDate{ day, month, year }))
}

/// ddmm.mmmm / dddmm.mmmm plus the hemisphere field that follows it.  The two digits in front of the decimal
/// point are always minutes, so latitude and longitude share the same parser.
pub fn coordinate(value:&str, hemisphere:&str) -> Result<Option<Coordinate>, &'static str> {
	if value.is_empty() { return Ok(None); }

	let hemisphere = Hemisphere::from_field(hemisphere).ok_or("Malformed hemisphere field")?;
	let int_len:usize = value.find('.').unwrap_or(value.len());
	if int_len < 3 || !value[..int_len].bytes().all(|b| b.is_ascii_digit()) {
		return Err("Malformed coordinate field");
	}

	let degrees:u16  = value[..int_len-2].parse().map_err(|_| "Malformed degrees")?;
	let minutes:f64  = value[int_len-2..].parse().map_err(|_| "Malformed minutes")?;
	if minutes >= 60.0 { return Err("Minutes out of range"); }

	Ok(Some(Coordinate{ degrees, minutes, hemisphere }))
}
