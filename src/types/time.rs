
use std::fmt;

use serde::{Serialize, Deserialize};

pub const SEC_PER_MIN:i64 = 60;
pub const SEC_PER_HOUR:i64 = 3600;

/// UTC time of day as carried by NMEA sentences; there's no date attached, so ordering only makes sense within one day.
/// Field order matters here because the derived Ord compares hour, then minute, then second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
	pub hour:u8,
	pub minute:u8,
	pub second:u8,
}

impl TimeOfDay {

	pub fn new(hour:u8, minute:u8, second:u8) -> Self { Self{ hour, minute, second } }

	pub fn seconds_of_day(&self) -> i64 {
		(self.hour as i64)*SEC_PER_HOUR + (self.minute as i64)*SEC_PER_MIN + (self.second as i64)
	}

	/// Signed number of whole seconds from self to later, carrying minutes and hours properly
	pub fn seconds_until(&self, later:&TimeOfDay) -> i64 {
		later.seconds_of_day() - self.seconds_of_day()
	}

	/// The time of day a whole number of seconds after this one; None if it would roll past midnight
	pub fn plus_seconds(&self, secs:i64) -> Option<TimeOfDay> {
		let total:i64 = self.seconds_of_day() + secs;
		if total < 0 || total >= 24*SEC_PER_HOUR { return None; }

		Some(TimeOfDay{
			hour:   (total / SEC_PER_HOUR) as u8,
			minute: ((total % SEC_PER_HOUR) / SEC_PER_MIN) as u8,
			second: (total % SEC_PER_MIN) as u8,
		})
	}

}

impl fmt::Display for TimeOfDay {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
	pub day:u8,
	pub month:u8,
	pub year:u8,		// Two-digit year as transmitted in RMC
}
