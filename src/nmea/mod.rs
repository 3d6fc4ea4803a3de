
use std::collections::BTreeMap;

use log::debug;
use serde::{Serialize, Deserialize};

use crate::types::{CalendarDate, Coordinate, EpochRecord, FixType, SatelliteData, SatelliteId, TimeOfDay};

pub mod checksum;
pub mod fields;
mod sentence;

pub use self::sentence::SentenceKind;


const MAX_SENTENCE_LENGTH:usize = 90;
const CHECKSUM_DIGITS:usize = 2;

/// The fix as it's being assembled from the sentences seen so far.  Owned by whoever drives the decoder and
/// handed to it by exclusive reference on each character.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentFix {
	pub timestamp:Option<TimeOfDay>,
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
	pub total_sv_sentences:Option<u32>,
	pub last_sv_sentence:Option<u32>,
	pub satellites:BTreeMap<SatelliteId, SatelliteData>,
}

impl CurrentFix {

	/// Copies the current state out into an immutable epoch; nothing to snapshot until a time has been decoded
	pub fn snapshot(&self) -> Option<EpochRecord> {
		let timestamp = self.timestamp?;
		Some(EpochRecord{
			timestamp,
			date: self.date,
			latitude: self.latitude,
			longitude: self.longitude,
			altitude_m: self.altitude_m,
			geoid_height_m: self.geoid_height_m,
			hdop: self.hdop,
			pdop: self.pdop,
			vdop: self.vdop,
			satellites_in_use: self.satellites_in_use,
			satellites_in_view: self.satellites_in_view,
			satellites_used: self.satellites_used.clone(),
			fix_status: self.fix_status,
			fix_type: self.fix_type,
			valid: self.valid,
			speed_knots: self.speed_knots,
			course_deg: self.course_deg,
			satellites: self.satellites.clone(),
		})
	}

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceEvent {
	/// Nothing completed on this character
	Pending,
	Applied(SentenceKind),
	/// Checksum was fine but the sentence type isn't one we decode
	Ignored,
	/// Checksum was fine but a required field was malformed; the fix is untouched
	Unparsed(SentenceKind),
	ChecksumMismatch,
	Truncated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderStats {
	pub sentences_started:usize,
	pub clean_sentences:usize,
	pub checksum_failures:usize,
	pub truncated_sentences:usize,
	pub parsed_sentences:usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Idle,
	Fields,
	Checksum,
}

#[derive(Debug)]
pub struct SentenceDecoder {
	state:State,
	fields:Vec<String>,
	field_buffer:String,
	checksum_buffer:String,
	running_checksum:u8,
	char_count:usize,
	stats:DecoderStats,
}

impl SentenceDecoder {

	pub fn new() -> Self {
		Self{ state: State::Idle, fields: vec![], field_buffer: String::new(), checksum_buffer: String::new(),
			running_checksum: 0, char_count: 0, stats: DecoderStats::default() }
	}

	pub fn stats(&self) -> DecoderStats { self.stats }

	fn start_sentence(&mut self) {
		self.state = State::Fields;
		self.fields.clear();
		self.field_buffer.clear();
		self.checksum_buffer.clear();
		self.running_checksum = 0;
		self.char_count = 0;
		self.stats.sentences_started += 1;
	}

	fn abandon(&mut self) -> SentenceEvent {
		self.state = State::Idle;
		self.stats.truncated_sentences += 1;
		debug!("Abandoning truncated sentence after {} characters", self.char_count);
		SentenceEvent::Truncated
	}

	fn commit_field(&mut self) {
		let committed = std::mem::replace(&mut self.field_buffer, String::new());
		self.fields.push(committed);
	}

	pub fn feed(&mut self, c:char, fix:&mut CurrentFix) -> SentenceEvent {
		if !(c == '\n' || (' '..='~').contains(&c)) { return SentenceEvent::Pending; }

		if c == '$' {
			let interrupted:bool = self.state != State::Idle;
			self.start_sentence();
			return if interrupted {
				self.stats.truncated_sentences += 1;
				SentenceEvent::Truncated
			} else { SentenceEvent::Pending };
		}

		if self.state == State::Idle { return SentenceEvent::Pending; }

		// A line ending before the checksum has been read means the sentence was cut short
		if c == '\n' { return self.abandon(); }

		self.char_count += 1;
		if self.char_count > MAX_SENTENCE_LENGTH { return self.abandon(); }

		match self.state {
			State::Fields => {
				match c {
					'*' => {
						self.commit_field();
						self.state = State::Checksum;
					},
					',' => {
						self.running_checksum ^= c as u8;
						self.commit_field();
					},
					_ => {
						self.running_checksum ^= c as u8;
						self.field_buffer.push(c);
					}
				}
				SentenceEvent::Pending
			},
			State::Checksum => {
				self.checksum_buffer.push(c);
				if self.checksum_buffer.len() < CHECKSUM_DIGITS { return SentenceEvent::Pending; }

				self.state = State::Idle;
				self.finish(fix)
			},
			State::Idle => SentenceEvent::Pending,
		}
	}

	pub fn feed_str(&mut self, s:&str, fix:&mut CurrentFix) -> Vec<SentenceEvent> {
		s.chars().map(|c| self.feed(c, fix)).filter(|e| *e != SentenceEvent::Pending).collect()
	}

	fn finish(&mut self, fix:&mut CurrentFix) -> SentenceEvent {
		match checksum::parse(&self.checksum_buffer) {
			Some(expected) if expected == self.running_checksum => (),
			_ => {
				self.stats.checksum_failures += 1;
				debug!("Checksum mismatch on {:?}: computed {:02X}, transmitted {:?}",
					self.fields.get(0), self.running_checksum, self.checksum_buffer);
				return SentenceEvent::ChecksumMismatch;
			}
		}

		self.stats.clean_sentences += 1;

		let kind = match self.fields.get(0).and_then(|address| SentenceKind::identify(address)) {
			Some(kind) => kind,
			None => return SentenceEvent::Ignored,
		};

		match kind.apply(&self.fields, fix) {
			Ok(()) => {
				self.stats.parsed_sentences += 1;
				SentenceEvent::Applied(kind)
			},
			Err(e) => {
				debug!("Dropping {:?} sentence: {}", kind, e);
				SentenceEvent::Unparsed(kind)
			}
		}
	}

}

impl Default for SentenceDecoder {
	fn default() -> Self { Self::new() }
}
