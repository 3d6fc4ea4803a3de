
/// XOR of every byte between the '$' and the '*'
pub fn compute(body:&str) -> u8 {
	body.bytes().fold(0u8, |acc, b| acc ^ b)
}

/// Parses the two hex digits that follow the '*'; NMEA uses upper case, but some loggers don't
pub fn parse(digits:&str) -> Option<u8> {
	if digits.len() != 2 { return None; }
	u8::from_str_radix(digits, 16).ok()
}

/// Wraps a sentence body (everything between '$' and '*') into a complete sentence
pub fn encode(body:&str) -> String {
	format!("${}*{:02X}", body, compute(body))
}
