use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub calendar: Calendar,
	#[serde(default)]
	pub providers: Providers,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// One of "keyword", "semantic", or "hybrid".
	pub default_mode: String,
	/// Keyword weight used by hybrid fusion when a request does not carry one.
	pub default_alpha: f32,
	pub default_top_k: u32,
	/// Minimum cosine similarity a candidate needs to survive the semantic pass.
	pub semantic_threshold: f32,
	/// Upper bound on one query-embedding call before semantic search degrades.
	pub embedding_timeout_ms: u64,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_mode: "hybrid".to_string(),
			default_alpha: 0.3,
			default_top_k: 50,
			semantic_threshold: 0.3,
			embedding_timeout_ms: 5_000,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Calendar {
	/// Fixed offset used for day, week, month, and year boundaries, e.g. "+08:00".
	pub utc_offset: String,
	/// Lowercase English weekday name, e.g. "monday".
	pub week_start: String,
}
impl Calendar {
	pub fn utc_offset_seconds(&self) -> Option<i32> {
		parse_utc_offset(self.utc_offset.as_str())
	}
}
impl Default for Calendar {
	fn default() -> Self {
		Self { utc_offset: "+00:00".to_string(), week_start: "monday".to_string() }
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct Providers {
	/// Without an embedding provider only keyword retrieval is available.
	pub embedding: Option<EmbeddingProviderConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

pub(crate) const WEEKDAYS: [&str; 7] =
	["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];

fn parse_utc_offset(raw: &str) -> Option<i32> {
	let raw = raw.trim();

	if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
		return Some(0);
	}

	let (sign, rest) = match raw.as_bytes().first()? {
		b'+' => (1, &raw[1..]),
		b'-' => (-1, &raw[1..]),
		_ => return None,
	};
	let (hours, minutes) = rest.split_once(':')?;

	if hours.len() != 2 || minutes.len() != 2 {
		return None;
	}
	if !hours.bytes().chain(minutes.bytes()).all(|byte| byte.is_ascii_digit()) {
		return None;
	}

	let hours: i32 = hours.parse().ok()?;
	let minutes: i32 = minutes.parse().ok()?;

	if hours > 23 || minutes > 59 {
		return None;
	}

	Some(sign * (hours * 3_600 + minutes * 60))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_signed_offsets() {
		assert_eq!(parse_utc_offset("+08:00"), Some(28_800));
		assert_eq!(parse_utc_offset("-05:30"), Some(-19_800));
		assert_eq!(parse_utc_offset("UTC"), Some(0));
	}

	#[test]
	fn rejects_malformed_offsets() {
		assert_eq!(parse_utc_offset("08:00"), None);
		assert_eq!(parse_utc_offset("+8:00"), None);
		assert_eq!(parse_utc_offset("+24:00"), None);
		assert_eq!(parse_utc_offset("+-5:30"), None);
		assert_eq!(parse_utc_offset("-+05:00"), None);
		assert_eq!(parse_utc_offset("+05:-3"), None);
		assert_eq!(parse_utc_offset(""), None);
	}
}
