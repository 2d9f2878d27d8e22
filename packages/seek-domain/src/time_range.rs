use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime, UtcOffset, Weekday};

/// Abstract time window a search is restricted to.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeRange {
	#[default]
	All,
	Today,
	ThisWeek,
	ThisMonth,
	ThisYear,
	/// Passed through as given. An inverted range matches nothing.
	Custom { start_ms: i64, end_ms: i64 },
}
impl TimeRange {
	pub fn resolve(self, now: OffsetDateTime, calendar: &Calendar) -> TimeWindow {
		let now_ms = unix_millis(now);
		let start_date = match self {
			Self::All => return TimeWindow::Unrestricted,
			Self::Custom { start_ms, end_ms } =>
				return TimeWindow::Between(Interval { start_ms, end_ms }),
			Self::Today => local_date(now, calendar),
			Self::ThisWeek => {
				let today = local_date(now, calendar);

				days_before(today, i64::from(days_since(today.weekday(), calendar.week_start)))
			},
			Self::ThisMonth => {
				let today = local_date(now, calendar);

				days_before(today, i64::from(today.day()) - 1)
			},
			Self::ThisYear => {
				let today = local_date(now, calendar);

				days_before(today, i64::from(today.ordinal()) - 1)
			},
		};
		let start_ms = unix_millis(start_date.midnight().assume_offset(calendar.offset));

		TimeWindow::Between(Interval { start_ms, end_ms: now_ms })
	}

	pub fn label(&self) -> &'static str {
		match self {
			Self::All => "all",
			Self::Today => "today",
			Self::ThisWeek => "this_week",
			Self::ThisMonth => "this_month",
			Self::ThisYear => "this_year",
			Self::Custom { .. } => "custom",
		}
	}
}

/// Inclusive millisecond interval.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Interval {
	pub start_ms: i64,
	pub end_ms: i64,
}
impl Interval {
	pub fn contains(&self, ts_ms: i64) -> bool {
		self.start_ms <= ts_ms && ts_ms <= self.end_ms
	}

	pub fn is_inverted(&self) -> bool {
		self.start_ms > self.end_ms
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimeWindow {
	Unrestricted,
	Between(Interval),
}
impl TimeWindow {
	pub fn contains(&self, ts_ms: i64) -> bool {
		match self {
			Self::Unrestricted => true,
			Self::Between(interval) => interval.contains(ts_ms),
		}
	}
}

/// Calendar rules for period boundaries. Never derived from the host locale.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Calendar {
	pub offset: UtcOffset,
	pub week_start: Weekday,
}
impl Calendar {
	pub fn from_config(cfg: &seek_config::Calendar) -> Option<Self> {
		let offset = UtcOffset::from_whole_seconds(cfg.utc_offset_seconds()?).ok()?;
		let week_start = parse_weekday(cfg.week_start.as_str())?;

		Some(Self { offset, week_start })
	}
}
impl Default for Calendar {
	fn default() -> Self {
		Self { offset: UtcOffset::UTC, week_start: Weekday::Monday }
	}
}

pub fn unix_millis(ts: OffsetDateTime) -> i64 {
	(ts.unix_timestamp_nanos() / 1_000_000) as i64
}

pub fn parse_weekday(raw: &str) -> Option<Weekday> {
	let weekday = match raw.trim().to_ascii_lowercase().as_str() {
		"monday" => Weekday::Monday,
		"tuesday" => Weekday::Tuesday,
		"wednesday" => Weekday::Wednesday,
		"thursday" => Weekday::Thursday,
		"friday" => Weekday::Friday,
		"saturday" => Weekday::Saturday,
		"sunday" => Weekday::Sunday,
		_ => return None,
	};

	Some(weekday)
}

fn local_date(now: OffsetDateTime, calendar: &Calendar) -> Date {
	now.checked_to_offset(calendar.offset).map_or_else(|| now.date(), |local| local.date())
}

/// Clamps to the first representable date instead of overflowing.
fn days_before(date: Date, days: i64) -> Date {
	date.checked_sub(Duration::days(days)).unwrap_or(Date::MIN)
}

fn days_since(day: Weekday, week_start: Weekday) -> u8 {
	(day.number_days_from_monday() + 7 - week_start.number_days_from_monday()) % 7
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn days_since_wraps_around_week_start() {
		assert_eq!(days_since(Weekday::Monday, Weekday::Monday), 0);
		assert_eq!(days_since(Weekday::Sunday, Weekday::Monday), 6);
		assert_eq!(days_since(Weekday::Monday, Weekday::Sunday), 1);
		assert_eq!(days_since(Weekday::Saturday, Weekday::Saturday), 0);
	}

	#[test]
	fn parses_weekday_names() {
		assert_eq!(parse_weekday("Sunday"), Some(Weekday::Sunday));
		assert_eq!(parse_weekday(" monday "), Some(Weekday::Monday));
		assert_eq!(parse_weekday("mon"), None);
	}
}
