use std::collections::BTreeSet;

use crate::{Record, TimeWindow};

/// Narrows a snapshot to the records inside `window` that share at least one of `tags`.
///
/// An empty tag set disables the tag constraint. Tags compare by exact string equality.
/// The snapshot order is kept.
pub fn filter_records<'a>(
	records: &'a [Record],
	window: &TimeWindow,
	tags: &BTreeSet<String>,
) -> Vec<&'a Record> {
	records
		.iter()
		.filter(|record| window.contains(record.created_at_ms))
		.filter(|record| tags.is_empty() || record.has_any_tag(tags))
		.collect()
}

/// Normalizes caller-supplied filter tags: trims whitespace and drops blanks.
pub fn normalize_filter_tags<I, S>(tags: I) -> BTreeSet<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	tags.into_iter()
		.filter_map(|tag| {
			let trimmed = tag.as_ref().trim();

			(!trimmed.is_empty()).then(|| trimmed.to_string())
		})
		.collect()
}
