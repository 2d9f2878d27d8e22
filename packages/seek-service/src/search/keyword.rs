use seek_domain::Record;

use super::ranking::{self, Scored};

const SCORE_DESCRIPTION_EXACT: f32 = 1.0;
const SCORE_TAG_EXACT: f32 = 0.9;
const SCORE_DESCRIPTION_AND_TAG: f32 = 0.8;
const SCORE_DESCRIPTION_ONLY: f32 = 0.7;
const SCORE_TAG_ONLY: f32 = 0.6;
/// Neutral score for a blank query, where every candidate passes.
pub(crate) const SCORE_UNCONSTRAINED: f32 = 1.0;

/// Scores candidates by case-insensitive containment in description and tags.
///
/// Non-matching candidates are left out. Output is ranked by score, then id.
pub(crate) fn match_keyword<'a>(candidates: &[&'a Record], query: &str) -> Vec<Scored<'a>> {
	let query = query.trim();

	if query.is_empty() {
		let mut out: Vec<Scored<'a>> = candidates
			.iter()
			.map(|&record| Scored { record, score: SCORE_UNCONSTRAINED })
			.collect();

		ranking::sort_scored(&mut out);

		return out;
	}

	let needle = query.to_lowercase();
	let mut out: Vec<Scored<'a>> = candidates
		.iter()
		.filter_map(|&record| {
			keyword_score(record, needle.as_str()).map(|score| Scored { record, score })
		})
		.collect();

	ranking::sort_scored(&mut out);

	out
}

/// `needle` must already be lowercase.
pub(crate) fn keyword_score(record: &Record, needle: &str) -> Option<f32> {
	let description = record.description.to_lowercase();
	let tags: Vec<String> = record.tags.iter().map(|tag| tag.to_lowercase()).collect();
	let description_match = description.contains(needle);
	let tag_match = tags.iter().any(|tag| tag.contains(needle));

	if !description_match && !tag_match {
		return None;
	}

	let score = if description == needle {
		SCORE_DESCRIPTION_EXACT
	} else if tags.iter().any(|tag| tag == needle) {
		SCORE_TAG_EXACT
	} else if description_match && tag_match {
		SCORE_DESCRIPTION_AND_TAG
	} else if description_match {
		SCORE_DESCRIPTION_ONLY
	} else {
		SCORE_TAG_ONLY
	};

	Some(score)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(description: &str, tags: &[&str]) -> Record {
		Record::new(1, description, tags.iter().copied(), 0)
	}

	#[test]
	fn scoring_precedence() {
		assert_eq!(keyword_score(&record("Cat", &["pet"]), "cat"), Some(1.0));
		assert_eq!(keyword_score(&record("a cat", &["Cat"]), "cat"), Some(0.9));
		assert_eq!(keyword_score(&record("a cat", &["cats"]), "cat"), Some(0.8));
		assert_eq!(keyword_score(&record("a cat", &["pet"]), "cat"), Some(0.7));
		assert_eq!(keyword_score(&record("a dog", &["catalog"]), "cat"), Some(0.6));
		assert_eq!(keyword_score(&record("a dog", &["pet"]), "cat"), None);
	}

	#[test]
	fn exact_description_beats_exact_tag() {
		assert_eq!(keyword_score(&record("receipt", &["receipt"]), "receipt"), Some(1.0));
	}

	#[test]
	fn empty_description_can_still_match_tags() {
		assert_eq!(keyword_score(&record("", &["Screenshot"]), "screen"), Some(0.6));
	}

	#[test]
	fn blank_query_passes_everything() {
		let a = Record::new(2, "x", Vec::<String>::new(), 0);
		let b = Record::new(1, "y", Vec::<String>::new(), 0);
		let out = match_keyword(&[&a, &b], "   ");
		let ids: Vec<i64> = out.iter().map(|item| item.record.id.0).collect();

		assert_eq!(ids, vec![1, 2]);
		assert!(out.iter().all(|item| item.score == SCORE_UNCONSTRAINED));
	}
}
