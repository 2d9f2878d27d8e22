use std::collections::HashMap;

use seek_domain::{Record, RecordId};

use super::{
	MatchType, SearchExplain, SearchItem,
	ranking::{Scored, cmp_f32_desc},
};

#[derive(Debug)]
struct FusedCandidate<'r> {
	record: &'r Record,
	keyword: Option<f32>,
	semantic: Option<f32>,
	score: f32,
}
impl FusedCandidate<'_> {
	fn match_type(&self) -> MatchType {
		let keyword = self.keyword.unwrap_or(0.0);
		let semantic = self.semantic.unwrap_or(0.0);

		if keyword > 0.0 && semantic > 0.0 {
			MatchType::Both
		} else if keyword > 0.0 {
			MatchType::Keyword
		} else {
			MatchType::Semantic
		}
	}
}

/// Blends keyword and semantic scores as `alpha * keyword + (1 - alpha) * semantic`.
///
/// A missing side counts as zero. A record only reachable through a side whose weight is zero
/// is dropped, so `alpha = 1` ranks exactly like keyword search and `alpha = 0` exactly like
/// semantic search. `alpha` must already be clamped to `[0, 1]`.
pub(crate) fn fuse<'r>(
	keyword: &[Scored<'r>],
	semantic: &[Scored<'r>],
	alpha: f32,
	top_k: usize,
) -> Vec<SearchItem> {
	let mut by_id: HashMap<RecordId, FusedCandidate<'r>> = HashMap::new();

	for item in keyword {
		by_id
			.entry(item.record.id)
			.or_insert_with(|| FusedCandidate {
				record: item.record,
				keyword: None,
				semantic: None,
				score: 0.0,
			})
			.keyword = Some(item.score);
	}
	for item in semantic {
		by_id
			.entry(item.record.id)
			.or_insert_with(|| FusedCandidate {
				record: item.record,
				keyword: None,
				semantic: None,
				score: 0.0,
			})
			.semantic = Some(item.score);
	}

	let mut fused: Vec<FusedCandidate<'r>> = by_id
		.into_values()
		.filter(|candidate| {
			(candidate.keyword.is_some() && alpha > 0.0)
				|| (candidate.semantic.is_some() && alpha < 1.0)
		})
		.map(|mut candidate| {
			candidate.score = fused_score(
				alpha,
				candidate.keyword.unwrap_or(0.0),
				candidate.semantic.unwrap_or(0.0),
			);

			candidate
		})
		.collect();

	fused.sort_by(|left, right| {
		cmp_f32_desc(left.score, right.score).then_with(|| left.record.id.cmp(&right.record.id))
	});
	fused.truncate(top_k);

	fused
		.into_iter()
		.map(|candidate| SearchItem {
			match_type: candidate.match_type(),
			record: candidate.record.clone(),
			score: candidate.score,
			explain: SearchExplain {
				keyword_score: candidate.keyword,
				semantic_score: candidate.semantic,
			},
		})
		.collect()
}

pub(crate) fn fused_score(alpha: f32, keyword: f32, semantic: f32) -> f32 {
	alpha * keyword + (1.0 - alpha) * semantic
}
