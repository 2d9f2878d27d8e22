mod fusion;
mod keyword;
mod ranking;
mod semantic;

use std::{
	cmp::Reverse,
	fmt::{Display, Formatter},
	time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use seek_domain::{Record, TimeRange, TimeWindow, filter};

use self::{
	ranking::Scored,
	semantic::{SemanticArgs, SemanticOutcome},
};
use crate::{Error, Result, SeekService};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
	Keyword,
	Semantic,
	Hybrid,
}
impl SearchMode {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"keyword" => Some(Self::Keyword),
			"semantic" => Some(Self::Semantic),
			"hybrid" => Some(Self::Hybrid),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Keyword => "keyword",
			Self::Semantic => "semantic",
			Self::Hybrid => "hybrid",
		}
	}
}
impl Display for SearchMode {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Which retrieval path produced a result.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
	Keyword,
	Semantic,
	Both,
	/// Listed by the time and tag filters alone, without a query.
	Filter,
}

/// Why the semantic pass did not run. Searches still succeed with keyword results.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DegradeReason {
	#[error("Embedding provider is not ready.")]
	ProviderNotReady,
	#[error("Embedding provider failed: {message}")]
	ProviderFailed { message: String },
	#[error("Embedding provider did not answer within {timeout_ms} ms.")]
	ProviderTimedOut { timeout_ms: u64 },
	#[error("No record embeddings are stored.")]
	EmptyStore,
	#[error("Embedding store failed: {message}")]
	StoreFailed { message: String },
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchRequest {
	pub query: String,
	/// Falls back to `search.default_mode`.
	pub mode: Option<SearchMode>,
	pub time_range: TimeRange,
	/// A record passes when it carries at least one of these tags. Empty means no constraint.
	pub tags: Vec<String>,
	/// Keyword weight for hybrid fusion. Clamped to `[0, 1]`.
	pub alpha: Option<f32>,
	/// Result cap, falling back to `search.default_top_k`. It applies to every mode, keyword
	/// results included, so hybrid with `alpha = 1` ranks exactly like keyword mode. A blank
	/// query without tags lists every record in the time range and ignores it.
	pub top_k: Option<u32>,
}

/// Component scores behind `SearchItem::score`. A side is `None` when it did not match.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SearchExplain {
	pub keyword_score: Option<f32>,
	pub semantic_score: Option<f32>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchItem {
	pub record: Record,
	pub score: f32,
	pub match_type: MatchType,
	pub explain: SearchExplain,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchResponse {
	/// The mode that was requested, even when the semantic side degraded.
	pub mode: SearchMode,
	pub items: Vec<SearchItem>,
	pub degradation: Option<DegradeReason>,
}

struct SearchParams {
	mode: SearchMode,
	alpha: f32,
	top_k: usize,
}

impl SeekService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		self.search_at(req, OffsetDateTime::now_utc()).await
	}

	/// Runs a search with `now` as the reference instant for relative time ranges.
	pub async fn search_at(
		&self,
		req: SearchRequest,
		now: OffsetDateTime,
	) -> Result<SearchResponse> {
		let started = Instant::now();
		let params = self.resolve_params(&req);
		let window = req.time_range.resolve(now, &self.calendar);

		if let TimeWindow::Between(interval) = window
			&& interval.is_inverted()
		{
			tracing::warn!(
				start_ms = interval.start_ms,
				end_ms = interval.end_ms,
				"Custom time range starts after it ends. No record can match."
			);
		}

		let records = self.providers.records.fetch_all().await.map_err(|err| match err {
			Error::Storage { .. } => err,
			other => Error::Storage { message: other.to_string() },
		})?;
		let tags = filter::normalize_filter_tags(&req.tags);
		let candidates = filter::filter_records(&records, &window, &tags);
		let query = req.query.trim();
		let (items, degradation) = if query.is_empty() && tags.is_empty() {
			(list_filtered(&candidates), None)
		} else {
			self.dispatch(&params, &candidates, query).await
		};

		if let Some(reason) = degradation.as_ref() {
			tracing::warn!(
				mode = params.mode.as_str(),
				reason = %reason,
				"Semantic search degraded. Serving keyword results."
			);
		}

		tracing::info!(
			mode = params.mode.as_str(),
			time_range = req.time_range.label(),
			candidates = candidates.len(),
			results = items.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Search completed."
		);

		Ok(SearchResponse { mode: params.mode, items, degradation })
	}

	fn resolve_params(&self, req: &SearchRequest) -> SearchParams {
		let search = &self.cfg.search;
		let mode = req.mode.unwrap_or_else(|| {
			SearchMode::parse(search.default_mode.as_str()).unwrap_or(SearchMode::Hybrid)
		});
		let default_alpha = search.default_alpha.clamp(0.0, 1.0);
		let alpha = match req.alpha {
			Some(alpha) if alpha.is_finite() => alpha.clamp(0.0, 1.0),
			Some(alpha) => {
				tracing::warn!(alpha, "Ignoring non-finite alpha. Using the configured default.");

				default_alpha
			},
			None => default_alpha,
		};
		let top_k = req.top_k.unwrap_or(search.default_top_k) as usize;

		SearchParams { mode, alpha, top_k }
	}

	async fn dispatch(
		&self,
		params: &SearchParams,
		candidates: &[&Record],
		query: &str,
	) -> (Vec<SearchItem>, Option<DegradeReason>) {
		match params.mode {
			SearchMode::Keyword => (keyword_items(candidates, query, params.top_k), None),
			SearchMode::Semantic => {
				let outcome = self.semantic_pass(candidates, query, params.top_k).await;

				match outcome {
					SemanticOutcome::Matched(hits) =>
						(single_side_items(hits, MatchType::Semantic), None),
					SemanticOutcome::Degraded(reason) =>
						(keyword_items(candidates, query, params.top_k), Some(reason)),
				}
			},
			SearchMode::Hybrid => {
				let (keyword_hits, semantic_outcome) = tokio::join!(
					async { keyword::match_keyword(candidates, query) },
					self.semantic_pass(candidates, query, params.top_k),
				);

				match semantic_outcome {
					SemanticOutcome::Matched(semantic_hits) => (
						fusion::fuse(&keyword_hits, &semantic_hits, params.alpha, params.top_k),
						None,
					),
					SemanticOutcome::Degraded(reason) => {
						let mut keyword_hits = keyword_hits;

						keyword_hits.truncate(params.top_k);

						(single_side_items(keyword_hits, MatchType::Keyword), Some(reason))
					},
				}
			},
		}
	}

	async fn semantic_pass<'r>(
		&self,
		candidates: &[&'r Record],
		query: &str,
		top_k: usize,
	) -> SemanticOutcome<'r> {
		semantic::match_semantic(SemanticArgs {
			candidates,
			query,
			provider: self.providers.embedding.as_ref(),
			store: self.providers.embeddings.as_ref(),
			top_k,
			threshold: self.cfg.search.semantic_threshold,
			timeout: Duration::from_millis(self.cfg.search.embedding_timeout_ms),
		})
		.await
	}
}

fn keyword_items(candidates: &[&Record], query: &str, top_k: usize) -> Vec<SearchItem> {
	let mut hits = keyword::match_keyword(candidates, query);

	hits.truncate(top_k);

	single_side_items(hits, MatchType::Keyword)
}

fn single_side_items(hits: Vec<Scored<'_>>, match_type: MatchType) -> Vec<SearchItem> {
	hits.into_iter()
		.map(|hit| {
			let explain = match match_type {
				MatchType::Semantic =>
					SearchExplain { keyword_score: None, semantic_score: Some(hit.score) },
				_ => SearchExplain { keyword_score: Some(hit.score), semantic_score: None },
			};

			SearchItem { record: hit.record.clone(), score: hit.score, match_type, explain }
		})
		.collect()
}

/// Newest first, then id. Every candidate is kept.
fn list_filtered(candidates: &[&Record]) -> Vec<SearchItem> {
	let mut listed = candidates.to_vec();

	listed.sort_by_key(|record| (Reverse(record.created_at_ms), record.id));

	listed
		.into_iter()
		.map(|record| SearchItem {
			record: record.clone(),
			score: keyword::SCORE_UNCONSTRAINED,
			match_type: MatchType::Filter,
			explain: SearchExplain::default(),
		})
		.collect()
}
