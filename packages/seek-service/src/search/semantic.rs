use std::time::Duration;

use seek_domain::{EmbeddingMap, Record, vector};

use super::{
	DegradeReason,
	ranking::{self, Scored},
};
use crate::{EmbeddingProvider, EmbeddingStore};

/// Result of a semantic pass. `Degraded` means the pass could not run at all, which callers
/// must not confuse with a pass that ran and found nothing above the threshold.
pub(crate) enum SemanticOutcome<'r> {
	Matched(Vec<Scored<'r>>),
	Degraded(DegradeReason),
}

pub(crate) struct SemanticArgs<'a, 'r> {
	pub(crate) candidates: &'a [&'r Record],
	pub(crate) query: &'a str,
	pub(crate) provider: &'a dyn EmbeddingProvider,
	pub(crate) store: &'a dyn EmbeddingStore,
	pub(crate) top_k: usize,
	pub(crate) threshold: f32,
	pub(crate) timeout: Duration,
}

pub(crate) async fn match_semantic<'r>(args: SemanticArgs<'_, 'r>) -> SemanticOutcome<'r> {
	let query = args.query.trim();

	if query.is_empty() {
		return SemanticOutcome::Matched(Vec::new());
	}

	let query_vector = match embed_query(args.provider, query, args.timeout).await {
		Ok(vector) => vector,
		Err(reason) => return SemanticOutcome::Degraded(reason),
	};
	let embeddings = match args.store.all_embeddings().await {
		Ok(embeddings) if embeddings.is_empty() =>
			return SemanticOutcome::Degraded(DegradeReason::EmptyStore),
		Ok(embeddings) => embeddings,
		Err(err) =>
			return SemanticOutcome::Degraded(DegradeReason::StoreFailed {
				message: err.to_string(),
			}),
	};

	SemanticOutcome::Matched(rank_by_similarity(
		args.candidates,
		query_vector.as_slice(),
		&embeddings,
		args.top_k,
		args.threshold,
	))
}

async fn embed_query(
	provider: &dyn EmbeddingProvider,
	query: &str,
	timeout: Duration,
) -> Result<Vec<f32>, DegradeReason> {
	if !provider.is_ready() {
		return Err(DegradeReason::ProviderNotReady);
	}

	match tokio::time::timeout(timeout, provider.embed(query)).await {
		Err(_) => Err(DegradeReason::ProviderTimedOut { timeout_ms: timeout.as_millis() as u64 }),
		Ok(Err(err)) => Err(DegradeReason::ProviderFailed { message: err.to_string() }),
		Ok(Ok(vector)) if vector.is_empty() => Err(DegradeReason::ProviderFailed {
			message: "Embedding provider returned an empty vector.".to_string(),
		}),
		Ok(Ok(vector)) => Ok(vector),
	}
}

/// Cosine-ranks the candidates that have a stored embedding.
///
/// Vectors stored for records outside `candidates` are never looked at.
pub(crate) fn rank_by_similarity<'r>(
	candidates: &[&'r Record],
	query: &[f32],
	embeddings: &EmbeddingMap,
	top_k: usize,
	threshold: f32,
) -> Vec<Scored<'r>> {
	let query_norm = vector::norm(query);
	let mut mismatched = 0_usize;
	let mut out = Vec::new();

	for &record in candidates {
		let Some(stored) = embeddings.get(&record.id) else { continue };
		let Some(score) = vector::cosine_similarity_with_norm(query, query_norm, stored) else {
			mismatched += 1;

			continue;
		};

		if score.is_nan() || score < threshold {
			continue;
		}

		out.push(Scored { record, score });
	}

	if mismatched > 0 {
		tracing::warn!(
			mismatched,
			query_dimensions = query.len(),
			"Skipped stored embeddings with a different dimension than the query."
		);
	}

	ranking::top_k_scored(out, top_k)
}

#[cfg(test)]
mod tests {
	use super::*;
	use seek_domain::RecordId;

	fn embeddings(entries: Vec<(i64, Vec<f32>)>) -> EmbeddingMap {
		entries.into_iter().map(|(id, vector)| (RecordId(id), vector)).collect()
	}

	#[test]
	fn skips_records_without_embeddings_and_below_threshold() {
		let a = Record::new(1, "a", Vec::<String>::new(), 0);
		let b = Record::new(2, "b", Vec::<String>::new(), 0);
		let c = Record::new(3, "c", Vec::<String>::new(), 0);
		let map = embeddings(vec![(1, vec![1.0, 0.0]), (2, vec![0.0, 1.0])]);
		let out = rank_by_similarity(&[&a, &b, &c], &[1.0, 0.1], &map, 10, 0.3);
		let ids: Vec<i64> = out.iter().map(|item| item.record.id.0).collect();

		assert_eq!(ids, vec![1]);
	}

	#[test]
	fn ignores_vectors_outside_the_candidate_set() {
		let a = Record::new(1, "a", Vec::<String>::new(), 0);
		let map = embeddings(vec![(1, vec![0.5, 0.5]), (9, vec![1.0, 0.0])]);
		let out = rank_by_similarity(&[&a], &[1.0, 0.0], &map, 10, 0.0);

		assert_eq!(out.len(), 1);
		assert_eq!(out[0].record.id, RecordId(1));
	}

	#[test]
	fn skips_mismatched_dimensions() {
		let a = Record::new(1, "a", Vec::<String>::new(), 0);
		let b = Record::new(2, "b", Vec::<String>::new(), 0);
		let map = embeddings(vec![(1, vec![1.0, 0.0, 0.0]), (2, vec![1.0, 0.0])]);
		let out = rank_by_similarity(&[&a, &b], &[1.0, 0.0], &map, 10, 0.3);

		assert_eq!(out.len(), 1);
		assert_eq!(out[0].record.id, RecordId(2));
	}

	#[test]
	fn zero_query_vector_scores_zero() {
		let a = Record::new(1, "a", Vec::<String>::new(), 0);
		let map = embeddings(vec![(1, vec![1.0, 0.0])]);

		assert!(rank_by_similarity(&[&a], &[0.0, 0.0], &map, 10, 0.3).is_empty());

		let kept = rank_by_similarity(&[&a], &[0.0, 0.0], &map, 10, 0.0);

		assert_eq!(kept[0].score, 0.0);
	}

	#[test]
	fn truncates_to_top_k_with_id_tie_break() {
		let records: Vec<Record> =
			(1..=4).map(|id| Record::new(id, "x", Vec::<String>::new(), 0)).collect();
		let refs: Vec<&Record> = records.iter().collect();
		let map = embeddings(vec![
			(1, vec![1.0, 0.0]),
			(2, vec![1.0, 0.0]),
			(3, vec![0.6, 0.8]),
			(4, vec![1.0, 0.0]),
		]);
		let out = rank_by_similarity(&refs, &[1.0, 0.0], &map, 2, 0.3);
		let ids: Vec<i64> = out.iter().map(|item| item.record.id.0).collect();

		assert_eq!(ids, vec![1, 2]);
	}
}
