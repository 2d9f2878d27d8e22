//! In-memory collaborators for exercising `SeekService` without a database or a network.

use std::{
	collections::HashMap,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};

use seek_config::Config;
use seek_domain::{EmbeddingMap, Record, RecordId};
use seek_service::{
	BoxFuture, EmbeddingProvider, EmbeddingStore, Error, Providers, RecordSource, Result,
	SeekService,
};

/// Defaults matching a freshly installed app: hybrid, alpha 0.3, top-K 50, threshold 0.3.
pub fn test_config() -> Config {
	Config::default()
}

pub fn service_with(
	cfg: Config,
	records: Vec<Record>,
	embeddings: EmbeddingMap,
	embedding: Arc<dyn EmbeddingProvider>,
) -> SeekService {
	let providers = Providers::new(
		Arc::new(StaticRecords::new(records)),
		Arc::new(StaticEmbeddings::new(embeddings)),
		embedding,
	);

	SeekService::new(cfg, providers)
}

pub fn embedding_map<I>(entries: I) -> EmbeddingMap
where
	I: IntoIterator<Item = (i64, Vec<f32>)>,
{
	entries.into_iter().map(|(id, vector)| (RecordId(id), vector)).collect()
}

pub struct StaticRecords {
	records: Vec<Record>,
}
impl StaticRecords {
	pub fn new(records: Vec<Record>) -> Self {
		Self { records }
	}
}
impl RecordSource for StaticRecords {
	fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<Record>>> {
		let records = self.records.clone();

		Box::pin(async move { Ok(records) })
	}
}

pub struct FailingRecords;
impl RecordSource for FailingRecords {
	fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<Record>>> {
		Box::pin(async { Err(Error::Storage { message: "Record table is locked.".to_string() }) })
	}
}

pub struct StaticEmbeddings {
	embeddings: EmbeddingMap,
}
impl StaticEmbeddings {
	pub fn new(embeddings: EmbeddingMap) -> Self {
		Self { embeddings }
	}
}
impl EmbeddingStore for StaticEmbeddings {
	fn all_embeddings(&self) -> BoxFuture<'_, Result<EmbeddingMap>> {
		let embeddings = self.embeddings.clone();

		Box::pin(async move { Ok(embeddings) })
	}
}

pub struct FailingEmbeddings;
impl EmbeddingStore for FailingEmbeddings {
	fn all_embeddings(&self) -> BoxFuture<'_, Result<EmbeddingMap>> {
		Box::pin(async {
			Err(Error::Storage { message: "Embedding table is unreadable.".to_string() })
		})
	}
}

/// Answers from a fixed text-to-vector table. Unknown texts are provider errors.
pub struct TableEmbedding {
	table: HashMap<String, Vec<f32>>,
	pub calls: Arc<AtomicUsize>,
}
impl TableEmbedding {
	pub fn new<I, S>(entries: I) -> Self
	where
		I: IntoIterator<Item = (S, Vec<f32>)>,
		S: Into<String>,
	{
		Self {
			table: entries.into_iter().map(|(text, vector)| (text.into(), vector)).collect(),
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl EmbeddingProvider for TableEmbedding {
	fn is_ready(&self) -> bool {
		true
	}

	fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let vector = self.table.get(text).cloned();

		Box::pin(async move {
			vector.ok_or_else(|| Error::Provider { message: format!("No vector for {text:?}.") })
		})
	}
}

/// A provider whose model never finished loading.
pub struct UnavailableEmbedding;
impl EmbeddingProvider for UnavailableEmbedding {
	fn is_ready(&self) -> bool {
		false
	}

	fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(async {
			Err(Error::Provider { message: "Embedding model is not loaded.".to_string() })
		})
	}
}

/// Ready, but never answers.
pub struct PendingEmbedding;
impl EmbeddingProvider for PendingEmbedding {
	fn is_ready(&self) -> bool {
		true
	}

	fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(std::future::pending())
	}
}
