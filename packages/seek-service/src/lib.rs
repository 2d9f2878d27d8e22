pub mod search;

mod error;

pub use error::{Error, Result};
pub use search::{
	DegradeReason, MatchType, SearchExplain, SearchItem, SearchMode, SearchRequest,
	SearchResponse,
};

use std::{future::Future, pin::Pin, sync::Arc};

use seek_config::{Config, EmbeddingProviderConfig};
use seek_domain::{Calendar, EmbeddingMap, Record};
use seek_providers::EmbeddingClient;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Point-in-time snapshot of every analyzed record.
pub trait RecordSource
where
	Self: Send + Sync,
{
	fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<Record>>>;
}

/// Turns query text into a vector comparable with the stored record embeddings.
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn is_ready(&self) -> bool;

	fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>>;
}

pub trait EmbeddingStore
where
	Self: Send + Sync,
{
	fn all_embeddings(&self) -> BoxFuture<'_, Result<EmbeddingMap>>;
}

#[derive(Clone)]
pub struct Providers {
	pub records: Arc<dyn RecordSource>,
	pub embeddings: Arc<dyn EmbeddingStore>,
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(
		records: Arc<dyn RecordSource>,
		embeddings: Arc<dyn EmbeddingStore>,
		embedding: Arc<dyn EmbeddingProvider>,
	) -> Self {
		Self { records, embeddings, embedding }
	}

	/// Uses the remote embedding endpoint from `[providers.embedding]`, if any.
	pub fn with_default_embedding(
		cfg: &Config,
		records: Arc<dyn RecordSource>,
		embeddings: Arc<dyn EmbeddingStore>,
	) -> Result<Self> {
		let embedding = Arc::new(DefaultEmbedding::new(cfg.providers.embedding.as_ref())?);

		Ok(Self::new(records, embeddings, embedding))
	}
}

/// Remote embedding endpoint. Never ready when no endpoint is configured.
pub struct DefaultEmbedding {
	client: Option<EmbeddingClient>,
}
impl DefaultEmbedding {
	pub fn new(cfg: Option<&EmbeddingProviderConfig>) -> Result<Self> {
		let client = cfg.map(EmbeddingClient::new).transpose()?;

		Ok(Self { client })
	}
}
impl EmbeddingProvider for DefaultEmbedding {
	fn is_ready(&self) -> bool {
		self.client.is_some()
	}

	fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(async move {
			let Some(client) = self.client.as_ref() else {
				return Err(Error::Provider {
					message: "No embedding provider is configured.".to_string(),
				});
			};

			Ok(client.embed_query(text).await?)
		})
	}
}

pub struct SeekService {
	pub cfg: Config,
	pub calendar: Calendar,
	pub providers: Providers,
}
impl SeekService {
	pub fn new(cfg: Config, providers: Providers) -> Self {
		let calendar = Calendar::from_config(&cfg.calendar).unwrap_or_else(|| {
			tracing::warn!(
				utc_offset = cfg.calendar.utc_offset.as_str(),
				week_start = cfg.calendar.week_start.as_str(),
				"Calendar config is invalid. Using UTC with Monday week start."
			);

			Calendar::default()
		});

		Self { cfg, calendar, providers }
	}

	/// Replaces the configured calendar, e.g. to pin boundaries in tests.
	pub fn with_calendar(mut self, calendar: Calendar) -> Self {
		self.calendar = calendar;

		self
	}

	pub fn is_semantic_search_available(&self) -> bool {
		self.providers.embedding.is_ready()
	}
}
