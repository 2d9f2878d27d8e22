use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, Serialize};

use seek_config::EmbeddingProviderConfig;
use seek_domain::vector;

use crate::{Error, Result};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
	model: &'a str,
	input: [&'a str; 1],
	dimensions: u32,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
	data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
	embedding: Vec<f32>,
}

/// Query-side client for an OpenAI-compatible embeddings endpoint.
///
/// Each call embeds one search query and returns a unit-length vector with the configured
/// width, so it can be ranked directly against the stored record embeddings.
pub struct EmbeddingClient {
	http: Client,
	url: String,
	model: String,
	dimensions: u32,
}
impl EmbeddingClient {
	pub fn new(cfg: &EmbeddingProviderConfig) -> Result<Self> {
		let http = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(request_headers(cfg)?)
			.build()?;

		Ok(Self {
			http,
			url: format!("{}{}", cfg.api_base, cfg.path),
			model: cfg.model.clone(),
			dimensions: cfg.dimensions,
		})
	}

	pub fn dimensions(&self) -> usize {
		self.dimensions as usize
	}

	pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
		let body = EmbeddingRequest {
			model: self.model.as_str(),
			input: [text],
			dimensions: self.dimensions,
		};
		let response: EmbeddingResponse = self
			.http
			.post(self.url.as_str())
			.json(&body)
			.send()
			.await?
			.error_for_status()?
			.json()
			.await?;
		let vector = query_vector(response, self.dimensions())?;

		tracing::debug!(model = self.model.as_str(), dimensions = vector.len(), "Embedded query.");

		Ok(vector)
	}
}

fn request_headers(cfg: &EmbeddingProviderConfig) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();
	let mut bearer = HeaderValue::from_str(&format!("Bearer {}", cfg.api_key)).map_err(|err| {
		Error::Header { name: AUTHORIZATION.to_string(), message: err.to_string() }
	})?;

	bearer.set_sensitive(true);
	headers.insert(AUTHORIZATION, bearer);

	for (name, value) in &cfg.default_headers {
		let invalid = |message: String| Error::Header { name: name.clone(), message };
		let Some(raw) = value.as_str() else {
			return Err(invalid("value must be a string".to_string()));
		};
		let header_name =
			HeaderName::from_bytes(name.as_bytes()).map_err(|err| invalid(err.to_string()))?;
		let header_value = HeaderValue::from_str(raw).map_err(|err| invalid(err.to_string()))?;

		headers.insert(header_name, header_value);
	}

	Ok(headers)
}

/// Takes the single query vector out of a response and scales it to unit length.
fn query_vector(response: EmbeddingResponse, dimensions: usize) -> Result<Vec<f32>> {
	let [datum]: [EmbeddingDatum; 1] = response.data.try_into().map_err(
		|data: Vec<EmbeddingDatum>| Error::Response {
			message: format!("expected one embedding, got {}", data.len()),
		},
	)?;
	let embedding = datum.embedding;

	if embedding.len() != dimensions {
		return Err(Error::Dimensions { expected: dimensions, actual: embedding.len() });
	}
	if embedding.iter().any(|value| !value.is_finite()) {
		return Err(Error::Response { message: "embedding has non-finite values".to_string() });
	}
	if vector::norm(&embedding) == 0.0 {
		return Err(Error::Response { message: "embedding is the zero vector".to_string() });
	}

	Ok(vector::l2_normalize(&embedding))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn response(value: serde_json::Value) -> EmbeddingResponse {
		serde_json::from_value(value).expect("Failed to decode embedding response.")
	}

	#[test]
	fn request_embeds_a_single_input() {
		let body = EmbeddingRequest { model: "m", input: ["red car"], dimensions: 3 };
		let value = serde_json::to_value(&body).expect("Failed to encode request.");

		assert_eq!(
			value,
			serde_json::json!({ "model": "m", "input": ["red car"], "dimensions": 3 })
		);
	}

	#[test]
	fn scales_query_to_unit_length() {
		let data = response(serde_json::json!({
			"object": "list",
			"data": [{ "index": 0, "embedding": [3.0, 4.0] }]
		}));

		assert_eq!(query_vector(data, 2).expect("Vector should be usable."), vec![0.6, 0.8]);
	}

	#[test]
	fn rejects_wrong_width() {
		let data = response(serde_json::json!({ "data": [{ "embedding": [1.0, 0.0, 0.0] }] }));
		let err = query_vector(data, 384).expect_err("Expected a dimension error.");

		assert!(matches!(err, Error::Dimensions { expected: 384, actual: 3 }), "{err:?}");
	}

	#[test]
	fn rejects_batches_and_empty_data() {
		let batch = response(serde_json::json!({
			"data": [{ "embedding": [1.0] }, { "embedding": [2.0] }]
		}));
		let empty = response(serde_json::json!({ "data": [] }));

		assert!(matches!(query_vector(batch, 1), Err(Error::Response { .. })));
		assert!(matches!(query_vector(empty, 1), Err(Error::Response { .. })));
	}

	#[test]
	fn rejects_zero_vectors() {
		let data = response(serde_json::json!({ "data": [{ "embedding": [0.0, 0.0] }] }));

		assert!(matches!(query_vector(data, 2), Err(Error::Response { .. })));
	}
}
