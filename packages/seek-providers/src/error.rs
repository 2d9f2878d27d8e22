pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Embedding request failed: {0}")]
	Http(#[from] reqwest::Error),
	#[error("Embedding header {name} is invalid: {message}")]
	Header { name: String, message: String },
	#[error("Embedding endpoint returned {actual} dimensions, expected {expected}.")]
	Dimensions { expected: usize, actual: usize },
	#[error("Embedding response is unusable: {message}")]
	Response { message: String },
}
