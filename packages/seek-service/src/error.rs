pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<seek_providers::Error> for Error {
	fn from(err: seek_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
