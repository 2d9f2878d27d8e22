pub mod embedding;

mod error;

pub use embedding::EmbeddingClient;
pub use error::{Error, Result};
