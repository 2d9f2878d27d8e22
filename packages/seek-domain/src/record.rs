use std::{
	collections::{BTreeSet, HashMap},
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

/// Embedding vectors keyed by the record they were computed for.
pub type EmbeddingMap = HashMap<RecordId, Vec<f32>>;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);
impl Display for RecordId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}
impl From<i64> for RecordId {
	fn from(value: i64) -> Self {
		Self(value)
	}
}

/// One analyzed image as seen by retrieval. Records are produced elsewhere and never mutated
/// here.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Record {
	pub id: RecordId,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub tags: BTreeSet<String>,
	/// Milliseconds since the Unix epoch.
	pub created_at_ms: i64,
}
impl Record {
	pub fn new<I, S>(id: i64, description: &str, tags: I, created_at_ms: i64) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			id: RecordId(id),
			description: description.to_string(),
			tags: tags.into_iter().map(Into::into).collect(),
			created_at_ms,
		}
	}

	pub fn has_any_tag(&self, tags: &BTreeSet<String>) -> bool {
		if self.tags.len() <= tags.len() {
			self.tags.iter().any(|tag| tags.contains(tag))
		} else {
			tags.iter().any(|tag| self.tags.contains(tag))
		}
	}
}
