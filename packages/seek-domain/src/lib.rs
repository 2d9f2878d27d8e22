pub mod filter;
pub mod record;
pub mod time_range;
pub mod vector;

pub use record::{EmbeddingMap, Record, RecordId};
pub use time_range::{Calendar, Interval, TimeRange, TimeWindow};
