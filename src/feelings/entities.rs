use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::Feeling;

/// One logged feeling. Records are never changed after creation, the store only appends them.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct FeelingRecord {
    pub id: String,
    pub feeling: Feeling,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl FeelingRecord {
    /// Creates a record whose id is derived from its creation time. `taken` tells whether an id
    /// is already used, in which case a numeric suffix is appended.
    ///
    /// The timestamp is truncated to milliseconds, which is what gets stored.
    pub fn create(
        feeling: Feeling,
        timestamp: DateTime<Utc>,
        taken: impl Fn(&str) -> bool,
    ) -> FeelingRecord {
        let timestamp = timestamp
            .with_nanosecond(timestamp.nanosecond() / 1_000_000 * 1_000_000)
            .unwrap_or(timestamp);
        let base = timestamp.timestamp_millis().to_string();
        let mut id = base.clone();
        let mut suffix = 0usize;
        while taken(&id) {
            suffix += 1;
            id = format!("{base}-{suffix}");
        }
        FeelingRecord {
            id,
            feeling,
            timestamp,
        }
    }
}
