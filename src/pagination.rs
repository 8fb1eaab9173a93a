//! This module defines the common functionality for paging data.

use serde::{Deserialize, Deserializer};

/// Query parameters controlling which slice of a collection to return.
///
/// Both fields are optional in requests and fall back to the defaults below.
/// The fields are `i64` so they bind directly as SQL parameters; negative
/// values are rejected at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// The number of items to skip from the start of the collection.
    #[serde(deserialize_with = "non_negative")]
    pub skip: i64,
    /// The maximum number of items to return.
    #[serde(deserialize_with = "non_negative")]
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
        }
    }
}

fn non_negative<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;

    if value < 0 {
        return Err(serde::de::Error::custom("must not be negative"));
    }

    Ok(value)
}
