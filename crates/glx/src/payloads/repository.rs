use serde::Deserialize;
use serde_json::Value;

use super::{Scalar, null_as_empty};

/// 🏠 Repository snapshot. One per fetch, keyed by when it was fetched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepositoryData {
    #[serde(default)]
    pub forks_count: Option<i64>,
    #[serde(default)]
    pub subscribers_count: Option<i64>,
    #[serde(default)]
    pub stargazers_count: Option<i64>,
    pub fetched_on: Scalar,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub releases: Vec<Value>,
}
