//! 🧬 Payloads — the typed view of a raw item's `data` blob.
//!
//! The fetcher hands us JSON with a category tag. This module turns
//! `(category, data)` into a [`RawPayload`], a sum type with one strongly-typed
//! variant per category. Required fields are plain fields (decoding fails if
//! they are missing); optional fields are `Option`s, so "absent" is one
//! uniform `None` instead of a key-presence check at every call site.
//!
//! 🧠 Knowledge graph:
//! - `RawItem.data` (Value) → `RawPayload::decode` → `Issue | PullRequest | Repository`
//! - Used by: `transforms::*` (exhaustive match), nobody else
//! - Identity/anonymization work on the untyped `Value` on purpose: they must
//!   cope with payloads the enrichment would reject.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::common::{ISSUE_TYPE, PULL_TYPE, REPOSITORY_TYPE, RawItem};
use crate::errors::ItemError;

mod issue;
mod pull_request;
mod repository;
mod user;

pub use issue::{IssueData, IssueStatus, Label};
pub use pull_request::{PullComments, PullIssueRef, PullRequestData};
pub use repository::RepositoryData;
pub use user::{Comment, User};

/// 🎭 One variant per category. The transform stage matches on this exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    Issue(Box<IssueData>),
    PullRequest(Box<PullRequestData>),
    Repository(Box<RepositoryData>),
}

impl RawPayload {
    /// 🔬 Decode the item's `data` according to its `category`.
    ///
    /// Unknown categories and payloads missing required fields come back as
    /// [`ItemError`]s. The caller decides whether that means "skip" (it does).
    pub fn decode(item: &RawItem) -> Result<Self, ItemError> {
        match item.category.as_str() {
            ISSUE_TYPE => IssueData::deserialize(&item.data)
                .map(|issue| Self::Issue(Box::new(issue)))
                .map_err(|source| ItemError::Malformed {
                    category: ISSUE_TYPE,
                    source,
                }),
            PULL_TYPE => PullRequestData::deserialize(&item.data)
                .map(|pull| Self::PullRequest(Box::new(pull)))
                .map_err(|source| ItemError::Malformed {
                    category: PULL_TYPE,
                    source,
                }),
            REPOSITORY_TYPE => RepositoryData::deserialize(&item.data)
                .map(|repo| Self::Repository(Box::new(repo)))
                .map_err(|source| ItemError::Malformed {
                    category: REPOSITORY_TYPE,
                    source,
                }),
            other => Err(ItemError::UnknownCategory(other.to_string())),
        }
    }
}

/// 🔢 A JSON scalar: the forge is not consistent about ids being numbers or strings.
///
/// Serializes back to the same JSON type it came from. Variant order matters:
/// untagged decoding takes the first fit, and `UInt` catches ids past `i64::MAX`
/// before `Float` can round them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::UInt(u) => write!(f, "{u}"),
            // 🎯 same text as a JSON float: `1672567200.0`, never `1672567200`
            Scalar::Float(x) => match serde_json::Number::from_f64(*x) {
                Some(n) => write!(f, "{n}"),
                None => write!(f, "{x}"),
            },
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&Scalar> for Value {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Int(i) => Value::from(*i),
            Scalar::UInt(u) => Value::from(*u),
            Scalar::Float(x) => Value::from(*x),
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Text(s) => Value::String(s.clone()),
        }
    }
}

/// 🧽 Lenient decode: anything that does not fit `T` (wrong shape, `null`, `""`,
/// `[]`) becomes `None` instead of failing the whole item.
///
/// Used for actor objects and reaction maps, where the forge is creative.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// 🕳️ `null` or missing list → empty list. Malformed entries still fail loudly.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// 🎭 Reaction counters keyed by emoji name. `url` is noise and gets dropped later.
pub type Reactions = Map<String, Value>;
