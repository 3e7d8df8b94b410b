//! 📦 Common data structures — the building blocks of glx.
//!
//! 🎬 COLD OPEN — INT. FETCHER OUTPUT — SOME TIME AFTER MIDNIGHT
//!
//! A raw item arrives. It has a `category`. It has a `data` blob nested three
//! levels deep with a user object that might be a user, might be `null`, or
//! might be `{"organizations": []}` pretending to be a user. It does not know
//! what it is about to become. It is about to become flat.
//!
//! Two structs carry the whole story:
//! - [`RawItem`]: the envelope the fetcher hands us. Read-only to the transforms.
//! - [`EnrichedItem`]: the flat document the sink receives. Born fresh per raw
//!   item (or per comment/review hanging off one).
//!
//! 🦆

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 🏷️ Category tags as they appear on the wire.
pub const ISSUE_TYPE: &str = "issue";
pub const PULL_TYPE: &str = "pull_request";
pub const REPOSITORY_TYPE: &str = "repository";
pub const COMMENT_TYPE: &str = "comment";
pub const ISSUE_COMMENT_TYPE: &str = "issue_comment";
pub const REVIEW_COMMENT_TYPE: &str = "review_comment";

/// 🔑 The enriched field that holds every document's unique identifier.
pub const UNIQUE_ID_FIELD: &str = "id";

/// 📥 A raw item as produced by the fetcher: envelope + nested `data` payload.
///
/// Envelope fields we care about are typed; everything else rides along in
/// `extra` so a serialize round-trip (e.g. after anonymization) loses nothing.
/// `data` stays a [`Value`] on purpose — the typed view lives in
/// [`crate::payloads::RawPayload`] and is decoded on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    /// 🎭 `issue`, `pull_request` or `repository`. Anything else gets skipped with a log line.
    pub category: String,
    /// 📦 The real data. Nested. Opinionated.
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Value>,
    /// ⏱️ Fetcher's notion of "last updated" (epoch seconds, usually a float).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(
        default,
        rename = "metadata__updated_on",
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata_updated_on: Option<Value>,
    #[serde(
        default,
        rename = "metadata__timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata_timestamp: Option<Value>,
    /// 🗂️ Project name stamped upstream, if any. Overrides the configured project map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// 🧳 Every other envelope key, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawItem {
    /// 📋 The pass-through envelope fields, in declaration order, with `null` for anything absent.
    pub(crate) fn raw_fields(&self) -> [(&'static str, Value); 6] {
        fn or_null<T: Clone + Into<Value>>(v: &Option<T>) -> Value {
            v.clone().map(Into::into).unwrap_or(Value::Null)
        }
        [
            ("metadata__updated_on", or_null(&self.metadata_updated_on)),
            ("metadata__timestamp", or_null(&self.metadata_timestamp)),
            ("offset", or_null(&self.offset)),
            ("origin", or_null(&self.origin)),
            ("tag", or_null(&self.tag)),
            ("uuid", or_null(&self.uuid)),
        ]
    }
}

/// 📤 A flat enriched document. Keys are strings, values are scalars or flat lists.
///
/// Insertion order is irrelevant to the sink; equality is by content, which is
/// what the idempotence tests lean on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrichedItem {
    fields: Map<String, Value>,
}

impl EnrichedItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// ✍️ Set a field. `Option::None` lands as an explicit `null`, never as a missing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// 🕳️ Shorthand for `insert(key, Value::Null)`.
    pub fn insert_null(&mut self, key: impl Into<String>) {
        self.fields.insert(key.into(), Value::Null);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// 🔍 Read a field, treating absence as `null`. Child items copy parent fields this way.
    pub fn get_or_null(&self, key: &str) -> Value {
        self.fields.get(key).cloned().unwrap_or(Value::Null)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 🔑 The document id as a string, ready for a bulk action line.
    ///
    /// Strings pass through, numbers are stringified, and anything else
    /// (`null`, objects, missing) is `None` — such a document cannot be indexed.
    pub fn id_string(&self, id_field: &str) -> Option<String> {
        match self.fields.get(id_field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// 🏷️ `issue`, `pull_request`, `comment`, `repository`... whatever the transform stamped.
    pub fn item_type(&self) -> Option<&str> {
        self.fields.get("item_type").and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for EnrichedItem {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
