//! 🔄 Transforms — where nested forge JSON goes in and flat documents come out 🎭🚀
//!
//! 🎬 COLD OPEN — INT. DASHBOARD TEAM STANDUP — 9:03 AM
//!
//! "Can we chart time-to-first-response per repo?"
//! The raw issue says nothing about response time. It has a `created_at`,
//! a list of comments with their own `created_at`s, an author, and a
//! `comments_data[3].user` that is `null` because someone deleted their
//! account in 2021. Somebody has to do the arithmetic. This module is somebody.
//!
//! ## Architecture 📐
//!
//! ```text
//!   RawItem ──decode──▶ RawPayload ──match──▶ issue::enrich        ──▶ [issue, comment, comment…]
//!                         (sum type)          pull_request::enrich ──▶ [pull, review_comment…]
//!                                             repository::enrich   ──▶ [repository]
//! ```
//!
//! One raw item in, an ordered `Vec<EnrichedItem>` out: parent first, then the
//! fan-out children in input order. The dispatch is an exhaustive `match`, so a
//! fourth category is a compile error until somebody teaches it here.
//!
//! ## Knowledge Graph 🧠
//! - Depends on: `payloads` (typed views), `common` (RawItem / EnrichedItem), `identities` (uuids)
//! - Used by: `supervisors::Supervisor` (one call per raw item)
//! - Pure given a clock: `enrich_item_at` takes `now` so tests can pin it.
//!
//! ⚠️ Every field that a dashboard has ever filtered on lives somewhere below. Tread gently. 🦆

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::common::{EnrichedItem, RawItem};
use crate::errors::{ConfigError, ItemError};
use crate::payloads::RawPayload;

pub(crate) mod actors;
pub(crate) mod comments;
pub(crate) mod dates;
pub(crate) mod fields;
pub(crate) mod issue;
pub(crate) mod pull_request;
pub(crate) mod repository;

/// 📋 The two sub-indexes this connector knows how to feed.
pub const KNOWN_DATA_SOURCES: &[&str] = &["gitlink_issues", "gitlink_pulls"];

/// 📦 Default flush threshold, counted in enriched items (fan-out included).
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// ✂️ Default cap on `body` length, in characters. `body_analyzed` keeps everything.
pub const DEFAULT_KEYWORD_MAX_LENGTH: usize = 1000;

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_keyword_max_length() -> usize {
    DEFAULT_KEYWORD_MAX_LENGTH
}

// ============================================================
//  🔧 EnrichConfig
// ============================================================

/// 🔧 Everything the enrichment needs to know that is not in the raw item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// 📋 Which sub-index is being fed (`gitlink_issues` / `gitlink_pulls`). Required at run time.
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_keyword_max_length")]
    pub keyword_max_length: usize,
    /// 🪪 Add `<role>_uuid` / `_name` / `_user_name` / `_domain` fields per actor.
    #[serde(default)]
    pub sortinghat: bool,
    /// 🗂️ origin URL → project name.
    #[serde(default)]
    pub projects: BTreeMap<String, String>,
    #[serde(default)]
    pub repository_labels: Option<Vec<String>>,
    #[serde(default)]
    pub filter_raw: Option<String>,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            data_source: None,
            batch_size: DEFAULT_BATCH_SIZE,
            keyword_max_length: DEFAULT_KEYWORD_MAX_LENGTH,
            sortinghat: false,
            projects: BTreeMap::new(),
            repository_labels: None,
            filter_raw: None,
        }
    }
}

impl EnrichConfig {
    /// ✅ Check the config before a single item is read.
    ///
    /// A missing `data_source` or a zero batch size is fatal. An unfamiliar
    /// `data_source` only earns a warning: maybe someone knows something we don't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let data_source = self
            .data_source
            .as_deref()
            .filter(|ds| !ds.trim().is_empty())
            .ok_or(ConfigError::MissingDataSource)?;
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if !KNOWN_DATA_SOURCES.contains(&data_source) {
            warn!(
                "⚠️ data_source '{}' is neither gitlink_issues nor gitlink_pulls. Carrying on, eyebrow raised.",
                data_source
            );
        }
        Ok(())
    }
}

// ============================================================
//  🧪 Enricher
// ============================================================

/// 🕰️ Per-call context: the config plus a frozen "now" for the wall-clock fields.
pub(crate) struct EnrichContext<'a> {
    pub(crate) config: &'a EnrichConfig,
    pub(crate) now: DateTime<Utc>,
}

/// 🧪 Turns one raw item into its enriched documents.
#[derive(Debug, Clone)]
pub struct Enricher {
    config: EnrichConfig,
}

impl Enricher {
    pub fn new(config: EnrichConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    /// 🔄 Enrich with the real clock.
    pub fn enrich_item(&self, item: &RawItem) -> Result<Vec<EnrichedItem>, ItemError> {
        self.enrich_item_at(item, Utc::now())
    }

    /// 🔄 Enrich against a caller-supplied clock. Same input + same `now` = same output.
    pub fn enrich_item_at(
        &self,
        item: &RawItem,
        now: DateTime<Utc>,
    ) -> Result<Vec<EnrichedItem>, ItemError> {
        let ctx = EnrichContext {
            config: &self.config,
            now,
        };
        match RawPayload::decode(item)? {
            RawPayload::Issue(data) => issue::enrich(&ctx, item, &data),
            RawPayload::PullRequest(data) => pull_request::enrich(&ctx, item, &data),
            RawPayload::Repository(data) => Ok(vec![repository::enrich(&ctx, item, &data)]),
        }
    }
}
