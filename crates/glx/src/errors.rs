//! 💀 Errors — the taxonomy of things that go wrong between a raw item and an index.
//!
//! Two flavours live here:
//! - [`ItemError`]: scoped to ONE raw item. The supervisor logs it, skips the item,
//!   and keeps draining. One bad issue does not get to ruin everyone's evening.
//! - [`ConfigError`]: scoped to the whole run. Raised before a single item is read.
//!
//! Everything else (I/O, HTTP, the filesystem having a bad day) rides on `anyhow`
//! with a `.context(...)` message, same as the rest of the crate. 🦆

use thiserror::Error;

/// 🧾 Per-item failure. The item is skipped; the run goes on.
#[derive(Debug, Error)]
pub enum ItemError {
    /// 🎭 A category nobody taught us how to enrich.
    #[error("rich item not defined for gitlink category '{0}'")]
    UnknownCategory(String),

    /// 🕳️ The payload did not decode — usually a required field went missing.
    #[error("malformed '{category}' payload: {source}")]
    Malformed {
        category: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// 🔍 A required field was absent after decoding (e.g. a review with neither
    /// `updated_at` nor `submitted_at`).
    #[error("missing required field '{field}' in '{category}' item")]
    MissingField {
        category: &'static str,
        field: &'static str,
    },
}

/// 🔧 Whole-run failure, raised before processing begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 📋 The enrichment has to know which sub-index it is feeding.
    #[error("missing data_source attribute: set enrich.data_source (e.g. 'gitlink_issues')")]
    MissingDataSource,

    /// 📦 A batch of zero would flush forever and write nothing.
    #[error("batch_size must be at least 1")]
    ZeroBatchSize,
}
