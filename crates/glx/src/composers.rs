// ai
//! 🎬 *[the batch is full. the sink hungers. the documents line up single file.]*
//!
//! 🎼 The Composers module — turning a batch of enriched documents into one wire payload.
//!
//! 🧠 Knowledge graph:
//! - **NDJSON** (`NdjsonComposer`): one document per line. Used by the file sink.
//! - **Bulk** (`BulkComposer`): action line + source line per document. Used by the
//!   Elasticsearch `/_bulk` sink.
//! - Both skip documents without the id field: a document that cannot be addressed
//!   cannot be written, and the sink's returned count says so.
//!
//! ```text
//!   Supervisor: batch Vec<EnrichedItem> → sink.bulk_upload(batch, "id")
//!   Sink:       composer.compose(&batch, "id") → Composed { payload, submitted } → I/O
//! ```
//!
//! 🦆 (the duck composes... symphonies? payloads? both? the duck has no comment.)

use anyhow::Result;

use crate::common::EnrichedItem;

mod bulk;
mod ndjson;

pub(crate) use bulk::BulkComposer;
pub(crate) use ndjson::NdjsonComposer;

/// 📦 A rendered payload plus how many documents went into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Composed {
    pub(crate) payload: String,
    /// 🔢 Documents actually in the payload (the ones that had an id).
    pub(crate) submitted: usize,
}

/// 🎼 Renders a batch of documents into a sink's wire format.
pub(crate) trait Composer: std::fmt::Debug {
    fn compose(&self, items: &[EnrichedItem], id_field: &str) -> Result<Composed>;
}
