//! 📡 **BulkComposer** — the `/_bulk` dialect: an action line, then the document, per document.
//!
//! ```text
//! {"index":{"_id":"101"}}
//! {"id":101,"item_type":"issue",...}
//! {"index":{"_id":"101_issue_comment_7"}}
//! {"id":"101_issue_comment_7","item_type":"comment",...}
//! ```
//!
//! The target index lives in the URL, so the action line only carries `_id`.
//! Re-sending the same document overwrites it: enrichment is re-runnable.

use anyhow::{Context, Result};
use serde_json::json;
use tracing::warn;

use super::{Composed, Composer};
use crate::common::EnrichedItem;

#[derive(Debug, Clone, Copy)]
pub(crate) struct BulkComposer;

impl Composer for BulkComposer {
    fn compose(&self, items: &[EnrichedItem], id_field: &str) -> Result<Composed> {
        let mut composed = Composed::default();
        for item in items {
            let Some(id) = item.id_string(id_field) else {
                warn!(
                    "⚠️ document without '{}' cannot be addressed in a bulk request, skipping it: {:?}",
                    id_field,
                    item.item_type()
                );
                continue;
            };
            let action = json!({ "index": { "_id": id } });
            let action_line = serde_json::to_string(&action).context(
                "💀 Failed to serialize bulk action metadata. \
                 The JSON that describes JSON has failed to become JSON.",
            )?;
            let source_line = serde_json::to_string(item)
                .context("💀 An enriched document refused to become a bulk source line.")?;
            composed.payload.push_str(&action_line);
            composed.payload.push('\n');
            composed.payload.push_str(&source_line);
            composed.payload.push('\n');
            composed.submitted += 1;
        }
        Ok(composed)
    }
}
