// ai
//! 📡 **NdjsonComposer** — one enriched document per line, trailing `\n` included.
//!
//! What's the DEAL with NDJSON? It's JSON but unfriendly. Every line is lonely.
//! No brackets to hold them. No commas to connect them. Just newlines. And silence. 🦆

use anyhow::{Context, Result};
use tracing::warn;

use super::{Composed, Composer};
use crate::common::EnrichedItem;

#[derive(Debug, Clone, Copy)]
pub(crate) struct NdjsonComposer;

impl Composer for NdjsonComposer {
    fn compose(&self, items: &[EnrichedItem], id_field: &str) -> Result<Composed> {
        let mut composed = Composed::default();
        for item in items {
            if item.id_string(id_field).is_none() {
                warn!(
                    "⚠️ document without '{}' left out of the file: {:?}",
                    id_field,
                    item.item_type()
                );
                continue;
            }
            let line = serde_json::to_string(item)
                .context("💀 An enriched document refused to become a line of JSON.")?;
            composed.payload.push_str(&line);
            composed.payload.push('\n');
            composed.submitted += 1;
        }
        Ok(composed)
    }
}
