use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::backends::Sink;
use crate::common::EnrichedItem;

/// 📦 A sink that never forgets. Unlike my dad, who forgot my soccer game in 1998.
///
/// `InMemorySink` hoards enriched documents in a shared Vec wrapped in a Mutex
/// wrapped in an Arc. It's types all the way down.
///
/// Documents without an id are refused, same as any other sink, so the count
/// it returns means the same thing everywhere.
///
/// Clone-able because tests need to peek inside after handing `self` off to the
/// pipeline. The `Arc` means everyone shares the same Vec.
#[derive(Debug, Default, Clone)]
pub struct InMemorySink {
    /// 🔒 The evidence locker. Every accepted document, in arrival order.
    pub received: Arc<Mutex<Vec<EnrichedItem>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 📋 A copy of everything received so far.
    pub async fn snapshot(&self) -> Vec<EnrichedItem> {
        self.received.lock().await.clone()
    }
}

#[async_trait]
impl Sink for InMemorySink {
    async fn bulk_upload(&mut self, items: Vec<EnrichedItem>, id_field: &str) -> Result<usize> {
        // 🔒 The Mutex is load-bearing. Do not remove. I know it looks optional. It isn't.
        let mut received = self.received.lock().await;
        let before = received.len();
        for item in items {
            if item.id_string(id_field).is_some() {
                received.push(item);
            } else {
                warn!(
                    "⚠️ in-memory sink turned away a document without '{}'",
                    id_field
                );
            }
        }
        Ok(received.len() - before)
    }

    /// 🗑️ There is nothing to clean up. We live in RAM.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
