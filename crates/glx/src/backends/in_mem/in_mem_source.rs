use std::collections::VecDeque;

use anyhow::Result;
use async_trait::async_trait;

use crate::backends::Source;
use crate::common::RawItem;

/// 📦 The world's most predictable data source.
///
/// Give it raw items, it gives them back one by one in the same order, then
/// `None` forever. It has no opinions about them.
#[derive(Debug, Default)]
pub struct InMemorySource {
    pending: VecDeque<RawItem>,
}

impl InMemorySource {
    /// 🚀 No I/O. No config. No environment variables lurking in the shadows.
    pub fn new(items: Vec<RawItem>) -> Self {
        Self {
            pending: items.into(),
        }
    }
}

#[async_trait]
impl Source for InMemorySource {
    // 🔒 One pop per call. When the deque is empty, the well is dry. The larder is bare.
    async fn next_item(&mut self) -> Result<Option<RawItem>> {
        Ok(self.pending.pop_front())
    }
}
