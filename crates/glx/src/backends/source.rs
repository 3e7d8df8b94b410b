use anyhow::Result;
use async_trait::async_trait;

use crate::backends::{file, in_mem};
use crate::common::RawItem;

/// 🚰 A source of raw items, one per call, lazily.
///
/// Implement this trait and you too can be the origin of someone else's data problems.
///
/// # Contract 📜
/// - `next_item` returns `Ok(Some(item))` while items flow, `Ok(None)` at EOF.
/// - `Err(...)` means the source itself broke (disk gone, permissions, etc.). Fatal.
/// - A single undecodable record is NOT an error: log it, skip it, move to the next one.
/// - The borrow checker demands `&mut self` because sources have state. And feelings. Mostly state.
#[async_trait]
pub trait Source: std::fmt::Debug + Send {
    /// 📄 Fetch the next raw item, or `None` when the tap runs dry. 🏁
    async fn next_item(&mut self) -> Result<Option<RawItem>>;
}

/// 🎭 The many faces of a Source.
///
/// The enum dispatches via `impl Source for SourceBackend`, so the supervisor never
/// needs to know whether it's reading from RAM or from disk.
/// Ancient proverb: "He who hardcodes the backend, enriches only once."
#[derive(Debug)]
pub enum SourceBackend {
    InMemory(in_mem::InMemorySource),
    File(file::FileSource),
}

#[async_trait]
impl Source for SourceBackend {
    async fn next_item(&mut self) -> Result<Option<RawItem>> {
        match self {
            SourceBackend::InMemory(i) => i.next_item().await,
            SourceBackend::File(f) => f.next_item().await,
        }
    }
}
