use anyhow::Result;
use async_trait::async_trait;

use crate::backends::{elasticsearch, file, in_mem};
use crate::common::EnrichedItem;

/// 🕳️ A sink that bulk-writes enriched documents and says how many made it.
///
/// # Contract 📜
/// - `bulk_upload` writes one batch and returns the number of documents actually
///   written. Fewer than submitted is a partial failure: the caller logs the gap
///   and carries on. Documents without an `id_field` are never written.
/// - `Err(...)` is a transport failure (network down, disk full). The run stops.
/// - `close` flushes, finalizes, and bids the data a fond farewell. MUST be called.
///   Skipping `close` is a bug. It is also considered rude.
#[async_trait]
pub trait Sink: std::fmt::Debug + Send {
    /// 📡 Write a batch. Returns how many documents the destination accepted.
    async fn bulk_upload(&mut self, items: Vec<EnrichedItem>, id_field: &str) -> Result<usize>;
    /// 🗑️ Flush, finalize, and release. Call this. Always. No exceptions. Not even on Fridays.
    async fn close(&mut self) -> Result<()>;
}

/// 🎭 The many faces of a Sink. Mirrors `SourceBackend` on the other end of the pipeline.
#[derive(Debug)]
pub enum SinkBackend {
    InMemory(in_mem::InMemorySink),
    File(file::FileSink),
    Elasticsearch(elasticsearch::ElasticsearchSink),
}

#[async_trait]
impl Sink for SinkBackend {
    async fn bulk_upload(&mut self, items: Vec<EnrichedItem>, id_field: &str) -> Result<usize> {
        match self {
            SinkBackend::InMemory(sink) => sink.bulk_upload(items, id_field).await,
            SinkBackend::File(sink) => sink.bulk_upload(items, id_field).await,
            SinkBackend::Elasticsearch(sink) => sink.bulk_upload(items, id_field).await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self {
            SinkBackend::InMemory(sink) => sink.close().await,
            SinkBackend::File(sink) => sink.close().await,
            SinkBackend::Elasticsearch(sink) => sink.close().await,
        }
    }
}
