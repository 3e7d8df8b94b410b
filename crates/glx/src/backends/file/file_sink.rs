use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{
    fs::File,
    io::{self, AsyncWriteExt},
};
use tracing::trace;

use crate::backends::Sink;
use crate::common::EnrichedItem;
use crate::composers::{Composer, NdjsonComposer};

// -- 🚰 FileSinkConfig — cousin of FileSourceConfig, equally traumatized by disk full errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSinkConfig {
    pub file_name: String,
}

/// 🚰 FileSink — writes enriched documents to disk as NDJSON.
///
/// It's a BufWriter around a tokio `File`. Every document with an id is written,
/// so the returned count is simply how many had one.
///
/// ⚠️ `File::create` truncates if the file exists. No warning. No backup. Just gone.
#[derive(Debug)]
pub struct FileSink {
    file_buf: io::BufWriter<File>,
    sink_config: FileSinkConfig,
}

impl FileSink {
    /// 🚀 Creates (or obliterates and recreates) the sink file and wraps it in a BufWriter.
    pub async fn new(sink_config: FileSinkConfig) -> Result<Self> {
        let file_handle = File::create(&sink_config.file_name)
            .await
            .with_context(|| {
                format!(
                    "💀 The sink file '{}' could not be conjured into existence. \
                     We stared at the path. The path stared back. \
                     One of us was wrong about whether the parent directory existed.",
                    sink_config.file_name
                )
            })?;
        Ok(Self {
            file_buf: io::BufWriter::new(file_handle),
            sink_config,
        })
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn bulk_upload(&mut self, items: Vec<EnrichedItem>, id_field: &str) -> Result<usize> {
        let composed = NdjsonComposer.compose(&items, id_field)?;
        trace!(
            "📬 {} documents ({} bytes) walked into the file sink — writing them all down",
            composed.submitted,
            composed.payload.len()
        );
        self.file_buf
            .write_all(composed.payload.as_bytes())
            .await
            .with_context(|| format!("💀 Writing to '{}' failed.", self.sink_config.file_name))?;
        Ok(composed.submitted)
    }

    /// 🗑️ Flush the BufWriter. Without this, the last batch stays warm and cozy in memory forever.
    ///
    /// KNOWLEDGE GRAPH: `flush()` is called explicitly here rather than relying on Drop
    /// because async Drop is not a thing in Rust yet.
    async fn close(&mut self) -> Result<()> {
        trace!("🎬 final flush. the file sink takes its bow");
        self.file_buf.flush().await.context(
            "💀 Error flushing file — the buffer held its data to the very end, \
             only for the disk to refuse it. The enriched documents remain unwritten.",
        )
    }
}
