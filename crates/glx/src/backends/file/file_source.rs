use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{
    fs::File,
    io::{self, AsyncBufReadExt},
};
use tracing::{trace, warn};

use crate::backends::Source;
use crate::common::RawItem;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// -- 📂 FileSourceConfig — "It's just a file", said no sysadmin ever before the disk filled up.
// KNOWLEDGE GRAPH: config lives co-located with the backend that uses it. This is intentional.
// It avoids the "where the heck is that config defined" scavenger hunt at 2am during an incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSourceConfig {
    /// 📄 Path to an NDJSON file of raw items, one per line.
    pub file_name: String,
}

/// 📂 FileSource — reads raw items from an NDJSON file, one per call.
///
/// Blank lines are ignored. Lines that do not decode as a raw item (bad JSON,
/// wrong shape, invalid UTF-8) are logged with their line number and skipped;
/// the source keeps going. Only I/O failures are errors.
///
/// 🧵 Async, non-blocking. The BufReader wraps a tokio `File`, so we're doing real async I/O.
pub struct FileSource {
    buf_reader: io::BufReader<File>,
    source_config: FileSourceConfig,
    line_number: usize,
    line: Vec<u8>,
}

// 🐛 The BufReader and line buffer are noise in a Debug dump; the config says everything useful.
impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSource")
            .field("source_config", &self.source_config)
            .field("line_number", &self.line_number)
            .finish()
    }
}

impl FileSource {
    /// 🚀 Opens the source file and wraps it in a BufReader.
    ///
    /// If the file doesn't exist: 💀 anyhow will tell you with *theatrical flair*.
    pub async fn new(source_config: FileSourceConfig) -> Result<Self> {
        // -- 💀 The door. It's locked. Or it doesn't exist. Or the filesystem lied to you.
        let file_handle = File::open(&source_config.file_name)
            .await
            .with_context(|| {
                format!(
                    "💀 The door to '{}' would not budge. We knocked. We pleaded. \
                     We checked if it existed (it might not). We checked permissions (they might be wrong). \
                     The door remained closed. The raw items remain unread.",
                    source_config.file_name
                )
            })?;

        Ok(Self {
            buf_reader: io::BufReader::new(file_handle),
            source_config,
            line_number: 0,
            // ⚠️ raw issues with a few hundred comments get chunky
            line: Vec::with_capacity(64 * 1024),
        })
    }
}

#[async_trait]
impl Source for FileSource {
    /// 📄 Read lines until one decodes as a raw item, or EOF.
    async fn next_item(&mut self) -> Result<Option<RawItem>> {
        loop {
            self.line.clear();
            let bytes_read = self
                .buf_reader
                .read_until(b'\n', &mut self.line)
                .await
                .with_context(|| {
                    format!(
                        "💀 Reading line {} of '{}' failed mid-sentence.",
                        self.line_number + 1,
                        self.source_config.file_name
                    )
                })?;
            if bytes_read == 0 {
                trace!(
                    "🏁 '{}' ran dry after {} lines",
                    self.source_config.file_name, self.line_number
                );
                return Ok(None);
            }
            self.line_number += 1;

            // 🧹 bytes, not a String: a line of mojibake is a bad record, not a dead run.
            // read_until keeps the \n (and \r\n on Windows); a BOM is just rude
            let line = self.line.as_slice();
            let trimmed = line.strip_prefix(UTF8_BOM).unwrap_or(line).trim_ascii();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_slice::<RawItem>(trimmed) {
                Ok(item) => return Ok(Some(item)),
                Err(err) => {
                    warn!(
                        "⚠️ skipping line {} of '{}': not a raw item ({})",
                        self.line_number, self.source_config.file_name, err
                    );
                }
            }
        }
    }
}
