//! 🔌 Backends — where the real I/O happens.
//!
//! 🚰 Source backends pour raw items in, Sink backends slurp enriched documents up.
//! And in between, we panic! (kidding, we use anyhow)
//!
//! 🎭 This module is the casting agency. Raw items from an NDJSON dump? From a
//! vector in a test? Enriched documents into Elasticsearch, a file, or RAM?
//! We've got a backend for that.
//!
//! 🧠 Knowledge graph:
//! - Pattern: trait → concrete impls → `SourceBackend` / `SinkBackend` enum dispatch
//! - Each backend's config lives next to the backend (`FileSourceConfig` in `file`, etc.)
//! - Resolution from config: `crate::app_config::{SourceConfig, SinkConfig}` → `lib::build_*`
//!
//! 🦆 The duck is here because every file must have one. This is law. Do not question the duck.

mod sink;
mod source;

pub mod elasticsearch;
pub mod file;
pub mod in_mem;

pub use elasticsearch::{ElasticsearchSink, ElasticsearchSinkConfig};
pub use file::{FileSink, FileSinkConfig, FileSource, FileSourceConfig};
pub use in_mem::{InMemorySink, InMemorySource};
pub use sink::{Sink, SinkBackend};
pub use source::{Source, SourceBackend};
