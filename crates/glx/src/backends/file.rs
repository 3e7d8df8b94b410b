// ai
//! 📂 Previously, on "Things That Could Go Wrong With A File"...
//!
//! The disk was quiet. Too quiet. A lone process had been tasked with reading
//! a dump of raw GitLink items — just a file, they said. One JSON object per
//! line, they said. What could go wrong?
//!
//! Line 4,812 was half a JSON object because the fetcher got OOM-killed mid-write.
//! Line 9,003 was an HTML error page. Somebody's editor added a BOM.
//!
//! This module handles file-based I/O for the glx pipeline. The source reads
//! NDJSON line by line and skips (loudly) the lines that are not raw items.
//! The sink writes enriched documents back out as NDJSON through a BufWriter
//! so we're not doing a syscall per document like some kind of 1995 CGI script.
//!
//! 🚰 File → BufReader → RawItem → Enricher → Vec<EnrichedItem> → NdjsonComposer → BufWriter
//! 💀 Disk full → your problem now
//! 🦆 (mandatory, no notes)

mod file_sink;
mod file_source;

pub use file_sink::{FileSink, FileSinkConfig};
pub use file_source::{FileSource, FileSourceConfig};
