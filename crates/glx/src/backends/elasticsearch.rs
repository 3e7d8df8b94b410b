//! # 📡 THE ELASTICSEARCH BACKEND
//!
//! *Previously, on glx...*
//!
//! 🎬 COLD OPEN — INT. SERVER ROOM — 3:47 AM
//!
//! The dashboard glows amber. The enriched issues are ready, flat and
//! beautiful, every `time_to_close_days` computed with love. All that stands
//! between them and a Kibana panel is one HTTP POST. The cluster answers
//! 200 OK, which means nothing, because the bulk API reports failure per item
//! inside a success. Our hero reads the `items` array. Two documents hit a
//! mapping conflict. Nobody would have noticed.
//!
//! 🚀 This module sends enriched documents to `/<index>/_bulk` and counts how
//! many of them the cluster actually accepted. That count is the whole point:
//! the pipeline compares it against what it submitted and complains loudly
//! about the difference.
//!
//! 🦆 (mandatory duck, no context provided, none shall be requested)

mod elasticsearch_sink;

pub use elasticsearch_sink::{ElasticsearchSink, ElasticsearchSinkConfig};
