//! # Previously, on glx...
//!
//! 🎬 The raw items were trapped in a test function. No disk. No cluster. No
//! docker-compose file with seventeen services. Someone had to give them a way
//! into the pipeline and a place to land afterwards.
//!
//! That someone was this module.
//!
//! `in_mem` provides an in-memory [`Source`](crate::backends::Source) and
//! [`Sink`](crate::backends::Sink) for tests and local runs. The
//! [`InMemorySource`] hands out a fixed list of raw items, front to back, then
//! yields nothing further. The [`InMemorySink`] keeps every document it receives
//! behind an `Arc<Mutex<...>>` so callers can inspect what arrived.
//!
//! 🦆
//!
//! ⚠️ This is NOT for production. If you're deploying this to prod, please also
//! deploy a therapist.

mod in_mem_sink;
mod in_mem_source;

pub use in_mem_sink::InMemorySink;
pub use in_mem_source::InMemorySource;
