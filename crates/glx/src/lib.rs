//! 🧪 glx — GitLink raw items in, flat enriched documents out.
//!
//! 🎬 *[narrator voice]* "It started with an NDJSON dump and a question nobody
//! could answer: how long do our issues stay open?"
//!
//! The crate is laid out like a pipeline:
//! - [`backends`]: where raw items come from and enriched documents go
//! - [`payloads`]: typed views over the raw `data` blobs
//! - [`transforms`]: the enrichment itself, one raw item at a time
//! - [`identities`]: who did what, and how to forget their names
//! - `supervisors`: the batch loop that ties it all together
//!
//! [`run`] is the front door. The CLI calls it. Tests mostly don't. 🦆

use anyhow::{Context, Result};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::info;

pub mod app_config;
pub mod backends;
pub mod common;
mod composers;
pub mod errors;
pub mod identities;
pub mod payloads;
pub mod progress;
mod supervisors;
pub mod transforms;

use crate::app_config::{AppConfig, SinkConfig, SourceConfig};
use crate::backends::{
    ElasticsearchSink, FileSink, FileSource, InMemorySink, SinkBackend, Source, SourceBackend,
};
pub use crate::supervisors::EnrichReport;

/// 🚀 Build the backends from config, drain the source through the enricher into the sink.
pub async fn run(app_config: AppConfig) -> Result<EnrichReport> {
    let AppConfig {
        source_config,
        sink_config,
        enrich,
    } = app_config;
    // ✅ before any backend is built, so a bad config doesn't cost an Elasticsearch ping
    enrich
        .validate()
        .context("💀 The enrichment config was rejected before a single item was read.")?;

    let mut source = build_source(source_config).await?;
    let mut sink = build_sink(sink_config).await?;
    supervisors::Supervisor::new(enrich)
        .run(&mut source, &mut sink)
        .await
}

/// 🚰 Config in, source out.
pub async fn build_source(source_config: SourceConfig) -> Result<SourceBackend> {
    Ok(match source_config {
        SourceConfig::File(config) => SourceBackend::File(
            FileSource::new(config)
                .await
                .context("💀 Could not open the file source.")?,
        ),
    })
}

/// 🕳️ Config in, sink out. The Elasticsearch sink pings the cluster on the way.
pub async fn build_sink(sink_config: SinkConfig) -> Result<SinkBackend> {
    Ok(match sink_config {
        SinkConfig::Elasticsearch(config) => SinkBackend::Elasticsearch(
            ElasticsearchSink::new(config)
                .await
                .context("💀 Could not reach the Elasticsearch sink.")?,
        ),
        SinkConfig::File(config) => SinkBackend::File(
            FileSink::new(config)
                .await
                .context("💀 Could not create the file sink.")?,
        ),
        SinkConfig::InMemory => SinkBackend::InMemory(InMemorySink::new()),
    })
}

/// 🪪 Write every identity found in `source` as one JSON line each. Returns how many.
pub async fn write_identities<S, W>(source: &mut S, out: &mut W) -> Result<u64>
where
    S: Source + ?Sized,
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(item) = source.next_item().await? {
        for identity in identities::identities(&item) {
            let line = serde_json::to_string(&identity)
                .context("💀 An identity refused to become JSON.")?;
            out.write_all(line.as_bytes()).await?;
            out.write_all(b"\n").await?;
            written += 1;
        }
    }
    out.flush().await.context("💀 The identities never left the buffer.")?;
    info!("🪪 wrote {} identities", written);
    Ok(written)
}

/// 🥸 Write every raw item in `source` back out with its people hashed. Returns how many.
pub async fn write_anonymized<S, W>(source: &mut S, out: &mut W) -> Result<u64>
where
    S: Source + ?Sized,
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(mut item) = source.next_item().await? {
        identities::anonymize_item(&mut item);
        let line = serde_json::to_string(&item)
            .context("💀 An anonymized raw item refused to become JSON.")?;
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        written += 1;
    }
    out.flush().await.context("💀 The anonymized items never left the buffer.")?;
    info!("🥸 anonymized {} raw items", written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{FileSinkConfig, FileSourceConfig, InMemorySource};
    use crate::transforms::{EnrichConfig, test_fixtures};
    use serde_json::{Value, json};

    #[tokio::test]
    async fn the_one_where_a_file_goes_in_and_a_file_comes_out() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let raw_path = dir.path().join("raw.ndjson");
        let out_path = dir.path().join("enriched.ndjson");
        let raw_items = [
            test_fixtures::issue(
                3,
                json!([test_fixtures::comment(5, Some("cy"), "Cy", "2023-01-02T10:00:00")]),
            ),
            test_fixtures::raw(
                "repository",
                json!({"forks_count": 3, "subscribers_count": 10, "stargazers_count": 7,
                       "fetched_on": "2023-01-01T00:00:00"}),
            ),
        ];
        let mut ndjson = String::new();
        for item in &raw_items {
            ndjson.push_str(&serde_json::to_string(item)?);
            ndjson.push('\n');
        }
        tokio::fs::write(&raw_path, ndjson).await?;

        let report = run(AppConfig {
            source_config: SourceConfig::File(FileSourceConfig {
                file_name: raw_path.display().to_string(),
            }),
            sink_config: SinkConfig::File(FileSinkConfig {
                file_name: out_path.display().to_string(),
            }),
            enrich: EnrichConfig {
                data_source: Some("gitlink_issues".into()),
                ..EnrichConfig::default()
            },
        })
        .await?;

        assert_eq!(report.items_read, 2);
        assert_eq!(report.submitted, 3, "issue + its comment + repository");
        assert_eq!(report.written, 3);
        let written = tokio::fs::read_to_string(&out_path).await?;
        let types: Vec<String> = written
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).map(|v| v["item_type"].to_string()))
            .collect::<Result<_, _>>()?;
        assert_eq!(types, vec![r#""issue""#, r#""comment""#, r#""repository""#]);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_identities_come_out_one_per_line() -> Result<()> {
        let mut source = InMemorySource::new(vec![test_fixtures::issue(1, json!([]))]);
        let mut out = Vec::new();

        let count = write_identities(&mut source, &mut out).await?;

        let text = String::from_utf8(out)?;
        assert_eq!(count, 2, "author ana and assignee bo");
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains(r#""username":"ana""#));
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_nobody_is_recognizable_afterwards() -> Result<()> {
        let mut source = InMemorySource::new(vec![test_fixtures::issue(1, json!([]))]);
        let mut out = Vec::new();

        let count = write_anonymized(&mut source, &mut out).await?;

        let text = String::from_utf8(out)?;
        assert_eq!(count, 1);
        assert!(!text.contains("ana@example.com"));
        assert!(text.contains(&identities::hash_value("ana")));
        Ok(())
    }
}
