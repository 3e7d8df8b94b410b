//! 🎬 *[camera pans across a dimly lit server room]*
//! 🎬 *[dramatic orchestral music swells]*
//! 🎬 "In a world where raw issues pile up endlessly..."
//! 🎬 "One supervisor dared to batch them all."
//! 🎬 *[record scratch]* 🦆
//!
//! 📦 The Supervisor module — part middle manager, part helicopter parent.
//!
//! It owns the loop: pull one raw item, enrich it, buffer the documents, and
//! flush to the sink whenever the buffer reaches `batch_size`. Whatever is left
//! at EOF is flushed exactly once. After every flush it compares what it sent
//! with what the sink says it wrote and complains, loudly, about the gap.
//!
//! 🧵 Sequential on purpose: one await on the source, one transform, one await
//! on the sink when the batch is full. The buffer never leaves this module.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use crate::backends::{Sink, Source};
use crate::common::{EnrichedItem, UNIQUE_ID_FIELD};
use crate::progress::ProgressMetrics;
use crate::transforms::{EnrichConfig, Enricher};

/// 🧾 What happened during one run. Summed across every flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichReport {
    /// 📄 raw items pulled from the source
    pub items_read: u64,
    /// 🗑️ raw items that failed to enrich and were skipped
    pub items_skipped: u64,
    /// 📦 enriched documents handed to the sink
    pub submitted: u64,
    /// ✅ enriched documents the sink says it wrote
    pub written: u64,
    /// 🚽 how many times we flushed
    pub flushes: u64,
    pub elapsed: Duration,
}

impl EnrichReport {
    /// 🕳️ Documents that went in and never came out.
    pub fn missing(&self) -> u64 {
        self.submitted.saturating_sub(self.written)
    }
}

/// 📦 The Supervisor: because even a for-loop needs someone hovering over it
/// asking "is it done yet?"
#[derive(Debug)]
pub(crate) struct Supervisor {
    enricher: Enricher,
}

impl Supervisor {
    pub(crate) fn new(config: EnrichConfig) -> Self {
        Self {
            enricher: Enricher::new(config),
        }
    }

    /// 🚀 Drain `source` into `sink`, then close the sink.
    ///
    /// The configuration is validated before the first read. Per-item failures
    /// are logged and skipped. A sink `Err` ends the run.
    pub(crate) async fn run<S, K>(&self, source: &mut S, sink: &mut K) -> Result<EnrichReport>
    where
        S: Source + ?Sized,
        K: Sink + ?Sized,
    {
        let config = self.enricher.config();
        config
            .validate()
            .context("💀 The enrichment config was rejected before a single item was read.")?;
        let data_source = config.data_source.as_deref().unwrap_or_default();
        let batch_size = config.batch_size;

        let started = Instant::now();
        let mut report = EnrichReport::default();
        let mut progress = ProgressMetrics::new(data_source);
        let mut batch: Vec<EnrichedItem> = Vec::with_capacity(batch_size);

        info!("🚀 enriching gitlink items for '{}'", data_source);
        while let Some(item) = source
            .next_item()
            .await
            .context("💀 The source broke down mid-run. Whatever was read so far has been enriched, the rest is still out there.")?
        {
            report.items_read += 1;
            match self.enricher.enrich_item(&item) {
                Ok(documents) => {
                    progress.update(documents.len() as u64);
                    batch.extend(documents);
                }
                Err(err) => {
                    progress.update(0);
                    report.items_skipped += 1;
                    error!(
                        "💀 skipping raw item {} from {}: {}",
                        item.uuid.as_deref().unwrap_or("<no uuid>"),
                        item.origin.as_deref().unwrap_or("<no origin>"),
                        err
                    );
                }
            }

            if batch.len() >= batch_size {
                self.flush(sink, std::mem::take(&mut batch), &mut report).await?;
            }
        }

        if !batch.is_empty() {
            self.flush(sink, batch, &mut report).await?;
        }
        progress.finish();

        sink.close()
            .await
            .context("💀 The sink refused to close gracefully. The last documents may still be in a buffer somewhere.")?;

        report.elapsed = started.elapsed();
        if report.written == report.submitted {
            info!(
                "✅ DONE: {} raw items read, {} skipped, {}/{} documents written in {} flushes",
                report.items_read, report.items_skipped, report.written, report.submitted, report.flushes
            );
        } else {
            error!(
                "💀 DONE with gaps: {} raw items read, {} skipped, {}/{} documents written ({} missing) in {} flushes",
                report.items_read,
                report.items_skipped,
                report.written,
                report.submitted,
                report.missing(),
                report.flushes
            );
        }
        Ok(report)
    }

    /// 🚽 Hand one batch to the sink and reconcile the count. A gap is logged, never retried.
    async fn flush<K>(&self, sink: &mut K, batch: Vec<EnrichedItem>, report: &mut EnrichReport) -> Result<()>
    where
        K: Sink + ?Sized,
    {
        let submitted = batch.len();
        debug!("🚽 flushing {} enriched documents", submitted);
        let written = sink
            .bulk_upload(batch, UNIQUE_ID_FIELD)
            .await
            .with_context(|| format!("💀 Flush #{} of {} documents failed in transit.", report.flushes + 1, submitted))?;

        report.flushes += 1;
        report.submitted += submitted as u64;
        report.written += written as u64;
        if written != submitted {
            let missing = submitted.saturating_sub(written);
            error!(
                "💀 {}/{} missing items for gitlink",
                missing, submitted
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    use crate::backends::InMemorySource;
    use crate::common::RawItem;
    use crate::errors::ConfigError;
    use crate::transforms::test_fixtures;

    /// 🎭 A sink that writes nothing, remembers every batch size (and what it
    /// claimed to write), and can be told to lose documents.
    #[derive(Debug, Default)]
    struct MockSink {
        batches: Vec<usize>,
        written: Vec<usize>,
        lose_per_batch: usize,
        closed: u32,
    }

    #[async_trait]
    impl Sink for MockSink {
        async fn bulk_upload(&mut self, items: Vec<EnrichedItem>, _id_field: &str) -> Result<usize> {
            let written = items.len().saturating_sub(self.lose_per_batch);
            self.batches.push(items.len());
            self.written.push(written);
            Ok(written)
        }

        async fn close(&mut self) -> Result<()> {
            self.closed += 1;
            Ok(())
        }
    }

    /// 🐛 `n` closed issues without comments; each one enriches to exactly one document.
    fn issues(n: i64) -> Vec<RawItem> {
        (0..n)
            .map(|i| {
                let mut item = test_fixtures::issue(3, json!([]));
                item.data["id"] = json!(1_000 + i);
                item
            })
            .collect()
    }

    /// 💬 `n` closed issues with two comments each; each one enriches to three documents.
    fn chatty_issues(n: i64) -> Vec<RawItem> {
        (0..n)
            .map(|i| {
                let comments = json!([
                    test_fixtures::comment(1, Some("cy"), "Cy", "2023-01-02T10:00:00"),
                    test_fixtures::comment(2, Some("di"), "Di", "2023-01-03T10:00:00"),
                ]);
                let mut item = test_fixtures::issue(3, comments);
                item.data["id"] = json!(5_000 + i);
                item
            })
            .collect()
    }

    fn config(batch_size: usize) -> EnrichConfig {
        EnrichConfig {
            data_source: Some("gitlink_issues".into()),
            batch_size,
            ..EnrichConfig::default()
        }
    }

    #[tokio::test]
    async fn the_one_where_two_hundred_means_flush() -> Result<()> {
        let mut source = InMemorySource::new(issues(450));
        let mut sink = MockSink::default();

        let report = Supervisor::new(config(200)).run(&mut source, &mut sink).await?;

        assert_eq!(sink.batches, vec![200, 200, 50], "the remainder goes out exactly once");
        assert_eq!(sink.closed, 1);
        assert_eq!(report.items_read, 450);
        assert_eq!(report.submitted, 450);
        assert_eq!(report.written, 450);
        assert_eq!(report.flushes, 3);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_the_sink_loses_two_and_nobody_panics() -> Result<()> {
        let mut source = InMemorySource::new(issues(400));
        let mut sink = MockSink {
            lose_per_batch: 2,
            ..MockSink::default()
        };

        let report = Supervisor::new(config(200)).run(&mut source, &mut sink).await?;

        assert_eq!(sink.batches, vec![200, 200]);
        assert_eq!(sink.written, vec![198, 198], "the gap is per flush");
        assert_eq!(report.submitted, 400);
        assert_eq!(report.written, 396, "198 + 198, summed across the run");
        assert_eq!(report.missing(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_comments_count_toward_the_threshold() -> Result<()> {
        // 📐 70 raw issues × 3 documents = 210. The check runs after each raw item,
        // so the 67th pushes the buffer to 201 and the last 3 items leave 9 behind.
        let mut source = InMemorySource::new(chatty_issues(70));
        let mut sink = MockSink {
            lose_per_batch: 2,
            ..MockSink::default()
        };

        let report = Supervisor::new(config(200)).run(&mut source, &mut sink).await?;

        assert_eq!(sink.batches, vec![201, 9], "documents, not raw items, fill the buffer");
        assert_eq!(sink.written, vec![199, 7]);
        assert_eq!(report.items_read, 70);
        assert_eq!(report.submitted, 210);
        assert_eq!(report.written, 206);
        assert_eq!(report.missing(), 4);
        assert_eq!(report.flushes, 2);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_an_exact_multiple_leaves_nothing_behind() -> Result<()> {
        let mut source = InMemorySource::new(issues(200));
        let mut sink = MockSink::default();

        Supervisor::new(config(200)).run(&mut source, &mut sink).await?;

        assert_eq!(sink.batches, vec![200], "no empty trailing flush");
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_the_source_is_empty() -> Result<()> {
        let mut source = InMemorySource::new(Vec::new());
        let mut sink = MockSink::default();

        let report = Supervisor::new(config(200)).run(&mut source, &mut sink).await?;

        assert!(sink.batches.is_empty());
        assert_eq!(sink.closed, 1, "the sink is closed even when nothing was sent");
        assert_eq!(report.flushes, 0);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_bad_items_are_skipped_not_fatal() -> Result<()> {
        let mut items = issues(2);
        items.insert(1, test_fixtures::raw("wiki_page", json!({})));
        items.insert(2, test_fixtures::raw("issue", json!({"html_url": 42})));
        let mut source = InMemorySource::new(items);
        let mut sink = MockSink::default();

        let report = Supervisor::new(config(200)).run(&mut source, &mut sink).await?;

        assert_eq!(report.items_read, 4);
        assert_eq!(report.items_skipped, 2);
        assert_eq!(sink.batches, vec![2]);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_no_data_source_means_no_reading() {
        let mut source = InMemorySource::new(issues(3));
        let mut sink = MockSink::default();

        let err = Supervisor::new(EnrichConfig::default())
            .run(&mut source, &mut sink)
            .await
            .expect_err("💀 a missing data_source must stop the run");

        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::MissingDataSource));
        assert!(sink.batches.is_empty());
        assert!(
            source.next_item().await.ok().flatten().is_some(),
            "the source was never touched"
        );
    }
}
