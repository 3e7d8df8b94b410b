// AI
//! 📊 progress.rs — "Are we there yet?" — every pipeline, every time, forever.
//!
//! 🚀 Two jobs live here. While the source drains, a spinner counts raw items
//! and enriched documents so the terminal shows signs of life. When the run is
//! over, [`report_table`] turns the [`EnrichReport`] into a table so comfy it has
//! lumbar support.
//!
//! ⚠️  Warning: Watching this spinner will not make it go faster.
//! Neither will refreshing it. We've tried. Science says no.
//!
//! 🦆 The duck has nothing to do with this module. It's just vibing.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::NOTHING};
use indicatif::{ProgressBar, ProgressStyle};

use crate::supervisors::EnrichReport;

/// 🔢 Formats a number with commas for the 3 people in the audience who like readability.
/// "1000000 docs" → "1,000,000 docs" — you're welcome, eyes.
pub(crate) fn format_number(n: u64) -> String {
    let s = n.to_string();
    // -- 🧵 pre-allocate like we know what we're doing (we do, we read the book)
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// ⏱️ Formats a Duration into MM:SS or HH:MM:SS.
/// If it shows HH:MM:SS, you should probably call your mom. It's been a while.
pub(crate) fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// 📊 The live counter behind the spinner. Tracks raw items, enriched documents,
/// and a 5-second sliding window of items/s so spikes don't scare you.
///
/// # Ancient Proverb
/// "He who enriches without a spinner, enriches alone and in darkness."
pub(crate) struct ProgressMetrics {
    /// 🏷️ what are we even reading? a name to display
    source_name: String,
    /// 📄 raw items pulled from the source so far
    raw_items: u64,
    /// 📦 enriched documents produced so far (one issue can make many)
    enriched_items: u64,
    /// 🎨 indicatif does the heavy lifting here
    spinner: ProgressBar,
    /// 🔄 sliding window of (timestamp, raw_items) for rate calculation
    rate_samples: VecDeque<(Instant, u64)>,
    start_time: Instant,
}

impl std::fmt::Debug for ProgressMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // -- 🎭 custom Debug impl because ProgressBar is a diva and doesn't derive Debug
        f.debug_struct("ProgressMetrics")
            .field("source_name", &self.source_name)
            .field("raw_items", &self.raw_items)
            .field("enriched_items", &self.enriched_items)
            .finish()
    }
}

impl ProgressMetrics {
    /// 🚀 Spin up the spinner. indicatif draws to stderr and stays quiet when
    /// stderr is not a terminal, so CI logs don't fill up with carriage returns.
    pub(crate) fn new(source_name: impl Into<String>) -> Self {
        let spinner = ProgressBar::new_spinner();
        // -- 🐛 template is hardcoded; if indicatif ever rejects it we fall back to the plain spinner
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(120));

        let start_time = Instant::now();
        let mut rate_samples = VecDeque::new();
        // -- 🔄 seed the rate window with t=0 so we don't divide by zero like animals
        rate_samples.push_back((start_time, 0u64));

        Self {
            source_name: source_name.into(),
            raw_items: 0,
            enriched_items: 0,
            spinner,
            rate_samples,
            start_time,
        }
    }

    /// 🔄 One raw item went through, producing `enriched` documents (0 if it was skipped).
    pub(crate) fn update(&mut self, enriched: u64) {
        self.raw_items += 1;
        self.enriched_items += enriched;
        let rate = self.items_per_sec();
        self.spinner.set_message(format!(
            "{}: {} raw items, {} enriched, {} items/s, {} elapsed",
            self.source_name,
            format_number(self.raw_items),
            format_number(self.enriched_items),
            format_number(rate as u64),
            format_duration(self.start_time.elapsed()),
        ));
    }

    /// ✅ Clear the spinner. Ring the bell. We made it.
    pub(crate) fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    /// 📈 Raw items per second over the last 5 seconds.
    fn items_per_sec(&mut self) -> f64 {
        let now = Instant::now();
        let window = Duration::from_secs(5);
        // 🔄 evict samples older than the window, like a bouncer but for data points
        while let Some(&(timestamp, _)) = self.rate_samples.front() {
            if now.duration_since(timestamp) > window {
                self.rate_samples.pop_front();
            } else {
                break;
            }
        }
        self.rate_samples.push_back((now, self.raw_items));

        match self.rate_samples.front() {
            Some(&(oldest_time, oldest_items)) => {
                let elapsed = now.duration_since(oldest_time).as_secs_f64();
                if elapsed > 0.0 {
                    self.raw_items.saturating_sub(oldest_items) as f64 / elapsed
                } else {
                    0.0
                }
            }
            // -- 💤 unreachable in practice, we just pushed
            None => 0.0,
        }
    }
}

/// 🍽️ The end-of-run summary. Two columns, right-aligned numbers, no borders.
///
/// ```text
///   raw items read        1,204
///   items skipped             3
///   submitted             5,310
///   written               5,308
///   missing                   2
///   flushes                  27
///   elapsed               00:41
/// ```
pub fn report_table(report: &EnrichReport) -> Table {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let rows = [
        ("raw items read", format_number(report.items_read)),
        ("items skipped", format_number(report.items_skipped)),
        ("submitted", format_number(report.submitted)),
        ("written", format_number(report.written)),
        ("missing", format_number(report.missing())),
        ("flushes", format_number(report.flushes)),
        ("elapsed", format_duration(report.elapsed)),
    ];
    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_big_numbers_get_their_commas() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn the_one_where_hours_only_show_up_when_earned() {
        assert_eq!(format_duration(Duration::from_secs(61)), "01:01");
        assert_eq!(format_duration(Duration::from_secs(3_725)), "01:02:05");
    }

    #[test]
    fn the_one_where_the_report_table_tells_the_whole_story() {
        let report = EnrichReport {
            items_read: 1_204,
            items_skipped: 3,
            submitted: 5_310,
            written: 5_308,
            flushes: 27,
            elapsed: Duration::from_secs(41),
        };
        let rendered = report_table(&report).to_string();
        assert!(rendered.contains("1,204"));
        assert!(rendered.contains("5,308"));
        assert!(rendered.contains("missing"));
        assert!(rendered.contains("00:41"));
    }

    #[test]
    fn the_one_where_the_spinner_counts_quietly() {
        let mut metrics = ProgressMetrics::new("gitlink");
        metrics.update(3);
        metrics.update(0);
        metrics.finish();
        assert_eq!(metrics.raw_items, 2);
        assert_eq!(metrics.enriched_items, 3);
    }
}
