//! Sprint detection: threshold filtering, gap segmentation and per-sprint
//! summaries.

mod segmenter;
mod summary;
mod types;

pub use segmenter::{filter_samples, segment};
pub use summary::{detail_rows, long_sprints, summaries};
pub use types::{Sample, SprintDetailRow, SprintSummary};

use crate::config::SprintConfig;

/// Every sprint view derived from one sample series.
#[derive(Debug, Clone, PartialEq)]
pub struct SprintAnalysis {
    /// Samples that passed the speed threshold.
    pub filtered: usize,
    pub details: Vec<SprintDetailRow>,
    pub summaries: Vec<SprintSummary>,
    pub long_sprints: Vec<SprintSummary>,
}

pub fn analyze<I>(samples: I, config: &SprintConfig) -> SprintAnalysis
where
    I: IntoIterator<Item = Sample>,
{
    let filtered = filter_samples(samples, config.speed_threshold_kmh, config.precision);
    let count = filtered.len();
    let sprints = segment(filtered, config.gap_threshold);
    let summaries = summaries(&sprints);
    let long_sprints = long_sprints(&summaries, config.min_duration, config.precision);

    log::debug!(
        "{} samples above threshold, {} sprints, {} long",
        count,
        sprints.len(),
        long_sprints.len()
    );

    SprintAnalysis {
        filtered: count,
        details: detail_rows(&sprints),
        summaries,
        long_sprints,
    }
}
