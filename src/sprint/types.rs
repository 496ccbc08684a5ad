use chrono::{Duration, NaiveDateTime};
use std::fmt;

use crate::normalize::speed;

/// Numeric sprint identifier, 1-based in order of first appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SprintId(pub u32);

impl SprintId {
    pub fn label(&self) -> String {
        format!("Sprint {}", self.0)
    }
}

impl fmt::Display for SprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub speed_ms: f64,
}

impl Sample {
    pub fn speed_kmh(&self) -> f64 {
        speed::to_kmh(self.speed_ms)
    }
}

/// A sample that passed the speed threshold. Only
/// [`filter_samples`](super::filter_samples) hands these out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilteredSample(Sample);

impl FilteredSample {
    pub(crate) fn new(sample: Sample) -> Self {
        Self(sample)
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.0.timestamp
    }

    pub fn speed_kmh(&self) -> f64 {
        self.0.speed_kmh()
    }
}

/// A non-empty, time-ordered run of filtered samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprint {
    id: SprintId,
    samples: Vec<FilteredSample>,
}

impl Sprint {
    pub(crate) fn open(id: SprintId, first: FilteredSample) -> Self {
        Self {
            id,
            samples: vec![first],
        }
    }

    pub(crate) fn push(&mut self, sample: FilteredSample) {
        self.samples.push(sample);
    }

    pub fn id(&self) -> SprintId {
        self.id
    }

    pub fn samples(&self) -> &[FilteredSample] {
        &self.samples
    }

    // samples are sorted and never empty
    pub fn start(&self) -> NaiveDateTime {
        self.samples[0].timestamp()
    }

    pub fn end(&self) -> NaiveDateTime {
        self.samples[self.samples.len() - 1].timestamp()
    }

    pub fn total_duration(&self) -> Duration {
        self.end() - self.start()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SprintDetailRow {
    pub sprint: SprintId,
    pub timestamp: NaiveDateTime,
    pub speed_kmh: f64,
    /// Time to the next sample of the same sprint, zero for its last sample.
    pub until_next: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SprintSummary {
    pub sprint: SprintId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub total_duration: Duration,
}
