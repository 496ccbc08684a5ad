use chrono::Duration;

use super::types::{FilteredSample, Sample, Sprint, SprintId};
use crate::normalize::speed;

/// Keeps the samples whose km/h speed reaches `threshold_kmh` at the given
/// display precision.
pub fn filter_samples<I>(samples: I, threshold_kmh: f64, precision: u32) -> Vec<FilteredSample>
where
    I: IntoIterator<Item = Sample>,
{
    samples
        .into_iter()
        .filter(|s| speed::meets_threshold(s.speed_kmh(), threshold_kmh, precision))
        .map(FilteredSample::new)
        .collect()
}

/// Partitions `samples` into sprints.
///
/// Samples are stably sorted by timestamp first. A sample opens a new sprint
/// when it follows the previous one by strictly more than `gap_threshold`;
/// a gap equal to the threshold continues the current sprint.
pub fn segment(mut samples: Vec<FilteredSample>, gap_threshold: Duration) -> Vec<Sprint> {
    samples.sort_by_key(|s| s.timestamp());

    samples
        .into_iter()
        .fold(Vec::new(), |mut sprints: Vec<Sprint>, sample| {
            match sprints.last_mut() {
                Some(current) if sample.timestamp() - current.end() <= gap_threshold => {
                    current.push(sample);
                }
                _ => {
                    let id = SprintId(sprints.len() as u32 + 1);
                    sprints.push(Sprint::open(id, sample));
                }
            }
            sprints
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprint::testing::{filtered, filtered_ms, seconds_of};

    const GAP: Duration = Duration::seconds(5);

    fn seconds_by_sprint(sprints: &[Sprint]) -> Vec<Vec<i64>> {
        sprints
            .iter()
            .map(|s| s.samples().iter().map(|f| seconds_of(f.timestamp())).collect())
            .collect()
    }

    #[test]
    fn splits_on_gaps_larger_than_threshold() {
        let sprints = segment(filtered(&[0, 1, 2, 8, 9]), GAP);
        assert_eq!(seconds_by_sprint(&sprints), vec![vec![0, 1, 2], vec![8, 9]]);
        assert_eq!(sprints[0].id(), SprintId(1));
        assert_eq!(sprints[1].id(), SprintId(2));
    }

    #[test]
    fn gap_equal_to_threshold_stays_in_sprint() {
        let sprints = segment(filtered(&[0, 5, 10]), GAP);
        assert_eq!(seconds_by_sprint(&sprints), vec![vec![0, 5, 10]]);
    }

    #[test]
    fn gap_just_above_threshold_starts_new_sprint() {
        let sprints = segment(filtered_ms(&[0, 5_001]), GAP);
        assert_eq!(sprints.len(), 2);
        let sprints = segment(filtered_ms(&[0, 5_000]), GAP);
        assert_eq!(sprints.len(), 1);
    }

    #[test]
    fn empty_input_yields_no_sprints() {
        assert!(segment(Vec::new(), GAP).is_empty());
    }

    #[test]
    fn single_sample_is_a_zero_length_sprint() {
        let sprints = segment(filtered(&[5]), GAP);
        assert_eq!(sprints.len(), 1);
        assert_eq!(sprints[0].total_duration(), Duration::zero());
    }

    #[test]
    fn unsorted_input_is_ordered_before_grouping() {
        let sprints = segment(filtered(&[9, 0, 8, 2, 1]), GAP);
        assert_eq!(seconds_by_sprint(&sprints), vec![vec![0, 1, 2], vec![8, 9]]);
    }

    #[test]
    fn duplicate_timestamps_share_a_sprint() {
        let sprints = segment(filtered(&[3, 3, 3]), GAP);
        assert_eq!(sprints.len(), 1);
        assert_eq!(sprints[0].samples().len(), 3);
    }

    #[test]
    fn partition_keeps_every_sample_exactly_once() {
        let input = [0, 1, 7, 8, 20, 21, 22, 40, 44, 50, 56];
        let sprints = segment(filtered(&input), GAP);
        let mut seen: Vec<i64> = seconds_by_sprint(&sprints).into_iter().flatten().collect();
        seen.sort();
        assert_eq!(seen, input.to_vec());

        for pair in sprints.windows(2) {
            assert!(pair[1].start() - pair[0].end() > GAP);
        }
        for sprint in &sprints {
            for pair in sprint.samples().windows(2) {
                assert!(pair[1].timestamp() - pair[0].timestamp() <= GAP);
            }
        }
    }

    #[test]
    fn filter_keeps_inclusive_threshold() {
        let samples = crate::sprint::testing::samples(&[(0, 7.0), (1, 6.99), (2, 10.0)]);
        let kept = filter_samples(samples, 25.2, 3);
        let seconds: Vec<i64> = kept.iter().map(|f| seconds_of(f.timestamp())).collect();
        assert_eq!(seconds, vec![0, 2]);
    }
}
