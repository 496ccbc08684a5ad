use chrono::Duration;

use super::types::{Sprint, SprintDetailRow, SprintSummary};
use crate::normalize::fixed;

pub fn summarize(sprint: &Sprint) -> SprintSummary {
    SprintSummary {
        sprint: sprint.id(),
        start: sprint.start(),
        end: sprint.end(),
        total_duration: sprint.total_duration(),
    }
}

/// One summary per sprint, ordered by end time. The sort is stable, so
/// sprints ending at the same instant keep their id order.
pub fn summaries(sprints: &[Sprint]) -> Vec<SprintSummary> {
    let mut rows: Vec<SprintSummary> = sprints.iter().map(summarize).collect();
    rows.sort_by_key(|row| row.end);
    rows
}

/// Summaries lasting at least `min_duration`, keeping their order. Both
/// sides are compared at the display `precision`, so a row shown as the
/// threshold value is kept.
pub fn long_sprints(
    summaries: &[SprintSummary],
    min_duration: Duration,
    precision: u32,
) -> Vec<SprintSummary> {
    let min_units = fixed::quantize_seconds(min_duration, precision);
    summaries
        .iter()
        .filter(|row| fixed::quantize_seconds(row.total_duration, precision) >= min_units)
        .cloned()
        .collect()
}

/// One row per sample, ordered by sprint id then timestamp.
pub fn detail_rows(sprints: &[Sprint]) -> Vec<SprintDetailRow> {
    let mut rows: Vec<SprintDetailRow> = sprints
        .iter()
        .flat_map(|sprint| {
            let samples = sprint.samples();
            samples.iter().enumerate().map(move |(i, sample)| SprintDetailRow {
                sprint: sprint.id(),
                timestamp: sample.timestamp(),
                speed_kmh: sample.speed_kmh(),
                until_next: samples
                    .get(i + 1)
                    .map(|next| next.timestamp() - sample.timestamp())
                    .unwrap_or_else(Duration::zero),
            })
        })
        .collect();
    rows.sort_by_key(|row| (row.sprint, row.timestamp));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprint::segment;
    use crate::sprint::testing::{filtered, filtered_ms, filtered_us, seconds_of};
    use crate::sprint::types::SprintId;

    const GAP: Duration = Duration::seconds(5);
    const ONE_SECOND: Duration = Duration::seconds(1);

    #[test]
    fn trailing_durations_reset_at_sprint_end() {
        let sprints = segment(filtered(&[0, 1, 2, 8, 9]), GAP);
        let rows = detail_rows(&sprints);
        let trailing: Vec<i64> = rows.iter().map(|r| r.until_next.num_seconds()).collect();
        assert_eq!(trailing, vec![1, 1, 0, 1, 0]);
        let sprint_ids: Vec<u32> = rows.iter().map(|r| r.sprint.0).collect();
        assert_eq!(sprint_ids, vec![1, 1, 1, 2, 2]);
    }

    #[test]
    fn summary_spans_first_to_last_sample() {
        let sprints = segment(filtered(&[0, 1, 2, 8, 9]), GAP);
        let rows = summaries(&sprints);
        assert_eq!(rows.len(), 2);
        assert_eq!(seconds_of(rows[0].start), 0);
        assert_eq!(seconds_of(rows[0].end), 2);
        assert_eq!(rows[0].total_duration, Duration::seconds(2));
        assert_eq!(rows[1].total_duration, Duration::seconds(1));

        let long = long_sprints(&rows, ONE_SECOND, 3);
        assert_eq!(long, rows);
    }

    #[test]
    fn singleton_sprint_is_not_long() {
        let sprints = segment(filtered(&[5]), GAP);
        let rows = summaries(&sprints);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_duration, Duration::zero());
        assert!(long_sprints(&rows, ONE_SECOND, 3).is_empty());

        let details = detail_rows(&sprints);
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].until_next, Duration::zero());
    }

    #[test]
    fn empty_series_produces_empty_views() {
        let sprints = segment(Vec::new(), GAP);
        assert!(summaries(&sprints).is_empty());
        assert!(detail_rows(&sprints).is_empty());
        assert!(long_sprints(&summaries(&sprints), ONE_SECOND, 3).is_empty());
    }

    #[test]
    fn long_sprint_boundary_is_inclusive() {
        let sprints = segment(filtered_ms(&[0, 999, 10_000, 11_000]), GAP);
        let rows = summaries(&sprints);
        let long = long_sprints(&rows, ONE_SECOND, 3);
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].sprint, SprintId(2));
    }

    #[test]
    fn long_sprint_threshold_uses_displayed_digits() {
        // 0.9996 s is shown as 1.000 at three decimals.
        let sprints = segment(filtered_us(&[0, 999_600]), GAP);
        let rows = summaries(&sprints);
        assert_eq!(
            fixed::display_seconds(rows[0].total_duration, 3),
            "1.000"
        );
        assert_eq!(long_sprints(&rows, ONE_SECOND, 3), rows);

        // At six decimals it shows as 0.999600 and falls short.
        assert!(long_sprints(&rows, ONE_SECOND, 6).is_empty());

        // At zero decimals 0.5 s rounds up to 1, 0.4 s does not.
        let sprints = segment(filtered_ms(&[0, 500, 10_000, 10_400]), GAP);
        let rows = summaries(&sprints);
        let long: Vec<u32> = long_sprints(&rows, ONE_SECOND, 0)
            .iter()
            .map(|r| r.sprint.0)
            .collect();
        assert_eq!(long, vec![1]);
    }

    #[test]
    fn long_sprints_preserve_summary_order() {
        let sprints = segment(filtered(&[0, 3, 10, 20, 21, 30, 32]), GAP);
        let rows = summaries(&sprints);
        let long = long_sprints(&rows, Duration::seconds(2), 3);
        let expected: Vec<SprintSummary> = rows
            .iter()
            .filter(|r| r.total_duration >= Duration::seconds(2))
            .cloned()
            .collect();
        assert_eq!(long, expected);
        let long_ids: Vec<u32> = long.iter().map(|r| r.sprint.0).collect();
        assert_eq!(long_ids, vec![1, 4]);
    }

    #[test]
    fn summaries_are_ordered_by_end_time() {
        let sprints = segment(filtered(&[40, 41, 0, 20, 22, 23]), GAP);
        let rows = summaries(&sprints);
        assert!(rows.windows(2).all(|w| w[0].end <= w[1].end));
        let ends: Vec<i64> = rows.iter().map(|r| seconds_of(r.end)).collect();
        assert_eq!(ends, vec![0, 23, 41]);
    }

    #[test]
    fn sprint_ids_past_nine_sort_numerically() {
        let seconds: Vec<i64> = (0..12).map(|i| i * 10).collect();
        let sprints = segment(filtered(&seconds), GAP);
        let rows = detail_rows(&sprints);
        let sprint_ids: Vec<u32> = rows.iter().map(|r| r.sprint.0).collect();
        assert_eq!(sprint_ids, (1..=12).collect::<Vec<u32>>());
        assert_eq!(rows[11].sprint.label(), "Sprint 12");
    }
}
