//! Streaks, averages and day-of-week distribution over the diary

use crate::managers::{DiaryManager, Manager};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Consecutive days ending today with at least one entry.
///
/// Zero when there is no entry today.
pub fn streak(diary: &DiaryManager, today: NaiveDate) -> u32 {
    let dates: HashSet<NaiveDate> = diary.records().iter().map(|e| e.date).collect();
    let mut streak = 0;
    let mut day = today;
    while dates.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Total hours over the span from the oldest to the newest entry, inclusive
pub fn daily_average(diary: &DiaryManager) -> f64 {
    let entries = diary.records();
    let (Some(oldest), Some(newest)) = (
        entries.iter().map(|e| e.date).min(),
        entries.iter().map(|e| e.date).max(),
    ) else {
        return 0.0;
    };
    let span = (newest - oldest).num_days() + 1;
    diary.total_hours() / span as f64
}

/// Most hours logged on a single date
pub fn record_day(diary: &DiaryManager) -> f64 {
    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for entry in diary.records() {
        *per_day.entry(entry.date).or_default() += entry.hours;
    }
    per_day.into_values().fold(0.0, f64::max)
}

/// Hours per weekday over all history, index 0 = Sunday
pub fn weekly_heatmap(diary: &DiaryManager) -> [f64; 7] {
    let mut heatmap = [0.0; 7];
    for entry in diary.records() {
        heatmap[entry.date.weekday().num_days_from_sunday() as usize] += entry.hours;
    }
    heatmap
}

/// Number of distinct (year, month, day-of-month / 7) buckets with entries
pub fn distinct_week_buckets(diary: &DiaryManager) -> usize {
    diary
        .records()
        .iter()
        .map(|e| (e.date.year(), e.date.month(), e.date.day() / 7))
        .collect::<BTreeSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::NewDiaryEntry;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn diary(entries: &[(NaiveDate, f64)]) -> DiaryManager {
        let mut diary = DiaryManager::new(Vec::new());
        for (date, hours) in entries {
            diary
                .add_entry(NewDiaryEntry {
                    date: *date,
                    subject: "Latin".to_string(),
                    hours: *hours,
                    comprehension: 6,
                    stress: 5,
                    notes: String::new(),
                })
                .unwrap();
        }
        diary
    }

    #[test]
    fn test_streak_stops_at_gap() {
        let today = date(2024, 3, 10);
        let d = diary(&[(today, 1.0), (date(2024, 3, 9), 1.0), (date(2024, 3, 7), 1.0)]);
        assert_eq!(streak(&d, today), 2);
    }

    #[test]
    fn test_streak_breaks_without_entry_today() {
        let d = diary(&[(date(2024, 3, 9), 1.0), (date(2024, 3, 8), 1.0)]);
        assert_eq!(streak(&d, date(2024, 3, 10)), 0);
        assert_eq!(streak(&diary(&[]), date(2024, 3, 10)), 0);
    }

    #[test]
    fn test_streak_counts_duplicate_dates_once() {
        let today = date(2024, 3, 10);
        let d = diary(&[(today, 1.0), (today, 2.0), (date(2024, 3, 9), 1.0)]);
        assert_eq!(streak(&d, today), 2);
    }

    #[test]
    fn test_daily_average() {
        assert_eq!(daily_average(&diary(&[])), 0.0);
        assert_eq!(daily_average(&diary(&[(date(2024, 1, 1), 3.0)])), 3.0);
        let d = diary(&[(date(2024, 1, 1), 2.0), (date(2024, 1, 4), 6.0)]);
        assert_eq!(daily_average(&d), 2.0);
    }

    #[test]
    fn test_record_day() {
        assert_eq!(record_day(&diary(&[])), 0.0);
        let d = diary(&[
            (date(2024, 1, 1), 2.0),
            (date(2024, 1, 1), 2.5),
            (date(2024, 1, 2), 4.0),
        ]);
        assert_eq!(record_day(&d), 4.5);
    }

    #[test]
    fn test_weekly_heatmap() {
        // 2024-03-10 is a Sunday
        let d = diary(&[(date(2024, 3, 10), 1.5), (date(2024, 3, 17), 1.0), (date(2024, 3, 11), 2.0)]);
        let heatmap = weekly_heatmap(&d);
        assert_eq!(heatmap[0], 2.5);
        assert_eq!(heatmap[1], 2.0);
        assert_eq!(heatmap[6], 0.0);
    }

    #[test]
    fn test_distinct_week_buckets() {
        let d = diary(&[
            (date(2024, 3, 1), 1.0),
            (date(2024, 3, 6), 1.0),
            (date(2024, 3, 7), 1.0),
            (date(2024, 4, 1), 1.0),
        ]);
        // Buckets: (3, 0), (3, 1), (4, 0)
        assert_eq!(distinct_week_buckets(&d), 3);
    }
}
