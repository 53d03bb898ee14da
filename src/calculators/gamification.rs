//! Study levels unlocked by total logged hours

use crate::managers::{DiaryManager, PomodoroManager};
use serde::Serialize;

/// Hours required to reach each level
pub const LEVEL_THRESHOLDS: [f64; 6] = [0.0, 5.0, 20.0, 50.0, 100.0, 200.0];

/// Hours past the last threshold used as the final target
pub const TOP_LEVEL_SPAN: f64 = 100.0;

const LEVEL_NAMES: [&str; 6] = ["Beginner", "Scholar", "Committed", "Devoted", "Master", "Legend"];

/// Current level and progress towards the next
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub total_hours: f64,
    /// Zero-based index into [`LEVEL_THRESHOLDS`]
    pub level: usize,
    pub level_name: &'static str,
    pub next_threshold: f64,
    /// Percentage from the current to the next threshold, within [0, 100]
    pub progress_percent: f64,
}

/// Level reached with `total_hours`
pub fn level_for(total_hours: f64) -> usize {
    LEVEL_THRESHOLDS
        .iter()
        .rposition(|&threshold| total_hours >= threshold)
        .unwrap_or(0)
}

pub fn level_name(level: usize) -> &'static str {
    LEVEL_NAMES
        .get(level)
        .copied()
        .unwrap_or(LEVEL_NAMES[LEVEL_NAMES.len() - 1])
}

/// Level progress over diary and pomodoro hours combined
pub fn progress(diary: &DiaryManager, pomodoro: &PomodoroManager) -> LevelProgress {
    progress_for_hours(diary.total_hours() + pomodoro.total_hours())
}

pub fn progress_for_hours(total_hours: f64) -> LevelProgress {
    let level = level_for(total_hours);
    let current = LEVEL_THRESHOLDS[level];
    let next = LEVEL_THRESHOLDS
        .get(level + 1)
        .copied()
        .unwrap_or(current + TOP_LEVEL_SPAN);
    let progress_percent = ((total_hours - current) / (next - current) * 100.0).clamp(0.0, 100.0);

    LevelProgress {
        total_hours,
        level,
        level_name: level_name(level),
        next_threshold: next,
        progress_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::NewDiaryEntry;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_levels() {
        assert_eq!(level_for(0.0), 0);
        assert_eq!(level_for(4.99), 0);
        assert_eq!(level_for(5.0), 1);
        assert_eq!(level_for(199.0), 4);
        assert_eq!(level_for(1000.0), 5);
    }

    #[test]
    fn test_progress_between_thresholds() {
        let p = progress_for_hours(12.5);
        assert_eq!(p.level, 1);
        assert_eq!(p.level_name, "Scholar");
        assert_eq!(p.next_threshold, 20.0);
        assert_eq!(p.progress_percent, 50.0);
    }

    #[test]
    fn test_top_level_progress() {
        let p = progress_for_hours(250.0);
        assert_eq!(p.level, 5);
        assert_eq!(p.level_name, "Legend");
        assert_eq!(p.next_threshold, 300.0);
        assert_eq!(p.progress_percent, 50.0);
        assert_eq!(progress_for_hours(900.0).progress_percent, 100.0);
    }

    #[test]
    fn test_progress_counts_pomodoro_hours() {
        let mut diary = DiaryManager::new(Vec::new());
        diary
            .add_entry(NewDiaryEntry {
                date: NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
                subject: "Art".to_string(),
                hours: 4.0,
                comprehension: 5,
                stress: 5,
                notes: String::new(),
            })
            .unwrap();
        let mut pomodoro = PomodoroManager::new(Vec::new());
        pomodoro.record_session(1.0, Utc::now());

        let p = progress(&diary, &pomodoro);
        assert_eq!(p.total_hours, 5.0);
        assert_eq!(p.level, 1);
        assert_eq!(p.progress_percent, 0.0);
    }
}
