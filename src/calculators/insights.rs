//! Rule-based study insights
//!
//! Each rule is checked independently and in a fixed order; a journal can
//! trigger anywhere from zero to five insights. Averages are compared at
//! display precision: one decimal for ratings, two for grades.

use crate::managers::{DiaryManager, GradeManager, Manager};
use chrono::NaiveDate;
use serde::Serialize;

/// Which rule produced an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    CalmStudy,
    HighStress,
    KeepItUp,
    StudyMore,
    Momentum,
    SubjectBalance,
    WeeklyProgress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub emoji: &'static str,
    pub text: String,
}

impl Insight {
    fn new(kind: InsightKind, emoji: &'static str, text: impl Into<String>) -> Self {
        Self {
            kind,
            emoji,
            text: text.into(),
        }
    }
}

const RECENT_ENTRIES: usize = 5;
const MOMENTUM_HOURS: f64 = 10.0;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn generate(diary: &DiaryManager, grades: &GradeManager, today: NaiveDate) -> Vec<Insight> {
    let mut insights = Vec::new();
    let entries = diary.records();

    // Stress vs comprehension
    if entries.len() >= 3 {
        let stress = round_to(diary.average_stress(), 1);
        let comprehension = round_to(diary.average_comprehension(), 1);
        if stress < 6.0 && comprehension > 6.0 {
            insights.push(Insight::new(
                InsightKind::CalmStudy,
                "✨",
                "You study best when your stress stays below 6. Keep calm!",
            ));
        } else if stress > 7.0 {
            insights.push(Insight::new(
                InsightKind::HighStress,
                "🧘",
                "Your stress is high. Try taking more frequent breaks and breathe deeply.",
            ));
        }
    }

    // Hours vs grades
    if grades.len() >= 2 && entries.len() >= 2 {
        let avg_hours = diary.total_hours() / entries.len() as f64;
        let avg_grade = round_to(grades.weighted_average(), 2);
        if avg_hours >= 2.0 && avg_grade >= 7.0 {
            insights.push(Insight::new(
                InsightKind::KeepItUp,
                "🚀",
                format!(
                    "Study more than {:.1} hours per subject to keep an average of {:.2}.",
                    avg_hours, avg_grade
                ),
            ));
        } else if avg_grade < 7.0 && avg_hours < 1.5 {
            insights.push(Insight::new(
                InsightKind::StudyMore,
                "⏱️",
                "Increase your study hours to improve your grades. Aim for 2+ hours per subject.",
            ));
        }
    }

    // Momentum over the most recent entries
    let recent_hours: f64 = entries.iter().take(RECENT_ENTRIES).map(|e| e.hours).sum();
    if recent_hours > MOMENTUM_HOURS {
        insights.push(Insight::new(
            InsightKind::Momentum,
            "🔥",
            "You're keeping incredible momentum! Keep it going!",
        ));
    }

    let subjects = diary.subjects().len();
    if subjects >= 3 {
        insights.push(Insight::new(
            InsightKind::SubjectBalance,
            "⚖️",
            format!(
                "You're studying {} different subjects. Make sure to balance your time between them.",
                subjects
            ),
        ));
    }

    let week_hours = diary.this_week_hours(today);
    if week_hours > 0.0 {
        insights.push(Insight::new(
            InsightKind::WeeklyProgress,
            "📈",
            format!(
                "This week you studied {:.1} hours. Keep up the progress!",
                week_hours
            ),
        ));
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::{NewDiaryEntry, NewGrade, SchoolType};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 20).unwrap()
    }

    fn diary(entries: &[(i64, &str, f64, u8, u8)]) -> DiaryManager {
        let mut diary = DiaryManager::new(Vec::new());
        for (days_ago, subject, hours, comprehension, stress) in entries {
            diary
                .add_entry(NewDiaryEntry {
                    date: today() - chrono::Duration::days(*days_ago),
                    subject: subject.to_string(),
                    hours: *hours,
                    comprehension: *comprehension,
                    stress: *stress,
                    notes: String::new(),
                })
                .unwrap();
        }
        diary
    }

    fn grades(values: &[f64]) -> GradeManager {
        let mut grades = GradeManager::new(Vec::new(), SchoolType::HighSchool.scale());
        for value in values {
            grades
                .add_grade(NewGrade {
                    subject: "Math".to_string(),
                    value: *value,
                    weight: 1,
                    date: today(),
                })
                .unwrap();
        }
        grades
    }

    fn kinds(insights: &[Insight]) -> Vec<InsightKind> {
        insights.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_empty_journal_has_no_insights() {
        assert!(generate(&diary(&[]), &grades(&[]), today()).is_empty());
    }

    #[test]
    fn test_calm_study_and_balance() {
        let d = diary(&[
            (30, "Math", 1.0, 8, 3),
            (31, "Physics", 1.0, 7, 4),
            (32, "History", 1.0, 9, 2),
        ]);
        let insights = generate(&d, &grades(&[]), today());
        assert_eq!(
            kinds(&insights),
            vec![InsightKind::CalmStudy, InsightKind::SubjectBalance]
        );
        assert!(insights[1].text.contains("3 different subjects"));
    }

    #[test]
    fn test_averages_compared_at_display_precision() {
        // Stress averages 5.96, shown and compared as 6.0
        let mut entries: Vec<(i64, &str, f64, u8, u8)> =
            (0..24).map(|i| (30 + i, "Math", 0.1, 8, 6)).collect();
        entries.push((60, "Math", 0.1, 8, 5));
        assert!(generate(&diary(&entries), &grades(&[]), today()).is_empty());

        // Grade averages 6.996, shown and compared as 7.00
        let d = diary(&[(30, "Math", 3.0, 5, 7), (31, "Math", 3.0, 5, 7)]);
        let insights = generate(&d, &grades(&[7.0, 6.992]), today());
        assert_eq!(kinds(&insights), vec![InsightKind::KeepItUp]);
        assert!(insights[0].text.contains("7.00"));
    }

    #[test]
    fn test_high_stress() {
        let d = diary(&[(40, "Math", 1.0, 5, 9), (41, "Math", 1.0, 5, 8), (42, "Math", 1.0, 5, 9)]);
        assert_eq!(kinds(&generate(&d, &grades(&[]), today())), vec![InsightKind::HighStress]);
    }

    #[test]
    fn test_keep_it_up_momentum_and_weekly() {
        let d = diary(&[(0, "Math", 6.0, 5, 7), (1, "Math", 5.0, 5, 7)]);
        let insights = generate(&d, &grades(&[8.0, 9.0]), today());
        assert_eq!(
            kinds(&insights),
            vec![
                InsightKind::KeepItUp,
                InsightKind::Momentum,
                InsightKind::WeeklyProgress
            ]
        );
        assert!(insights[0].text.contains("5.5 hours"));
        assert!(insights[2].text.contains("11.0 hours"));
    }

    #[test]
    fn test_study_more() {
        let d = diary(&[(20, "Math", 1.0, 5, 7), (21, "Math", 0.5, 5, 7)]);
        let insights = generate(&d, &grades(&[5.0, 6.0]), today());
        assert_eq!(kinds(&insights), vec![InsightKind::StudyMore]);
    }
}
