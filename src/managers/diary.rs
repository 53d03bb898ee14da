//! Study diary: logged sessions, newest first

use super::types::{DiaryEntry, NewDiaryEntry};
use super::{impl_manager, mean};
use crate::error::{Error, Result};
use crate::ids::IdGenerator;
use chrono::{Duration, NaiveDate};

/// Calendar days counted as "this week", today included
pub const WEEK_DAYS: i64 = 7;

/// Valid range for comprehension and stress ratings
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Owns the diary entries, kept sorted by date descending
#[derive(Debug, Clone)]
pub struct DiaryManager {
    entries: Vec<DiaryEntry>,
    ids: IdGenerator,
}

impl_manager!(DiaryManager, DiaryEntry, entries);

impl DiaryManager {
    pub fn new(entries: Vec<DiaryEntry>) -> Self {
        let ids = IdGenerator::seeded(entries.iter().map(|e| e.id));
        let mut manager = Self { entries, ids };
        manager.sort_by_date();
        manager
    }

    /// Log a study session
    pub fn add_entry(&mut self, req: NewDiaryEntry) -> Result<DiaryEntry> {
        if !req.hours.is_finite() || req.hours < 0.0 {
            return Err(Error::Validation(format!(
                "hours must be a non-negative number, got {}",
                req.hours
            )));
        }
        if !RATING_RANGE.contains(&req.comprehension) || !RATING_RANGE.contains(&req.stress) {
            return Err(Error::Validation(
                "comprehension and stress must be between 1 and 10".to_string(),
            ));
        }

        let entry = DiaryEntry {
            id: self.ids.next_id(),
            date: req.date,
            subject: req.subject,
            hours: req.hours,
            comprehension: req.comprehension,
            stress: req.stress,
            notes: req.notes,
        };
        self.entries.push(entry.clone());
        self.sort_by_date();
        Ok(entry)
    }

    // Stable, so same-day entries keep insertion order.
    fn sort_by_date(&mut self) {
        self.entries.sort_by(|a, b| b.date.cmp(&a.date));
    }

    /// Entries for a subject, compared case-insensitively
    pub fn entries_by_subject(&self, subject: &str) -> Vec<&DiaryEntry> {
        let subject = subject.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.subject.to_lowercase() == subject)
            .collect()
    }

    pub fn total_hours(&self) -> f64 {
        self.entries.iter().map(|e| e.hours).sum()
    }

    /// Hours logged on or after `cutoff`
    pub fn hours_since(&self, cutoff: NaiveDate) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.date >= cutoff)
            .map(|e| e.hours)
            .sum()
    }

    /// Hours logged in the seven calendar days ending on `today`
    pub fn this_week_hours(&self, today: NaiveDate) -> f64 {
        self.hours_since(today - Duration::days(WEEK_DAYS - 1))
    }

    pub fn average_comprehension(&self) -> f64 {
        mean(self.entries.iter().map(|e| f64::from(e.comprehension)))
    }

    pub fn average_stress(&self) -> f64 {
        mean(self.entries.iter().map(|e| f64::from(e.stress)))
    }

    /// Distinct subjects in first-seen order
    pub fn subjects(&self) -> Vec<String> {
        let mut subjects: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !subjects.contains(&entry.subject) {
                subjects.push(entry.subject.clone());
            }
        }
        subjects
    }
}
