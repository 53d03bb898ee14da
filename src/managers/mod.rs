//! Domain managers, one owned collection per entity type
//!
//! Every manager is seeded once from the loaded [`Document`] and exclusively
//! mutates its own collection. [`Journal`] constructs all of them at startup
//! and is passed by reference to whatever needs them; there is no global
//! state.
//!
//! The shared CRUD surface lives in the [`Manager`] trait. Entity-specific
//! mutations (`add_*`, `toggle_*`, `record_*`, `update_*`) and query helpers
//! are inherent methods on each manager. Queries are recomputed on every call.

pub mod diary;
pub mod flashcards;
pub mod goals;
pub mod grades;
pub mod notes;
pub mod pomodoro;
pub mod resources;
pub mod tasks;
pub mod types;
pub mod wellness;

pub use diary::DiaryManager;
pub use flashcards::FlashcardManager;
pub use goals::GoalsManager;
pub use grades::{GradeManager, GradeScale, SchoolType};
pub use notes::NotesManager;
pub use pomodoro::{PomodoroManager, PomodoroSettings, PomodoroTimer, TimerMode};
pub use resources::ResourcesManager;
pub use tasks::TaskManager;
pub use types::*;
pub use wellness::WellnessManager;

use crate::calculators::gamification;
use crate::ids::RecordId;
use crate::storage::{Document, Preferences, Stats};

/// Shared contract of every collection owner
pub trait Manager {
    type Record: Identified + Clone;

    /// Current collection, in the manager's canonical order
    fn records(&self) -> &[Self::Record];

    /// Mutable access for in-place updates
    fn records_mut(&mut self) -> &mut Vec<Self::Record>;

    /// Find a record by id
    fn get(&self, id: RecordId) -> Option<&Self::Record> {
        self.records().iter().find(|r| r.id() == id)
    }

    /// Find a record by id for in-place mutation
    fn get_mut(&mut self, id: RecordId) -> Option<&mut Self::Record> {
        self.records_mut().iter_mut().find(|r| r.id() == id)
    }

    /// Remove the record with this id. Returns whether anything was removed.
    fn delete(&mut self, id: RecordId) -> bool {
        let records = self.records_mut();
        match records.iter().position(|r| r.id() == id) {
            Some(pos) => {
                records.remove(pos);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

/// Implements [`Manager`] for a struct whose collection lives in `$field`
macro_rules! impl_manager {
    ($manager:ty, $record:ty, $field:ident) => {
        impl $crate::managers::Manager for $manager {
            type Record = $record;

            fn records(&self) -> &[$record] {
                &self.$field
            }

            fn records_mut(&mut self) -> &mut Vec<$record> {
                &mut self.$field
            }
        }
    };
}
pub(crate) use impl_manager;

/// Arithmetic mean, 0 for an empty input
pub(crate) fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Every manager, built once per process from the loaded document
#[derive(Debug, Clone)]
pub struct Journal {
    pub diary: DiaryManager,
    pub tasks: TaskManager,
    pub grades: GradeManager,
    pub pomodoro: PomodoroManager,
    pub notes: NotesManager,
    pub flashcards: FlashcardManager,
    pub goals: GoalsManager,
    pub resources: ResourcesManager,
    pub wellness: WellnessManager,
    pub preferences: Preferences,
}

impl Journal {
    /// Seed every manager from its document field
    pub fn from_document(document: Document) -> Self {
        let Document {
            diary_entries,
            tasks,
            grades,
            pomodoro_sessions,
            notes,
            flashcards,
            goals,
            resources,
            wellness,
            preferences,
            stats: _,
        } = document;

        Self {
            diary: DiaryManager::new(diary_entries),
            tasks: TaskManager::new(tasks),
            grades: GradeManager::new(grades, preferences.school_type.scale()),
            pomodoro: PomodoroManager::new(pomodoro_sessions),
            notes: NotesManager::new(notes),
            flashcards: FlashcardManager::new(flashcards),
            goals: GoalsManager::new(goals),
            resources: ResourcesManager::new(resources),
            wellness: WellnessManager::new(wellness),
            preferences,
        }
    }

    /// Empty journal with default preferences
    pub fn empty() -> Self {
        Self::from_document(Document::default())
    }

    /// Aggregate stats kept alongside the collections
    pub fn stats(&self) -> Stats {
        let progress = gamification::progress(&self.diary, &self.pomodoro);
        Stats {
            total_hours: progress.total_hours,
            total_sessions: self.pomodoro.session_count() as u64,
            current_level: progress.level as u32,
        }
    }

    /// Snapshot every collection into a document ready to persist
    pub fn to_document(&self) -> Document {
        Document {
            diary_entries: self.diary.records().to_vec(),
            tasks: self.tasks.records().to_vec(),
            grades: self.grades.records().to_vec(),
            pomodoro_sessions: self.pomodoro.records().to_vec(),
            notes: self.notes.records().to_vec(),
            flashcards: self.flashcards.records().to_vec(),
            goals: self.goals.records().to_vec(),
            resources: self.resources.records().to_vec(),
            wellness: self.wellness.records().to_vec(),
            stats: self.stats(),
            preferences: self.preferences.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn entry(date: NaiveDate, hours: f64) -> NewDiaryEntry {
        NewDiaryEntry {
            date,
            subject: "Physics".to_string(),
            hours,
            comprehension: 7,
            stress: 3,
            notes: String::new(),
        }
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(Vec::<f64>::new()), 0.0);
        assert_eq!(mean(vec![1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_add_delete_sizes_and_unique_ids() {
        let mut journal = Journal::empty();
        let mut ids = Vec::new();
        for d in 1..=20 {
            ids.push(journal.diary.add_entry(entry(day(d), 1.0)).unwrap().id);
        }
        for id in ids.iter().step_by(3) {
            assert!(journal.diary.delete(*id));
        }
        assert_eq!(journal.diary.len(), 20 - 7);

        let mut seen: Vec<_> = journal.diary.records().iter().map(|e| e.id).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), journal.diary.len());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut journal = Journal::empty();
        journal.diary.add_entry(entry(day(1), 1.0)).unwrap();
        assert!(!journal.diary.delete(12345));
        assert_eq!(journal.diary.len(), 1);
    }

    #[test]
    fn test_document_round_trip_through_journal() {
        let mut journal = Journal::empty();
        journal.diary.add_entry(entry(day(2), 3.0)).unwrap();
        journal.diary.add_entry(entry(day(5), 4.0)).unwrap();
        journal.pomodoro.record_session(0.5, chrono::Utc::now());

        let document = journal.to_document();
        assert_eq!(document.diary_entries.len(), 2);
        assert_eq!(document.stats.total_sessions, 1);
        assert_eq!(document.stats.total_hours, 7.5);
        assert_eq!(document.stats.current_level, 1);

        let reloaded = Journal::from_document(document);
        assert_eq!(reloaded.diary.records(), journal.diary.records());
        assert_eq!(reloaded.pomodoro.len(), 1);
    }

    #[test]
    fn test_ids_continue_after_reload() {
        let mut journal = Journal::empty();
        let first = journal.diary.add_entry(entry(day(1), 1.0)).unwrap();
        let mut reloaded = Journal::from_document(journal.to_document());
        let second = reloaded.diary.add_entry(entry(day(2), 1.0)).unwrap();
        assert!(second.id > first.id);
    }
}
