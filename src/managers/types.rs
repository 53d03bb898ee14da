//! Record and request types for every managed collection
//!
//! All types use camelCase JSON, matching the persisted document layout.

use crate::ids::{lenient_id, RecordId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Records that carry an id
pub trait Identified {
    fn id(&self) -> RecordId;
}

macro_rules! identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> RecordId {
                self.id
            }
        })*
    };
}

identified!(
    DiaryEntry,
    Task,
    Grade,
    PomodoroSession,
    Note,
    Flashcard,
    Goal,
    Resource,
    WellnessCheckIn,
);

// =============================================================================
// Diary
// =============================================================================

/// A logged study session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    #[serde(deserialize_with = "lenient_id")]
    pub id: RecordId,
    pub date: NaiveDate,
    pub subject: String,
    pub hours: f64,
    pub comprehension: u8,
    pub stress: u8,
    #[serde(default)]
    pub notes: String,
}

/// Request body for a new diary entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDiaryEntry {
    pub date: NaiveDate,
    pub subject: String,
    pub hours: f64,
    pub comprehension: u8,
    pub stress: u8,
    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Tasks
// =============================================================================

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// A to-do item with a due date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "lenient_id")]
    pub id: RecordId,
    pub subject: String,
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

/// Request body for a new task
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub subject: String,
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
}

// =============================================================================
// Grades
// =============================================================================

/// A weighted grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    #[serde(deserialize_with = "lenient_id")]
    pub id: RecordId,
    pub subject: String,
    pub value: f64,
    pub weight: u32,
    pub date: NaiveDate,
}

/// Request body for a new grade
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGrade {
    pub subject: String,
    pub value: f64,
    #[serde(default = "default_weight")]
    pub weight: u32,
    pub date: NaiveDate,
}

fn default_weight() -> u32 {
    1
}

// =============================================================================
// Pomodoro
// =============================================================================

/// A completed pomodoro study phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSession {
    #[serde(deserialize_with = "lenient_id")]
    pub id: RecordId,
    pub date: NaiveDate,
    pub hours: f64,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Notes
// =============================================================================

/// A free-form study note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(deserialize_with = "lenient_id")]
    pub id: RecordId,
    pub title: String,
    pub subject: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Request body for a new note
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub title: String,
    pub subject: String,
    pub content: String,
}

/// Partial note update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
}

// =============================================================================
// Flashcards
// =============================================================================

/// Flashcard difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// A question/answer card with answer statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    #[serde(deserialize_with = "lenient_id")]
    pub id: RecordId,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub incorrect: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// Request body for a new flashcard
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlashcard {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub subject: String,
}

/// Front/back pair as produced by the generation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPair {
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub back: String,
}

// =============================================================================
// Goals
// =============================================================================

/// A study goal with percentage progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(deserialize_with = "lenient_id")]
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Request body for a new goal
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub deadline: NaiveDate,
}

// =============================================================================
// Resources
// =============================================================================

/// A bookmarked study resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(deserialize_with = "lenient_id")]
    pub id: RecordId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub url: String,
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub rating: u8,
}

/// Request body for a new resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub url: String,
}

// =============================================================================
// Wellness
// =============================================================================

/// A daily wellness check-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessCheckIn {
    #[serde(deserialize_with = "lenient_id")]
    pub id: RecordId,
    pub date: DateTime<Utc>,
    pub energy: u8,
    pub mood: u8,
    pub focus: u8,
    pub sleep: f64,
}

/// Request body for a new check-in
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckIn {
    pub energy: u8,
    pub mood: u8,
    pub focus: u8,
    pub sleep: f64,
}

/// Averages over all check-ins
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessAverages {
    pub energy: f64,
    pub mood: f64,
    pub focus: f64,
    pub sleep: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diary_entry_serialization() {
        let entry = DiaryEntry {
            id: 42,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            subject: "Math".to_string(),
            hours: 2.5,
            comprehension: 7,
            stress: 4,
            notes: String::new(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"date\":\"2024-03-01\""));
        assert!(json.contains("\"hours\":2.5"));
    }

    #[test]
    fn test_task_camel_case() {
        let json = r#"{"id": 1, "subject": "History", "description": "Essay",
                       "dueDate": "2024-05-10", "priority": "high"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Priority::High);
        assert!(!task.completed);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
    }

    #[test]
    fn test_resource_type_field() {
        let json = r#"{"id": 5, "title": "Khan Academy", "type": "video",
                       "dateAdded": "2024-01-01T10:00:00Z"}"#;
        let res: Resource = serde_json::from_str(json).unwrap();
        assert_eq!(res.kind, "video");
        assert_eq!(res.rating, 0);
        let back = serde_json::to_string(&res).unwrap();
        assert!(back.contains("\"type\":\"video\""));
    }

    #[test]
    fn test_flashcard_defaults() {
        let json = r#"{"id": 9, "front": "Q", "back": "A"}"#;
        let card: Flashcard = serde_json::from_str(json).unwrap();
        assert_eq!(card.correct, 0);
        assert_eq!(card.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::High.to_string(), "high");
    }

    #[test]
    fn test_new_grade_default_weight() {
        let req: NewGrade =
            serde_json::from_str(r#"{"subject":"Latin","value":8,"date":"2024-02-02"}"#).unwrap();
        assert_eq!(req.weight, 1);
        assert_eq!(req.value, 8.0);
    }

    #[test]
    fn test_note_update_partial() {
        let update: NoteUpdate = serde_json::from_str(r#"{"content":"rewritten"}"#).unwrap();
        assert_eq!(update.content.as_deref(), Some("rewritten"));
        assert!(update.title.is_none());
    }
}
