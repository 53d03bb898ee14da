//! Persisted document schema
//!
//! Every field has a default so that older or partially written files still
//! load. Unknown keys are ignored. Collections are read record by record: a
//! record that does not fit the schema is logged and skipped so the rest of
//! the document survives.

use crate::managers::types::{
    DiaryEntry, Flashcard, Goal, Grade, Note, PomodoroSession, Resource, Task, WellnessCheckIn,
};
use crate::managers::{PomodoroSettings, SchoolType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// The single aggregate persisted object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    #[serde(deserialize_with = "lenient_records")]
    pub diary_entries: Vec<DiaryEntry>,
    #[serde(deserialize_with = "lenient_records")]
    pub tasks: Vec<Task>,
    #[serde(deserialize_with = "lenient_records")]
    pub grades: Vec<Grade>,
    #[serde(deserialize_with = "lenient_records")]
    pub pomodoro_sessions: Vec<PomodoroSession>,
    #[serde(deserialize_with = "lenient_records")]
    pub notes: Vec<Note>,
    #[serde(deserialize_with = "lenient_records")]
    pub flashcards: Vec<Flashcard>,
    #[serde(deserialize_with = "lenient_records")]
    pub goals: Vec<Goal>,
    #[serde(deserialize_with = "lenient_records")]
    pub resources: Vec<Resource>,
    #[serde(deserialize_with = "lenient_records")]
    pub wellness: Vec<WellnessCheckIn>,
    pub stats: Stats,
    pub preferences: Preferences,
}

/// Keep the records of a collection that parse.
///
/// `null` or a non-array value reads as an empty collection.
fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => return Ok(Vec::new()),
        other => {
            tracing::warn!(
                "Expected a list of {} records, found {}; ignoring it",
                record_name::<T>(),
                other
            );
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping {} record #{}: {}", record_name::<T>(), index, e);
                None
            }
        })
        .collect())
}

fn record_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Aggregate stats refreshed on every snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_hours: f64,
    pub total_sessions: u64,
    /// Zero-based index into the level thresholds
    pub current_level: u32,
}

/// User preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub school_type: SchoolType,
    pub pomodoro: PomodoroSettings,
}
