//! Study notes

use super::impl_manager;
use super::types::{NewNote, Note, NoteUpdate};
use crate::ids::{IdGenerator, RecordId};
use chrono::Utc;

#[derive(Debug, Clone)]
pub struct NotesManager {
    notes: Vec<Note>,
    ids: IdGenerator,
}

impl_manager!(NotesManager, Note, notes);

impl NotesManager {
    pub fn new(notes: Vec<Note>) -> Self {
        let ids = IdGenerator::seeded(notes.iter().map(|n| n.id));
        Self { notes, ids }
    }

    pub fn add_note(&mut self, req: NewNote) -> Note {
        let now = Utc::now();
        let note = Note {
            id: self.ids.next_id(),
            title: req.title,
            subject: req.subject,
            content: req.content,
            date: now,
            last_modified: now,
        };
        self.notes.push(note.clone());
        note
    }

    /// Merge the provided fields and bump `last_modified`
    pub fn update_note(&mut self, id: RecordId, update: NoteUpdate) -> Option<Note> {
        let note = self.notes.iter_mut().find(|n| n.id == id)?;
        if let Some(title) = update.title {
            note.title = title;
        }
        if let Some(subject) = update.subject {
            note.subject = subject;
        }
        if let Some(content) = update.content {
            note.content = content;
        }
        note.last_modified = Utc::now();
        Some(note.clone())
    }

    pub fn notes_by_subject(&self, subject: &str) -> Vec<&Note> {
        let subject = subject.to_lowercase();
        self.notes
            .iter()
            .filter(|n| n.subject.to_lowercase() == subject)
            .collect()
    }
}
