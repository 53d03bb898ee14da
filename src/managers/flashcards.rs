//! Flashcard deck with per-card answer statistics

use super::impl_manager;
use super::types::{CardPair, Difficulty, Flashcard, NewFlashcard};
use crate::ids::{IdGenerator, RecordId};

#[derive(Debug, Clone)]
pub struct FlashcardManager {
    cards: Vec<Flashcard>,
    ids: IdGenerator,
}

impl_manager!(FlashcardManager, Flashcard, cards);

impl FlashcardManager {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        let ids = IdGenerator::seeded(cards.iter().map(|c| c.id));
        Self { cards, ids }
    }

    pub fn add_card(&mut self, req: NewFlashcard) -> Flashcard {
        let card = Flashcard {
            id: self.ids.next_id(),
            front: req.front,
            back: req.back,
            subject: req.subject,
            correct: 0,
            incorrect: 0,
            difficulty: Difficulty::Medium,
        };
        self.cards.push(card.clone());
        card
    }

    /// Add generated pairs under `subject`, skipping any with an empty side.
    ///
    /// Returns how many cards were added.
    pub fn import_generated(&mut self, pairs: Vec<CardPair>, subject: &str) -> usize {
        let mut imported = 0;
        for pair in pairs {
            if pair.front.trim().is_empty() || pair.back.trim().is_empty() {
                continue;
            }
            self.add_card(NewFlashcard {
                front: pair.front,
                back: pair.back,
                subject: subject.to_string(),
            });
            imported += 1;
        }
        imported
    }

    /// Count an answer. Returns false when the card is unknown.
    pub fn record_answer(&mut self, id: RecordId, correct: bool) -> bool {
        match self.cards.iter_mut().find(|c| c.id == id) {
            Some(card) => {
                if correct {
                    card.correct += 1;
                } else {
                    card.incorrect += 1;
                }
                true
            }
            None => false,
        }
    }

    /// Correct answers as a whole percentage; 0 if unanswered or unknown
    pub fn accuracy(&self, id: RecordId) -> u32 {
        let Some(card) = self.cards.iter().find(|c| c.id == id) else {
            return 0;
        };
        let answered = card.correct + card.incorrect;
        if answered == 0 {
            return 0;
        }
        (f64::from(card.correct) / f64::from(answered) * 100.0).round() as u32
    }

    pub fn cards_by_subject(&self, subject: &str) -> Vec<&Flashcard> {
        let subject = subject.to_lowercase();
        self.cards
            .iter()
            .filter(|c| c.subject.to_lowercase() == subject)
            .collect()
    }

    /// Drop the whole deck. Returns how many cards were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.cards.len();
        self.cards.clear();
        removed
    }
}
