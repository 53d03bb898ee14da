//! Wellness check-ins (energy, mood, focus, sleep)

use super::types::{NewCheckIn, WellnessAverages, WellnessCheckIn};
use super::{impl_manager, mean};
use crate::ids::IdGenerator;
use chrono::{DateTime, Duration, Utc};

/// Append-only log of check-ins
#[derive(Debug, Clone)]
pub struct WellnessManager {
    check_ins: Vec<WellnessCheckIn>,
    ids: IdGenerator,
}

impl_manager!(WellnessManager, WellnessCheckIn, check_ins);

impl WellnessManager {
    pub fn new(check_ins: Vec<WellnessCheckIn>) -> Self {
        let ids = IdGenerator::seeded(check_ins.iter().map(|c| c.id));
        Self { check_ins, ids }
    }

    pub fn add_check_in(&mut self, req: NewCheckIn) -> WellnessCheckIn {
        self.add_check_in_at(req, Utc::now())
    }

    pub fn add_check_in_at(&mut self, req: NewCheckIn, now: DateTime<Utc>) -> WellnessCheckIn {
        let check_in = WellnessCheckIn {
            id: self.ids.next_id(),
            date: now,
            energy: req.energy,
            mood: req.mood,
            focus: req.focus,
            sleep: req.sleep,
        };
        self.check_ins.push(check_in.clone());
        check_in
    }

    pub fn check_ins_since(&self, cutoff: DateTime<Utc>) -> Vec<&WellnessCheckIn> {
        self.check_ins.iter().filter(|c| c.date >= cutoff).collect()
    }

    /// Check-ins from the last seven days
    pub fn this_week(&self, now: DateTime<Utc>) -> Vec<&WellnessCheckIn> {
        self.check_ins_since(now - Duration::days(7))
    }

    /// Averages over all check-ins; all zero when there are none
    pub fn average_metrics(&self) -> WellnessAverages {
        WellnessAverages {
            energy: mean(self.check_ins.iter().map(|c| f64::from(c.energy))),
            mood: mean(self.check_ins.iter().map(|c| f64::from(c.mood))),
            focus: mean(self.check_ins.iter().map(|c| f64::from(c.focus))),
            sleep: mean(self.check_ins.iter().map(|c| c.sleep)),
        }
    }
}
