//! Study goals with percentage progress

use super::impl_manager;
use super::types::{Goal, NewGoal};
use crate::ids::{IdGenerator, RecordId};
use chrono::{NaiveDate, Utc};

pub const MAX_PROGRESS: u8 = 100;

#[derive(Debug, Clone)]
pub struct GoalsManager {
    goals: Vec<Goal>,
    ids: IdGenerator,
}

impl_manager!(GoalsManager, Goal, goals);

impl GoalsManager {
    pub fn new(goals: Vec<Goal>) -> Self {
        let ids = IdGenerator::seeded(goals.iter().map(|g| g.id));
        Self { goals, ids }
    }

    pub fn add_goal(&mut self, req: NewGoal) -> Goal {
        let goal = Goal {
            id: self.ids.next_id(),
            title: req.title,
            category: req.category,
            deadline: req.deadline,
            progress: 0,
            completed: false,
            created_at: Utc::now(),
        };
        self.goals.push(goal.clone());
        goal
    }

    /// Set progress, capped at 100. Reaching 100 marks the goal completed;
    /// lowering progress afterwards does not reopen it.
    pub fn update_progress(&mut self, id: RecordId, progress: u32) -> Option<&Goal> {
        let goal = self.goals.iter_mut().find(|g| g.id == id)?;
        goal.progress = progress.min(u32::from(MAX_PROGRESS)) as u8;
        if goal.progress == MAX_PROGRESS {
            goal.completed = true;
        }
        Some(goal)
    }

    /// Flip completion manually. Returns the new state.
    pub fn toggle_goal(&mut self, id: RecordId) -> Option<bool> {
        let goal = self.goals.iter_mut().find(|g| g.id == id)?;
        goal.completed = !goal.completed;
        Some(goal.completed)
    }

    pub fn active_goals(&self) -> Vec<&Goal> {
        self.goals.iter().filter(|g| !g.completed).collect()
    }

    /// Open goals whose deadline is `today`
    pub fn goals_due_on(&self, today: NaiveDate) -> Vec<&Goal> {
        self.goals
            .iter()
            .filter(|g| g.deadline == today && !g.completed)
            .collect()
    }
}
