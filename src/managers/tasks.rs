//! Task list, ordered by due date

use super::impl_manager;
use super::types::{NewTask, Task};
use crate::ids::{IdGenerator, RecordId};
use chrono::{Duration, NaiveDate};

/// Days ahead of today that count as urgent
pub const URGENT_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone)]
pub struct TaskManager {
    tasks: Vec<Task>,
    ids: IdGenerator,
}

impl_manager!(TaskManager, Task, tasks);

impl TaskManager {
    pub fn new(tasks: Vec<Task>) -> Self {
        let ids = IdGenerator::seeded(tasks.iter().map(|t| t.id));
        let mut manager = Self { tasks, ids };
        manager.sort_by_due_date();
        manager
    }

    pub fn add_task(&mut self, req: NewTask) -> Task {
        let task = Task {
            id: self.ids.next_id(),
            subject: req.subject,
            description: req.description,
            due_date: req.due_date,
            priority: req.priority,
            completed: false,
        };
        self.tasks.push(task.clone());
        self.sort_by_due_date();
        task
    }

    /// Flip completion. Returns the new state, `None` if the task is unknown.
    pub fn toggle_task(&mut self, id: RecordId) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    fn sort_by_due_date(&mut self) {
        self.tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    }

    /// Open tasks due between today and three days from now, inclusive
    pub fn urgent_tasks(&self, today: NaiveDate) -> Vec<&Task> {
        let horizon = today + Duration::days(URGENT_WINDOW_DAYS);
        self.tasks
            .iter()
            .filter(|t| !t.completed && t.due_date >= today && t.due_date <= horizon)
            .collect()
    }

    pub fn active_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).collect()
    }

    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.completed).collect()
    }
}
