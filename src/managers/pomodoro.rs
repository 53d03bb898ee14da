//! Pomodoro sessions and the focus timer state machine
//!
//! The timer alternates study phases with breaks; every fourth completed
//! study phase is followed by a long break. Completing a study phase appends
//! a [`PomodoroSession`] worth `study_minutes / 60` hours.

use super::diary::WEEK_DAYS;
use super::impl_manager;
use super::types::PomodoroSession;
use crate::ids::IdGenerator;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Study phases between long breaks
pub const SESSIONS_PER_LONG_BREAK: u32 = 4;

/// Phase durations, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PomodoroSettings {
    pub study_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            study_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
        }
    }
}

/// Append-only log of completed study phases
#[derive(Debug, Clone)]
pub struct PomodoroManager {
    sessions: Vec<PomodoroSession>,
    ids: IdGenerator,
}

impl_manager!(PomodoroManager, PomodoroSession, sessions);

impl PomodoroManager {
    pub fn new(sessions: Vec<PomodoroSession>) -> Self {
        let ids = IdGenerator::seeded(sessions.iter().map(|s| s.id));
        Self { sessions, ids }
    }

    /// Append a completed session
    pub fn record_session(&mut self, hours: f64, now: DateTime<Utc>) -> PomodoroSession {
        let session = PomodoroSession {
            id: self.ids.next_id(),
            date: now.date_naive(),
            hours,
            timestamp: now,
        };
        self.sessions.push(session.clone());
        session
    }

    pub fn total_hours(&self) -> f64 {
        self.sessions.iter().map(|s| s.hours).sum()
    }

    pub fn this_week_hours(&self, today: NaiveDate) -> f64 {
        let cutoff = today - Duration::days(WEEK_DAYS - 1);
        self.sessions
            .iter()
            .filter(|s| s.date >= cutoff)
            .map(|s| s.hours)
            .sum()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// Current timer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Study,
    ShortBreak,
    LongBreak,
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Study => write!(f, "study"),
            Self::ShortBreak => write!(f, "short break"),
            Self::LongBreak => write!(f, "long break"),
        }
    }
}

/// Emitted by [`PomodoroTimer::tick`] when a phase runs out
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseCompleted {
    pub finished: TimerMode,
    pub next: TimerMode,
    /// Session recorded for a finished study phase
    pub session: Option<PomodoroSession>,
}

/// One-second resolution focus timer
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    settings: PomodoroSettings,
    mode: TimerMode,
    remaining_secs: u32,
    running: bool,
    sessions_completed: u32,
}

impl PomodoroTimer {
    /// New paused timer at the start of a study phase.
    ///
    /// `sessions_completed` continues the long-break cadence across restarts.
    pub fn new(settings: PomodoroSettings, sessions_completed: u32) -> Self {
        Self {
            settings,
            mode: TimerMode::Study,
            remaining_secs: settings.study_minutes * 60,
            running: false,
            sessions_completed,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    pub fn settings(&self) -> PomodoroSettings {
        self.settings
    }

    /// Change durations; applies from the next phase
    pub fn set_settings(&mut self, settings: PomodoroSettings) {
        self.settings = settings;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Pause and go back to the start of a study phase
    pub fn reset(&mut self) {
        self.pause();
        self.mode = TimerMode::Study;
        self.remaining_secs = self.settings.study_minutes * 60;
    }

    /// Advance one second. No-op while paused.
    pub fn tick(
        &mut self,
        sessions: &mut PomodoroManager,
        now: DateTime<Utc>,
    ) -> Option<PhaseCompleted> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            Some(self.complete_phase(sessions, now))
        } else {
            None
        }
    }

    fn complete_phase(&mut self, sessions: &mut PomodoroManager, now: DateTime<Utc>) -> PhaseCompleted {
        let finished = self.mode;
        let mut session = None;

        if finished == TimerMode::Study {
            self.sessions_completed += 1;
            let hours = f64::from(self.settings.study_minutes) / 60.0;
            session = Some(sessions.record_session(hours, now));

            if self.sessions_completed % SESSIONS_PER_LONG_BREAK == 0 {
                self.mode = TimerMode::LongBreak;
                self.remaining_secs = self.settings.long_break_minutes * 60;
            } else {
                self.mode = TimerMode::ShortBreak;
                self.remaining_secs = self.settings.short_break_minutes * 60;
            }
        } else {
            self.mode = TimerMode::Study;
            self.remaining_secs = self.settings.study_minutes * 60;
        }

        self.running = false;
        tracing::debug!(%finished, next = %self.mode, "Pomodoro phase completed");

        PhaseCompleted {
            finished,
            next: self.mode,
            session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::Manager;

    fn quick_settings() -> PomodoroSettings {
        PomodoroSettings {
            study_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 2,
        }
    }

    fn run_phase(timer: &mut PomodoroTimer, sessions: &mut PomodoroManager) -> PhaseCompleted {
        timer.start();
        loop {
            if let Some(done) = timer.tick(sessions, Utc::now()) {
                return done;
            }
        }
    }

    #[test]
    fn test_record_session_and_totals() {
        let mut sessions = PomodoroManager::new(Vec::new());
        let now = Utc::now();
        let session = sessions.record_session(0.5, now);
        assert_eq!(session.date, now.date_naive());
        sessions.record_session(0.25, now);
        assert_eq!(sessions.total_hours(), 0.75);
        assert_eq!(sessions.this_week_hours(now.date_naive()), 0.75);
        assert_eq!(
            sessions.this_week_hours(now.date_naive() + Duration::days(30)),
            0.0
        );
    }

    #[test]
    fn test_this_week_excludes_eighth_day() {
        let mut sessions = PomodoroManager::new(Vec::new());
        let now = Utc::now();
        for back in 0..=7 {
            sessions.record_session(0.5, now - Duration::days(back));
        }
        assert_eq!(sessions.this_week_hours(now.date_naive()), 3.5);
    }

    #[test]
    fn test_paused_timer_does_not_advance() {
        let mut sessions = PomodoroManager::new(Vec::new());
        let mut timer = PomodoroTimer::new(PomodoroSettings::default(), 0);
        assert_eq!(timer.remaining_secs(), 25 * 60);
        assert!(timer.tick(&mut sessions, Utc::now()).is_none());
        assert_eq!(timer.remaining_secs(), 25 * 60);
    }

    #[test]
    fn test_study_phase_records_session() {
        let mut sessions = PomodoroManager::new(Vec::new());
        let mut timer = PomodoroTimer::new(quick_settings(), 0);

        let done = run_phase(&mut timer, &mut sessions);
        assert_eq!(done.finished, TimerMode::Study);
        assert_eq!(done.next, TimerMode::ShortBreak);
        assert!(done.session.is_some());
        assert_eq!(sessions.len(), 1);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs(), 60);

        let done = run_phase(&mut timer, &mut sessions);
        assert_eq!(done.finished, TimerMode::ShortBreak);
        assert!(done.session.is_none());
        assert_eq!(sessions.len(), 1);
        assert_eq!(timer.mode(), TimerMode::Study);
    }

    #[test]
    fn test_long_break_every_fourth_session() {
        let mut sessions = PomodoroManager::new(Vec::new());
        let mut timer = PomodoroTimer::new(quick_settings(), 0);

        let mut breaks = Vec::new();
        for _ in 0..4 {
            breaks.push(run_phase(&mut timer, &mut sessions).next);
            run_phase(&mut timer, &mut sessions);
        }
        assert_eq!(
            breaks,
            vec![
                TimerMode::ShortBreak,
                TimerMode::ShortBreak,
                TimerMode::ShortBreak,
                TimerMode::LongBreak
            ]
        );
        assert_eq!(timer.sessions_completed(), 4);
    }

    #[test]
    fn test_reset() {
        let mut sessions = PomodoroManager::new(Vec::new());
        let mut timer = PomodoroTimer::new(quick_settings(), 0);
        run_phase(&mut timer, &mut sessions);
        timer.start();
        timer.reset();
        assert_eq!(timer.mode(), TimerMode::Study);
        assert_eq!(timer.remaining_secs(), 60);
        assert!(!timer.is_running());
    }
}
