//! StudyJournal - Study tracking with a local JSON store and an LLM proxy
//!
//! StudyJournal keeps a student's diary, tasks, grades, pomodoro sessions,
//! notes, flashcards, goals, resources and wellness check-ins in a single
//! local document, derives progress metrics from them, and exposes a thin
//! HTTP proxy that turns notes into flashcards and answers tutor chat
//! through a hosted language model.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         studyjournal CLI                          │
//! └──────────────┬───────────────────────────────────┬───────────────┘
//!                │ mutations / queries                │ ProxyClient
//! ┌──────────────▼───────────────────────┐  ┌────────▼──────────────┐
//! │               Journal                 │  │      LLM Proxy        │
//! │  ┌───────┐ ┌───────┐ ┌────────┐       │  │  /api/generate-       │
//! │  │ Diary │ │ Tasks │ │ Grades │  ...  │  │      flashcards       │
//! │  └───────┘ └───────┘ └────────┘       │  │  /api/chat            │
//! │            ▲                          │  │  /health              │
//! │            │ read-only                │  └────────┬──────────────┘
//! │  ┌─────────┴──────────────────────┐   │           │ retry on 429
//! │  │  Calculators                   │   │  ┌────────▼──────────────┐
//! │  │  levels, insights, stats, plan │   │  │   TextGenerator       │
//! │  └────────────────────────────────┘   │  │   (Gemini REST)       │
//! └──────────────┬───────────────────────┘  └───────────────────────┘
//!                │ snapshot / seed
//! ┌──────────────▼───────────────────────┐
//! │  StorageGateway (+ autosave timer)   │
//! │  studyjournal_data.json              │
//! └──────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`storage`]: document schema, load/save/reset, autosave
//! - [`managers`]: one owner per collection, aggregated in [`Journal`]
//! - [`calculators`]: levels, insights, advanced stats, exam planner
//! - [`proxy`]: axum proxy service, upstream client with retry, proxy client
//! - [`config`]: Configuration management

pub mod calculators;
pub mod config;
pub mod error;
pub mod ids;
pub mod managers;
pub mod proxy;
pub mod storage;

pub use config::StudyJournalConfig;
pub use error::{Error, Result};
pub use managers::Journal;
pub use storage::{Document, StorageGateway};
