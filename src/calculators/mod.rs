//! Derived metrics
//!
//! Stateless functions that read the managers they are handed and compute
//! levels, insights, statistics and exam plans on demand. Nothing here is
//! cached or persisted, apart from the level snapshot in
//! [`crate::storage::Stats`].

pub mod advanced_stats;
pub mod exam_planner;
pub mod gamification;
pub mod insights;

pub use exam_planner::{generate_plan, ExamPlan, TopicAllocation};
pub use gamification::{level_name, LevelProgress};
pub use insights::{Insight, InsightKind};
