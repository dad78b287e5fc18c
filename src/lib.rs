//! Combat achievement tracker core.
//!
//! Holds the achievement records loaded from the game client and computes
//! what the tracker panel shows: filtered and sorted lists, boss summaries,
//! point totals and progress toward a tier goal. Tracked ids, difficulty
//! ratings and settings persist through a [`config::ConfigStore`].
//!
//! Rendering, wiki fetching and reading game memory belong to the host.

pub mod achievements;
pub mod completion;
pub mod config;
pub mod error;
pub mod filter;
pub mod messages;
pub mod session;
pub mod sort;
pub mod stats;
pub mod tier_goal;

pub use achievements::{AchievementId, AchievementStore, CombatAchievement, TierLevel};
pub use config::{ConfigStore, JsonFileConfigStore, MemoryConfigStore, TrackerConfig};
pub use error::{Result, TrackerError};
pub use filter::{FilterState, StatusFilter, TypeFilter};
pub use session::{SessionEvent, TrackerSession, ViewContent, ViewMode};
pub use sort::{SortDirection, SortKey, SortSelection};
pub use tier_goal::{GoalTarget, TierGoal, TierThresholds};
