//! Combat achievement records, host data conversion and persisted user state.
//!
//! Records are rebuilt from host data on every load. Tracking and
//! difficulty ratings survive reloads by being re-applied by id.

pub mod host;
pub mod persistence;
pub mod store;
pub mod types;

pub use host::{load_achievements, load_tier_thresholds, GameDataSource, HostTask};
pub use persistence::{
    decode_difficulties, decode_tracked_ids, encode_difficulties, encode_tracked_ids,
};
pub use store::AchievementStore;
pub use types::{AchievementId, CombatAchievement, TierLevel, TASK_TYPES};
