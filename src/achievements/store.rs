//! Canonical achievement storage.
//!
//! The store owns every record; views borrow from it. Each host load
//! replaces the whole set, after which persisted user state is re-applied
//! by id.

use super::types::{AchievementId, CombatAchievement};
use crate::completion::CompletionPercentages;
use crate::error::{Result, TrackerError};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
pub struct AchievementStore {
    /// Records in host load order
    records: Vec<CombatAchievement>,
    index: HashMap<AchievementId, usize>,
    /// Tracked ids in the order they were added
    tracked: Vec<AchievementId>,
}

impl AchievementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_achievements(achievements: Vec<CombatAchievement>) -> Self {
        let mut store = Self::new();
        store.replace_all(achievements);
        store
    }

    /// Replace the full record set. Tracking is cleared; duplicate ids keep
    /// the first record.
    pub fn replace_all(&mut self, achievements: Vec<CombatAchievement>) {
        self.records.clear();
        self.index.clear();
        self.tracked.clear();

        for mut achievement in achievements {
            if self.index.contains_key(&achievement.id()) {
                tracing::warn!(id = achievement.id(), "duplicate achievement id, skipping");
                continue;
            }
            achievement.set_tracked(false);
            self.index.insert(achievement.id(), self.records.len());
            self.records.push(achievement);
        }
        tracing::debug!(count = self.records.len(), "achievement set replaced");
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: AchievementId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: AchievementId) -> Option<&CombatAchievement> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    fn get_mut(&mut self, id: AchievementId) -> Result<&mut CombatAchievement> {
        let i = *self
            .index
            .get(&id)
            .ok_or(TrackerError::UnknownAchievement(id))?;
        Ok(&mut self.records[i])
    }

    /// Every record in load order.
    pub fn all(&self) -> impl Iterator<Item = &CombatAchievement> + '_ {
        self.records.iter()
    }

    /// Records for one boss, in load order.
    pub fn for_boss<'a>(
        &'a self,
        boss: &'a str,
    ) -> impl Iterator<Item = &'a CombatAchievement> + 'a {
        self.records
            .iter()
            .filter(move |achievement| achievement.boss_name() == Some(boss))
    }

    // =========================================================================
    // Tracking
    // =========================================================================

    /// Tracked ids in the order they were added.
    pub fn tracked_ids(&self) -> &[AchievementId] {
        &self.tracked
    }

    /// Tracked records in the order they were added.
    pub fn tracked(&self) -> impl Iterator<Item = &CombatAchievement> + '_ {
        self.tracked.iter().filter_map(|id| self.get(*id))
    }

    pub fn is_tracked(&self, id: AchievementId) -> bool {
        self.get(id).is_some_and(CombatAchievement::is_tracked)
    }

    /// Start tracking. Returns true if newly tracked.
    pub fn track(&mut self, id: AchievementId) -> Result<bool> {
        let achievement = self.get_mut(id)?;
        if achievement.is_tracked() {
            return Ok(false);
        }
        achievement.set_tracked(true);
        self.tracked.push(id);
        tracing::debug!(id, "tracking achievement");
        Ok(true)
    }

    /// Stop tracking. Untracked or unknown ids are a no-op returning false.
    pub fn untrack(&mut self, id: AchievementId) -> bool {
        let Some(pos) = self.tracked.iter().position(|t| *t == id) else {
            return false;
        };
        self.tracked.remove(pos);
        if let Ok(achievement) = self.get_mut(id) {
            achievement.set_tracked(false);
        }
        tracing::debug!(id, "untracked achievement");
        true
    }

    /// Flip tracking. Returns the new tracked state.
    pub fn toggle_tracked(&mut self, id: AchievementId) -> Result<bool> {
        if self.is_tracked(id) {
            self.untrack(id);
            Ok(false)
        } else {
            self.track(id)?;
            Ok(true)
        }
    }

    /// Replace the tracked set with persisted ids. Ids missing from the
    /// current records are dropped. Returns the number tracked.
    pub fn rehydrate_tracked(&mut self, ids: &[AchievementId]) -> usize {
        for id in std::mem::take(&mut self.tracked) {
            if let Ok(achievement) = self.get_mut(id) {
                achievement.set_tracked(false);
            }
        }

        let mut dropped = 0;
        for &id in ids {
            if !self.contains(id) {
                dropped += 1;
                continue;
            }
            // Duplicates in the blob are harmless
            let _ = self.track(id);
        }
        tracing::debug!(
            tracked = self.tracked.len(),
            dropped,
            "rehydrated tracked achievements"
        );
        self.tracked.len()
    }

    // =========================================================================
    // Record state
    // =========================================================================

    /// Mark a record completed now. Returns true if newly completed.
    pub fn mark_completed(&mut self, id: AchievementId) -> Result<bool> {
        Ok(self.get_mut(id)?.mark_completed())
    }

    pub fn set_user_difficulty(&mut self, id: AchievementId, rating: u8) -> Result<()> {
        self.get_mut(id)?.set_user_difficulty(rating)
    }

    /// Non-zero difficulty ratings by id.
    pub fn difficulties(&self) -> BTreeMap<AchievementId, u8> {
        self.records
            .iter()
            .filter(|a| a.user_difficulty() > 0)
            .map(|a| (a.id(), a.user_difficulty()))
            .collect()
    }

    /// Replace every rating with the persisted ones; records not in `ratings`
    /// become unrated. Unknown ids and out-of-range ratings are skipped.
    /// Returns the number applied.
    pub fn rehydrate_difficulties(&mut self, ratings: &BTreeMap<AchievementId, u8>) -> usize {
        for achievement in &mut self.records {
            achievement.clear_user_difficulty();
        }

        let mut applied = 0;
        for (&id, &rating) in ratings {
            match self.set_user_difficulty(id, rating) {
                Ok(()) => applied += 1,
                Err(e) => tracing::debug!(id, error = %e, "skipping persisted difficulty"),
            }
        }
        applied
    }

    /// Merge wiki completion percentages into every record.
    pub fn apply_completion_percentages(&mut self, percentages: &CompletionPercentages) -> usize {
        percentages.hydrate(self.records.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(ids: &[u32]) -> AchievementStore {
        AchievementStore::from_achievements(
            ids.iter()
                .map(|id| CombatAchievement::new(*id, format!("Task {}", id), "", "Easy", 1))
                .collect(),
        )
    }

    #[test]
    fn test_track_is_idempotent() {
        let mut store = store_with(&[1, 2, 3]);
        assert!(store.track(2).unwrap());
        assert!(!store.track(2).unwrap());
        assert_eq!(store.tracked_ids(), &[2]);
        assert!(store.is_tracked(2));
    }

    #[test]
    fn test_untrack_is_idempotent() {
        let mut store = store_with(&[1, 2, 3]);
        assert!(!store.untrack(1));
        store.track(1).unwrap();
        assert!(store.untrack(1));
        assert!(!store.untrack(1));
        assert!(store.tracked_ids().is_empty());
        assert!(!store.get(1).unwrap().is_tracked());
        assert!(!store.untrack(99));
    }

    #[test]
    fn test_track_unknown_id_errors() {
        let mut store = store_with(&[1]);
        assert!(matches!(
            store.track(42),
            Err(TrackerError::UnknownAchievement(42))
        ));
        assert!(store.tracked_ids().is_empty());
    }

    #[test]
    fn test_toggle_tracked() {
        let mut store = store_with(&[1]);
        assert!(store.toggle_tracked(1).unwrap());
        assert!(!store.toggle_tracked(1).unwrap());
        assert!(store.toggle_tracked(5).is_err());
    }

    #[test]
    fn test_rehydrate_drops_unknown_ids() {
        let mut store = store_with(&[1, 2, 3, 4]);
        store.track(4).unwrap();
        let count = store.rehydrate_tracked(&[1, 3, 5, 3]);
        assert_eq!(count, 2);
        assert_eq!(store.tracked_ids(), &[1, 3]);
        assert!(!store.get(4).unwrap().is_tracked());
    }

    #[test]
    fn test_replace_all_clears_tracking() {
        let mut store = store_with(&[1, 2]);
        store.track(1).unwrap();
        store.replace_all(vec![CombatAchievement::new(1, "Task 1", "", "Easy", 1)]);
        assert!(store.tracked_ids().is_empty());
        assert!(!store.is_tracked(1));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let store = AchievementStore::from_achievements(vec![
            CombatAchievement::new(1, "First", "", "Easy", 1),
            CombatAchievement::new(1, "Second", "", "Easy", 1),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().name(), "First");
    }

    #[test]
    fn test_difficulties_rehydrate() {
        let mut store = store_with(&[1, 2]);
        store.set_user_difficulty(1, 3).unwrap();
        let saved = store.difficulties();
        assert_eq!(saved.get(&1), Some(&3));
        assert_eq!(saved.len(), 1);

        let mut fresh = store_with(&[1, 2]);
        let mut ratings = saved.clone();
        ratings.insert(2, 9);
        ratings.insert(7, 2);
        assert_eq!(fresh.rehydrate_difficulties(&ratings), 1);
        assert_eq!(fresh.get(1).unwrap().user_difficulty(), 3);
        assert_eq!(fresh.get(2).unwrap().user_difficulty(), 0);
    }

    #[test]
    fn test_rehydrate_difficulties_replaces_existing_ratings() {
        let mut store = store_with(&[1, 2]);
        store.set_user_difficulty(1, 4).unwrap();
        store.set_user_difficulty(2, 1).unwrap();

        let mut ratings = BTreeMap::new();
        ratings.insert(2, 5);
        assert_eq!(store.rehydrate_difficulties(&ratings), 1);
        assert_eq!(store.get(1).unwrap().user_difficulty(), 0);
        assert_eq!(store.get(2).unwrap().user_difficulty(), 5);

        store.rehydrate_difficulties(&BTreeMap::new());
        assert!(store.difficulties().is_empty());
    }

    #[test]
    fn test_mark_completed_unknown() {
        let mut store = store_with(&[1]);
        assert!(store.mark_completed(1).unwrap());
        assert!(!store.mark_completed(1).unwrap());
        assert!(store.mark_completed(2).is_err());
    }
}
