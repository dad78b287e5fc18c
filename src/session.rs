//! Tracker session: the single controller behind the All Tasks, Tracked and
//! Bosses views.
//!
//! The session owns the canonical achievement store and the persisted user
//! state. Views are computed on demand as borrowed projections of the store,
//! so every view always sees the same records.
//!
//! All methods are synchronous and expect to be called from the host's UI
//! thread; mutation takes `&mut self`.

use crate::achievements::{
    self, decode_difficulties, decode_tracked_ids, encode_difficulties, encode_tracked_ids,
    AchievementId, AchievementStore, CombatAchievement, GameDataSource,
};
use crate::completion::CompletionPercentages;
use crate::config::{ConfigStore, TrackerConfig, DIFFICULTY_KEY, TRACKED_KEY};
use crate::error::Result;
use crate::filter::{filter_achievements, FilterState};
use crate::messages;
use crate::sort::{sort_achievements, SortSelection};
use crate::stats::{boss_stats, BossStats, BossSummary, ProgressStats};
use crate::tier_goal::{GoalTarget, TierThresholds};
use std::collections::BTreeMap;

pub const EMPTY_ALL_MESSAGE: &str = "No achievements match current filters";
pub const EMPTY_TRACKED_MESSAGE: &str = "No tracked achievements match current filters";
pub const NO_BOSS_DATA_MESSAGE: &str = "No boss data available";
pub const NO_BOSS_MATCH_MESSAGE: &str = "No bosses match search criteria";

/// Which list the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    #[default]
    AllTasks,
    Tracked,
    Bosses,
}

/// Something the host should act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Reload achievement data from the game
    ReloadRequested,
    /// Send this line to the chat box
    ProgressMessage(String),
}

/// What the current view displays.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewContent<'a> {
    /// A filtered, sorted achievement list
    Achievements {
        rows: Vec<&'a CombatAchievement>,
        /// Set when `rows` is empty
        empty_message: Option<String>,
    },
    /// Boss overview, sorted by name
    BossGrid {
        bosses: Vec<(String, BossStats)>,
        empty_message: Option<&'static str>,
    },
}

/// The three stats panel lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsLabels {
    pub total: String,
    pub tracked: String,
    pub goal: String,
}

pub struct TrackerSession<S: ConfigStore> {
    store: AchievementStore,
    config_store: S,
    config: TrackerConfig,
    thresholds: TierThresholds,
    percentages: CompletionPercentages,
    pub filter: FilterState,
    pub sort: SortSelection,
    view: ViewMode,
    selected_boss: Option<String>,
    /// A completion was seen; report progress once the reload lands
    progress_pending: bool,
}

impl<S: ConfigStore> TrackerSession<S> {
    pub fn new(config_store: S) -> Self {
        let config = TrackerConfig::load(&config_store);
        Self {
            store: AchievementStore::new(),
            config_store,
            config,
            thresholds: TierThresholds::default(),
            percentages: CompletionPercentages::default(),
            filter: FilterState::new(),
            sort: SortSelection::default(),
            view: ViewMode::default(),
            selected_boss: None,
            progress_pending: false,
        }
    }

    pub fn store(&self) -> &AchievementStore {
        &self.store
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn config_store(&self) -> &S {
        &self.config_store
    }

    /// Replace and persist the settings.
    pub fn set_config(&mut self, config: TrackerConfig) -> Result<()> {
        config.save(&mut self.config_store)?;
        self.config = config;
        Ok(())
    }

    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    pub fn set_thresholds(&mut self, thresholds: TierThresholds) {
        self.thresholds = thresholds;
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Replace all records with a fresh host load, then re-apply completion
    /// percentages, tracking and difficulty ratings by id.
    pub fn load_achievements(&mut self, achievements: Vec<CombatAchievement>) -> Vec<SessionEvent> {
        self.store.replace_all(achievements);
        if !self.percentages.is_empty() {
            self.store.apply_completion_percentages(&self.percentages);
        }

        let tracked = decode_tracked_ids(self.config_store.get(TRACKED_KEY).as_deref());
        self.store.rehydrate_tracked(&tracked);
        // An empty load (logged out) must not wipe the saved ids
        if !self.store.is_empty() && self.store.tracked_ids() != tracked.as_slice() {
            if let Err(e) = self.save_tracked() {
                tracing::warn!(error = %e, "failed to save pruned tracked achievements");
            }
        }
        let ratings = decode_difficulties(self.config_store.get(DIFFICULTY_KEY).as_deref());
        self.store.rehydrate_difficulties(&ratings);

        let boss_gone = self
            .selected_boss
            .as_deref()
            .is_some_and(|boss| self.store.for_boss(boss).next().is_none());
        if boss_gone {
            self.selected_boss = None;
        }

        let mut events = Vec::new();
        if std::mem::take(&mut self.progress_pending) && self.config.show_chat_messages {
            events.push(SessionEvent::ProgressMessage(messages::progress_message(
                &self.goal(),
            )));
        }
        events
    }

    /// Read thresholds and records from the host and load them.
    pub fn load_from_host(&mut self, source: &dyn GameDataSource) -> Vec<SessionEvent> {
        self.thresholds = achievements::load_tier_thresholds(source);
        self.load_achievements(achievements::load_achievements(source))
    }

    /// Merge wiki percentages now and on every later reload.
    pub fn apply_completion_percentages(&mut self, percentages: CompletionPercentages) -> usize {
        let matched = self.store.apply_completion_percentages(&percentages);
        self.percentages = percentages;
        matched
    }

    /// React to a game chat message.
    pub fn on_chat_message(&mut self, message: &str) -> Vec<SessionEvent> {
        if !messages::is_task_completion_message(message) {
            return Vec::new();
        }
        tracing::debug!(message, "combat task completed, requesting reload");
        self.progress_pending = true;
        vec![SessionEvent::ReloadRequested]
    }

    // =========================================================================
    // User state
    // =========================================================================

    fn save_tracked(&mut self) -> Result<()> {
        let json = encode_tracked_ids(self.store.tracked_ids())?;
        self.config_store.set(TRACKED_KEY, json)
    }

    fn save_difficulties(&mut self) -> Result<()> {
        let json = encode_difficulties(&self.store.difficulties())?;
        self.config_store.set(DIFFICULTY_KEY, json)
    }

    /// Save the tracked set, restoring `previous` if the write fails.
    fn commit_tracked(&mut self, previous: &[AchievementId]) -> Result<()> {
        if let Err(e) = self.save_tracked() {
            self.store.rehydrate_tracked(previous);
            return Err(e);
        }
        Ok(())
    }

    /// Track and persist. Returns true if newly tracked. On a failed save
    /// the tracked set is left unchanged.
    pub fn track(&mut self, id: AchievementId) -> Result<bool> {
        let previous = self.store.tracked_ids().to_vec();
        let added = self.store.track(id)?;
        if added {
            self.commit_tracked(&previous)?;
        }
        Ok(added)
    }

    /// Untrack and persist. Returns true if it was tracked. On a failed
    /// save the tracked set is left unchanged.
    pub fn untrack(&mut self, id: AchievementId) -> Result<bool> {
        let previous = self.store.tracked_ids().to_vec();
        let removed = self.store.untrack(id);
        if removed {
            self.commit_tracked(&previous)?;
        }
        Ok(removed)
    }

    /// Flip tracking and persist. Returns the new state.
    pub fn toggle_tracked(&mut self, id: AchievementId) -> Result<bool> {
        let previous = self.store.tracked_ids().to_vec();
        let tracked = self.store.toggle_tracked(id)?;
        self.commit_tracked(&previous)?;
        Ok(tracked)
    }

    /// Rate a task 1-5, or 0 to clear, and persist. On a failed save the
    /// previous rating is restored.
    pub fn set_user_difficulty(&mut self, id: AchievementId, rating: u8) -> Result<()> {
        let previous = self.store.difficulties();
        self.store.set_user_difficulty(id, rating)?;
        if let Err(e) = self.save_difficulties() {
            self.store.rehydrate_difficulties(&previous);
            return Err(e);
        }
        Ok(())
    }

    /// Mark a task completed ahead of the next reload.
    pub fn mark_completed(&mut self, id: AchievementId) -> Result<bool> {
        self.store.mark_completed(id)
    }

    /// Forget tracked ids and ratings for this profile.
    pub fn clear_persisted_data(&mut self) -> Result<()> {
        self.config_store.unset(TRACKED_KEY)?;
        self.config_store.unset(DIFFICULTY_KEY)?;
        self.store.rehydrate_tracked(&[]);
        self.store.rehydrate_difficulties(&BTreeMap::new());
        Ok(())
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn selected_boss(&self) -> Option<&str> {
        self.selected_boss.as_deref()
    }

    /// Switch views. Leaving or re-entering the boss view clears the boss selection.
    pub fn switch_view(&mut self, view: ViewMode) {
        self.view = view;
        self.selected_boss = None;
    }

    /// Open one boss's tasks (switches to the boss view), or `None` for the grid.
    pub fn select_boss(&mut self, boss: Option<String>) {
        self.view = ViewMode::Bosses;
        self.selected_boss = boss;
    }

    fn filtered_sorted<'a>(
        &self,
        source: impl IntoIterator<Item = &'a CombatAchievement>,
    ) -> Vec<&'a CombatAchievement> {
        let mut rows = filter_achievements(source, &self.filter);
        sort_achievements(&mut rows, self.sort);
        rows
    }

    fn achievement_list<'a>(
        &self,
        rows: Vec<&'a CombatAchievement>,
        empty_message: impl FnOnce() -> String,
    ) -> ViewContent<'a> {
        let empty_message = rows.is_empty().then(empty_message);
        ViewContent::Achievements {
            rows,
            empty_message,
        }
    }

    fn boss_grid(&self) -> ViewContent<'_> {
        let stats = boss_stats(self.store.all());
        if stats.is_empty() {
            return ViewContent::BossGrid {
                bosses: Vec::new(),
                empty_message: Some(NO_BOSS_DATA_MESSAGE),
            };
        }

        let search = self.filter.search().to_lowercase();
        let bosses: Vec<(String, BossStats)> = stats
            .into_iter()
            .filter(|(name, _)| search.is_empty() || name.to_lowercase().contains(&search))
            .collect();
        let empty_message = bosses.is_empty().then_some(NO_BOSS_MATCH_MESSAGE);
        ViewContent::BossGrid {
            bosses,
            empty_message,
        }
    }

    /// Rows (or boss cards) for the current view.
    pub fn content(&self) -> ViewContent<'_> {
        match (self.view, self.selected_boss.as_deref()) {
            (ViewMode::AllTasks, _) => self.achievement_list(
                self.filtered_sorted(self.store.all()),
                || EMPTY_ALL_MESSAGE.to_string(),
            ),
            (ViewMode::Tracked, _) => self.achievement_list(
                self.filtered_sorted(self.store.tracked()),
                || EMPTY_TRACKED_MESSAGE.to_string(),
            ),
            (ViewMode::Bosses, None) => self.boss_grid(),
            (ViewMode::Bosses, Some(boss)) => {
                self.achievement_list(self.filtered_sorted(self.store.for_boss(boss)), || {
                    format!(
                        "No achievements found for {} given current filter settings",
                        boss
                    )
                })
            }
        }
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Completed points over every record, regardless of view.
    pub fn total_completed_points(&self) -> u32 {
        crate::stats::total_completed_points(self.store.all())
    }

    pub fn goal(&self) -> GoalTarget {
        self.thresholds
            .resolve(self.config.tier_goal, self.total_completed_points())
    }

    /// Overall, visible and tracked totals. Visible totals cover the rows of
    /// the current list view and are empty on the boss grid.
    pub fn stats(&self) -> ProgressStats {
        let visible = match self.content() {
            ViewContent::Achievements { rows, .. } => rows,
            ViewContent::BossGrid { .. } => Vec::new(),
        };
        ProgressStats::calculate(self.store.all(), visible, self.store.tracked())
    }

    /// Stats panel text for the current view.
    pub fn stats_labels(&self) -> StatsLabels {
        let compact = self.config.prefer_smaller_stats_panel;
        let stats = self.stats();

        let total = if self.view == ViewMode::Bosses && self.selected_boss.is_none() {
            let summary = BossSummary::from_stats(&boss_stats(self.store.all()));
            messages::boss_label(&summary, compact)
        } else {
            messages::total_label(&stats.overall, compact)
        };

        StatsLabels {
            total,
            tracked: messages::tracked_label(&stats.tracked, compact),
            goal: messages::goal_label(&self.goal(), compact),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use crate::filter::StatusFilter;

    fn records() -> Vec<CombatAchievement> {
        vec![
            CombatAchievement::new(1, "Barrows Novice", "Open the chest", "Easy", 1)
                .with_boss("Barrows")
                .with_completed(true),
            CombatAchievement::new(2, "Defence? What Defence?", "Kill a Barrows brother", "Easy", 1)
                .with_boss("Barrows"),
            CombatAchievement::new(3, "Giant Mole Hunter", "Kill the Giant Mole", "Medium", 2)
                .with_boss("Giant Mole")
                .with_completed(true),
        ]
    }

    fn session() -> TrackerSession<MemoryConfigStore> {
        let mut session = TrackerSession::new(MemoryConfigStore::new());
        session.load_achievements(records());
        session
    }

    #[test]
    fn test_track_persists_ids() {
        let mut session = session();
        assert!(session.track(3).unwrap());
        assert!(session.track(1).unwrap());
        assert!(!session.track(1).unwrap());
        assert_eq!(
            session.config_store().get(TRACKED_KEY).as_deref(),
            Some("[3,1]")
        );

        assert!(session.untrack(3).unwrap());
        assert!(!session.untrack(3).unwrap());
        assert_eq!(
            session.config_store().get(TRACKED_KEY).as_deref(),
            Some("[1]")
        );
    }

    #[test]
    fn test_reload_rehydrates_tracking_and_ratings() {
        let mut session = session();
        session.track(2).unwrap();
        session.set_user_difficulty(2, 4).unwrap();

        session.load_achievements(records());
        assert!(session.store().is_tracked(2));
        assert_eq!(session.store().get(2).unwrap().user_difficulty(), 4);
    }

    #[test]
    fn test_chat_completion_requests_reload_then_reports() {
        let mut session = session();
        assert!(session.on_chat_message("Welcome to the game.").is_empty());

        let events = session.on_chat_message(
            "Congratulations, you've completed an easy combat task: Defence? What Defence? (1 point).",
        );
        assert_eq!(events, vec![SessionEvent::ReloadRequested]);

        let mut reloaded = records();
        reloaded[1].mark_completed_at(0);
        let events = session.load_achievements(reloaded);
        assert_eq!(
            events,
            vec![SessionEvent::ProgressMessage(
                "[Combat Achievements] Progress: 4/38 points (34 points to Easy)".to_string()
            )]
        );

        // Only once per completion
        assert!(session.load_achievements(records()).is_empty());
    }

    #[test]
    fn test_chat_messages_disabled() {
        let mut session = session();
        session
            .set_config(TrackerConfig {
                show_chat_messages: false,
                ..TrackerConfig::default()
            })
            .unwrap();
        session.on_chat_message("Congratulations, you've completed a hard combat task: X.");
        assert!(session.load_achievements(records()).is_empty());
    }

    #[test]
    fn test_tracked_view_empty_message() {
        let mut session = session();
        session.switch_view(ViewMode::Tracked);
        match session.content() {
            ViewContent::Achievements {
                rows,
                empty_message,
            } => {
                assert!(rows.is_empty());
                assert_eq!(empty_message.as_deref(), Some(EMPTY_TRACKED_MESSAGE));
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn test_boss_detail_filters_and_messages() {
        let mut session = session();
        session.select_boss(Some("Barrows".to_string()));
        session.filter.status = StatusFilter::Incomplete;
        match session.content() {
            ViewContent::Achievements { rows, .. } => {
                let ids: Vec<u32> = rows.iter().map(|a| a.id()).collect();
                assert_eq!(ids, vec![2]);
            }
            other => panic!("unexpected content: {:?}", other),
        }

        session.select_boss(Some("Giant Mole".to_string()));
        match session.content() {
            ViewContent::Achievements { empty_message, .. } => assert_eq!(
                empty_message.as_deref(),
                Some("No achievements found for Giant Mole given current filter settings")
            ),
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn test_boss_grid_search() {
        let mut session = session();
        session.switch_view(ViewMode::Bosses);
        session.filter.set_search("MOLE");
        match session.content() {
            ViewContent::BossGrid { bosses, .. } => {
                assert_eq!(bosses.len(), 1);
                assert_eq!(bosses[0].0, "Giant Mole");
            }
            other => panic!("unexpected content: {:?}", other),
        }

        session.filter.set_search("zulrah");
        match session.content() {
            ViewContent::BossGrid { empty_message, .. } => {
                assert_eq!(empty_message, Some(NO_BOSS_MATCH_MESSAGE))
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn test_boss_grid_no_data() {
        let mut session = TrackerSession::new(MemoryConfigStore::new());
        session.switch_view(ViewMode::Bosses);
        assert_eq!(
            session.content(),
            ViewContent::BossGrid {
                bosses: Vec::new(),
                empty_message: Some(NO_BOSS_DATA_MESSAGE),
            }
        );
    }

    #[test]
    fn test_stats_labels() {
        let mut session = session();
        session.track(2).unwrap();
        let labels = session.stats_labels();
        assert_eq!(labels.total, "3/4 pts (3 tasks)");
        assert_eq!(labels.tracked, "0/1 pts (1 tasks)");
        assert_eq!(labels.goal, "35 pts to Easy");

        session.switch_view(ViewMode::Bosses);
        assert_eq!(session.stats_labels().total, "1/2 complete");
    }

    #[test]
    fn test_clear_persisted_data() {
        let mut session = session();
        session.track(1).unwrap();
        session.set_user_difficulty(1, 2).unwrap();
        session.clear_persisted_data().unwrap();
        assert!(session.store().tracked_ids().is_empty());
        assert_eq!(session.config_store().get(TRACKED_KEY), None);
        assert_eq!(session.config_store().get(DIFFICULTY_KEY), None);
        assert_eq!(session.store().get(1).unwrap().user_difficulty(), 0);

        session.set_user_difficulty(2, 1).unwrap();
        assert_eq!(
            session.config_store().get(DIFFICULTY_KEY).as_deref(),
            Some(r#"{"2":1}"#)
        );
    }

    /// Store that rejects every write once `fail` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryConfigStore,
        fail: bool,
    }

    impl ConfigStore for FlakyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<()> {
            if self.fail {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
            self.inner.set(key, value)
        }

        fn unset(&mut self, key: &str) -> Result<()> {
            self.inner.unset(key)
        }
    }

    #[test]
    fn test_failed_save_keeps_previous_state() {
        let mut session = TrackerSession::new(FlakyStore::default());
        session.load_achievements(records());
        session.track(1).unwrap();
        session.set_user_difficulty(1, 3).unwrap();

        session.config_store.fail = true;
        assert!(session.track(2).is_err());
        assert!(session.untrack(1).is_err());
        assert!(session.toggle_tracked(3).is_err());
        assert_eq!(session.store().tracked_ids(), &[1]);
        assert!(!session.store().is_tracked(2));

        assert!(session.set_user_difficulty(1, 5).is_err());
        assert_eq!(session.store().get(1).unwrap().user_difficulty(), 3);
    }

    #[test]
    fn test_reload_prunes_saved_tracked_ids() {
        let mut store = MemoryConfigStore::new();
        store.set(TRACKED_KEY, "[3,7,1]".to_string()).unwrap();
        let mut session = TrackerSession::new(store);

        session.load_achievements(Vec::new());
        assert_eq!(
            session.config_store().get(TRACKED_KEY).as_deref(),
            Some("[3,7,1]")
        );

        session.load_achievements(records());
        assert_eq!(session.store().tracked_ids(), &[3, 1]);
        assert_eq!(
            session.config_store().get(TRACKED_KEY).as_deref(),
            Some("[3,1]")
        );
    }
}
