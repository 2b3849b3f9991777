use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use roster_types::{CoachId, GoalEvent, Match, MatchId, Player, TimeLog};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::transition::Transition;

/// Everything a tracker needs to resume a coach's roster.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    pub players: Vec<Player>,
    pub current_match: Option<Match>,
    pub goals: Vec<GoalEvent>,
}

/// Record store behind the tracker. `persist` must apply a transition
/// completely or not at all.
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Players in insertion order, the coach's latest match and its goals.
    async fn load_roster(&self, coach_id: CoachId) -> Result<RosterSnapshot>;

    /// Whether `match_id` was started by `coach_id`.
    async fn match_belongs_to(&self, coach_id: CoachId, match_id: MatchId) -> Result<bool>;

    async fn time_logs_for_match(&self, match_id: MatchId) -> Result<Vec<TimeLog>>;

    async fn persist(&self, coach_id: CoachId, transition: &Transition) -> Result<()>;
}

#[derive(Default)]
struct Tables {
    players: Vec<(CoachId, Player)>,
    matches: Vec<(CoachId, Match)>,
    time_logs: Vec<TimeLog>,
    goals: Vec<GoalEvent>,
}

/// In-process store for tests and embedders without a database.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `persist` fail, to exercise error paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn time_log_count(&self) -> usize {
        self.tables.lock().map(|t| t.time_logs.len()).unwrap_or(0)
    }

    fn tables(&self) -> Result<std::sync::MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

#[async_trait]
impl RosterStore for MemoryStore {
    async fn load_roster(&self, coach_id: CoachId) -> Result<RosterSnapshot> {
        let tables = self.tables()?;

        let players = tables
            .players
            .iter()
            .filter(|(owner, _)| *owner == coach_id)
            .map(|(_, player)| player.clone())
            .collect();
        let current_match = tables
            .matches
            .iter()
            .filter(|(owner, _)| *owner == coach_id)
            .map(|(_, m)| m)
            .max_by_key(|m| m.start_time)
            .cloned();
        let goals = match &current_match {
            Some(m) => tables
                .goals
                .iter()
                .filter(|g| g.match_id == m.id)
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        Ok(RosterSnapshot {
            players,
            current_match,
            goals,
        })
    }

    async fn match_belongs_to(&self, coach_id: CoachId, match_id: MatchId) -> Result<bool> {
        let tables = self.tables()?;
        Ok(tables
            .matches
            .iter()
            .any(|(owner, m)| *owner == coach_id && m.id == match_id))
    }

    async fn time_logs_for_match(&self, match_id: MatchId) -> Result<Vec<TimeLog>> {
        let tables = self.tables()?;
        Ok(tables
            .time_logs
            .iter()
            .filter(|log| log.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn persist(&self, coach_id: CoachId, transition: &Transition) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("memory store is rejecting writes");
        }

        let mut tables = self.tables()?;

        // Check every referenced row first so a rejected transition writes nothing.
        let owns_player = |tables: &Tables, id| {
            tables
                .players
                .iter()
                .any(|(owner, p)| *owner == coach_id && p.id == id)
        };
        for player in &transition.players {
            let added = transition.new_players.iter().any(|p| p.id == player.id);
            if !added && !owns_player(&*tables, player.id) {
                bail!("player {} not found", player.id);
            }
        }
        if let Some(updated) = &transition.match_update {
            let known = tables
                .matches
                .iter()
                .any(|(owner, m)| *owner == coach_id && m.id == updated.id)
                || transition.new_match.as_ref().map(|m| m.id) == Some(updated.id);
            if !known {
                bail!("match {} not found", updated.id);
            }
        }

        for player in &transition.new_players {
            tables.players.push((coach_id, player.clone()));
        }
        for player in &transition.players {
            if let Some(row) = tables
                .players
                .iter_mut()
                .find(|(owner, p)| *owner == coach_id && p.id == player.id)
            {
                row.1 = player.clone();
            }
        }

        if let Some(new_match) = &transition.new_match {
            tables.matches.push((coach_id, new_match.clone()));
        }
        if let Some(updated) = &transition.match_update {
            if let Some(row) = tables
                .matches
                .iter_mut()
                .find(|(owner, m)| *owner == coach_id && m.id == updated.id)
            {
                row.1 = updated.clone();
            }
        }

        tables.time_logs.extend(transition.time_logs.iter().cloned());
        tables.goals.extend(transition.goals.iter().cloned());
        Ok(())
    }
}
