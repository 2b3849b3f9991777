use anyhow::{Context, Result};
use async_trait::async_trait;
use roster_core::{RosterSnapshot, RosterStore, Transition};
use roster_types::{CoachId, MatchId, TimeLog};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::debug;

use crate::repositories::{GoalRepository, MatchRepository, PlayerRepository, TimeLogRepository};

/// `RosterStore` over the sea-orm schema. Each transition is written in a
/// single database transaction.
#[derive(Clone)]
pub struct SqlRosterStore {
    db: DatabaseConnection,
}

impl SqlRosterStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RosterStore for SqlRosterStore {
    async fn load_roster(&self, coach_id: CoachId) -> Result<RosterSnapshot> {
        let players = PlayerRepository::new(&self.db).find_by_coach(coach_id).await?;
        let current_match = MatchRepository::new(&self.db)
            .find_latest_for_coach(coach_id)
            .await?;
        let goals = match &current_match {
            Some(m) => GoalRepository::new(&self.db).find_by_match(m.id).await?,
            None => Vec::new(),
        };

        debug!(
            "Loaded roster of coach {}: {} players, match {:?}",
            coach_id,
            players.len(),
            current_match.as_ref().map(|m| m.id)
        );
        Ok(RosterSnapshot {
            players,
            current_match,
            goals,
        })
    }

    async fn match_belongs_to(&self, coach_id: CoachId, match_id: MatchId) -> Result<bool> {
        MatchRepository::new(&self.db)
            .exists_for_coach(coach_id, match_id)
            .await
    }

    async fn time_logs_for_match(&self, match_id: MatchId) -> Result<Vec<TimeLog>> {
        TimeLogRepository::new(&self.db).find_by_match(match_id).await
    }

    async fn persist(&self, coach_id: CoachId, transition: &Transition) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .context("opening roster transaction")?;

        let players = PlayerRepository::new(&txn);
        for player in &transition.new_players {
            players.insert(coach_id, player).await?;
        }

        // The match row must exist before time logs reference it.
        let matches = MatchRepository::new(&txn);
        if let Some(new_match) = &transition.new_match {
            matches.insert(coach_id, new_match).await?;
        }

        for player in &transition.players {
            players.update_state(coach_id, player).await?;
        }

        if let Some(updated) = &transition.match_update {
            matches.update_state(coach_id, updated).await?;
        }

        TimeLogRepository::new(&txn)
            .insert_many(&transition.time_logs)
            .await?;

        let goals = GoalRepository::new(&txn);
        for goal in &transition.goals {
            goals.insert(goal).await?;
        }

        txn.commit().await.context("committing roster transaction")?;
        Ok(())
    }
}
