use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::config::Config;
use roster_core::{
    Clock, PlayingTimeReport, RosterStore, TimeTracker, TracingEventHandler, player_view,
};
use roster_types::{
    ClockState, CoachId, Command, CommandOutcome, Formation, MatchId, RosterView, TrackerError,
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("Match not found: {match_id}")]
    MatchNotFound { match_id: MatchId },
    #[error("persistence failure: {0:#}")]
    Persistence(anyhow::Error),
}

/// Defaults applied to every tracker the manager creates.
#[derive(Debug, Clone, Default)]
pub struct RosterSettings {
    pub default_match_minutes: Option<i32>,
    pub formation: Option<Formation>,
}

impl From<&Config> for RosterSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_match_minutes: Some(config.default_match_minutes),
            formation: Some(config.formation.clone()),
        }
    }
}

/// One `TimeTracker` per coach, loaded lazily from the store.
///
/// A command holds its coach's write guard from planning through persisting
/// to committing, so commands for the same coach never interleave.
pub struct RosterManager {
    rosters: RwLock<HashMap<CoachId, Arc<RwLock<TimeTracker>>>>,
    store: Arc<dyn RosterStore>,
    clock: Arc<dyn Clock>,
    settings: RosterSettings,
}

impl RosterManager {
    pub fn new(store: Arc<dyn RosterStore>, clock: Arc<dyn Clock>, settings: RosterSettings) -> Self {
        Self {
            rosters: RwLock::new(HashMap::new()),
            store,
            clock,
            settings,
        }
    }

    async fn tracker(&self, coach_id: CoachId) -> Result<Arc<RwLock<TimeTracker>>, ServiceError> {
        if let Some(tracker) = self.rosters.read().await.get(&coach_id) {
            return Ok(tracker.clone());
        }

        let snapshot = self
            .store
            .load_roster(coach_id)
            .await
            .map_err(|e| {
                error!("Failed to load roster of coach {}: {:#}", coach_id, e);
                ServiceError::Persistence(e)
            })?;

        let mut tracker = TimeTracker::from_snapshot(snapshot);
        tracker.set_formation(self.settings.formation.clone());
        if let Some(minutes) = self.settings.default_match_minutes {
            tracker = tracker.with_default_match_minutes(minutes);
        }
        tracker.add_event_handler(Box::new(TracingEventHandler));

        // Another request may have loaded the same roster meanwhile; keep the first.
        let mut rosters = self.rosters.write().await;
        let entry = rosters
            .entry(coach_id)
            .or_insert_with(|| {
                info!("Loaded roster for coach {}", coach_id);
                Arc::new(RwLock::new(tracker))
            });
        Ok(entry.clone())
    }

    /// Plans, persists and commits one command at the clock's current time.
    pub async fn execute(
        &self,
        coach_id: CoachId,
        command: Command,
    ) -> Result<CommandOutcome, ServiceError> {
        let tracker = self.tracker(coach_id).await?;
        let mut tracker = tracker.write().await;
        let now = self.clock.now();

        let transition = tracker.plan(&command, now).map_err(|e| {
            warn!("Rejected {} for coach {}: {}", command.name(), coach_id, e);
            e
        })?;

        if !transition.is_empty() {
            if let Err(e) = self.store.persist(coach_id, &transition).await {
                error!(
                    "Failed to persist {} for coach {}: {:#}",
                    command.name(),
                    coach_id,
                    e
                );
                return Err(ServiceError::Persistence(e));
            }
        }
        tracker.commit(&transition);

        Ok(CommandOutcome {
            command: command.name().to_string(),
            players: transition
                .new_players
                .iter()
                .chain(transition.players.iter())
                .map(|p| player_view(p, now))
                .collect(),
            current_match: tracker.current_match().cloned(),
            time_logs: transition.time_logs,
            goals: transition.goals,
            repairs: transition.repairs,
        })
    }

    pub async fn roster_view(&self, coach_id: CoachId) -> Result<RosterView, ServiceError> {
        let tracker = self.tracker(coach_id).await?;
        let tracker = tracker.read().await;
        Ok(tracker.roster_view(self.clock.now()))
    }

    pub async fn clock_state(&self, coach_id: CoachId) -> Result<Option<ClockState>, ServiceError> {
        let tracker = self.tracker(coach_id).await?;
        let tracker = tracker.read().await;
        Ok(tracker.clock_state(self.clock.now()))
    }

    /// Playing time of one of the coach's matches. Matches of other coaches
    /// are reported as missing.
    pub async fn report(
        &self,
        coach_id: CoachId,
        match_id: MatchId,
    ) -> Result<PlayingTimeReport, ServiceError> {
        let owned = self
            .store
            .match_belongs_to(coach_id, match_id)
            .await
            .map_err(ServiceError::Persistence)?;
        if !owned {
            warn!("Coach {} requested report of unknown match {}", coach_id, match_id);
            return Err(ServiceError::MatchNotFound { match_id });
        }

        let logs = self
            .store
            .time_logs_for_match(match_id)
            .await
            .map_err(ServiceError::Persistence)?;
        Ok(PlayingTimeReport::from_logs(match_id, &logs))
    }

    pub async fn loaded_rosters(&self) -> usize {
        self.rosters.read().await.len()
    }
}
