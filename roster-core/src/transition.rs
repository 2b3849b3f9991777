use roster_types::{
    GoalEvent, Match, MatchId, Player, PlayerId, PlayerStatus, Repair, TimeLog, TimeLogKind,
    Timestamp, TrackerError,
};
use std::collections::HashSet;
use uuid::Uuid;

use crate::clock::rfc3339;
use crate::events::TrackerEvent;

/// The computed effect of one command, not yet applied to the tracker.
///
/// Players and matches carry their complete new state, so a store can write
/// them as whole-row updates.
#[derive(Debug, Clone, Default)]
pub struct Transition {
    pub new_players: Vec<Player>,
    pub players: Vec<Player>,
    pub new_match: Option<Match>,
    pub match_update: Option<Match>,
    pub time_logs: Vec<TimeLog>,
    pub goals: Vec<GoalEvent>,
    pub repairs: Vec<Repair>,
    pub events: Vec<TrackerEvent>,
}

impl Transition {
    pub fn is_empty(&self) -> bool {
        self.new_players.is_empty()
            && self.players.is_empty()
            && self.new_match.is_none()
            && self.match_update.is_none()
            && self.time_logs.is_empty()
            && self.goals.is_empty()
            && self.repairs.is_empty()
    }
}

/// Every positioned player is on the field and no position has two holders.
pub fn roster_is_consistent(players: &[Player]) -> bool {
    let mut held = HashSet::new();
    players.iter().all(|player| match &player.position {
        Some(position) => player.is_on_field && held.insert(position.as_str()),
        None => true,
    })
}

/// Working copy used while planning a transition.
pub(crate) struct Draft<'a> {
    roster: &'a [Player],
    base_match: Option<&'a Match>,
    staged: Vec<Player>,
    staged_match: Option<Match>,
    match_created: bool,
    transition: Transition,
}

impl<'a> Draft<'a> {
    pub(crate) fn new(roster: &'a [Player], current_match: Option<&'a Match>) -> Self {
        Self {
            roster,
            base_match: current_match,
            staged: Vec::new(),
            staged_match: None,
            match_created: false,
            transition: Transition::default(),
        }
    }

    pub(crate) fn player(&self, player_id: PlayerId) -> Result<Player, TrackerError> {
        self.staged
            .iter()
            .find(|p| p.id == player_id)
            .or_else(|| self.roster.iter().find(|p| p.id == player_id))
            .cloned()
            .ok_or(TrackerError::PlayerNotFound { player_id })
    }

    /// The roster as it would look after this draft, in roster order.
    pub(crate) fn players(&self) -> Vec<Player> {
        self.roster
            .iter()
            .map(|p| {
                self.staged
                    .iter()
                    .find(|staged| staged.id == p.id)
                    .unwrap_or(p)
                    .clone()
            })
            .collect()
    }

    pub(crate) fn put(&mut self, player: Player) {
        match self.staged.iter_mut().find(|p| p.id == player.id) {
            Some(existing) => *existing = player,
            None => self.staged.push(player),
        }
    }

    pub(crate) fn current_match(&self) -> Option<&Match> {
        self.staged_match.as_ref().or(self.base_match)
    }

    pub(crate) fn active_match(&self) -> Option<&Match> {
        self.current_match().filter(|m| m.is_active)
    }

    pub(crate) fn create_match(&mut self, new_match: Match) {
        self.staged_match = Some(new_match);
        self.match_created = true;
    }

    pub(crate) fn update_match(&mut self, updated: Match) {
        self.staged_match = Some(updated);
    }

    pub(crate) fn holder_of(&self, position: &str) -> Option<PlayerId> {
        self.players()
            .into_iter()
            .find(|p| p.position.as_deref() == Some(position))
            .map(|p| p.id)
    }

    pub(crate) fn add_player(&mut self, player: Player) {
        self.transition.new_players.push(player);
    }

    pub(crate) fn add_goal(&mut self, goal: GoalEvent) {
        self.transition.goals.push(goal);
    }

    pub(crate) fn add_repair(&mut self, repair: Repair) {
        self.emit(TrackerEvent::Repaired {
            player_id: repair.player_id,
            kind: repair.kind,
        });
        self.transition.repairs.push(repair);
    }

    pub(crate) fn emit(&mut self, event: TrackerEvent) {
        self.transition.events.push(event);
    }

    /// The single transition function for a player's bench/field/position state.
    ///
    /// Closing happens before opening: a position being left is closed first,
    /// then the field session if the player is leaving the field. Sessions are
    /// only timed while a match is active.
    pub(crate) fn move_player(
        &mut self,
        player_id: PlayerId,
        target: &PlayerStatus,
        now: Timestamp,
    ) -> Result<(), TrackerError> {
        let mut player = self.player(player_id)?;
        let current = player.status();
        if &current == target {
            return Ok(());
        }

        let session_match = self.active_match().map(|m| m.id);

        if current.position() != target.position() {
            if let Some(position) = player.position.take() {
                if let Some(start) = player.position_time_start.take() {
                    if let Some(match_id) = session_match {
                        player.total_position_time += (now - start).max(0);
                        self.log_session(
                            &player,
                            match_id,
                            TimeLogKind::Position,
                            start,
                            now,
                            Some(position.clone()),
                        );
                    }
                }
                self.emit(TrackerEvent::PositionCleared {
                    player_id,
                    position,
                });
            }
            player.position_time_start = None;
        }

        if current.is_on_field() && !target.is_on_field() {
            if let Some(start) = player.field_time_start.take() {
                if let Some(match_id) = session_match {
                    player.total_field_time += (now - start).max(0);
                    self.log_session(&player, match_id, TimeLogKind::Field, start, now, None);
                }
            }
            player.is_on_field = false;
            self.emit(TrackerEvent::PlayerSubbedOut { player_id });
        }

        if !current.is_on_field() && target.is_on_field() {
            player.is_on_field = true;
            player.field_time_start = session_match.map(|_| now);
            self.emit(TrackerEvent::PlayerSubbedIn { player_id });
        }

        if let Some(position) = target.position() {
            if current.position() != Some(position) {
                player.position = Some(position.to_string());
                player.position_time_start = session_match.map(|_| now);
                self.emit(TrackerEvent::PositionAssigned {
                    player_id,
                    position: position.to_string(),
                });
            }
        }

        debug_assert!(player.position.is_none() || player.is_on_field);
        player.updated_at = rfc3339(now);
        self.put(player);
        Ok(())
    }

    /// Starts the clock on whatever the player is already doing.
    pub(crate) fn open_sessions(&mut self, mut player: Player, now: Timestamp) {
        if !player.is_on_field {
            return;
        }
        player.field_time_start = Some(now);
        if player.position.is_some() {
            player.position_time_start = Some(now);
        }
        player.updated_at = rfc3339(now);
        self.put(player);
    }

    fn log_session(
        &mut self,
        player: &Player,
        match_id: MatchId,
        kind: TimeLogKind,
        start_time: Timestamp,
        end_time: Timestamp,
        position: Option<String>,
    ) {
        let log = TimeLog {
            id: Uuid::new_v4(),
            player_id: player.id,
            match_id,
            start_time,
            end_time,
            kind,
            position,
            created_at: rfc3339(end_time),
        };
        self.emit(TrackerEvent::SessionClosed { log: log.clone() });
        self.transition.time_logs.push(log);
    }

    pub(crate) fn finish(mut self) -> Transition {
        debug_assert!(roster_is_consistent(&self.players()));

        self.transition.players = self.staged;
        if let Some(staged_match) = self.staged_match {
            if self.match_created {
                self.transition.new_match = Some(staged_match);
            } else {
                self.transition.match_update = Some(staged_match);
            }
        }
        self.transition
    }
}
