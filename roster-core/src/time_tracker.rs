use roster_types::{
    ClockState, Command, Formation, GoalEvent, Match, Player, PlayerId, PlayerStatus, PlayerView,
    RosterView, Score, Timestamp, TrackerError,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::{match_date, rfc3339};
use crate::events::{TrackerEventBus, TrackerEventHandler, TrackerEvent};
use crate::match_clock;
use crate::reconcile;
use crate::store::RosterSnapshot;
use crate::transition::{Draft, Transition};

/// Field time at `now`: closed sessions plus the open one, if any.
pub fn current_field_time(player: &Player, now: Timestamp) -> i64 {
    let open = match (player.is_on_field, player.field_time_start) {
        (true, Some(start)) => (now - start).max(0),
        _ => 0,
    };
    player.total_field_time + open
}

/// Position time at `now`: closed sessions plus the open one, if any.
pub fn current_position_time(player: &Player, now: Timestamp) -> i64 {
    let open = match (&player.position, player.position_time_start) {
        (Some(_), Some(start)) => (now - start).max(0),
        _ => 0,
    };
    player.total_position_time + open
}

/// Owns a coach's roster and match state and applies every time-accounting
/// rule to it.
///
/// Mutations are two-phase: [`TimeTracker::plan`] computes a [`Transition`]
/// without touching state, and [`TimeTracker::commit`] applies it. Callers
/// that persist state commit only after the store accepted the transition.
pub struct TimeTracker {
    players: Vec<Player>,
    current_match: Option<Match>,
    goals: Vec<GoalEvent>,
    formation: Option<Formation>,
    default_match_minutes: i32,
    event_bus: TrackerEventBus,
}

pub const DEFAULT_MATCH_MINUTES: i32 = 90;

impl TimeTracker {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            current_match: None,
            goals: Vec::new(),
            formation: None,
            default_match_minutes: DEFAULT_MATCH_MINUTES,
            event_bus: TrackerEventBus::new(),
        }
    }

    pub fn from_snapshot(snapshot: RosterSnapshot) -> Self {
        Self {
            players: snapshot.players,
            current_match: snapshot.current_match,
            goals: snapshot.goals,
            formation: None,
            default_match_minutes: DEFAULT_MATCH_MINUTES,
            event_bus: TrackerEventBus::new(),
        }
    }

    /// Restricts position names to the slots of `formation`.
    pub fn with_formation(mut self, formation: Formation) -> Self {
        self.formation = Some(formation);
        self
    }

    /// Match length used when a start command names none.
    pub fn with_default_match_minutes(mut self, minutes: i32) -> Self {
        self.default_match_minutes = minutes;
        self
    }

    pub fn set_formation(&mut self, formation: Option<Formation>) {
        self.formation = formation;
    }

    pub fn formation(&self) -> Option<&Formation> {
        self.formation.as_ref()
    }

    pub fn add_event_handler(&mut self, handler: Box<dyn TrackerEventHandler>) {
        self.event_bus.add_handler(handler);
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn current_match(&self) -> Option<&Match> {
        self.current_match.as_ref()
    }

    pub fn active_match(&self) -> Option<&Match> {
        self.current_match.as_ref().filter(|m| m.is_active)
    }

    pub fn goals(&self) -> &[GoalEvent] {
        &self.goals
    }

    /// Computes the effect of `command` at `now` without applying it.
    pub fn plan(&self, command: &Command, now: Timestamp) -> Result<Transition, TrackerError> {
        let mut draft = Draft::new(&self.players, self.current_match.as_ref());

        match command {
            Command::AddPlayer { name, number } => {
                self.plan_add_player(&mut draft, name, *number, now)?;
            }
            Command::StartMatch {
                opponent,
                duration_minutes,
            } => {
                let minutes = duration_minutes.unwrap_or(self.default_match_minutes);
                self.plan_start_match(&mut draft, opponent.clone(), minutes, now)?
            }
            Command::ToggleHalfTime => {
                let halted = draft
                    .active_match()
                    .ok_or(TrackerError::NoActiveMatch)?
                    .is_half_time();
                if halted {
                    self.plan_end_half_time(&mut draft, now)?
                } else {
                    self.plan_start_half_time(&mut draft, now)?
                }
            }
            Command::StartHalfTime => self.plan_start_half_time(&mut draft, now)?,
            Command::EndHalfTime => self.plan_end_half_time(&mut draft, now)?,
            Command::SubIn { player_id } => {
                if !draft.player(*player_id)?.is_on_field {
                    draft.move_player(*player_id, &PlayerStatus::OnField, now)?;
                }
            }
            Command::SubOut { player_id } => {
                draft.move_player(*player_id, &PlayerStatus::Bench, now)?;
            }
            Command::AssignPosition {
                player_id,
                position,
            } => self.plan_assign_position(&mut draft, *player_id, position, now)?,
            Command::RemoveFromPosition { player_id, sub_out } => {
                let player = draft.player(*player_id)?;
                let target = if *sub_out || !player.is_on_field {
                    PlayerStatus::Bench
                } else {
                    PlayerStatus::OnField
                };
                draft.move_player(*player_id, &target, now)?;
            }
            Command::SwapPlayers { first, second } => {
                let first_player = draft.player(*first)?;
                let second_player = draft.player(*second)?;
                if first != second {
                    // Both moves share `now` and land in one transition.
                    draft.move_player(*first, &second_player.status(), now)?;
                    draft.move_player(*second, &first_player.status(), now)?;
                }
            }
            Command::RecordGoal {
                scorer_id,
                assist_id,
                is_own_goal,
            } => self.plan_record_goal(&mut draft, *scorer_id, *assist_id, *is_own_goal, now)?,
            Command::SetMatchScore { score } => {
                self.plan_set_score(&mut draft, score.as_deref(), now)?
            }
            Command::EndMatch => self.plan_end_match(&mut draft, now)?,
            Command::Reconcile => reconcile::plan_repairs(&mut draft, now),
        }

        Ok(draft.finish())
    }

    /// Applies a transition produced by [`TimeTracker::plan`] on this tracker.
    pub fn commit(&mut self, transition: &Transition) {
        self.players.extend(transition.new_players.iter().cloned());

        for updated in &transition.players {
            match self.players.iter_mut().find(|p| p.id == updated.id) {
                Some(player) => *player = updated.clone(),
                None => self.players.push(updated.clone()),
            }
        }

        if let Some(new_match) = &transition.new_match {
            self.goals.clear();
            self.current_match = Some(new_match.clone());
        }
        if let Some(updated) = &transition.match_update {
            self.current_match = Some(updated.clone());
        }
        self.goals.extend(transition.goals.iter().cloned());

        for event in &transition.events {
            self.event_bus.publish(event);
        }
    }

    /// Plans and commits in one step, for callers without a store.
    pub fn apply(&mut self, command: &Command, now: Timestamp) -> Result<Transition, TrackerError> {
        let transition = self.plan(command, now)?;
        self.commit(&transition);
        Ok(transition)
    }

    pub fn add_player(
        &mut self,
        name: &str,
        number: Option<i32>,
        now: Timestamp,
    ) -> Result<PlayerId, TrackerError> {
        let mut draft = Draft::new(&self.players, self.current_match.as_ref());
        let player_id = self.plan_add_player(&mut draft, name, number, now)?;
        let transition = draft.finish();
        self.commit(&transition);
        Ok(player_id)
    }

    pub fn start_match(
        &mut self,
        opponent: Option<String>,
        duration_minutes: i32,
        now: Timestamp,
    ) -> Result<Transition, TrackerError> {
        self.apply(
            &Command::StartMatch {
                opponent,
                duration_minutes: Some(duration_minutes),
            },
            now,
        )
    }

    pub fn toggle_half_time(&mut self, now: Timestamp) -> Result<Transition, TrackerError> {
        self.apply(&Command::ToggleHalfTime, now)
    }

    pub fn start_half_time(&mut self, now: Timestamp) -> Result<Transition, TrackerError> {
        self.apply(&Command::StartHalfTime, now)
    }

    pub fn end_half_time(&mut self, now: Timestamp) -> Result<Transition, TrackerError> {
        self.apply(&Command::EndHalfTime, now)
    }

    pub fn set_player_on_field(
        &mut self,
        player_id: PlayerId,
        now: Timestamp,
    ) -> Result<Transition, TrackerError> {
        self.apply(&Command::SubIn { player_id }, now)
    }

    pub fn set_player_off_field(
        &mut self,
        player_id: PlayerId,
        now: Timestamp,
    ) -> Result<Transition, TrackerError> {
        self.apply(&Command::SubOut { player_id }, now)
    }

    pub fn assign_position(
        &mut self,
        player_id: PlayerId,
        position: &str,
        now: Timestamp,
    ) -> Result<Transition, TrackerError> {
        self.apply(
            &Command::AssignPosition {
                player_id,
                position: position.to_string(),
            },
            now,
        )
    }

    pub fn remove_from_position(
        &mut self,
        player_id: PlayerId,
        sub_out: bool,
        now: Timestamp,
    ) -> Result<Transition, TrackerError> {
        self.apply(&Command::RemoveFromPosition { player_id, sub_out }, now)
    }

    pub fn swap_players(
        &mut self,
        first: PlayerId,
        second: PlayerId,
        now: Timestamp,
    ) -> Result<Transition, TrackerError> {
        self.apply(&Command::SwapPlayers { first, second }, now)
    }

    pub fn record_goal(
        &mut self,
        scorer_id: Option<PlayerId>,
        assist_id: Option<PlayerId>,
        is_own_goal: bool,
        now: Timestamp,
    ) -> Result<Transition, TrackerError> {
        self.apply(
            &Command::RecordGoal {
                scorer_id,
                assist_id,
                is_own_goal,
            },
            now,
        )
    }

    pub fn set_match_score(
        &mut self,
        score: Option<String>,
        now: Timestamp,
    ) -> Result<Transition, TrackerError> {
        self.apply(&Command::SetMatchScore { score }, now)
    }

    pub fn end_match(&mut self, now: Timestamp) -> Result<Transition, TrackerError> {
        self.apply(&Command::EndMatch, now)
    }

    pub fn reconcile(&mut self, now: Timestamp) -> Result<Transition, TrackerError> {
        self.apply(&Command::Reconcile, now)
    }

    pub fn elapsed_match_time(&self, now: Timestamp) -> i64 {
        self.current_match
            .as_ref()
            .map(|m| match_clock::elapsed_match_time(m, now))
            .unwrap_or(0)
    }

    pub fn clock_state(&self, now: Timestamp) -> Option<ClockState> {
        self.current_match
            .as_ref()
            .map(|m| match_clock::clock_state(m, now))
    }

    pub fn current_field_time(&self, player_id: PlayerId, now: Timestamp) -> Result<i64, TrackerError> {
        self.player(player_id)
            .map(|p| current_field_time(p, now))
            .ok_or(TrackerError::PlayerNotFound { player_id })
    }

    pub fn current_position_time(
        &self,
        player_id: PlayerId,
        now: Timestamp,
    ) -> Result<i64, TrackerError> {
        self.player(player_id)
            .map(|p| current_position_time(p, now))
            .ok_or(TrackerError::PlayerNotFound { player_id })
    }

    pub fn score(&self) -> Score {
        Score::from_goals(&self.goals)
    }

    pub fn player_views(&self, now: Timestamp) -> Vec<PlayerView> {
        self.players.iter().map(|p| player_view(p, now)).collect()
    }

    pub fn roster_view(&self, now: Timestamp) -> RosterView {
        RosterView {
            players: self.player_views(now),
            current_match: self.current_match.clone(),
            clock: self.clock_state(now),
            score: self.score(),
        }
    }

    fn plan_add_player(
        &self,
        draft: &mut Draft<'_>,
        name: &str,
        number: Option<i32>,
        now: Timestamp,
    ) -> Result<PlayerId, TrackerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::InvalidPlayerName);
        }

        let player = Player::new(Uuid::new_v4(), name.to_string(), number, rfc3339(now));
        draft.emit(TrackerEvent::PlayerAdded {
            player_id: player.id,
            name: player.name.clone(),
        });
        let player_id = player.id;
        draft.add_player(player);
        Ok(player_id)
    }

    fn plan_start_match(
        &self,
        draft: &mut Draft<'_>,
        opponent: Option<String>,
        duration_minutes: i32,
        now: Timestamp,
    ) -> Result<(), TrackerError> {
        if draft.active_match().is_some() {
            return Err(TrackerError::MatchAlreadyActive);
        }
        if duration_minutes <= 0 {
            return Err(TrackerError::InvalidDuration {
                minutes: duration_minutes,
            });
        }

        let opponent = opponent
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty());
        let new_match = Match {
            id: Uuid::new_v4(),
            date: match_date(now),
            opponent: opponent.clone(),
            start_time: now,
            end_time: None,
            half_time_start: None,
            half_time_end: None,
            duration: duration_minutes,
            is_active: true,
            score: None,
            created_at: rfc3339(now),
            updated_at: rfc3339(now),
        };
        info!("Starting match {} ({} minutes)", new_match.id, duration_minutes);

        draft.emit(TrackerEvent::MatchStarted {
            match_id: new_match.id,
            opponent,
            duration_minutes,
        });
        draft.create_match(new_match);

        // The line-up picked before kickoff starts accruing at kickoff.
        for player in draft.players() {
            draft.open_sessions(player, now);
        }
        Ok(())
    }

    fn plan_start_half_time(&self, draft: &mut Draft<'_>, now: Timestamp) -> Result<(), TrackerError> {
        let mut current = draft
            .active_match()
            .cloned()
            .ok_or(TrackerError::NoActiveMatch)?;
        if current.is_half_time() {
            return Err(TrackerError::AlreadyInHalfTime);
        }
        if current.half_time_end.is_some() {
            return Err(TrackerError::HalfTimeAlreadyTaken);
        }

        current.half_time_start = Some(now);
        current.updated_at = rfc3339(now);
        draft.emit(TrackerEvent::HalfTimeStarted {
            match_id: current.id,
        });
        draft.update_match(current);
        Ok(())
    }

    fn plan_end_half_time(&self, draft: &mut Draft<'_>, now: Timestamp) -> Result<(), TrackerError> {
        let mut current = draft
            .active_match()
            .cloned()
            .ok_or(TrackerError::NoActiveMatch)?;
        if !current.is_half_time() {
            return Err(TrackerError::NotInHalfTime);
        }

        current.half_time_end = Some(now);
        current.updated_at = rfc3339(now);
        draft.emit(TrackerEvent::HalfTimeEnded {
            match_id: current.id,
        });
        draft.update_match(current);
        Ok(())
    }

    fn plan_assign_position(
        &self,
        draft: &mut Draft<'_>,
        player_id: PlayerId,
        position: &str,
        now: Timestamp,
    ) -> Result<(), TrackerError> {
        let position = position.trim();
        let known = match &self.formation {
            Some(formation) => formation.has_slot(position),
            None => !position.is_empty(),
        };
        if !known {
            return Err(TrackerError::UnknownPosition {
                position: position.to_string(),
            });
        }

        // Surface an unknown player before reporting the slot as taken.
        draft.player(player_id)?;
        if let Some(holder) = draft.holder_of(position) {
            if holder != player_id {
                return Err(TrackerError::PositionOccupied {
                    position: position.to_string(),
                    holder,
                });
            }
        }

        draft.move_player(
            player_id,
            &PlayerStatus::Positioned {
                position: position.to_string(),
            },
            now,
        )
    }

    fn plan_record_goal(
        &self,
        draft: &mut Draft<'_>,
        scorer_id: Option<PlayerId>,
        assist_id: Option<PlayerId>,
        is_own_goal: bool,
        now: Timestamp,
    ) -> Result<(), TrackerError> {
        let current = draft.active_match().ok_or(TrackerError::NoActiveMatch)?;
        let match_id = current.id;
        let minute = match_clock::match_minute(current, now);

        for player_id in scorer_id.iter().chain(assist_id.iter()) {
            draft.player(*player_id)?;
        }
        if scorer_id.is_some() && scorer_id == assist_id {
            return Err(TrackerError::InvalidGoal {
                reason: "scorer cannot assist their own goal".to_string(),
            });
        }
        if is_own_goal && assist_id.is_some() {
            return Err(TrackerError::InvalidGoal {
                reason: "own goals have no assist".to_string(),
            });
        }

        let goal = GoalEvent {
            id: Uuid::new_v4(),
            match_id,
            scorer_id,
            assist_id,
            is_own_goal,
            minute,
            timestamp: now,
            created_at: rfc3339(now),
        };
        debug!("Goal recorded in minute {} of match {}", minute, match_id);
        draft.emit(TrackerEvent::GoalRecorded { goal: goal.clone() });
        draft.add_goal(goal);
        Ok(())
    }

    fn plan_set_score(
        &self,
        draft: &mut Draft<'_>,
        score: Option<&str>,
        now: Timestamp,
    ) -> Result<(), TrackerError> {
        let mut current = draft
            .current_match()
            .cloned()
            .ok_or(TrackerError::NoActiveMatch)?;
        let score = score.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        if current.score == score {
            return Ok(());
        }

        current.score = score.clone();
        current.updated_at = rfc3339(now);
        draft.emit(TrackerEvent::MatchScoreSet {
            match_id: current.id,
            score,
        });
        draft.update_match(current);
        Ok(())
    }

    fn plan_end_match(&self, draft: &mut Draft<'_>, now: Timestamp) -> Result<(), TrackerError> {
        let match_id = draft
            .active_match()
            .map(|m| m.id)
            .ok_or(TrackerError::NoActiveMatch)?;

        // Close every open session while the match is still active.
        let on_field: Vec<PlayerId> = draft
            .players()
            .iter()
            .filter(|p| p.is_on_field)
            .map(|p| p.id)
            .collect();
        for player_id in on_field {
            draft.move_player(player_id, &PlayerStatus::Bench, now)?;
        }

        let mut current = draft
            .current_match()
            .cloned()
            .ok_or(TrackerError::NoActiveMatch)?;
        if current.is_half_time() {
            current.half_time_end = Some(now);
        }
        current.end_time = Some(now);
        current.is_active = false;
        current.updated_at = rfc3339(now);

        let elapsed_ms = match_clock::elapsed_match_time(&current, now);
        info!("Ending match {} after {} ms", match_id, elapsed_ms);
        draft.emit(TrackerEvent::MatchEnded {
            match_id,
            elapsed_ms,
        });
        draft.update_match(current);
        Ok(())
    }
}

impl Default for TimeTracker {
    fn default() -> Self {
        Self::new()
    }
}

pub fn player_view(player: &Player, now: Timestamp) -> PlayerView {
    PlayerView {
        player: player.clone(),
        status: player.status(),
        current_field_time: current_field_time(player, now),
        current_position_time: current_position_time(player, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::roster_is_consistent;
    use roster_types::TimeLogKind;

    fn tracker_with(names: &[&str]) -> (TimeTracker, Vec<PlayerId>) {
        let mut tracker = TimeTracker::new();
        let ids = names
            .iter()
            .map(|name| tracker.add_player(name, None, 0).unwrap())
            .collect();
        (tracker, ids)
    }

    #[test]
    fn test_striker_scenario() {
        let (mut tracker, ids) = tracker_with(&["Alex"]);
        let alex = ids[0];

        tracker.start_match(None, 60, 0).unwrap();
        tracker.set_player_on_field(alex, 0).unwrap();
        tracker.assign_position(alex, "ST", 5_000).unwrap();
        let transition = tracker.set_player_off_field(alex, 65_000).unwrap();

        let player = tracker.player(alex).unwrap();
        assert_eq!(player.total_field_time, 65_000);
        assert_eq!(player.total_position_time, 60_000);
        assert!(!player.is_on_field);
        assert_eq!(player.position, None);

        assert_eq!(transition.time_logs.len(), 2);
        let field = transition
            .time_logs
            .iter()
            .find(|l| l.kind == TimeLogKind::Field)
            .unwrap();
        assert_eq!((field.start_time, field.end_time), (0, 65_000));
        let position = transition
            .time_logs
            .iter()
            .find(|l| l.kind == TimeLogKind::Position)
            .unwrap();
        assert_eq!((position.start_time, position.end_time), (5_000, 65_000));
        assert_eq!(position.position.as_deref(), Some("ST"));
    }

    #[test]
    fn test_start_match_rejects_second_active_match() {
        let (mut tracker, _) = tracker_with(&[]);
        tracker.start_match(Some("Rovers".to_string()), 90, 0).unwrap();

        assert_eq!(
            tracker.start_match(None, 90, 10).unwrap_err(),
            TrackerError::MatchAlreadyActive
        );
        assert_eq!(
            tracker.current_match().unwrap().opponent.as_deref(),
            Some("Rovers")
        );
    }

    #[test]
    fn test_start_match_validates_duration() {
        let (mut tracker, _) = tracker_with(&[]);
        assert_eq!(
            tracker.start_match(None, 0, 0).unwrap_err(),
            TrackerError::InvalidDuration { minutes: 0 }
        );
        assert!(tracker.current_match().is_none());
    }

    #[test]
    fn test_lineup_before_kickoff_starts_at_kickoff() {
        let (mut tracker, ids) = tracker_with(&["Kim", "Lee"]);
        tracker.assign_position(ids[0], "GK", 100).unwrap();
        tracker.set_player_on_field(ids[1], 200).unwrap();

        assert_eq!(tracker.player(ids[0]).unwrap().field_time_start, None);

        tracker.start_match(None, 60, 1_000).unwrap();
        let keeper = tracker.player(ids[0]).unwrap();
        assert_eq!(keeper.field_time_start, Some(1_000));
        assert_eq!(keeper.position_time_start, Some(1_000));
        assert_eq!(tracker.player(ids[1]).unwrap().field_time_start, Some(1_000));
        assert_eq!(tracker.player(ids[1]).unwrap().position_time_start, None);
    }

    #[test]
    fn test_sub_in_twice_is_noop() {
        let (mut tracker, ids) = tracker_with(&["Alex"]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.set_player_on_field(ids[0], 1_000).unwrap();

        let second = tracker.set_player_on_field(ids[0], 2_000).unwrap();
        assert!(second.is_empty());
        assert_eq!(tracker.player(ids[0]).unwrap().field_time_start, Some(1_000));
    }

    #[test]
    fn test_sub_out_of_bench_player_is_noop() {
        let (mut tracker, ids) = tracker_with(&["Alex"]);
        tracker.start_match(None, 60, 0).unwrap();

        let transition = tracker.set_player_off_field(ids[0], 1_000).unwrap();
        assert!(transition.is_empty());
    }

    #[test]
    fn test_assign_position_subs_in_bench_player() {
        let (mut tracker, ids) = tracker_with(&["Alex"]);
        tracker.start_match(None, 60, 0).unwrap();

        tracker.assign_position(ids[0], "CM", 3_000).unwrap();

        let player = tracker.player(ids[0]).unwrap();
        assert!(player.is_on_field);
        assert_eq!(player.field_time_start, Some(3_000));
        assert_eq!(player.position_time_start, Some(3_000));
    }

    #[test]
    fn test_reassignment_closes_previous_position() {
        let (mut tracker, ids) = tracker_with(&["Alex"]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.assign_position(ids[0], "LM", 0).unwrap();

        let transition = tracker.assign_position(ids[0], "RM", 20_000).unwrap();

        assert_eq!(transition.time_logs.len(), 1);
        assert_eq!(transition.time_logs[0].position.as_deref(), Some("LM"));
        let player = tracker.player(ids[0]).unwrap();
        assert_eq!(player.total_position_time, 20_000);
        assert_eq!(player.position.as_deref(), Some("RM"));
        assert_eq!(player.position_time_start, Some(20_000));
        assert_eq!(player.field_time_start, Some(0));
    }

    #[test]
    fn test_assigning_same_position_is_noop() {
        let (mut tracker, ids) = tracker_with(&["Alex"]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.assign_position(ids[0], "LM", 0).unwrap();

        let transition = tracker.assign_position(ids[0], "LM", 9_000).unwrap();
        assert!(transition.is_empty());
        assert_eq!(tracker.player(ids[0]).unwrap().position_time_start, Some(0));
    }

    #[test]
    fn test_occupied_position_is_rejected() {
        let (mut tracker, ids) = tracker_with(&["Kim", "Lee"]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.assign_position(ids[0], "GK", 0).unwrap();

        let err = tracker.assign_position(ids[1], "GK", 1_000).unwrap_err();
        assert_eq!(
            err,
            TrackerError::PositionOccupied {
                position: "GK".to_string(),
                holder: ids[0]
            }
        );
        assert!(!tracker.player(ids[1]).unwrap().is_on_field);
    }

    #[test]
    fn test_formation_restricts_positions() {
        let formation = crate::formations::default_formation(roster_types::GameFormat::SevenASide);
        let mut tracker = TimeTracker::new().with_formation(formation);
        let id = tracker.add_player("Alex", None, 0).unwrap();

        assert_eq!(
            tracker.assign_position(id, "ST", 0).unwrap_err(),
            TrackerError::UnknownPosition {
                position: "ST".to_string()
            }
        );
        assert!(tracker.assign_position(id, "GK", 0).is_ok());
    }

    #[test]
    fn test_remove_from_position_keeps_player_on_field() {
        let (mut tracker, ids) = tracker_with(&["Alex"]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.assign_position(ids[0], "LB", 0).unwrap();

        let transition = tracker.remove_from_position(ids[0], false, 10_000).unwrap();

        assert_eq!(transition.time_logs.len(), 1);
        let player = tracker.player(ids[0]).unwrap();
        assert!(player.is_on_field);
        assert_eq!(player.position, None);
        assert_eq!(player.total_position_time, 10_000);
        assert_eq!(player.field_time_start, Some(0));
    }

    #[test]
    fn test_remove_from_position_with_sub_out() {
        let (mut tracker, ids) = tracker_with(&["Alex"]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.assign_position(ids[0], "LB", 0).unwrap();

        let transition = tracker.remove_from_position(ids[0], true, 10_000).unwrap();

        assert_eq!(transition.time_logs.len(), 2);
        let player = tracker.player(ids[0]).unwrap();
        assert!(!player.is_on_field);
        assert_eq!(player.total_field_time, 10_000);
    }

    #[test]
    fn test_swap_positioned_with_bench_player() {
        let (mut tracker, ids) = tracker_with(&["Alex", "Blake"]);
        let (alex, blake) = (ids[0], ids[1]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.assign_position(alex, "ST", 0).unwrap();

        let transition = tracker.swap_players(alex, blake, 30_000).unwrap();

        assert_eq!(transition.players.len(), 2);
        assert!(roster_is_consistent(tracker.players()));

        let a = tracker.player(alex).unwrap();
        assert!(!a.is_on_field);
        assert_eq!(a.position, None);
        assert_eq!(a.total_position_time, 30_000);
        assert_eq!(a.total_field_time, 30_000);

        let b = tracker.player(blake).unwrap();
        assert!(b.is_on_field);
        assert_eq!(b.position.as_deref(), Some("ST"));
        assert_eq!(b.field_time_start, Some(30_000));
        assert_eq!(b.position_time_start, Some(30_000));
    }

    #[test]
    fn test_swap_two_positioned_players() {
        let (mut tracker, ids) = tracker_with(&["Alex", "Blake"]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.assign_position(ids[0], "LW", 0).unwrap();
        tracker.assign_position(ids[1], "RW", 5_000).unwrap();

        let transition = tracker.swap_players(ids[0], ids[1], 20_000).unwrap();

        assert_eq!(transition.time_logs.len(), 2);
        assert!(transition.time_logs.iter().all(|l| l.end_time == 20_000));
        let a = tracker.player(ids[0]).unwrap();
        let b = tracker.player(ids[1]).unwrap();
        assert_eq!(a.position.as_deref(), Some("RW"));
        assert_eq!(b.position.as_deref(), Some("LW"));
        assert_eq!(a.total_position_time, 20_000);
        assert_eq!(b.total_position_time, 15_000);
        assert_eq!(a.field_time_start, Some(0));
        assert!(roster_is_consistent(tracker.players()));
    }

    #[test]
    fn test_swap_with_self_is_noop() {
        let (mut tracker, ids) = tracker_with(&["Alex"]);
        tracker.assign_position(ids[0], "LW", 0).unwrap();
        assert!(tracker.swap_players(ids[0], ids[0], 10).unwrap().is_empty());
    }

    #[test]
    fn test_half_time_cannot_start_twice() {
        let (mut tracker, _) = tracker_with(&[]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.start_half_time(30_000).unwrap();

        assert_eq!(
            tracker.start_half_time(31_000).unwrap_err(),
            TrackerError::AlreadyInHalfTime
        );
        assert_eq!(tracker.current_match().unwrap().half_time_start, Some(30_000));
    }

    #[test]
    fn test_toggle_half_time_round_trip() {
        let (mut tracker, _) = tracker_with(&[]);
        tracker.start_match(None, 60, 0).unwrap();

        tracker.toggle_half_time(30_000).unwrap();
        assert!(tracker.current_match().unwrap().is_half_time());
        assert_eq!(tracker.elapsed_match_time(35_000), 30_000);

        tracker.toggle_half_time(40_000).unwrap();
        assert!(!tracker.current_match().unwrap().is_half_time());
        assert_eq!(tracker.elapsed_match_time(50_000), 40_000);

        assert_eq!(
            tracker.toggle_half_time(60_000).unwrap_err(),
            TrackerError::HalfTimeAlreadyTaken
        );
        assert_eq!(
            tracker.end_half_time(60_000).unwrap_err(),
            TrackerError::NotInHalfTime
        );
    }

    #[test]
    fn test_half_time_requires_active_match() {
        let (mut tracker, _) = tracker_with(&[]);
        assert_eq!(
            tracker.toggle_half_time(0).unwrap_err(),
            TrackerError::NoActiveMatch
        );
    }

    #[test]
    fn test_end_match_closes_every_session() {
        let (mut tracker, ids) = tracker_with(&["Kim", "Lee", "Max", "Sam"]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.assign_position(ids[0], "GK", 0).unwrap();
        tracker.assign_position(ids[1], "CB", 0).unwrap();
        tracker.set_player_on_field(ids[2], 0).unwrap();

        let transition = tracker.end_match(50_000).unwrap();

        let field_logs = transition
            .time_logs
            .iter()
            .filter(|l| l.kind == TimeLogKind::Field)
            .count();
        let position_logs = transition
            .time_logs
            .iter()
            .filter(|l| l.kind == TimeLogKind::Position)
            .count();
        assert_eq!(field_logs, 3);
        assert_eq!(position_logs, 2);

        assert!(tracker.players().iter().all(|p| !p.is_on_field));
        let ended = tracker.current_match().unwrap();
        assert!(!ended.is_active);
        assert_eq!(ended.end_time, Some(50_000));
        assert!(tracker.active_match().is_none());
        assert_eq!(tracker.elapsed_match_time(99_000), 50_000);
    }

    #[test]
    fn test_end_match_during_half_time_closes_it() {
        let (mut tracker, _) = tracker_with(&[]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.start_half_time(30_000).unwrap();

        tracker.end_match(35_000).unwrap();
        let ended = tracker.current_match().unwrap();
        assert_eq!(ended.half_time_end, Some(35_000));
        assert_eq!(tracker.elapsed_match_time(40_000), 30_000);
    }

    #[test]
    fn test_current_field_time_monotonic_then_frozen() {
        let (mut tracker, ids) = tracker_with(&["Alex"]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.set_player_on_field(ids[0], 1_000).unwrap();

        let mut last = 0;
        for now in (1_000..10_000).step_by(1_000) {
            let value = tracker.current_field_time(ids[0], now).unwrap();
            assert!(value >= last);
            last = value;
        }

        tracker.set_player_off_field(ids[0], 10_000).unwrap();
        let frozen = tracker.current_field_time(ids[0], 10_000).unwrap();
        assert_eq!(frozen, 9_000);
        assert_eq!(tracker.current_field_time(ids[0], 99_000).unwrap(), frozen);
    }

    #[test]
    fn test_record_goal_and_score() {
        let (mut tracker, ids) = tracker_with(&["Alex", "Blake"]);
        tracker.start_match(None, 60, 0).unwrap();

        let transition = tracker
            .record_goal(Some(ids[0]), Some(ids[1]), false, 12 * 60_000 + 30_000)
            .unwrap();
        assert_eq!(transition.goals[0].minute, 12);
        tracker.record_goal(None, None, true, 20 * 60_000).unwrap();
        tracker.record_goal(Some(ids[1]), None, false, 21 * 60_000).unwrap();

        assert_eq!(
            tracker.score(),
            Score {
                goals_for: 2,
                goals_against: 1
            }
        );
    }

    #[test]
    fn test_record_goal_validation() {
        let (mut tracker, ids) = tracker_with(&["Alex"]);
        assert_eq!(
            tracker.record_goal(Some(ids[0]), None, false, 0).unwrap_err(),
            TrackerError::NoActiveMatch
        );

        tracker.start_match(None, 60, 0).unwrap();
        assert!(matches!(
            tracker.record_goal(Some(ids[0]), Some(ids[0]), false, 0),
            Err(TrackerError::InvalidGoal { .. })
        ));
        let stranger = Uuid::new_v4();
        assert_eq!(
            tracker.record_goal(Some(stranger), None, false, 0).unwrap_err(),
            TrackerError::PlayerNotFound {
                player_id: stranger
            }
        );
        assert!(tracker.goals().is_empty());
    }

    #[test]
    fn test_new_match_resets_goals() {
        let (mut tracker, _) = tracker_with(&[]);
        tracker.start_match(None, 60, 0).unwrap();
        tracker.record_goal(None, None, false, 1_000).unwrap();
        tracker.end_match(2_000).unwrap();
        assert_eq!(tracker.score().goals_for, 1);

        tracker.start_match(None, 60, 3_000).unwrap();
        assert_eq!(tracker.score(), Score::default());
    }

    #[test]
    fn test_add_player_trims_and_validates_name() {
        let (mut tracker, _) = tracker_with(&[]);
        let id = tracker.add_player("  Robin Lee ", Some(7), 0).unwrap();
        assert_eq!(tracker.player(id).unwrap().name, "Robin Lee");
        assert_eq!(
            tracker.add_player("   ", None, 0).unwrap_err(),
            TrackerError::InvalidPlayerName
        );
        assert_eq!(tracker.players().len(), 1);
    }

    #[test]
    fn test_match_score_note() {
        let (mut tracker, _) = tracker_with(&["Alex"]);
        assert_eq!(
            tracker.set_match_score(Some("1-0".to_string()), 0).unwrap_err(),
            TrackerError::NoActiveMatch
        );

        tracker.start_match(None, 60, 0).unwrap();
        let transition = tracker.set_match_score(Some(" 1-0 ".to_string()), 1_000).unwrap();
        assert_eq!(
            transition.match_update.unwrap().score.as_deref(),
            Some("1-0")
        );

        // The result can still be noted once the match is over
        tracker.end_match(60_000).unwrap();
        tracker.set_match_score(Some("2-1".to_string()), 70_000).unwrap();
        let ended = tracker.current_match().unwrap();
        assert_eq!(ended.score.as_deref(), Some("2-1"));
        assert!(!ended.is_active);
        assert_eq!(ended.end_time, Some(60_000));

        let unchanged = tracker.set_match_score(Some("2-1".to_string()), 80_000).unwrap();
        assert!(unchanged.is_empty());
        tracker.set_match_score(Some("  ".to_string()), 90_000).unwrap();
        assert_eq!(tracker.current_match().unwrap().score, None);
    }

    #[test]
    fn test_add_player_returns_the_new_entry() {
        let (mut tracker, ids) = tracker_with(&["Alex"]);
        tracker.start_match(None, 60, 0).unwrap();

        let late = tracker.add_player("Blake", Some(4), 30_000).unwrap();
        assert_ne!(late, ids[0]);
        assert_eq!(tracker.players().len(), 2);
        assert_eq!(tracker.players()[1].id, late);
        let blake = tracker.player(late).unwrap();
        assert_eq!(blake.number, Some(4));
        assert_eq!(blake.status(), PlayerStatus::Bench);
        assert!(tracker.active_match().is_some());
    }

    #[test]
    fn test_plan_does_not_mutate() {
        let (tracker, ids) = tracker_with(&["Alex"]);
        let transition = tracker
            .plan(
                &Command::AssignPosition {
                    player_id: ids[0],
                    position: "GK".to_string(),
                },
                0,
            )
            .unwrap();

        assert_eq!(transition.players.len(), 1);
        assert_eq!(tracker.player(ids[0]).unwrap().position, None);
    }
}
