use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{ClockState, GoalEvent, Match, PlayerId, PlayerView, Score, TimeLog};

/// Every user action the sideline can perform against a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Command {
    AddPlayer {
        name: String,
        number: Option<i32>,
    },
    /// Without a duration the tracker's default match length applies.
    StartMatch {
        opponent: Option<String>,
        duration_minutes: Option<i32>,
    },
    ToggleHalfTime,
    StartHalfTime,
    EndHalfTime,
    SubIn {
        player_id: PlayerId,
    },
    SubOut {
        player_id: PlayerId,
    },
    AssignPosition {
        player_id: PlayerId,
        position: String,
    },
    RemoveFromPosition {
        player_id: PlayerId,
        sub_out: bool,
    },
    SwapPlayers {
        first: PlayerId,
        second: PlayerId,
    },
    RecordGoal {
        scorer_id: Option<PlayerId>,
        assist_id: Option<PlayerId>,
        is_own_goal: bool,
    },
    /// Notes the result on the current match, active or ended.
    SetMatchScore {
        score: Option<String>,
    },
    EndMatch,
    Reconcile,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddPlayer { .. } => "add_player",
            Command::StartMatch { .. } => "start_match",
            Command::ToggleHalfTime => "toggle_half_time",
            Command::StartHalfTime => "start_half_time",
            Command::EndHalfTime => "end_half_time",
            Command::SubIn { .. } => "sub_in",
            Command::SubOut { .. } => "sub_out",
            Command::AssignPosition { .. } => "assign_position",
            Command::RemoveFromPosition { .. } => "remove_from_position",
            Command::SwapPlayers { .. } => "swap_players",
            Command::RecordGoal { .. } => "record_goal",
            Command::SetMatchScore { .. } => "set_match_score",
            Command::EndMatch => "end_match",
            Command::Reconcile => "reconcile",
        }
    }
}

/// A correction made by the reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Repair {
    pub player_id: PlayerId,
    pub kind: RepairKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RepairKind {
    /// Held a position while flagged off the field.
    PositionedOffField,
    /// Held a position already held by an earlier roster entry.
    DuplicatePosition,
    /// Field session start recorded for a benched player.
    StaleFieldStart,
    /// Position session start recorded without a position.
    StalePositionStart,
    /// On the field during a match with no open field session.
    MissingFieldStart,
    /// Positioned during a match with no open position session.
    MissingPositionStart,
    /// Session start left over from a match that is no longer active.
    OrphanedSession,
}

/// What a successful command changed, returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommandOutcome {
    pub command: String,
    pub players: Vec<PlayerView>,
    pub current_match: Option<Match>,
    pub time_logs: Vec<TimeLog>,
    pub goals: Vec<GoalEvent>,
    pub repairs: Vec<Repair>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RosterView {
    pub players: Vec<PlayerView>,
    pub current_match: Option<Match>,
    pub clock: Option<ClockState>,
    pub score: Score,
}
