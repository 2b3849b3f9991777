use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum TrackerError {
    #[error("A match is already active")]
    MatchAlreadyActive,
    #[error("No active match")]
    NoActiveMatch,
    #[error("Half-time has already started")]
    AlreadyInHalfTime,
    #[error("Half-time has not started")]
    NotInHalfTime,
    #[error("Half-time has already been played")]
    HalfTimeAlreadyTaken,
    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: Uuid },
    #[error("Position {position} is held by player {holder}")]
    PositionOccupied { position: String, holder: Uuid },
    #[error("Unknown position: {position}")]
    UnknownPosition { position: String },
    #[error("Invalid player name")]
    InvalidPlayerName,
    #[error("Invalid match duration: {minutes}")]
    InvalidDuration { minutes: i32 },
    #[error("Invalid goal: {reason}")]
    InvalidGoal { reason: String },
}
