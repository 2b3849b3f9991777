use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{PlayerId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub number: Option<i32>,
    pub is_on_field: bool,
    pub position: Option<String>,
    #[ts(type = "number | null")]
    pub field_time_start: Option<Timestamp>,
    /// Closed field sessions only; the open one is added on read.
    #[ts(type = "number")]
    pub total_field_time: i64,
    #[ts(type = "number | null")]
    pub position_time_start: Option<Timestamp>,
    #[ts(type = "number")]
    pub total_position_time: i64,
    pub created_at: String, // ISO 8601 string
    pub updated_at: String, // ISO 8601 string
}

impl Player {
    pub fn new(id: PlayerId, name: String, number: Option<i32>, created_at: String) -> Self {
        Self {
            id,
            name,
            number,
            is_on_field: false,
            position: None,
            field_time_start: None,
            total_field_time: 0,
            position_time_start: None,
            total_position_time: 0,
            updated_at: created_at.clone(),
            created_at,
        }
    }

    pub fn status(&self) -> PlayerStatus {
        match (&self.position, self.is_on_field) {
            (Some(position), _) => PlayerStatus::Positioned {
                position: position.clone(),
            },
            (None, true) => PlayerStatus::OnField,
            (None, false) => PlayerStatus::Bench,
        }
    }
}

/// Where a player currently is. `Positioned` always implies being on the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PlayerStatus {
    Bench,
    OnField,
    Positioned { position: String },
}

impl PlayerStatus {
    pub fn is_on_field(&self) -> bool {
        !matches!(self, PlayerStatus::Bench)
    }

    pub fn position(&self) -> Option<&str> {
        match self {
            PlayerStatus::Positioned { position } => Some(position),
            _ => None,
        }
    }
}

/// A player as shown on the sideline, with live times folded in.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerView {
    pub player: Player,
    pub status: PlayerStatus,
    #[ts(type = "number")]
    pub current_field_time: i64,
    #[ts(type = "number")]
    pub current_position_time: i64,
}
