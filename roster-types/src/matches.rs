use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{MatchId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Match {
    pub id: MatchId,
    pub date: String, // YYYY-MM-DD
    pub opponent: Option<String>,
    #[ts(type = "number")]
    pub start_time: Timestamp,
    #[ts(type = "number | null")]
    pub end_time: Option<Timestamp>,
    #[ts(type = "number | null")]
    pub half_time_start: Option<Timestamp>,
    #[ts(type = "number | null")]
    pub half_time_end: Option<Timestamp>,
    pub duration: i32, // planned minutes
    pub is_active: bool,
    pub score: Option<String>, // free text, e.g. "3-2"
    pub created_at: String,
    pub updated_at: String,
}

impl Match {
    /// Half-time has started and not yet ended.
    pub fn is_half_time(&self) -> bool {
        self.half_time_start.is_some() && self.half_time_end.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClockState {
    #[ts(type = "number")]
    pub elapsed_ms: i64,
    pub minute: i32,
    pub display: String, // m:ss
    #[ts(type = "number")]
    pub remaining_ms: i64,
    pub is_active: bool,
    pub is_half_time: bool,
}
