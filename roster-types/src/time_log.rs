use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::{MatchId, PlayerId, Timestamp};

/// One closed session of field time or position time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TimeLog {
    pub id: Uuid,
    pub player_id: PlayerId,
    pub match_id: MatchId,
    #[ts(type = "number")]
    pub start_time: Timestamp,
    #[ts(type = "number")]
    pub end_time: Timestamp,
    pub kind: TimeLogKind,
    pub position: Option<String>,
    pub created_at: String,
}

impl TimeLog {
    pub fn duration(&self) -> i64 {
        self.end_time - self.start_time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TimeLogKind {
    Field,
    Position,
}

impl TimeLogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeLogKind::Field => "field",
            TimeLogKind::Position => "position",
        }
    }
}

impl fmt::Display for TimeLogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeLogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "field" => Ok(TimeLogKind::Field),
            "position" => Ok(TimeLogKind::Position),
            other => Err(format!("unknown time log kind: {}", other)),
        }
    }
}
