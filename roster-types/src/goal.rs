use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{MatchId, PlayerId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GoalEvent {
    pub id: Uuid,
    pub match_id: MatchId,
    pub scorer_id: Option<PlayerId>,
    pub assist_id: Option<PlayerId>,
    pub is_own_goal: bool,
    pub minute: i32,
    #[ts(type = "number")]
    pub timestamp: Timestamp,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Score {
    pub goals_for: u32,
    pub goals_against: u32,
}

impl Score {
    pub fn from_goals<'a>(goals: impl IntoIterator<Item = &'a GoalEvent>) -> Self {
        goals.into_iter().fold(Score::default(), |mut score, goal| {
            if goal.is_own_goal {
                score.goals_against += 1;
            } else {
                score.goals_for += 1;
            }
            score
        })
    }
}
