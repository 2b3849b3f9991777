use anyhow::{Context, Result};
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::parse_stamp;
use crate::entities::{goal_events, prelude::*};
use roster_types::{GoalEvent, MatchId};

pub struct GoalRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> GoalRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn model_to_goal(model: goal_events::Model) -> GoalEvent {
        GoalEvent {
            id: model.id,
            match_id: model.match_id,
            scorer_id: model.scorer_id,
            assist_id: model.assist_id,
            is_own_goal: model.is_own_goal,
            minute: model.minute,
            timestamp: model.timestamp,
            created_at: model.created_at.to_rfc3339(),
        }
    }

    pub async fn find_by_match(&self, match_id: MatchId) -> Result<Vec<GoalEvent>> {
        let models = GoalEvents::find()
            .filter(goal_events::Column::MatchId.eq(match_id))
            .order_by_asc(goal_events::Column::Timestamp)
            .all(self.db)
            .await
            .with_context(|| format!("loading goals of match {}", match_id))?;

        Ok(models.into_iter().map(Self::model_to_goal).collect())
    }

    pub async fn insert(&self, goal: &GoalEvent) -> Result<()> {
        let model = goal_events::ActiveModel {
            id: ActiveValue::Set(goal.id),
            match_id: ActiveValue::Set(goal.match_id),
            scorer_id: ActiveValue::Set(goal.scorer_id),
            assist_id: ActiveValue::Set(goal.assist_id),
            is_own_goal: ActiveValue::Set(goal.is_own_goal),
            minute: ActiveValue::Set(goal.minute),
            timestamp: ActiveValue::Set(goal.timestamp),
            created_at: ActiveValue::Set(parse_stamp(&goal.created_at)),
        };

        GoalEvents::insert(model)
            .exec(self.db)
            .await
            .with_context(|| format!("inserting goal {}", goal.id))?;
        Ok(())
    }
}
