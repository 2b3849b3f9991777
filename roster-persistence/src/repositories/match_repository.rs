use anyhow::{Context, Result};
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::parse_stamp;
use crate::entities::{matches, prelude::*};
use roster_types::{CoachId, Match};

pub struct MatchRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MatchRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn model_to_match(model: matches::Model) -> Match {
        Match {
            id: model.id,
            date: model.date,
            opponent: model.opponent,
            start_time: model.start_time,
            end_time: model.end_time,
            half_time_start: model.half_time_start,
            half_time_end: model.half_time_end,
            duration: model.duration,
            is_active: model.is_active,
            score: model.score,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Match>> {
        let model = Matches::find_by_id(id).one(self.db).await?;
        Ok(model.map(Self::model_to_match))
    }

    pub async fn exists_for_coach(&self, coach_id: CoachId, id: Uuid) -> Result<bool> {
        let count = Matches::find_by_id(id)
            .filter(matches::Column::CoachId.eq(coach_id))
            .count(self.db)
            .await
            .with_context(|| format!("checking owner of match {}", id))?;
        Ok(count > 0)
    }

    /// The most recently started match of a coach, active or not.
    pub async fn find_latest_for_coach(&self, coach_id: CoachId) -> Result<Option<Match>> {
        let model = Matches::find()
            .filter(matches::Column::CoachId.eq(coach_id))
            .order_by_desc(matches::Column::StartTime)
            .one(self.db)
            .await
            .with_context(|| format!("loading latest match of coach {}", coach_id))?;

        Ok(model.map(Self::model_to_match))
    }

    pub async fn insert(&self, coach_id: CoachId, new_match: &Match) -> Result<()> {
        let model = matches::ActiveModel {
            id: ActiveValue::Set(new_match.id),
            coach_id: ActiveValue::Set(coach_id),
            date: ActiveValue::Set(new_match.date.clone()),
            opponent: ActiveValue::Set(new_match.opponent.clone()),
            start_time: ActiveValue::Set(new_match.start_time),
            end_time: ActiveValue::Set(new_match.end_time),
            half_time_start: ActiveValue::Set(new_match.half_time_start),
            half_time_end: ActiveValue::Set(new_match.half_time_end),
            duration: ActiveValue::Set(new_match.duration),
            is_active: ActiveValue::Set(new_match.is_active),
            score: ActiveValue::Set(new_match.score.clone()),
            created_at: ActiveValue::Set(parse_stamp(&new_match.created_at)),
            updated_at: ActiveValue::Set(parse_stamp(&new_match.updated_at)),
        };

        Matches::insert(model)
            .exec(self.db)
            .await
            .with_context(|| format!("inserting match {}", new_match.id))?;
        Ok(())
    }

    /// Writes the mutable fields of a match owned by `coach_id`.
    pub async fn update_state(&self, coach_id: CoachId, updated: &Match) -> Result<()> {
        let model = matches::ActiveModel {
            id: ActiveValue::Unchanged(updated.id),
            coach_id: ActiveValue::NotSet,
            date: ActiveValue::NotSet,
            opponent: ActiveValue::Set(updated.opponent.clone()),
            start_time: ActiveValue::NotSet,
            end_time: ActiveValue::Set(updated.end_time),
            half_time_start: ActiveValue::Set(updated.half_time_start),
            half_time_end: ActiveValue::Set(updated.half_time_end),
            duration: ActiveValue::Set(updated.duration),
            is_active: ActiveValue::Set(updated.is_active),
            score: ActiveValue::Set(updated.score.clone()),
            created_at: ActiveValue::NotSet,
            updated_at: ActiveValue::Set(parse_stamp(&updated.updated_at)),
        };

        Matches::update(model)
            .filter(matches::Column::CoachId.eq(coach_id))
            .exec(self.db)
            .await
            .with_context(|| format!("updating match {}", updated.id))?;
        Ok(())
    }
}
