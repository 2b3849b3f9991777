use anyhow::{Context, Result, anyhow};
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::parse_stamp;
use crate::entities::{prelude::*, time_logs};
use roster_types::{MatchId, PlayerId, TimeLog, TimeLogKind};

pub struct TimeLogRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TimeLogRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn model_to_log(model: time_logs::Model) -> Result<TimeLog> {
        let kind: TimeLogKind = model.kind.parse().map_err(|e: String| anyhow!(e))?;
        Ok(TimeLog {
            id: model.id,
            player_id: model.player_id,
            match_id: model.match_id,
            start_time: model.start_time,
            end_time: model.end_time,
            kind,
            position: model.position,
            created_at: model.created_at.to_rfc3339(),
        })
    }

    pub async fn find_by_match(&self, match_id: MatchId) -> Result<Vec<TimeLog>> {
        let models = TimeLogs::find()
            .filter(time_logs::Column::MatchId.eq(match_id))
            .order_by_asc(time_logs::Column::EndTime)
            .order_by_asc(time_logs::Column::StartTime)
            .all(self.db)
            .await
            .with_context(|| format!("loading time logs of match {}", match_id))?;

        models.into_iter().map(Self::model_to_log).collect()
    }

    pub async fn find_by_player(&self, player_id: PlayerId) -> Result<Vec<TimeLog>> {
        let models = TimeLogs::find()
            .filter(time_logs::Column::PlayerId.eq(player_id))
            .order_by_asc(time_logs::Column::EndTime)
            .all(self.db)
            .await?;

        models.into_iter().map(Self::model_to_log).collect()
    }

    pub async fn insert_many(&self, logs: &[TimeLog]) -> Result<()> {
        if logs.is_empty() {
            return Ok(());
        }

        let models = logs.iter().map(|log| time_logs::ActiveModel {
            id: ActiveValue::Set(log.id),
            player_id: ActiveValue::Set(log.player_id),
            match_id: ActiveValue::Set(log.match_id),
            start_time: ActiveValue::Set(log.start_time),
            end_time: ActiveValue::Set(log.end_time),
            kind: ActiveValue::Set(log.kind.as_str().to_string()),
            position: ActiveValue::Set(log.position.clone()),
            created_at: ActiveValue::Set(parse_stamp(&log.created_at)),
        });

        TimeLogs::insert_many(models)
            .exec(self.db)
            .await
            .with_context(|| format!("inserting {} time logs", logs.len()))?;
        Ok(())
    }
}
