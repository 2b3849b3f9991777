use anyhow::{Context, Result};
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::parse_stamp;
use crate::entities::{players, prelude::*};
use roster_types::{CoachId, Player};

pub struct PlayerRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PlayerRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn model_to_player(model: players::Model) -> Player {
        Player {
            id: model.id,
            name: model.name,
            number: model.number,
            is_on_field: model.is_on_field,
            position: model.position,
            field_time_start: model.field_time_start,
            total_field_time: model.total_field_time,
            position_time_start: model.position_time_start,
            total_position_time: model.total_position_time,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Player>> {
        let model = Players::find_by_id(id).one(self.db).await?;
        Ok(model.map(Self::model_to_player))
    }

    /// A coach's roster in the order players were added.
    pub async fn find_by_coach(&self, coach_id: CoachId) -> Result<Vec<Player>> {
        let models = Players::find()
            .filter(players::Column::CoachId.eq(coach_id))
            .order_by_asc(players::Column::CreatedAt)
            .order_by_asc(players::Column::Name)
            .all(self.db)
            .await
            .with_context(|| format!("loading roster of coach {}", coach_id))?;

        Ok(models.into_iter().map(Self::model_to_player).collect())
    }

    pub async fn insert(&self, coach_id: CoachId, player: &Player) -> Result<()> {
        let model = players::ActiveModel {
            id: ActiveValue::Set(player.id),
            coach_id: ActiveValue::Set(coach_id),
            name: ActiveValue::Set(player.name.clone()),
            number: ActiveValue::Set(player.number),
            is_on_field: ActiveValue::Set(player.is_on_field),
            position: ActiveValue::Set(player.position.clone()),
            field_time_start: ActiveValue::Set(player.field_time_start),
            total_field_time: ActiveValue::Set(player.total_field_time),
            position_time_start: ActiveValue::Set(player.position_time_start),
            total_position_time: ActiveValue::Set(player.total_position_time),
            created_at: ActiveValue::Set(parse_stamp(&player.created_at)),
            updated_at: ActiveValue::Set(parse_stamp(&player.updated_at)),
        };

        Players::insert(model)
            .exec(self.db)
            .await
            .with_context(|| format!("inserting player {}", player.id))?;
        Ok(())
    }

    /// Writes the player's field/position state. Fails if the player is not
    /// on this coach's roster.
    pub async fn update_state(&self, coach_id: CoachId, player: &Player) -> Result<()> {
        let model = players::ActiveModel {
            id: ActiveValue::Unchanged(player.id),
            coach_id: ActiveValue::NotSet,
            name: ActiveValue::Set(player.name.clone()),
            number: ActiveValue::Set(player.number),
            is_on_field: ActiveValue::Set(player.is_on_field),
            position: ActiveValue::Set(player.position.clone()),
            field_time_start: ActiveValue::Set(player.field_time_start),
            total_field_time: ActiveValue::Set(player.total_field_time),
            position_time_start: ActiveValue::Set(player.position_time_start),
            total_position_time: ActiveValue::Set(player.total_position_time),
            created_at: ActiveValue::NotSet,
            updated_at: ActiveValue::Set(parse_stamp(&player.updated_at)),
        };

        Players::update(model)
            .filter(players::Column::CoachId.eq(coach_id))
            .exec(self.db)
            .await
            .with_context(|| format!("updating player {}", player.id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::DatabaseConnection;

    async fn setup_test_db() -> DatabaseConnection {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn player(name: &str) -> Player {
        Player::new(
            Uuid::new_v4(),
            name.to_string(),
            Some(4),
            chrono::Utc::now().to_rfc3339(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find_player() {
        let db = setup_test_db().await;
        let repo = PlayerRepository::new(&db);
        let coach_id = Uuid::new_v4();
        let alex = player("Alex");

        repo.insert(coach_id, &alex).await.unwrap();

        let found = repo.find_by_id(alex.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Alex");
        assert_eq!(found.number, Some(4));
        assert!(!found.is_on_field);

        assert_eq!(repo.find_by_coach(coach_id).await.unwrap().len(), 1);
        assert!(repo.find_by_coach(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_state() {
        let db = setup_test_db().await;
        let repo = PlayerRepository::new(&db);
        let coach_id = Uuid::new_v4();
        let mut alex = player("Alex");
        repo.insert(coach_id, &alex).await.unwrap();

        alex.is_on_field = true;
        alex.position = Some("GK".to_string());
        alex.field_time_start = Some(1_000);
        alex.position_time_start = Some(1_000);
        alex.total_field_time = 5_000;
        repo.update_state(coach_id, &alex).await.unwrap();

        let found = repo.find_by_id(alex.id).await.unwrap().unwrap();
        assert!(found.is_on_field);
        assert_eq!(found.position.as_deref(), Some("GK"));
        assert_eq!(found.field_time_start, Some(1_000));
        assert_eq!(found.total_field_time, 5_000);
    }

    #[tokio::test]
    async fn test_update_rejects_other_coach() {
        let db = setup_test_db().await;
        let repo = PlayerRepository::new(&db);
        let alex = player("Alex");
        repo.insert(Uuid::new_v4(), &alex).await.unwrap();

        assert!(repo.update_state(Uuid::new_v4(), &alex).await.is_err());
    }
}
