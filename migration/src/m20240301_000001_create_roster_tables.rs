use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Players::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Players::CoachId).uuid().not_null())
                    .col(ColumnDef::new(Players::Name).string().not_null())
                    .col(ColumnDef::new(Players::Number).integer())
                    .col(
                        ColumnDef::new(Players::IsOnField)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Players::Position).string())
                    .col(ColumnDef::new(Players::FieldTimeStart).big_integer())
                    .col(
                        ColumnDef::new(Players::TotalFieldTime)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Players::PositionTimeStart).big_integer())
                    .col(
                        ColumnDef::new(Players::TotalPositionTime)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Players::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_players_coach_id")
                    .table(Players::Table)
                    .col(Players::CoachId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Matches::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Matches::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Matches::CoachId).uuid().not_null())
                    .col(ColumnDef::new(Matches::Date).string().not_null())
                    .col(ColumnDef::new(Matches::Opponent).string())
                    .col(ColumnDef::new(Matches::StartTime).big_integer().not_null())
                    .col(ColumnDef::new(Matches::EndTime).big_integer())
                    .col(ColumnDef::new(Matches::HalfTimeStart).big_integer())
                    .col(ColumnDef::new(Matches::HalfTimeEnd).big_integer())
                    .col(
                        ColumnDef::new(Matches::Duration)
                            .integer()
                            .not_null()
                            .default(90),
                    )
                    .col(
                        ColumnDef::new(Matches::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Matches::Score).string())
                    .col(
                        ColumnDef::new(Matches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Matches::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Latest match lookup per coach
        manager
            .create_index(
                Index::create()
                    .name("idx_matches_coach_start_time")
                    .table(Matches::Table)
                    .col(Matches::CoachId)
                    .col(Matches::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TimeLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TimeLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TimeLogs::PlayerId).uuid().not_null())
                    .col(ColumnDef::new(TimeLogs::MatchId).uuid().not_null())
                    .col(ColumnDef::new(TimeLogs::StartTime).big_integer().not_null())
                    .col(ColumnDef::new(TimeLogs::EndTime).big_integer().not_null())
                    .col(ColumnDef::new(TimeLogs::Kind).string().not_null())
                    .col(ColumnDef::new(TimeLogs::Position).string())
                    .col(
                        ColumnDef::new(TimeLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_logs_player_id")
                            .from(TimeLogs::Table, TimeLogs::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_logs_match_id")
                            .from(TimeLogs::Table, TimeLogs::MatchId)
                            .to(Matches::Table, Matches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_time_logs_match_id")
                    .table(TimeLogs::Table)
                    .col(TimeLogs::MatchId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GoalEvents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GoalEvents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(GoalEvents::MatchId).uuid().not_null())
                    .col(ColumnDef::new(GoalEvents::ScorerId).uuid())
                    .col(ColumnDef::new(GoalEvents::AssistId).uuid())
                    .col(
                        ColumnDef::new(GoalEvents::IsOwnGoal)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(GoalEvents::Minute).integer().not_null())
                    .col(ColumnDef::new(GoalEvents::Timestamp).big_integer().not_null())
                    .col(
                        ColumnDef::new(GoalEvents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_goal_events_match_id")
                            .from(GoalEvents::Table, GoalEvents::MatchId)
                            .to(Matches::Table, Matches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_goal_events_match_id")
                    .table(GoalEvents::Table)
                    .col(GoalEvents::MatchId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GoalEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TimeLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Matches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
    CoachId,
    Name,
    Number,
    IsOnField,
    Position,
    FieldTimeStart,
    TotalFieldTime,
    PositionTimeStart,
    TotalPositionTime,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Matches {
    Table,
    Id,
    CoachId,
    Date,
    Opponent,
    StartTime,
    EndTime,
    HalfTimeStart,
    HalfTimeEnd,
    Duration,
    IsActive,
    Score,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TimeLogs {
    Table,
    Id,
    PlayerId,
    MatchId,
    StartTime,
    EndTime,
    Kind,
    Position,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GoalEvents {
    Table,
    Id,
    MatchId,
    ScorerId,
    AssistId,
    IsOwnGoal,
    Minute,
    Timestamp,
    CreatedAt,
}
