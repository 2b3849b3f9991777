use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub coach_id: Uuid,
    pub date: String,
    pub opponent: Option<String>,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub half_time_start: Option<i64>,
    pub half_time_end: Option<i64>,
    pub duration: i32,
    pub is_active: bool,
    pub score: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::time_logs::Entity")]
    TimeLogs,
    #[sea_orm(has_many = "super::goal_events::Entity")]
    GoalEvents,
}

impl Related<super::time_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeLogs.def()
    }
}

impl Related<super::goal_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoalEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
