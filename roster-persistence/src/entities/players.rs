use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub coach_id: Uuid,
    pub name: String,
    pub number: Option<i32>,
    pub is_on_field: bool,
    pub position: Option<String>,
    pub field_time_start: Option<i64>,
    pub total_field_time: i64,
    pub position_time_start: Option<i64>,
    pub total_position_time: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::time_logs::Entity")]
    TimeLogs,
}

impl Related<super::time_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
