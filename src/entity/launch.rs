//! Launch entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "launches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub project_id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub number: i64,
    /// default, debug
    pub mode: String,
    pub status: String,
    pub has_retries: bool,
    pub start_time: DateTimeUtc,
    pub end_time: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_delete = "Cascade"
    )]
    Project,
    #[sea_orm(has_many = "super::test_item::Entity")]
    TestItems,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::test_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
