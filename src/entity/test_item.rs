//! Test item entity for SeaORM.
//!
//! Items form a tree per launch. `path` is the materialized path of ids from
//! the root, dot separated (`1.10.42`).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub launch_id: i64,
    pub parent_id: Option<i64>,
    pub path: String,
    pub name: String,
    pub item_type: String,
    pub status: String,
    pub has_children: bool,
    /// Item this one is a retry of
    pub retry_of: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::launch::Entity",
        from = "Column::LaunchId",
        to = "super::launch::Column::Id",
        on_delete = "Cascade"
    )]
    Launch,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,
    #[sea_orm(has_many = "super::log::Entity")]
    Logs,
}

impl Related<super::launch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Launch.def()
    }
}

impl Related<super::log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Logs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
