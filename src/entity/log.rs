//! Log entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub project_id: i64,
    pub item_id: Option<i64>,
    pub launch_id: Option<i64>,
    pub level: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub log_time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_item::Entity",
        from = "Column::ItemId",
        to = "super::test_item::Column::Id",
        on_delete = "Cascade"
    )]
    TestItem,
}

impl Related<super::test_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
