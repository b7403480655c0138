//! Saved filter entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_filters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub project_id: i64,
    pub owner: String,
    pub name: String,
    pub shared: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::widget_filter::Entity")]
    WidgetFilters,
}

impl Related<super::widget_filter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WidgetFilters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
