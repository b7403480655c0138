//! Widget entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "widgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub project_id: i64,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub widget_type: String,
    pub items_count: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub widget_options: JsonValue,
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
