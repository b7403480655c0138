//! Widget to saved filter link for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "widget_filters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub widget_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub filter_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::widget::Entity",
        from = "Column::WidgetId",
        to = "super::widget::Column::Id",
        on_delete = "Cascade"
    )]
    Widget,
    #[sea_orm(
        belongs_to = "super::user_filter::Entity",
        from = "Column::FilterId",
        to = "super::user_filter::Column::Id",
        on_delete = "Cascade"
    )]
    Filter,
}

impl Related<super::widget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Widget.def()
    }
}

impl Related<super::user_filter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Filter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
