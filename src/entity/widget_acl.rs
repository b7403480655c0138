//! Project-level sharing entry of a widget.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "widget_acl")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub widget_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_id: i64,
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
}

impl Related<super::widget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Widget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
