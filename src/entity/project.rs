//! Project entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_attribute::Entity")]
    Attributes,
    #[sea_orm(has_many = "super::launch::Entity")]
    Launches,
}

impl Related<super::project_attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attributes.def()
    }
}

impl Related<super::launch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Launches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
