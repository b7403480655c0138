//! Attachment entity for SeaORM.
//!
//! Metadata of binary blobs kept in object storage. Rows outlive their test
//! items and are removed once the blobs are gone.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub project_id: i64,
    pub launch_id: Option<i64>,
    pub item_id: Option<i64>,
    pub file_id: String,
    pub thumbnail_id: Option<String>,
    pub content_type: Option<String>,
    pub creation_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
