//! SeaORM entity definitions for PostgreSQL database.

pub mod attachment;
pub mod launch;
pub mod log;
pub mod project;
pub mod project_attribute;
pub mod test_item;
pub mod user_filter;
pub mod widget;
pub mod widget_acl;
pub mod widget_filter;
