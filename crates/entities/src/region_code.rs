//! `SeaORM` Entity definition for the region catalog.
//!
//! Rows are keyed by `(main_code, sub_code)`. A `sub_code` of `"0"` marks the
//! top-level region itself.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "RegionCode")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub main_code: String,
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub sub_code: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
