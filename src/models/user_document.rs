use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per user; both collections are stored as JSON arrays.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub wishlist: String, // JSON array of books
    pub cart: String,     // JSON array of cart entries
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
