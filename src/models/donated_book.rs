use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::DonatedBook;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donated_books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub donation_id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub quantity: i32,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::donation::Entity",
        from = "Column::DonationId",
        to = "super::donation::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Donation,
}

impl Related<super::donation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DonatedBook {
    fn from(model: Model) -> Self {
        Self {
            title: model.title,
            author: model.author,
            genre: model.genre,
            quantity: model.quantity.max(1).unsigned_abs(),
        }
    }
}
