use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{AuthorRef, Availability, Book, CoverImage, GenreRef};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub author_id: String,
    pub genre_id: String,
    pub price: Option<f64>,
    pub rental_price: Option<f64>,
    pub cover_url: String,
    pub cover_hint: String,
    pub description: String,
    #[sea_orm(default_value = "in-stock")]
    pub availability: String, // 'in-stock', 'out-of-stock'
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::genre::Entity",
        from = "Column::GenreId",
        to = "super::genre::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Genre,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genre.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Assemble the storefront view of this row. Missing relations fall back
    /// to the raw foreign key so a dangling row still renders.
    pub fn into_book(
        self,
        author: Option<super::author::Model>,
        genre: Option<super::genre::Model>,
    ) -> Book {
        let author = match author {
            Some(a) => AuthorRef {
                id: a.id,
                name: a.name,
            },
            None => AuthorRef {
                id: self.author_id.clone(),
                name: "Unknown".to_string(),
            },
        };
        let genre = match genre {
            Some(g) => GenreRef {
                id: g.id,
                name: g.name,
            },
            None => GenreRef {
                id: self.genre_id.clone(),
                name: "Unknown".to_string(),
            },
        };

        Book {
            id: self.id,
            title: self.title,
            author,
            genre,
            price: self.price,
            rental_price: self.rental_price,
            cover_image: CoverImage {
                url: self.cover_url,
                hint: self.cover_hint,
            },
            description: self.description,
            availability: Availability::parse(&self.availability),
        }
    }
}
