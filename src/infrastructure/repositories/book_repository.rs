//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;

use crate::domain::{Book, BookFilter, BookRepository, DomainError};
use crate::models::author::Entity as AuthorEntity;
use crate::models::book::{Column, Entity as BookEntity};
use crate::models::genre::{self, Entity as GenreEntity};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn genres_by_id(
        &self,
        ids: Vec<String>,
    ) -> Result<HashMap<String, genre::Model>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let genres = GenreEntity::find()
            .filter(genre::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(genres.into_iter().map(|g| (g.id.clone(), g)).collect())
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError> {
        let mut condition = Condition::all();

        if let Some(genre) = filter.genre.as_deref().filter(|g| !g.is_empty()) {
            condition = condition.add(Column::GenreId.eq(genre));
        }

        if let Some(availability) = filter.availability {
            condition = condition.add(Column::Availability.eq(availability.as_str()));
        }

        if let Some(q) = filter.query.as_deref().filter(|q| !q.is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(Column::Title.contains(q))
                    .add(Column::Description.contains(q)),
            );
        }

        let books_with_authors = BookEntity::find()
            .filter(condition)
            .order_by_asc(Column::Title)
            .find_also_related(AuthorEntity)
            .all(&self.db)
            .await?;

        // Fetch genres in one query
        let genre_ids: Vec<String> = books_with_authors
            .iter()
            .map(|(b, _)| b.genre_id.clone())
            .collect();
        let genres = self.genres_by_id(genre_ids).await?;

        Ok(books_with_authors
            .into_iter()
            .map(|(book, author)| {
                let genre = genres.get(&book.genre_id).cloned();
                book.into_book(author, genre)
            })
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>, DomainError> {
        let found = BookEntity::find_by_id(id.to_owned())
            .find_also_related(AuthorEntity)
            .one(&self.db)
            .await?;

        let Some((book, author)) = found else {
            return Ok(None);
        };

        let genre = GenreEntity::find_by_id(book.genre_id.clone())
            .one(&self.db)
            .await?;

        Ok(Some(book.into_book(author, genre)))
    }
}
