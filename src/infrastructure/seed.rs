//! Demo catalog, inserted when `SEED_DEMO` is set

use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::models::{author, book, genre};

const AUTHORS: &[(&str, &str)] = &[
    ("author-premchand", "Munshi Premchand"),
    ("author-tagore", "Rabindranath Tagore"),
    ("author-narayan", "R. K. Narayan"),
    ("author-roy", "Arundhati Roy"),
];

const GENRES: &[(&str, &str)] = &[
    ("genre-classic", "Classic"),
    ("genre-fiction", "Fiction"),
    ("genre-poetry", "Poetry"),
];

struct DemoBook {
    id: &'static str,
    title: &'static str,
    author_id: &'static str,
    genre_id: &'static str,
    price: Option<f64>,
    rental_price: Option<f64>,
    hint: &'static str,
    description: &'static str,
    availability: &'static str,
}

const BOOKS: &[DemoBook] = &[
    DemoBook {
        id: "book-godaan",
        title: "Godaan",
        author_id: "author-premchand",
        genre_id: "genre-classic",
        price: Some(399.0),
        rental_price: Some(59.0),
        hint: "village cow",
        description: "A farmer's lifelong wish to own a cow.",
        availability: "in-stock",
    },
    DemoBook {
        id: "book-gitanjali",
        title: "Gitanjali",
        author_id: "author-tagore",
        genre_id: "genre-poetry",
        price: Some(249.0),
        rental_price: None,
        hint: "poetry book",
        description: "Song offerings.",
        availability: "in-stock",
    },
    DemoBook {
        id: "book-swami",
        title: "Swami and Friends",
        author_id: "author-narayan",
        genre_id: "genre-fiction",
        price: Some(899.0),
        rental_price: Some(99.0),
        hint: "school boys",
        description: "Boyhood in the fictional town of Malgudi.",
        availability: "in-stock",
    },
    DemoBook {
        id: "book-small-things",
        title: "The God of Small Things",
        author_id: "author-roy",
        genre_id: "genre-fiction",
        price: Some(499.0),
        rental_price: Some(79.0),
        hint: "river boat",
        description: "Twins growing up in Ayemenem.",
        availability: "out-of-stock",
    },
];

/// Rows already present from an earlier seed are skipped
fn ignore_existing(err: DbErr) -> Result<(), DbErr> {
    match err {
        DbErr::RecordNotInserted => Ok(()),
        other => Err(other),
    }
}

pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = chrono::Utc::now().to_rfc3339();

    // 1. Authors
    for (id, name) in AUTHORS {
        let author = author::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
        };
        author::Entity::insert(author)
            .on_conflict(OnConflict::column(author::Column::Id).do_nothing().to_owned())
            .exec(db)
            .await
            .map(drop)
            .or_else(ignore_existing)?;
    }

    // 2. Genres
    for (id, name) in GENRES {
        let genre = genre::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
        };
        genre::Entity::insert(genre)
            .on_conflict(OnConflict::column(genre::Column::Id).do_nothing().to_owned())
            .exec(db)
            .await
            .map(drop)
            .or_else(ignore_existing)?;
    }

    // 3. Books
    for demo in BOOKS {
        let book = book::ActiveModel {
            id: Set(demo.id.to_string()),
            title: Set(demo.title.to_string()),
            author_id: Set(demo.author_id.to_string()),
            genre_id: Set(demo.genre_id.to_string()),
            price: Set(demo.price),
            rental_price: Set(demo.rental_price),
            cover_url: Set(format!("https://placehold.co/300x450?text={}", demo.id)),
            cover_hint: Set(demo.hint.to_string()),
            description: Set(demo.description.to_string()),
            availability: Set(demo.availability.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
        };
        book::Entity::insert(book)
            .on_conflict(OnConflict::column(book::Column::Id).do_nothing().to_owned())
            .exec(db)
            .await
            .map(drop)
            .or_else(ignore_existing)?;
    }

    tracing::debug!("Seeded {} demo books", BOOKS.len());
    Ok(())
}
