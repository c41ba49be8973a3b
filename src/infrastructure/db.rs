use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        sql.to_owned(),
    ))
    .await?;
    Ok(())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    execute(db, "PRAGMA foreign_keys = ON").await?;

    // Catalog reference data
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            author_id TEXT NOT NULL,
            genre_id TEXT NOT NULL,
            price REAL,
            rental_price REAL,
            cover_url TEXT NOT NULL DEFAULT '',
            cover_hint TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            availability TEXT NOT NULL DEFAULT 'in-stock',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (author_id) REFERENCES authors(id) ON DELETE CASCADE,
            FOREIGN KEY (genre_id) REFERENCES genres(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    // Accounts
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            display_name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    // Per-user wishlist/cart documents
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS user_documents (
            user_id TEXT PRIMARY KEY,
            wishlist TEXT NOT NULL DEFAULT '[]',
            cart TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    // Donations
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS donations (
            id TEXT PRIMARY KEY,
            donor_name TEXT NOT NULL,
            donor_email TEXT NOT NULL,
            donation_type TEXT NOT NULL CHECK (donation_type IN ('book', 'pdf')),
            status TEXT NOT NULL DEFAULT 'pending',
            phone TEXT,
            street_address TEXT,
            city TEXT,
            state TEXT,
            pincode TEXT,
            title TEXT,
            author TEXT,
            description TEXT,
            file_url TEXT,
            file_name TEXT,
            file_size INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS donated_books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            donation_id TEXT NOT NULL,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            genre TEXT NOT NULL DEFAULT '',
            quantity INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            FOREIGN KEY (donation_id) REFERENCES donations(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_donated_books_donation ON donated_books(donation_id)",
    )
    .await?;

    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_books_genre ON books(genre_id)",
    )
    .await?;

    Ok(())
}
