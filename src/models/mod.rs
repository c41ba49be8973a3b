pub mod author;
pub mod book;
pub mod donated_book;
pub mod donation;
pub mod genre;
pub mod profile;
pub mod user_document;
