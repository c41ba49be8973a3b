//! Repository implementations using SeaORM

pub mod book_repository;
pub mod document_store;
pub mod donation_repository;
pub mod profile_repository;

pub use book_repository::SeaOrmBookRepository;
pub use document_store::SeaOrmDocumentStore;
pub use donation_repository::SeaOrmDonationRepository;
pub use profile_repository::SeaOrmProfileRepository;
