//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use tokio::sync::watch;

use super::DomainError;
use super::book::{Availability, Book};
use super::cart::{DocumentUpdate, UserDocument};
use super::donation::{DonatedBook, Donation, FileAttachment, NewDonation};
use super::profile::{NewProfile, Profile};

/// Filter criteria for catalog queries
#[derive(Debug, Default, Clone)]
pub struct BookFilter {
    pub genre: Option<String>,
    pub query: Option<String>,
    pub availability: Option<Availability>,
}

/// Repository trait for catalog books
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all books matching the filter, ordered by title
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError>;

    /// Find a single book by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Book>, DomainError>;
}

/// Per-user wishlist/cart documents with transactional writes and live
/// subscriptions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the current document, if one was ever written
    async fn get(&self, user_id: &str) -> Result<Option<UserDocument>, DomainError>;

    /// Subscribe to the user's document. The receiver always holds the last
    /// committed snapshot (an empty document before the first write).
    async fn subscribe(&self, user_id: &str)
    -> Result<watch::Receiver<UserDocument>, DomainError>;

    /// Atomically read, apply `update` and write back, creating the document
    /// when it does not exist yet. Returns the committed document.
    async fn transact(
        &self,
        user_id: &str,
        update: DocumentUpdate,
    ) -> Result<UserDocument, DomainError>;
}

/// Repository trait for donations and their donated book rows
#[async_trait]
pub trait DonationRepository: Send + Sync {
    async fn create(&self, donation: NewDonation) -> Result<Donation, DomainError>;

    /// Record the uploaded file and mark the donation completed
    async fn attach_file(
        &self,
        donation_id: &str,
        file: FileAttachment,
    ) -> Result<Donation, DomainError>;

    async fn insert_donated_books(
        &self,
        donation_id: &str,
        books: &[DonatedBook],
    ) -> Result<(), DomainError>;

    async fn find_by_id(&self, donation_id: &str) -> Result<Option<Donation>, DomainError>;

    async fn donated_books(&self, donation_id: &str) -> Result<Vec<DonatedBook>, DomainError>;

    /// Delete a donation together with its donated book rows
    async fn delete(&self, donation_id: &str) -> Result<(), DomainError>;
}

/// Repository trait for user accounts
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, DomainError>;

    async fn create(&self, profile: NewProfile) -> Result<Profile, DomainError>;
}

/// Path-addressed file storage
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Store `bytes` at `bucket/path` and return its public URL
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, DomainError>;

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), DomainError>;
}

/// Whole-value key/value persistence on the local device
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, DomainError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), DomainError>;

    fn remove_item(&self, key: &str) -> Result<(), DomainError>;
}
