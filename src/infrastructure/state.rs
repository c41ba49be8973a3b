//! Application state containing repositories and shared services

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{BookRepository, ProfileRepository};
use crate::infrastructure::config::Config;
use crate::infrastructure::storage::FsBlobStorage;
use crate::infrastructure::{
    SeaOrmBookRepository, SeaOrmDonationRepository, SeaOrmProfileRepository,
};
use crate::services::DonationService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Catalog reads
    pub book_repo: Arc<dyn BookRepository>,
    /// Accounts for register/login
    pub profile_repo: Arc<dyn ProfileRepository>,
    /// Donation submission pipeline
    pub donations: Arc<DonationService>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let blobs = Arc::new(FsBlobStorage::new(
            config.storage_root.clone(),
            config.public_storage_url.clone(),
        ));
        let donations = Arc::new(DonationService::new(
            Arc::new(SeaOrmDonationRepository::new(db.clone())),
            blobs,
        ));

        Self {
            book_repo: Arc::new(SeaOrmBookRepository::new(db.clone())),
            profile_repo: Arc::new(SeaOrmProfileRepository::new(db)),
            donations,
            config: Arc::new(config),
        }
    }
}
