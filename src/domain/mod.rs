//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only domain types, trait definitions and domain error types.

pub mod address;
pub mod book;
pub mod cart;
pub mod donation;
pub mod errors;
pub mod profile;
pub mod repositories;
pub mod validation;

pub use address::{Address, AddressType, NewAddress};
pub use book::{AuthorRef, Availability, Book, CoverImage, GenreRef};
pub use cart::{CartEntry, DocumentUpdate, PurchaseType, UserDocument};
pub use donation::{
    DonatedBook, Donation, DonationDetails, DonationStatus, DonationSubmission, DonationType,
    FileAttachment, NewDonation, PdfFile, PickupAddress,
};
pub use errors::DomainError;
pub use profile::{CurrentUser, NewProfile, Profile};
pub use repositories::*;
