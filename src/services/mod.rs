//! Services Layer
//!
//! Business logic behind the HTTP handlers. Every service receives its
//! collaborators explicitly, so the same objects serve handlers and tests.

pub mod address_book;
pub mod cart_service;
pub mod donation_service;
pub mod donation_wizard;
pub mod kyc_service;
pub mod session_service;

// Re-export for convenience
pub use address_book::AddressBook;
pub use cart_service::{CartManager, Mutation};
pub use donation_service::{DonationNotifier, DonationReceipt, DonationService, LogNotifier};
pub use donation_wizard::{DonationWizard, WizardError, WizardStep};
pub use kyc_service::KycStatus;
pub use session_service::{Session, SessionService};
