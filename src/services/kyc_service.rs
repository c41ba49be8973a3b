//! KYC status - whether the user completed identity verification on this device

use std::sync::Arc;

use crate::domain::{DomainError, LocalStorage};

pub const KYC_KEY: &str = "kycCompleted";

pub struct KycStatus {
    storage: Arc<dyn LocalStorage>,
}

impl KycStatus {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    /// Anything other than a stored `true` counts as unverified.
    pub fn is_verified(&self) -> Result<bool, DomainError> {
        let verified = match self.storage.get_item(KYC_KEY)? {
            Some(raw) => serde_json::from_str::<bool>(&raw).unwrap_or(false),
            None => false,
        };
        Ok(verified)
    }

    pub fn mark_verified(&self) -> Result<(), DomainError> {
        self.storage.set_item(KYC_KEY, "true")?;
        tracing::info!("KYC marked as completed");
        Ok(())
    }

    pub fn reset(&self) -> Result<(), DomainError> {
        self.storage.remove_item(KYC_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryLocalStorage;

    #[test]
    fn verification_flag_lifecycle() {
        let storage = Arc::new(MemoryLocalStorage::new());
        let kyc = KycStatus::new(storage.clone());
        assert!(!kyc.is_verified().unwrap());

        kyc.mark_verified().unwrap();
        assert!(kyc.is_verified().unwrap());
        assert_eq!(storage.get_item(KYC_KEY).unwrap().as_deref(), Some("true"));

        kyc.reset().unwrap();
        assert!(!kyc.is_verified().unwrap());
    }

    #[test]
    fn unreadable_flag_is_unverified() {
        let storage = Arc::new(MemoryLocalStorage::new());
        storage.set_item(KYC_KEY, "yes please").unwrap();
        assert!(!KycStatus::new(storage).is_verified().unwrap());
    }
}
