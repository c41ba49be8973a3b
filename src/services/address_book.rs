//! Address Book Manager - shipping addresses kept in local storage
//!
//! The whole list is written back under one key on every mutation.

use std::sync::Arc;

use crate::domain::{Address, DomainError, LocalStorage, NewAddress};

pub const ADDRESSES_KEY: &str = "addresses";

pub struct AddressBook {
    storage: Arc<dyn LocalStorage>,
    addresses: Vec<Address>,
}

impl AddressBook {
    /// Read the stored list. A device that never stored one starts with the
    /// sample address.
    pub fn load(storage: Arc<dyn LocalStorage>) -> Result<Self, DomainError> {
        let addresses = match storage.get_item(ADDRESSES_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => vec![Address::sample()],
        };
        tracing::debug!("Loaded {} address(es)", addresses.len());
        Ok(Self { storage, addresses })
    }

    pub fn list(&self) -> &[Address] {
        &self.addresses
    }

    pub fn get(&self, id: &str) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == id)
    }

    pub fn add(&mut self, new_address: NewAddress) -> Result<Address, DomainError> {
        let mut id = uuid::Uuid::new_v4().to_string();
        while self.get(&id).is_some() {
            id = uuid::Uuid::new_v4().to_string();
        }
        let address = new_address.with_id(id);
        address.validate()?;

        let mut next = self.addresses.clone();
        next.push(address.clone());
        self.commit(next)?;
        tracing::info!("Added {:?} address {}", address.kind, address.id);
        Ok(address)
    }

    /// Replace the address with the same id. Returns `false` and leaves the
    /// list untouched when no such address exists.
    pub fn update(&mut self, address: Address) -> Result<bool, DomainError> {
        let Some(index) = self.addresses.iter().position(|a| a.id == address.id) else {
            return Ok(false);
        };
        let address = address.normalized();
        address.validate()?;

        let mut next = self.addresses.clone();
        tracing::info!("Updated address {}", address.id);
        next[index] = address;
        self.commit(next)?;
        Ok(true)
    }

    pub fn remove(&mut self, id: &str) -> Result<bool, DomainError> {
        if self.get(id).is_none() {
            return Ok(false);
        }

        let next: Vec<Address> = self
            .addresses
            .iter()
            .filter(|a| a.id != id)
            .cloned()
            .collect();
        self.commit(next)?;
        tracing::info!("Removed address {}", id);
        Ok(true)
    }

    /// Persist first so memory never runs ahead of storage
    fn commit(&mut self, next: Vec<Address>) -> Result<(), DomainError> {
        let raw = serde_json::to_string(&next)?;
        self.storage.set_item(ADDRESSES_KEY, &raw)?;
        self.addresses = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AddressType;
    use crate::infrastructure::storage::MemoryLocalStorage;

    fn office() -> NewAddress {
        NewAddress {
            kind: AddressType::Work,
            first_name: "Kiran".to_string(),
            last_name: "Rao".to_string(),
            address: "88 Residency Road".to_string(),
            address2: Some("   ".to_string()),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560025".to_string(),
            phone: "+91 98450 12345".to_string(),
        }
    }

    #[test]
    fn fresh_storage_starts_with_sample() {
        let book = AddressBook::load(Arc::new(MemoryLocalStorage::default())).unwrap();
        assert_eq!(book.list().len(), 1);
        assert_eq!(book.list()[0].id, "sample-home");
    }

    #[test]
    fn invalid_address_is_not_stored() {
        let storage = Arc::new(MemoryLocalStorage::default());
        let mut book = AddressBook::load(storage.clone()).unwrap();
        let mut bad = office();
        bad.pincode = "56002".to_string();

        assert!(matches!(book.add(bad), Err(DomainError::Validation(_))));
        assert_eq!(book.list().len(), 1);
        assert!(storage.get_item(ADDRESSES_KEY).unwrap().is_none());
    }

    #[test]
    fn blank_second_line_is_dropped() {
        let mut book = AddressBook::load(Arc::new(MemoryLocalStorage::default())).unwrap();
        let added = book.add(office()).unwrap();
        assert_eq!(added.address2, None);

        let mut edited = added.clone();
        edited.address2 = Some("Floor 3".to_string());
        assert!(book.update(edited).unwrap());
        assert_eq!(book.get(&added.id).unwrap().address2.as_deref(), Some("Floor 3"));

        let mut cleared = added.clone();
        cleared.address2 = Some(" \t".to_string());
        assert!(book.update(cleared).unwrap());
        assert_eq!(book.get(&added.id).unwrap().address2, None);
    }

    #[test]
    fn remove_unknown_id_reports_false() {
        let mut book = AddressBook::load(Arc::new(MemoryLocalStorage::default())).unwrap();
        assert!(!book.remove("missing").unwrap());
        assert!(book.remove("sample-home").unwrap());
        assert!(book.list().is_empty());
    }
}
