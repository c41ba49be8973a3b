use serde::{Deserialize, Serialize};

use super::DomainError;
use super::validation::{is_blank, is_valid_phone, is_valid_pincode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressType {
    #[default]
    Home,
    Work,
    Other,
}

/// A shipping address kept in local device storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AddressType,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

/// Address fields before an id has been assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    #[serde(rename = "type", default)]
    pub kind: AddressType,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    #[serde(default)]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

impl NewAddress {
    pub fn with_id(self, id: String) -> Address {
        Address {
            id,
            kind: self.kind,
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            address2: second_line(self.address2),
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            phone: self.phone,
        }
    }
}

/// A blank second line is stored as absent
fn second_line(address2: Option<String>) -> Option<String> {
    address2.filter(|a| !is_blank(a))
}

impl Address {
    pub fn normalized(mut self) -> Self {
        self.address2 = second_line(self.address2);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| is_blank(value)) {
            return Err(DomainError::Validation(format!("{} is required", field)));
        }
        if !is_valid_pincode(&self.pincode) {
            return Err(DomainError::Validation(
                "pincode must be 6 digits".to_string(),
            ));
        }
        if !is_valid_phone(&self.phone) {
            return Err(DomainError::Validation(
                "phone must have at least 10 digits".to_string(),
            ));
        }
        Ok(())
    }

    /// Sample entry shown to a fresh install.
    pub fn sample() -> Self {
        Address {
            id: "sample-home".to_string(),
            kind: AddressType::Home,
            first_name: "Asha".to_string(),
            last_name: "Reader".to_string(),
            address: "12 Library Road".to_string(),
            address2: Some("Near City Park".to_string()),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
            phone: "9876543210".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_address_is_valid() {
        assert!(Address::sample().validate().is_ok());
    }

    #[test]
    fn validation_names_first_missing_field() {
        let mut address = Address::sample();
        address.city = "  ".to_string();
        match address.validate() {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, "city is required"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn serializes_type_and_camel_case() {
        let json = serde_json::to_value(Address::sample()).unwrap();
        assert_eq!(json["type"], "Home");
        assert_eq!(json["firstName"], "Asha");
        assert_eq!(json["address2"], "Near City Park");
    }
}
