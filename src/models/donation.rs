use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Donation, DonationStatus, DonationType, DomainError, FileAttachment, PickupAddress,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub donor_name: String,
    pub donor_email: String,
    pub donation_type: String, // 'book', 'pdf'
    pub status: String,        // 'pending', 'pickup_scheduled', 'completed'
    // Pickup fields (book donations)
    pub phone: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    // File fields (pdf donations)
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::donated_book::Entity")]
    DonatedBooks,
}

impl Related<super::donated_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DonatedBooks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Donation {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let donation_type = DonationType::parse(&model.donation_type).ok_or_else(|| {
            DomainError::Internal(format!("Unknown donation type '{}'", model.donation_type))
        })?;
        let status = DonationStatus::parse(&model.status).ok_or_else(|| {
            DomainError::Internal(format!("Unknown donation status '{}'", model.status))
        })?;

        let pickup = match (
            model.phone,
            model.street_address,
            model.city,
            model.state,
            model.pincode,
        ) {
            (Some(phone), Some(street_address), Some(city), Some(state), Some(pincode)) => {
                Some(PickupAddress {
                    phone,
                    street_address,
                    city,
                    state,
                    pincode,
                })
            }
            _ => None,
        };

        let file = match (model.file_url, model.file_name) {
            (Some(file_url), Some(file_name)) => Some(FileAttachment {
                file_url,
                file_name,
                file_size: model.file_size.unwrap_or(0).max(0) as u64,
            }),
            _ => None,
        };

        Ok(Donation {
            id: model.id,
            donor_name: model.donor_name,
            donor_email: model.donor_email,
            donation_type,
            status,
            pickup,
            title: model.title,
            author: model.author,
            description: model.description,
            file,
            created_at: model.created_at,
        })
    }
}
