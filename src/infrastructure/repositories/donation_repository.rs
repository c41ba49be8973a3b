//! SeaORM implementation of DonationRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::{
    DonatedBook, Donation, DonationRepository, DonationStatus, DomainError, FileAttachment,
    NewDonation,
};
use crate::models::donated_book::{self, Entity as DonatedBookEntity};
use crate::models::donation::{self, Entity as DonationEntity};

pub struct SeaOrmDonationRepository {
    db: DatabaseConnection,
}

impl SeaOrmDonationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DonationRepository for SeaOrmDonationRepository {
    async fn create(&self, input: NewDonation) -> Result<Donation, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let pickup = input.pickup;

        let row = donation::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            donor_name: Set(input.donor_name),
            donor_email: Set(input.donor_email),
            donation_type: Set(input.donation_type.as_str().to_owned()),
            status: Set(input.status.as_str().to_owned()),
            phone: Set(pickup.as_ref().map(|p| p.phone.clone())),
            street_address: Set(pickup.as_ref().map(|p| p.street_address.clone())),
            city: Set(pickup.as_ref().map(|p| p.city.clone())),
            state: Set(pickup.as_ref().map(|p| p.state.clone())),
            pincode: Set(pickup.as_ref().map(|p| p.pincode.clone())),
            title: Set(input.title),
            author: Set(input.author),
            description: Set(input.description),
            file_url: Set(None),
            file_name: Set(None),
            file_size: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let saved = row.insert(&self.db).await?;
        Donation::try_from(saved)
    }

    async fn attach_file(
        &self,
        donation_id: &str,
        file: FileAttachment,
    ) -> Result<Donation, DomainError> {
        let existing = DonationEntity::find_by_id(donation_id.to_owned())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: donation::ActiveModel = existing.into();
        active.file_url = Set(Some(file.file_url));
        active.file_name = Set(Some(file.file_name));
        active.file_size = Set(Some(file.file_size as i64));
        active.status = Set(DonationStatus::Completed.as_str().to_owned());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;
        Donation::try_from(updated)
    }

    async fn insert_donated_books(
        &self,
        donation_id: &str,
        books: &[DonatedBook],
    ) -> Result<(), DomainError> {
        if books.is_empty() {
            return Ok(());
        }
        let now = chrono::Utc::now().to_rfc3339();

        let rows = books
            .iter()
            .map(|b| {
                let quantity = i32::try_from(b.quantity.max(1)).map_err(|_| {
                    DomainError::Validation(format!(
                        "Quantity {} for '{}' is too large",
                        b.quantity, b.title
                    ))
                })?;
                Ok::<_, DomainError>(donated_book::ActiveModel {
                    donation_id: Set(donation_id.to_owned()),
                    title: Set(b.title.clone()),
                    author: Set(b.author.clone()),
                    genre: Set(b.genre.clone()),
                    quantity: Set(quantity),
                    created_at: Set(now.clone()),
                    ..Default::default()
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        DonatedBookEntity::insert_many(rows).exec(&self.db).await?;
        Ok(())
    }

    async fn find_by_id(&self, donation_id: &str) -> Result<Option<Donation>, DomainError> {
        DonationEntity::find_by_id(donation_id.to_owned())
            .one(&self.db)
            .await?
            .map(Donation::try_from)
            .transpose()
    }

    async fn donated_books(&self, donation_id: &str) -> Result<Vec<DonatedBook>, DomainError> {
        let rows = DonatedBookEntity::find()
            .filter(donated_book::Column::DonationId.eq(donation_id))
            .order_by_asc(donated_book::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(DonatedBook::from).collect())
    }

    async fn delete(&self, donation_id: &str) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        DonatedBookEntity::delete_many()
            .filter(donated_book::Column::DonationId.eq(donation_id))
            .exec(&txn)
            .await?;
        let result = DonationEntity::delete_by_id(donation_id.to_owned())
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }
}
