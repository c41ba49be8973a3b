//! SeaORM implementation of ProfileRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::domain::{DomainError, NewProfile, Profile, ProfileRepository};
use crate::models::profile::{self, Entity as ProfileEntity};

pub struct SeaOrmProfileRepository {
    db: DatabaseConnection,
}

impl SeaOrmProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for SeaOrmProfileRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, DomainError> {
        let found = ProfileEntity::find()
            .filter(profile::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await?;
        Ok(found.map(Profile::from))
    }

    async fn create(&self, input: NewProfile) -> Result<Profile, DomainError> {
        let email = input.email.trim().to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "An account already exists for {}",
                email
            )));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let row = profile::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(email),
            display_name: Set(input.display_name),
            password_hash: Set(input.password_hash),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let saved = row.insert(&self.db).await?;
        Ok(Profile::from(saved))
    }
}
