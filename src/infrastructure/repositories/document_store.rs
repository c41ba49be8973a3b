//! SeaORM implementation of DocumentStore
//!
//! Each write runs inside a database transaction, and writes to the same
//! user are serialized in-process. Committed documents are published to
//! subscribers through one `watch` channel per user.

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait,
};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

use crate::domain::{DocumentStore, DocumentUpdate, DomainError, UserDocument};
use crate::models::user_document::{ActiveModel, Entity as UserDocumentEntity, Model};

pub struct SeaOrmDocumentStore {
    db: DatabaseConnection,
    channels: DashMap<String, watch::Sender<UserDocument>>,
    writers: DashMap<String, Arc<Mutex<()>>>,
}

impl SeaOrmDocumentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            channels: DashMap::new(),
            writers: DashMap::new(),
        }
    }

    fn publish(&self, user_id: &str, document: &UserDocument) {
        if let Some(sender) = self.channels.get(user_id) {
            sender.send_replace(document.clone());
        }
    }
}

fn decode(model: &Model) -> Result<UserDocument, DomainError> {
    Ok(UserDocument {
        wishlist: serde_json::from_str(&model.wishlist)?,
        cart: serde_json::from_str(&model.cart)?,
    })
}

async fn load<C: ConnectionTrait>(conn: &C, user_id: &str) -> Result<Option<Model>, DomainError> {
    Ok(UserDocumentEntity::find_by_id(user_id.to_owned())
        .one(conn)
        .await?)
}

#[async_trait]
impl DocumentStore for SeaOrmDocumentStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserDocument>, DomainError> {
        load(&self.db, user_id)
            .await?
            .map(|model| decode(&model))
            .transpose()
    }

    async fn subscribe(
        &self,
        user_id: &str,
    ) -> Result<watch::Receiver<UserDocument>, DomainError> {
        // Register the channel before loading so no commit goes unpublished
        let (receiver, created) = match self.channels.entry(user_id.to_owned()) {
            Entry::Occupied(entry) => (entry.get().subscribe(), false),
            Entry::Vacant(entry) => (
                entry.insert(watch::channel(UserDocument::default()).0).subscribe(),
                true,
            ),
        };
        if !created {
            return Ok(receiver);
        }

        let initial = match self.get(user_id).await {
            Ok(document) => document.unwrap_or_default(),
            Err(e) => {
                self.channels
                    .remove_if(user_id, |_, _| !receiver.has_changed().unwrap_or(true));
                return Err(e);
            }
        };
        if let Some(sender) = self.channels.get(user_id) {
            // A commit published meanwhile is newer than what was loaded
            sender.send_if_modified(|current| {
                if receiver.has_changed().unwrap_or(true) {
                    return false;
                }
                *current = initial;
                true
            });
        }
        Ok(receiver)
    }

    async fn transact(
        &self,
        user_id: &str,
        update: DocumentUpdate,
    ) -> Result<UserDocument, DomainError> {
        let writer = self.writers.entry(user_id.to_owned()).or_default().clone();
        let _serialized = writer.lock().await;

        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let document = match load(&txn, user_id).await? {
            None => {
                let document = UserDocument::from_update(&update);
                let row = ActiveModel {
                    user_id: Set(user_id.to_owned()),
                    wishlist: Set(serde_json::to_string(&document.wishlist)?),
                    cart: Set(serde_json::to_string(&document.cart)?),
                    created_at: Set(now.clone()),
                    updated_at: Set(now),
                };
                row.insert(&txn).await?;
                document
            }
            Some(model) => {
                let mut document = decode(&model)?;
                if document.apply(&update) {
                    let mut active: ActiveModel = model.into();
                    active.wishlist = Set(serde_json::to_string(&document.wishlist)?);
                    active.cart = Set(serde_json::to_string(&document.cart)?);
                    active.updated_at = Set(now);
                    active.update(&txn).await?;
                }
                document
            }
        };

        txn.commit().await?;
        self.publish(user_id, &document);

        Ok(document)
    }
}
