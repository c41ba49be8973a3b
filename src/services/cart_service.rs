//! Cart/Wishlist Manager
//!
//! Holds the last snapshot observed from the document store subscription of
//! the signed-in user. Mutations go through store transactions only; the
//! mirrors change when the committed document is published back.

use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::{
    Book, CartEntry, CurrentUser, DocumentStore, DocumentUpdate, DomainError, LocalStorage,
    PurchaseType, UserDocument,
};
use crate::services::session_service::SessionService;

pub const WISHLIST_KEY: &str = "wishlist";

/// Result of a mutation request, used for user-facing confirmations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    /// Nothing to do: already present, or not there to remove
    Unchanged,
}

struct Binding {
    user_id: String,
    receiver: watch::Receiver<UserDocument>,
    /// Writes each published wishlist to local storage
    cache_task: Option<JoinHandle<()>>,
}

impl Drop for Binding {
    fn drop(&mut self) {
        if let Some(task) = self.cache_task.take() {
            task.abort();
        }
    }
}

pub struct CartManager {
    store: Arc<dyn DocumentStore>,
    session: Arc<SessionService>,
    local: Option<Arc<dyn LocalStorage>>,
    binding: Mutex<Option<Binding>>,
}

impl CartManager {
    pub fn new(store: Arc<dyn DocumentStore>, session: Arc<SessionService>) -> Self {
        Self {
            store,
            session,
            local: None,
            binding: Mutex::new(None),
        }
    }

    /// Cache every observed wishlist in local storage
    pub fn with_local_storage(mut self, local: Arc<dyn LocalStorage>) -> Self {
        self.local = Some(local);
        self
    }

    /// Point the subscription at the session's current user, dropping it
    /// when nobody is signed in.
    pub async fn sync_session(&self) -> Result<(), DomainError> {
        let Some(user) = self.session.current_user() else {
            *self.lock_binding() = None;
            return Ok(());
        };

        let already_bound = self
            .lock_binding()
            .as_ref()
            .is_some_and(|b| b.user_id == user.id);
        if already_bound {
            return Ok(());
        }

        let receiver = self.store.subscribe(&user.id).await?;
        let cache_task = self
            .local
            .clone()
            .map(|local| tokio::spawn(cache_published_wishlists(local, receiver.clone())));
        *self.lock_binding() = Some(Binding {
            user_id: user.id.clone(),
            receiver,
            cache_task,
        });
        tracing::debug!("Cart subscription bound to {}", user.id);
        self.cache_wishlist();
        Ok(())
    }

    /// Last observed document for the signed-in user; empty when signed out.
    pub fn snapshot(&self) -> UserDocument {
        let current = self.session.current_user().map(|u| u.id);
        let binding = self.lock_binding();
        let document = match (binding.as_ref(), current) {
            (Some(b), Some(user_id)) if b.user_id == user_id => b.receiver.borrow().clone(),
            _ => UserDocument::default(),
        };
        document
    }

    pub fn wishlist(&self) -> Vec<Book> {
        self.snapshot().wishlist
    }

    pub fn cart(&self) -> Vec<CartEntry> {
        self.snapshot().cart
    }

    pub fn wishlist_count(&self) -> usize {
        self.snapshot().wishlist.len()
    }

    pub fn cart_count(&self) -> usize {
        self.snapshot().cart.len()
    }

    pub fn cart_total(&self) -> f64 {
        self.snapshot().cart_total()
    }

    pub fn is_in_wishlist(&self, book_id: &str) -> bool {
        self.snapshot().in_wishlist(book_id)
    }

    pub fn is_in_cart(&self, book_id: &str) -> bool {
        self.snapshot().in_cart(book_id)
    }

    pub async fn add_to_wishlist(&self, book: &Book) -> Result<Mutation, DomainError> {
        let user = self.require_user().await?;
        if self.is_in_wishlist(&book.id) {
            return Ok(Mutation::Unchanged);
        }

        self.store
            .transact(&user.id, DocumentUpdate::WishlistUnion(book.clone()))
            .await?;
        self.cache_wishlist();
        tracing::info!("Added '{}' to wishlist of {}", book.title, user.id);
        Ok(Mutation::Applied)
    }

    pub async fn remove_from_wishlist(&self, book_id: &str) -> Result<Mutation, DomainError> {
        let user = self.require_user().await?;
        if !self.is_in_wishlist(book_id) {
            return Ok(Mutation::Unchanged);
        }

        self.store
            .transact(&user.id, DocumentUpdate::WishlistRemove(book_id.to_owned()))
            .await?;
        self.cache_wishlist();
        tracing::info!("Removed book {} from wishlist of {}", book_id, user.id);
        Ok(Mutation::Applied)
    }

    /// Adding a book that is already in the cart is a no-op, even when the
    /// requested purchase type differs from the existing entry.
    pub async fn add_to_cart(
        &self,
        book: &Book,
        kind: PurchaseType,
    ) -> Result<Mutation, DomainError> {
        let user = self.require_user().await?;
        if self.is_in_cart(&book.id) {
            return Ok(Mutation::Unchanged);
        }

        let entry = CartEntry {
            book: book.clone(),
            kind,
        };
        self.store
            .transact(&user.id, DocumentUpdate::CartUnion(entry))
            .await?;
        tracing::info!("Added '{}' ({:?}) to cart of {}", book.title, kind, user.id);
        Ok(Mutation::Applied)
    }

    pub async fn remove_from_cart(&self, book_id: &str) -> Result<Mutation, DomainError> {
        let user = self.require_user().await?;
        if !self.is_in_cart(book_id) {
            return Ok(Mutation::Unchanged);
        }

        self.store
            .transact(&user.id, DocumentUpdate::CartRemove(book_id.to_owned()))
            .await?;
        tracing::info!("Removed book {} from cart of {}", book_id, user.id);
        Ok(Mutation::Applied)
    }

    /// Empty the cart, e.g. after checkout
    pub async fn clear_cart(&self) -> Result<Mutation, DomainError> {
        let user = self.require_user().await?;
        if self.cart_count() == 0 {
            return Ok(Mutation::Unchanged);
        }

        self.store
            .transact(&user.id, DocumentUpdate::ClearCart)
            .await?;
        tracing::info!("Cleared cart of {}", user.id);
        Ok(Mutation::Applied)
    }

    /// Wishlist as last cached on this device
    pub fn cached_wishlist(&self) -> Result<Vec<Book>, DomainError> {
        let Some(local) = &self.local else {
            return Ok(Vec::new());
        };
        match local.get_item(WISHLIST_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn require_user(&self) -> Result<CurrentUser, DomainError> {
        let user = self
            .session
            .current_user()
            .ok_or(DomainError::AuthenticationRequired)?;
        self.sync_session().await?;
        Ok(user)
    }

    fn cache_wishlist(&self) {
        if let Some(local) = &self.local {
            store_wishlist(local.as_ref(), &self.snapshot().wishlist);
        }
    }

    fn lock_binding(&self) -> std::sync::MutexGuard<'_, Option<Binding>> {
        self.binding.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn cache_published_wishlists(
    local: Arc<dyn LocalStorage>,
    mut receiver: watch::Receiver<UserDocument>,
) {
    while receiver.changed().await.is_ok() {
        let wishlist = receiver.borrow_and_update().wishlist.clone();
        store_wishlist(local.as_ref(), &wishlist);
    }
}

fn store_wishlist(local: &dyn LocalStorage, wishlist: &[Book]) {
    let result = serde_json::to_string(wishlist)
        .map_err(DomainError::from)
        .and_then(|raw| local.set_item(WISHLIST_KEY, &raw));
    if let Err(e) = result {
        tracing::warn!("Failed to cache wishlist locally: {}", e);
    }
}
