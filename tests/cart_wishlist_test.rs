use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use bookshare::auth::create_jwt;
use bookshare::db;
use bookshare::domain::{
    AuthorRef, Availability, Book, CoverImage, CurrentUser, DocumentStore, DocumentUpdate,
    DomainError, GenreRef, PurchaseType, UserDocument,
};
use bookshare::infrastructure::storage::MemoryLocalStorage;
use bookshare::infrastructure::{SeaOrmDocumentStore, SeaOrmProfileRepository};
use bookshare::services::{CartManager, Mutation, SessionService};

/// Reads from the real store but refuses every write
struct ReadOnlyStore {
    inner: SeaOrmDocumentStore,
}

#[async_trait]
impl DocumentStore for ReadOnlyStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserDocument>, DomainError> {
        self.inner.get(user_id).await
    }

    async fn subscribe(
        &self,
        user_id: &str,
    ) -> Result<watch::Receiver<UserDocument>, DomainError> {
        self.inner.subscribe(user_id).await
    }

    async fn transact(
        &self,
        _user_id: &str,
        _update: DocumentUpdate,
    ) -> Result<UserDocument, DomainError> {
        Err(DomainError::Database("database is locked".to_string()))
    }
}

struct Fixture {
    store: Arc<SeaOrmDocumentStore>,
    session: Arc<SessionService>,
    cart: CartManager,
}

async fn setup() -> Fixture {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let store = Arc::new(SeaOrmDocumentStore::new(db.clone()));
    let session = Arc::new(SessionService::new(Arc::new(SeaOrmProfileRepository::new(
        db,
    ))));
    let cart = CartManager::new(store.clone(), session.clone());
    Fixture {
        store,
        session,
        cart,
    }
}

fn sign_in(session: &SessionService, id: &str) {
    let user = CurrentUser {
        id: id.to_string(),
        email: format!("{}@example.org", id),
        display_name: id.to_string(),
    };
    let token = create_jwt(&user).expect("Failed to issue token");
    session.restore(&token).expect("Failed to restore session");
}

fn book(id: &str, price: Option<f64>, rental_price: Option<f64>) -> Book {
    Book {
        id: id.to_string(),
        title: format!("Title {}", id),
        author: AuthorRef {
            id: "a1".to_string(),
            name: "Author".to_string(),
        },
        genre: GenreRef {
            id: "g1".to_string(),
            name: "Fiction".to_string(),
        },
        price,
        rental_price,
        cover_image: CoverImage::default(),
        description: String::new(),
        availability: Availability::InStock,
    }
}

#[tokio::test]
async fn double_add_to_wishlist_keeps_one_entry() {
    let f = setup().await;
    sign_in(&f.session, "u1");
    let b1 = book("b1", Some(399.0), None);

    assert_eq!(f.cart.add_to_wishlist(&b1).await.unwrap(), Mutation::Applied);
    assert_eq!(
        f.cart.add_to_wishlist(&b1).await.unwrap(),
        Mutation::Unchanged
    );

    assert_eq!(f.cart.wishlist_count(), 1);
    let stored = f.store.get("u1").await.unwrap().unwrap();
    assert_eq!(stored.wishlist.len(), 1);
    assert!(f.cart.is_in_wishlist("b1"));
}

#[tokio::test]
async fn cart_keeps_first_purchase_type() {
    let f = setup().await;
    sign_in(&f.session, "u1");
    let b1 = book("b1", Some(899.0), Some(99.0));

    f.cart.add_to_cart(&b1, PurchaseType::Buy).await.unwrap();
    let second = f.cart.add_to_cart(&b1, PurchaseType::Rent).await.unwrap();

    assert_eq!(second, Mutation::Unchanged);
    let cart = f.cart.cart();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].kind, PurchaseType::Buy);
}

#[tokio::test]
async fn cart_total_uses_type_specific_price() {
    let f = setup().await;
    sign_in(&f.session, "u1");

    f.cart
        .add_to_cart(&book("b1", Some(399.0), None), PurchaseType::Buy)
        .await
        .unwrap();
    f.cart
        .add_to_cart(&book("b2", Some(899.0), Some(99.0)), PurchaseType::Rent)
        .await
        .unwrap();
    // Rented without a rental price counts as zero
    f.cart
        .add_to_cart(&book("b3", Some(250.0), None), PurchaseType::Rent)
        .await
        .unwrap();

    assert_eq!(f.cart.cart_count(), 3);
    assert_eq!(f.cart.cart_total(), 498.0);
}

#[tokio::test]
async fn signed_out_mutations_are_refused() {
    let f = setup().await;
    let b1 = book("b1", Some(100.0), None);

    assert!(matches!(
        f.cart.add_to_wishlist(&b1).await,
        Err(DomainError::AuthenticationRequired)
    ));
    assert!(matches!(
        f.cart.add_to_cart(&b1, PurchaseType::Buy).await,
        Err(DomainError::AuthenticationRequired)
    ));
    assert!(matches!(
        f.cart.clear_cart().await,
        Err(DomainError::AuthenticationRequired)
    ));
    assert_eq!(f.store.get("u1").await.unwrap(), None);
}

#[tokio::test]
async fn removals_and_clear() {
    let f = setup().await;
    sign_in(&f.session, "u1");
    let b1 = book("b1", Some(100.0), None);
    let b2 = book("b2", Some(200.0), None);

    assert_eq!(
        f.cart.remove_from_wishlist("b1").await.unwrap(),
        Mutation::Unchanged
    );
    f.cart.add_to_wishlist(&b1).await.unwrap();
    f.cart.add_to_wishlist(&b2).await.unwrap();
    assert_eq!(
        f.cart.remove_from_wishlist("b1").await.unwrap(),
        Mutation::Applied
    );
    assert_eq!(f.cart.wishlist(), vec![b2.clone()]);

    f.cart.add_to_cart(&b1, PurchaseType::Buy).await.unwrap();
    f.cart.add_to_cart(&b2, PurchaseType::Buy).await.unwrap();
    f.cart.remove_from_cart("b2").await.unwrap();
    assert_eq!(f.cart.cart_total(), 100.0);

    assert_eq!(f.cart.clear_cart().await.unwrap(), Mutation::Applied);
    assert_eq!(f.cart.cart_count(), 0);
    assert_eq!(f.cart.clear_cart().await.unwrap(), Mutation::Unchanged);
    // The wishlist is untouched by clearing the cart
    assert_eq!(f.cart.wishlist_count(), 1);
}

#[tokio::test]
async fn mirrors_follow_the_signed_in_user() {
    let f = setup().await;
    sign_in(&f.session, "u1");
    f.cart
        .add_to_wishlist(&book("b1", Some(100.0), None))
        .await
        .unwrap();

    f.session.sign_out();
    assert_eq!(f.cart.wishlist_count(), 0);

    sign_in(&f.session, "u2");
    f.cart.sync_session().await.unwrap();
    assert_eq!(f.cart.wishlist_count(), 0);

    sign_in(&f.session, "u1");
    f.cart.sync_session().await.unwrap();
    assert_eq!(f.cart.wishlist_count(), 1);
}

#[tokio::test]
async fn subscription_reflects_writes_from_other_clients() {
    let f = setup().await;
    sign_in(&f.session, "u1");
    f.cart.sync_session().await.unwrap();

    // Another client of the same store writes directly
    f.store
        .transact(
            "u1",
            DocumentUpdate::WishlistUnion(book("b9", None, None)),
        )
        .await
        .unwrap();

    assert!(f.cart.is_in_wishlist("b9"));
}

#[tokio::test]
async fn wishlist_is_cached_locally() {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let store = Arc::new(SeaOrmDocumentStore::new(db.clone()));
    let session = Arc::new(SessionService::new(Arc::new(SeaOrmProfileRepository::new(
        db,
    ))));
    let local = Arc::new(MemoryLocalStorage::new());
    let cart = CartManager::new(store, session.clone()).with_local_storage(local);

    assert!(cart.cached_wishlist().unwrap().is_empty());

    sign_in(&session, "u1");
    let b1 = book("b1", Some(100.0), None);
    cart.add_to_wishlist(&b1).await.unwrap();
    session.sign_out();

    assert_eq!(cart.wishlist_count(), 0);
    assert_eq!(cart.cached_wishlist().unwrap(), vec![b1]);
}

#[tokio::test]
async fn wishlist_cache_follows_writes_from_other_clients() {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let store = Arc::new(SeaOrmDocumentStore::new(db.clone()));
    let session = Arc::new(SessionService::new(Arc::new(SeaOrmProfileRepository::new(
        db,
    ))));
    let local = Arc::new(MemoryLocalStorage::new());
    let cart = CartManager::new(store.clone(), session.clone()).with_local_storage(local);

    sign_in(&session, "u1");
    cart.sync_session().await.unwrap();
    let b9 = book("b9", None, None);
    store
        .transact("u1", DocumentUpdate::WishlistUnion(b9.clone()))
        .await
        .unwrap();

    let cached = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let cached = cart.cached_wishlist().unwrap();
            if !cached.is_empty() {
                return cached;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("wishlist was never cached");
    assert_eq!(cached, vec![b9]);
}

#[tokio::test]
async fn concurrent_writers_lose_no_updates() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("docs.db").display());
    let db = db::init_db(&url).await.expect("Failed to init DB");
    let store = Arc::new(SeaOrmDocumentStore::new(db));
    let receiver = store.subscribe("u1").await.unwrap();

    let writers: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let id = format!("b{}", i);
                store
                    .transact("u1", DocumentUpdate::WishlistUnion(book(&id, None, None)))
                    .await
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap().unwrap();
    }

    let stored = store.get("u1").await.unwrap().unwrap();
    assert_eq!(stored.wishlist.len(), 20);
    assert_eq!(receiver.borrow().wishlist.len(), 20);
}

#[tokio::test]
async fn failed_write_is_surfaced_and_mirror_kept() {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let real = SeaOrmDocumentStore::new(db.clone());
    real.transact("u1", DocumentUpdate::WishlistUnion(book("b1", None, None)))
        .await
        .unwrap();

    let session = Arc::new(SessionService::new(Arc::new(SeaOrmProfileRepository::new(
        db,
    ))));
    let cart = CartManager::new(Arc::new(ReadOnlyStore { inner: real }), session.clone());
    sign_in(&session, "u1");

    assert!(matches!(
        cart.add_to_wishlist(&book("b2", None, None)).await,
        Err(DomainError::Database(_))
    ));
    assert!(matches!(
        cart.add_to_cart(&book("b2", Some(10.0), None), PurchaseType::Buy)
            .await,
        Err(DomainError::Database(_))
    ));
    assert_eq!(cart.wishlist_count(), 1);
    assert!(cart.is_in_wishlist("b1"));
    assert!(!cart.is_in_wishlist("b2"));
    assert_eq!(cart.cart_count(), 0);
}

#[tokio::test]
async fn late_subscriber_starts_from_stored_document() {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let writer = SeaOrmDocumentStore::new(db.clone());
    writer
        .transact("u1", DocumentUpdate::WishlistUnion(book("b1", None, None)))
        .await
        .unwrap();

    // A second store over the same database has no channel for u1 yet
    let reader = SeaOrmDocumentStore::new(db);
    let receiver = reader.subscribe("u1").await.unwrap();
    assert!(receiver.borrow().in_wishlist("b1"));

    let again = reader.subscribe("u1").await.unwrap();
    reader
        .transact("u1", DocumentUpdate::WishlistUnion(book("b2", None, None)))
        .await
        .unwrap();
    assert_eq!(receiver.borrow().wishlist.len(), 2);
    assert_eq!(again.borrow().wishlist.len(), 2);
}
