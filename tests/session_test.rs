use std::sync::Arc;

use bookshare::db;
use bookshare::domain::DomainError;
use bookshare::infrastructure::SeaOrmProfileRepository;
use bookshare::services::SessionService;

async fn setup() -> SessionService {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    SessionService::new(Arc::new(SeaOrmProfileRepository::new(db)))
}

#[tokio::test]
async fn sign_up_sign_out_sign_in() {
    let session = setup().await;
    let mut changes = session.on_change();

    let created = session
        .sign_up("Asha@Example.org", "secret-pass", "Asha")
        .await
        .unwrap();
    assert_eq!(created.user.email, "asha@example.org");
    assert!(!created.token.is_empty());
    assert!(changes.has_changed().unwrap());
    assert_eq!(
        changes.borrow_and_update().as_ref().map(|u| u.id.clone()),
        Some(created.user.id.clone())
    );

    session.sign_out();
    assert!(session.current_user().is_none());

    let again = session
        .sign_in("asha@example.org", "secret-pass")
        .await
        .unwrap();
    assert_eq!(again.user.id, created.user.id);
    assert_eq!(session.current_user(), Some(again.user.clone()));

    // The issued token resumes the same user
    session.sign_out();
    let restored = session.restore(&again.token).unwrap();
    assert_eq!(restored.id, created.user.id);
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let session = setup().await;
    session
        .sign_up("ravi@example.org", "correct-horse", "")
        .await
        .unwrap();
    session.sign_out();

    assert!(matches!(
        session.sign_in("ravi@example.org", "wrong-horse").await,
        Err(DomainError::InvalidCredentials)
    ));
    assert!(matches!(
        session.sign_in("nobody@example.org", "correct-horse").await,
        Err(DomainError::InvalidCredentials)
    ));
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn duplicate_and_invalid_sign_ups() {
    let session = setup().await;
    let first = session
        .sign_up("meera@example.org", "123456", "")
        .await
        .unwrap();
    assert_eq!(first.user.display_name, "meera");

    assert!(matches!(
        session.sign_up("MEERA@example.org", "abcdef", "Meera").await,
        Err(DomainError::Conflict(_))
    ));
    assert!(matches!(
        session.sign_up("not-an-email", "abcdef", "x").await,
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        session.sign_up("short@example.org", "12345", "x").await,
        Err(DomainError::Validation(_))
    ));
    assert!(session.restore("garbage").is_err());
}
