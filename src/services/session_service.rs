//! Session Service - the single identity abstraction
//!
//! Every consumer (cart, wishlist, donation forms, HTTP handlers) resolves
//! the signed-in user through here.

use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::{CurrentUser, DomainError, NewProfile, Profile, ProfileRepository};
use crate::domain::validation::{is_blank, is_valid_email};
use crate::infrastructure::auth;

pub const MIN_PASSWORD_LEN: usize = 6;

/// A signed-in user together with the bearer token issued for them
#[derive(Debug, Clone)]
pub struct Session {
    pub user: CurrentUser,
    pub token: String,
}

/// Create an account. Shared by [`SessionService::sign_up`] and the
/// registration endpoint.
pub async fn register(
    profiles: &dyn ProfileRepository,
    email: &str,
    password: &str,
    display_name: &str,
) -> Result<Profile, DomainError> {
    if !is_valid_email(email) {
        return Err(DomainError::Validation("A valid email is required".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    let display_name = if is_blank(display_name) {
        email.split('@').next().unwrap_or_default().to_string()
    } else {
        display_name.trim().to_string()
    };

    let password_hash = auth::hash_password(password).map_err(DomainError::Internal)?;
    profiles
        .create(NewProfile {
            email: email.to_string(),
            display_name,
            password_hash,
        })
        .await
}

/// Check credentials. Unknown emails and wrong passwords are reported the same way.
pub async fn authenticate(
    profiles: &dyn ProfileRepository,
    email: &str,
    password: &str,
) -> Result<Profile, DomainError> {
    let profile = profiles
        .find_by_email(email)
        .await?
        .ok_or(DomainError::InvalidCredentials)?;

    let valid =
        auth::verify_password(password, &profile.password_hash).map_err(DomainError::Internal)?;
    if !valid {
        return Err(DomainError::InvalidCredentials);
    }
    Ok(profile)
}

fn issue(user: CurrentUser) -> Result<Session, DomainError> {
    let token = auth::create_jwt(&user).map_err(DomainError::Internal)?;
    Ok(Session { user, token })
}

pub struct SessionService {
    profiles: Arc<dyn ProfileRepository>,
    current: watch::Sender<Option<CurrentUser>>,
}

impl SessionService {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        let (current, _) = watch::channel(None);
        Self { profiles, current }
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, DomainError> {
        let profile = register(self.profiles.as_ref(), email, password, display_name).await?;
        tracing::info!("Account created for {}", profile.email);
        self.start(CurrentUser::from(&profile))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let profile = authenticate(self.profiles.as_ref(), email, password).await?;
        self.start(CurrentUser::from(&profile))
    }

    /// Resume a session from a previously issued token.
    pub fn restore(&self, token: &str) -> Result<CurrentUser, DomainError> {
        let claims = auth::decode_jwt(token).map_err(|_| DomainError::AuthenticationRequired)?;
        let user = CurrentUser::from(claims);
        self.current.send_replace(Some(user.clone()));
        Ok(user)
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.current.send_replace(None) {
            tracing::info!("Signed out {}", user.email);
        }
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.current.borrow().clone()
    }

    /// Receiver that changes whenever a user signs in or out
    pub fn on_change(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.current.subscribe()
    }

    fn start(&self, user: CurrentUser) -> Result<Session, DomainError> {
        let session = issue(user)?;
        self.current.send_replace(Some(session.user.clone()));
        tracing::debug!("Session started for {}", session.user.email);
        Ok(session)
    }
}
