use std::sync::Arc;

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::accounts::{
    dto::{LoginRequest, PublicUser, SignupRequest},
    errors::AccountError,
    password::PasswordHasher,
    repo::{StoreError, UniqueField, UserStore},
    repo_types::NewUser,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Signup, login and listing on top of a [`UserStore`].
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn signup(&self, req: SignupRequest) -> Result<PublicUser, AccountError> {
        let username = req.username.trim().to_string();
        let email = req.email.trim().to_string();

        if username.is_empty() {
            return Err(AccountError::Validation("Username must not be empty".into()));
        }
        if !is_valid_email(&email) {
            return Err(AccountError::Validation("Invalid email".into()));
        }
        if req.password.is_empty() {
            return Err(AccountError::Validation("Password must not be empty".into()));
        }

        if self.store.find_by_email(&email).await?.is_some() {
            warn!("signup attempt with existing email");
            return Err(AccountError::DuplicateEmail);
        }

        let password_hash = self.hash(req.password).await?;

        // The pre-check above is advisory; the store's constraints decide races.
        let user = match self
            .store
            .insert(NewUser {
                username,
                email: email.clone(),
                password_hash,
            })
            .await
        {
            Ok(u) => u,
            Err(StoreError::UniqueViolation(UniqueField::Email)) => {
                warn!("concurrent signup won the email");
                return Err(AccountError::DuplicateEmail);
            }
            Err(StoreError::UniqueViolation(UniqueField::Username)) => {
                if self.store.find_by_email(&email).await?.is_some() {
                    return Err(AccountError::DuplicateEmail);
                }
                warn!("signup attempt with existing username");
                return Err(AccountError::DuplicateUsername);
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = user.id, created_at = %user.created_at, "user registered");
        Ok(user.into())
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<PublicUser, AccountError> {
        let email = req.email.trim();

        let Some(user) = self.store.find_by_email(email).await? else {
            warn!("login unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        if !self.verify(req.password, user.password_hash.clone()).await? {
            warn!(user_id = user.id, "login invalid password");
            return Err(AccountError::InvalidCredentials);
        }

        // No session or token is issued; the caller only learns who this is.
        info!(user_id = user.id, "user logged in");
        Ok(user.into())
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, AccountError> {
        let users = self.store.list().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    async fn hash(&self, plain: String) -> Result<String, AccountError> {
        let hasher = Arc::clone(&self.hasher);
        let digest = tokio::task::spawn_blocking(move || hasher.hash(&plain))
            .await
            .context("password hash task")??;
        Ok(digest)
    }

    async fn verify(&self, plain: String, digest: String) -> Result<bool, AccountError> {
        let hasher = Arc::clone(&self.hasher);
        let ok = tokio::task::spawn_blocking(move || hasher.verify(&plain, &digest))
            .await
            .context("password verify task")??;
        Ok(ok)
    }
}
