//! Account use cases: registration, login and profile management.

use crate::auth::jwt::TokenService;
use crate::auth::password::PasswordHasher;
use crate::db::UserRepository;
use crate::types::{AppError, Identity, Result, User};
use std::sync::Arc;
use uuid::Uuid;

/// A successful login: the bearer token and the account it was issued for.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let username = username.trim().to_string();
        let email = normalize_email(email);
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput("Invalid user data".to_string()));
        }

        if self.users.exists_by_username(&username).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        if self.users.exists_by_email(&email).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = self
            .hasher
            .hash_blocking(password.to_string())
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let user = User::new(Uuid::new_v4().to_string(), username, email, password_hash);
        self.users.create_user(&user).await?;

        tracing::info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    /// Checks credentials and issues a token whose display name is the
    /// username. Unknown email and wrong password are indistinguishable.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let invalid = || AppError::Unauthenticated("Invalid credentials".to_string());
        let email = normalize_email(email);

        let user = self
            .users
            .get_user_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        if !self
            .hasher
            .verify_blocking(password.to_string(), user.password_hash.clone())
            .await
        {
            tracing::debug!(user_id = %user.id, "password mismatch on login");
            return Err(invalid());
        }

        let token = self
            .tokens
            .issue(&user.id, &user.username)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(LoginOutcome { token, user })
    }

    pub async fn get_profile(&self, identity: &Identity) -> Result<User> {
        self.users
            .get_user_by_id(&identity.subject_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(
        &self,
        identity: &Identity,
        username: &str,
        email: &str,
    ) -> Result<User> {
        let username = username.trim().to_string();
        let email = normalize_email(email);
        if username.is_empty() || email.is_empty() {
            return Err(AppError::InvalidInput("Invalid user data".to_string()));
        }

        let mut user = self.get_profile(identity).await?;

        if username != user.username && self.users.exists_by_username(&username).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        if email != user.email && self.users.exists_by_email(&email).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        user.update_profile(username, email);
        self.users.update_user(&user).await?;

        Ok(user)
    }

    pub async fn update_password(
        &self,
        identity: &Identity,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(AppError::InvalidInput("Invalid password data".to_string()));
        }

        let mut user = self.get_profile(identity).await?;

        if !self
            .hasher
            .verify_blocking(current_password.to_string(), user.password_hash.clone())
            .await
        {
            return Err(AppError::Unauthenticated(
                "Current password is incorrect".to_string(),
            ));
        }

        let password_hash = self
            .hasher
            .hash_blocking(new_password.to_string())
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        user.update_password(password_hash);
        self.users.update_user(&user).await?;

        tracing::info!(user_id = %user.id, "password changed");
        Ok(())
    }
}
