//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        pagination::PageRequest,
        user::{RegisterUser, Role, UpdateUser, User, UserClaims, UserQuery, UserShort},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate user by email and return a JWT token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!(user_id = %user.user_id, "User logged in");
        Ok((token, user))
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.user_id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Register a new user account with the `user` role
    pub async fn register(&self, data: RegisterUser) -> AppResult<User> {
        data.validate()?;
        self.create_with_role(data, Role::User).await
    }

    async fn create_with_role(&self, data: RegisterUser, role: Role) -> AppResult<User> {
        let email = data.email.trim().to_lowercase();
        if self.repository.users.email_exists(&email, None).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let user = User {
            user_id: Uuid::new_v4(),
            name: data.name.trim().to_string(),
            email,
            password: self.hash_password(&data.password)?,
            phone: data.phone,
            address: data.address,
            role,
            created_at: Utc::now(),
            updated_at: None,
        };

        let created = self.repository.users.create(&user).await?;
        tracing::info!(user_id = %created.user_id, role = %created.role, "User registered");
        Ok(created)
    }

    /// Create the configured admin account if its email is still free
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        let (Some(email), Some(password)) = (
            self.config.bootstrap_admin_email.as_ref(),
            self.config.bootstrap_admin_password.as_ref(),
        ) else {
            return Ok(());
        };

        if self.repository.users.email_exists(email, None).await? {
            tracing::debug!(%email, "Bootstrap admin already exists");
            return Ok(());
        }

        let data = RegisterUser {
            name: "Administrator".to_string(),
            email: email.clone(),
            password: password.clone(),
            phone: None,
            address: None,
        };
        data.validate()?;
        self.create_with_role(data, Role::Admin).await?;
        tracing::info!(%email, "Bootstrap admin created");
        Ok(())
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Search users
    pub async fn search_users(&self, query: &UserQuery) -> AppResult<(Vec<UserShort>, i64, PageRequest)> {
        self.repository.users.search(query).await
    }

    /// Update an existing user
    pub async fn update_user(&self, id: Uuid, data: UpdateUser) -> AppResult<User> {
        data.validate()?;
        let mut user = self.repository.users.get_by_id(id).await?;

        if let Some(ref email) = data.email {
            if self.repository.users.email_exists(email.trim(), Some(id)).await? {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
        }

        let password_hash = match data.password {
            Some(ref password) => Some(self.hash_password(password)?),
            None => None,
        };
        data.apply_to(&mut user, password_hash);

        self.repository.users.update(&user).await
    }

    /// Change the role of a user
    pub async fn update_role(&self, id: Uuid, role: Role) -> AppResult<User> {
        let user = self.repository.users.update_role(id, role).await?;
        tracing::info!(user_id = %id, role = %role, "User role changed");
        Ok(user)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.repository.users.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
