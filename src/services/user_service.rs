use chrono::Utc;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::ServiceError;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::{Role, SessionUser};
use crate::config::AppConfig;
use crate::database::models::{NewUser, PublicUser, User, UserUpdate};
use crate::database::DictionaryStore;
use crate::dictionary::validate::FieldErrors;

pub const MIN_PASSWORD_CHARS: usize = 8;

/// Staff accounts: login checks and role-bounded management
pub struct UserService {
    store: Arc<dyn DictionaryStore>,
    config: Arc<AppConfig>,
    // Hash checked for unknown logins so they cost as much as known ones
    decoy_hash: Arc<OnceCell<String>>,
}

impl UserService {
    pub fn new(store: Arc<dyn DictionaryStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config, decoy_hash: Arc::default() }
    }

    /// Shares a decoy hash across service instances so it is built once per process.
    pub fn with_decoy(mut self, decoy_hash: Arc<OnceCell<String>>) -> Self {
        self.decoy_hash = decoy_hash;
        self
    }

    /// Every failure looks the same to the caller, in answer and in time.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<User, ServiceError> {
        let Some(user) = self.store.user_by_login(login).await? else {
            verify_password(password, self.decoy_hash()?);
            warn!("Login failed for '{}': unknown user", login.trim());
            return Err(ServiceError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash) {
            warn!("Login failed for '{}': wrong password", user.username);
            return Err(ServiceError::InvalidCredentials);
        }
        if !user.active {
            warn!("Login failed for '{}': account inactive", user.username);
            return Err(ServiceError::InvalidCredentials);
        }
        info!("{} logged in as {}", user.username, user.role);
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, ServiceError> {
        let mut users: Vec<PublicUser> = self.store.users().await?.iter().map(PublicUser::from).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    pub async fn create_user(&self, manager: &SessionUser, input: NewUser) -> Result<PublicUser, ServiceError> {
        if !manager.role.can_manage_users() || !manager.role.can_manage_role(input.role) {
            return Err(ServiceError::Forbidden(format!("Role {} cannot create {} accounts", manager.role, input.role)));
        }
        let user = self.register(input).await?;
        info!("{} created account {} ({})", manager.username, user.username, user.role);
        Ok(user)
    }

    pub async fn update_user(&self, manager: &SessionUser, id: Uuid, update: UserUpdate) -> Result<PublicUser, ServiceError> {
        if !manager.role.can_manage_users() {
            return Err(ServiceError::Forbidden("You cannot manage users".to_string()));
        }
        let mut user = self
            .store
            .user(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {}", id)))?;

        if user.id == manager.id {
            if update.active == Some(false) {
                return Err(ServiceError::Forbidden("You cannot deactivate your own account".to_string()));
            }
            if update.role.is_some_and(|role| role != user.role) {
                return Err(ServiceError::Forbidden("You cannot change your own role".to_string()));
            }
        } else if !manager.role.can_manage_role(user.role) {
            return Err(ServiceError::Forbidden(format!("Role {} cannot manage {} accounts", manager.role, user.role)));
        }

        if let Some(role) = update.role.filter(|role| *role != user.role) {
            if !manager.role.can_manage_role(role) {
                return Err(ServiceError::Forbidden(format!("Role {} cannot grant {}", manager.role, role)));
            }
            user.role = role;
        }
        if let Some(active) = update.active {
            user.active = active;
        }
        if let Some(password) = update.password {
            let mut errors = FieldErrors::new();
            validate_password(&password, &mut errors);
            if !errors.is_empty() {
                return Err(ServiceError::Validation { message: "Invalid user".to_string(), field_errors: errors });
            }
            user.password_hash = hash_password(&password, self.config.session.password_cost)?;
        }

        let user = self.store.update_user(user).await?;
        info!("{} updated account {}", manager.username, user.username);
        Ok(PublicUser::from(&user))
    }

    fn decoy_hash(&self) -> Result<&str, ServiceError> {
        let hash = self
            .decoy_hash
            .get_or_try_init(|| hash_password("duech-decoy-password", self.config.session.password_cost))?;
        Ok(hash.as_str())
    }

    /// Creates the first account. Used by the CLI before anyone can log in.
    pub async fn bootstrap_superadmin(&self, username: &str, email: &str, password: &str) -> Result<PublicUser, ServiceError> {
        self.register(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::Superadmin,
        })
        .await
    }

    /// Validates and stores an account without a manager check.
    pub async fn register(&self, input: NewUser) -> Result<PublicUser, ServiceError> {
        let username = input.username.trim().to_lowercase();
        let email = input.email.trim().to_string();

        let mut errors = FieldErrors::new();
        validate_username(&username, &mut errors);
        if !email.contains('@') {
            errors.insert("email".to_string(), "Email must contain '@'".to_string());
        }
        validate_password(&input.password, &mut errors);
        if !errors.is_empty() {
            return Err(ServiceError::Validation { message: "Invalid user".to_string(), field_errors: errors });
        }

        let user = User {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash: hash_password(&input.password, self.config.session.password_cost)?,
            role: input.role,
            active: true,
            created_at: Utc::now(),
        };
        let user = self.store.insert_user(user).await?;
        Ok(PublicUser::from(&user))
    }
}

fn validate_username(username: &str, errors: &mut FieldErrors) {
    let length = username.chars().count();
    if !(3..=32).contains(&length) {
        errors.insert("username".to_string(), "Username must be 3 to 32 characters".to_string());
    } else if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-'))
    {
        errors.insert(
            "username".to_string(),
            "Username may only contain a-z, 0-9, '_', '.' and '-'".to_string(),
        );
    }
}

fn validate_password(password: &str, errors: &mut FieldErrors) {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        errors.insert(
            "password".to_string(),
            format!("Password must be at least {} characters", MIN_PASSWORD_CHARS),
        );
    }
}
