//! Registration and authentication use cases.
//!
//! # Invariants
//! - Plaintext passwords only exist for the duration of one call.
//! - Authentication failures do not reveal whether the username exists.
//! - Email is checked for duplicates before username, and both are backed
//!   by storage UNIQUE constraints for concurrent registrations.

use crate::auth::CredentialHasher;
use crate::model::user::{
    validate_email, validate_password, validate_username, NewUser, User, UserId,
};
use crate::repo::user_repo::UserRepository;
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};

/// User service facade over a repository and a credential hasher.
pub struct UserService<R: UserRepository, H: CredentialHasher> {
    repo: R,
    hasher: H,
}

impl<R: UserRepository, H: CredentialHasher> UserService<R, H> {
    pub fn new(repo: R, hasher: H) -> Self {
        Self { repo, hasher }
    }

    /// Validates input, rejects duplicates and stores a hashed password.
    pub fn register(&self, username: &str, email: &str, password: &str) -> ServiceResult<User> {
        let username = validate_username(username)?;
        let email = validate_email(email)?;
        validate_password(password)?;

        if self.repo.get_by_email(&email)?.is_some() {
            return Err(ServiceError::EmailTaken(email));
        }
        if self.repo.get_by_username(&username)?.is_some() {
            return Err(ServiceError::UsernameTaken(username));
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self.repo.create(&NewUser {
            username,
            email,
            password_hash,
        })?;
        info!(
            "event=user_register module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Returns the user when `password` matches the stored hash.
    pub fn authenticate(&self, username: &str, password: &str) -> ServiceResult<User> {
        let Some(user) = self.repo.get_by_username(username.trim())? else {
            warn!("event=user_login module=service status=denied reason=unknown_user");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!(
                "event=user_login module=service status=denied reason=bad_password user_id={}",
                user.id
            );
            return Err(ServiceError::InvalidCredentials);
        }

        info!(
            "event=user_login module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    pub fn get_user(&self, user_id: UserId) -> ServiceResult<User> {
        self.repo
            .get(user_id)?
            .ok_or(ServiceError::UserNotFound(user_id))
    }

    /// Deletes the account together with all of its notes.
    pub fn delete_user(&self, user_id: UserId) -> ServiceResult<()> {
        self.repo.delete(user_id)?;
        info!("event=user_delete module=service status=ok user_id={user_id}");
        Ok(())
    }
}
