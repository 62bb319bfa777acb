//! Core domain logic for the corkboard notes backend.
//! This crate is the single source of truth for note ownership, tagging and
//! partial-update invariants.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{Argon2Hasher, CredentialError, CredentialHasher};
pub use config::{ConfigError, CoreConfig};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::note::{NewNote, Note, NoteDefaults, NoteId, NotePatch, Placement};
pub use model::tag::{Tag, TagId};
pub use model::user::{NewUser, User, UserId};
pub use model::ValidationError;
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::tag_repo::{SqliteTagResolver, TagResolver};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::note_service::NoteService;
pub use service::ownership::ensure_owner;
pub use service::user_service::UserService;
pub use service::{ErrorKind, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
