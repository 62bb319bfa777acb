//! User repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `username` and `email` are unique; violations surface as
//!   `UsernameTaken` / `EmailTaken`, not raw SQLite errors.
//! - Deleting a user cascades to their notes and those notes' tag links.

use crate::model::user::{NewUser, User, UserId};
use crate::repo::{ensure_connection_ready, unique_violation_target, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, username, email, password FROM users";

/// Repository interface for user accounts.
pub trait UserRepository {
    fn create(&self, user: &NewUser) -> RepoResult<User>;
    fn get(&self, user_id: UserId) -> RepoResult<Option<User>>;
    fn get_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn get_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Deletes the user and, by cascade, everything they own.
    fn delete(&self, user_id: UserId) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["users"])?;
        Ok(Self { conn })
    }

    fn find_one(&self, filter: &str, value: &dyn rusqlite::ToSql) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE {filter} = ?1;"),
                [value],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create(&self, user: &NewUser) -> RepoResult<User> {
        let inserted = self.conn.query_row(
            "INSERT INTO users (username, email, password)
             VALUES (?1, ?2, ?3)
             RETURNING id, username, email, password;",
            params![
                user.username.as_str(),
                user.email.as_str(),
                user.password_hash.as_str()
            ],
            parse_user_row,
        );

        inserted.map_err(|err| {
            let conflict = match unique_violation_target(&err) {
                Some("users.username") => Some(RepoError::UsernameTaken(user.username.clone())),
                Some("users.email") => Some(RepoError::EmailTaken(user.email.clone())),
                _ => None,
            };
            conflict.unwrap_or_else(|| err.into())
        })
    }

    fn get(&self, user_id: UserId) -> RepoResult<Option<User>> {
        self.find_one("id", &user_id)
    }

    fn get_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.find_one("username", &username)
    }

    fn get_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.find_one("email", &email)
    }

    fn delete(&self, user_id: UserId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [user_id])?;
        if changed == 0 {
            return Err(RepoError::UserNotFound(user_id));
        }
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        password_hash: row.get("password")?,
    })
}
