//! Tag resolver: turns tag names into persisted tag rows.
//!
//! # Responsibility
//! - Materialize tags with one atomic get-or-create statement per name.
//! - Run on whatever connection or transaction the caller holds, so new
//!   tag rows commit or roll back together with the note write they serve.
//!
//! # Invariants
//! - Never inserts two rows for one name (UNIQUE on `tags.name` plus
//!   `ON CONFLICT` upsert).
//! - Duplicate names in one batch resolve to a single tag.
//! - Never deletes tags, even when no note references them anymore.

use crate::model::tag::{normalize_tag_name, normalize_tag_names, Tag};
use crate::repo::{ensure_connection_ready, unique_violation_target, RepoError, RepoResult};
use log::warn;
use rusqlite::{Connection, OptionalExtension, Row};

/// Upper bound for get-or-create attempts on one name.
pub const TAG_RESOLVE_MAX_ATTEMPTS: u32 = 3;

const TAG_UPSERT_SQL: &str = "INSERT INTO tags (name)
     VALUES (?1)
     ON CONFLICT(name) DO UPDATE SET name = excluded.name
     RETURNING id, name;";

/// Resolves tag names to tag identities.
pub trait TagResolver {
    /// Returns one tag per distinct normalized name, in first-seen order,
    /// creating rows that do not exist yet.
    fn resolve(&self, names: &[String]) -> RepoResult<Vec<Tag>>;
    /// Exact-name lookup after trimming.
    fn get_by_name(&self, name: &str) -> RepoResult<Option<Tag>>;
    /// All tags sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
}

/// SQLite tag resolver bound to a connection or an open transaction.
pub struct SqliteTagResolver<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagResolver<'conn> {
    /// Constructs a resolver from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["tags", "note_tag"])?;
        Ok(Self { conn })
    }

    /// Binds to a connection the caller already verified, e.g. a transaction
    /// opened by a repository.
    pub(crate) fn bound(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Runs the upsert for one name.
    ///
    /// A UNIQUE violation means some other index rejected the row; the
    /// exact-name row is re-fetched after each one. When that row never
    /// shows up within `TAG_RESOLVE_MAX_ATTEMPTS`, the name is reported as
    /// `TagConflict`.
    fn get_or_create(&self, name: &str) -> RepoResult<Tag> {
        for attempt in 1..=TAG_RESOLVE_MAX_ATTEMPTS {
            match self.conn.query_row(TAG_UPSERT_SQL, [name], parse_tag_row) {
                Ok(tag) => return Ok(tag),
                Err(err) if unique_violation_target(&err).is_some() => {
                    warn!(
                        "event=tag_resolve module=repo status=retry attempt={attempt} max_attempts={TAG_RESOLVE_MAX_ATTEMPTS}"
                    );
                    if let Some(tag) = self.find_exact(name)? {
                        return Ok(tag);
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(RepoError::TagConflict(name.to_string()))
    }

    fn find_exact(&self, name: &str) -> RepoResult<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                "SELECT id, name FROM tags WHERE name = ?1;",
                [name],
                parse_tag_row,
            )
            .optional()?;
        Ok(tag)
    }
}

impl TagResolver for SqliteTagResolver<'_> {
    fn resolve(&self, names: &[String]) -> RepoResult<Vec<Tag>> {
        let normalized = normalize_tag_names(names)?;
        normalized
            .iter()
            .map(|name| self.get_or_create(name))
            .collect()
    }

    fn get_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        let normalized = normalize_tag_name(name)?;
        self.find_exact(&normalized)
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tags ORDER BY name ASC, id ASC;")?;
        let tags = stmt
            .query_map([], parse_tag_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tags)
    }
}

pub(crate) fn parse_tag_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
