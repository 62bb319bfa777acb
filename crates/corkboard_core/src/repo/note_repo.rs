//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Create/read/update/delete corkboard notes.
//! - Delegate tag materialization to the tag resolver inside the same
//!   transaction as the note write.
//!
//! # Invariants
//! - Every write is one `BEGIN IMMEDIATE` transaction; dropping it on an
//!   error path rolls back note rows and freshly created tags together.
//! - Updates only touch fields present in the patch; a present tag list
//!   replaces the whole tag set.
//! - `updated_at` strictly increases across updates of one note.
//! - Deleting a note removes its `note_tag` rows but never its tags.
//! - No ownership checks happen here.

use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::note::{NewNote, Note, NoteDefaults, NoteId, NotePatch};
use crate::model::tag::{normalize_tag_names, Tag};
use crate::model::user::UserId;
use crate::repo::tag_repo::{parse_tag_row, SqliteTagResolver, TagResolver};
use crate::repo::{ensure_connection_ready, is_foreign_key_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    content,
    created_at,
    updated_at,
    x,
    y,
    width,
    height
FROM notes";

/// Repository interface for corkboard notes.
pub trait NoteRepository {
    /// Creates a note owned by `owner_id` and returns it with resolved tags.
    fn create(&mut self, owner_id: UserId, note: &NewNote) -> RepoResult<Note>;
    /// Gets one note by id.
    fn get(&self, note_id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists an owner's notes in insertion (id) order.
    fn list_for_owner(&self, owner_id: UserId) -> RepoResult<Vec<Note>>;
    /// Applies a partial update and returns the stored result.
    fn update(&mut self, note_id: NoteId, patch: &NotePatch) -> RepoResult<Note>;
    /// Deletes a note and returns it as it was before deletion.
    fn delete(&mut self, note_id: NoteId) -> RepoResult<Note>;
    /// Returns every known tag sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
    defaults: NoteDefaults,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["users", "notes", "tags", "note_tag"])?;
        Ok(Self {
            conn,
            defaults: NoteDefaults::default(),
        })
    }

    /// Overrides the size given to notes created without one.
    pub fn with_defaults(mut self, defaults: NoteDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create(&mut self, owner_id: UserId, note: &NewNote) -> RepoResult<Note> {
        let placement = note.placement(self.defaults)?;
        let tag_names = normalize_tag_names(note.tags.as_slice())?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !user_exists(&tx, owner_id)? {
            return Err(RepoError::UserNotFound(owner_id));
        }

        let note_id: NoteId = tx
            .query_row(
                &format!(
                    "INSERT INTO notes (content, created_at, owner_id, x, y, width, height)
                     VALUES (?1, {NOW_EPOCH_MS_SQL}, ?2, ?3, ?4, ?5, ?6)
                     RETURNING id;"
                ),
                params![
                    note.content.as_deref(),
                    owner_id,
                    placement.x,
                    placement.y,
                    placement.width,
                    placement.height,
                ],
                |row| row.get(0),
            )
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::UserNotFound(owner_id)
                } else {
                    err.into()
                }
            })?;

        attach_tags(&tx, note_id, &tag_names)?;
        let created = load_note(&tx, note_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("note {note_id} missing after insert"))
        })?;
        tx.commit()?;
        Ok(created)
    }

    fn get(&self, note_id: NoteId) -> RepoResult<Option<Note>> {
        load_note(&*self.conn, note_id)
    }

    fn list_for_owner(&self, owner_id: UserId) -> RepoResult<Vec<Note>> {
        let conn: &Connection = &*self.conn;
        let mut stmt = conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE owner_id = ?1
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let mut note = parse_note_row(row)?;
            note.tags = load_tags_for_note(conn, note.id)?;
            notes.push(note);
        }
        Ok(notes)
    }

    fn update(&mut self, note_id: NoteId, patch: &NotePatch) -> RepoResult<Note> {
        patch.validate()?;
        let tag_names = patch
            .tags
            .as_deref()
            .map(|names| normalize_tag_names(names))
            .transpose()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            &format!(
                "UPDATE notes
                 SET
                    content = COALESCE(?2, content),
                    x = COALESCE(?3, x),
                    y = COALESCE(?4, y),
                    width = COALESCE(?5, width),
                    height = COALESCE(?6, height),
                    updated_at = MAX({NOW_EPOCH_MS_SQL}, COALESCE(updated_at + 1, created_at))
                 WHERE id = ?1;"
            ),
            params![
                note_id,
                patch.content.as_deref(),
                patch.x,
                patch.y,
                patch.width,
                patch.height,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NoteNotFound(note_id));
        }

        if let Some(names) = tag_names {
            tx.execute("DELETE FROM note_tag WHERE note_id = ?1;", [note_id])?;
            attach_tags(&tx, note_id, &names)?;
        }

        let updated = load_note(&tx, note_id)?.ok_or(RepoError::NoteNotFound(note_id))?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete(&mut self, note_id: NoteId) -> RepoResult<Note> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing = load_note(&tx, note_id)?.ok_or(RepoError::NoteNotFound(note_id))?;
        tx.execute("DELETE FROM notes WHERE id = ?1;", [note_id])?;
        tx.commit()?;
        Ok(existing)
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        SqliteTagResolver::bound(&*self.conn).list_tags()
    }
}

fn attach_tags(conn: &Connection, note_id: NoteId, names: &[String]) -> RepoResult<()> {
    if names.is_empty() {
        return Ok(());
    }

    let tags = SqliteTagResolver::bound(conn).resolve(names)?;
    let mut stmt =
        conn.prepare_cached("INSERT OR IGNORE INTO note_tag (note_id, tag_id) VALUES (?1, ?2);")?;
    for tag in &tags {
        stmt.execute(params![note_id, tag.id])?;
    }
    Ok(())
}

fn load_note(conn: &Connection, note_id: NoteId) -> RepoResult<Option<Note>> {
    let note = conn
        .query_row(
            &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
            [note_id],
            parse_note_row,
        )
        .optional()?;

    match note {
        Some(mut note) => {
            note.tags = load_tags_for_note(conn, note_id)?;
            Ok(Some(note))
        }
        None => Ok(None),
    }
}

fn load_tags_for_note(conn: &Connection, note_id: NoteId) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare_cached(
        "SELECT t.id, t.name
         FROM note_tag nt
         INNER JOIN tags t ON t.id = nt.tag_id
         WHERE nt.note_id = ?1
         ORDER BY t.name ASC, t.id ASC;",
    )?;
    let tags = stmt
        .query_map([note_id], parse_tag_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tags)
}

fn user_exists(conn: &Connection, user_id: UserId) -> RepoResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        x: row.get("x")?,
        y: row.get("y")?,
        width: row.get("width")?,
        height: row.get("height")?,
        tags: Vec::new(),
    })
}
