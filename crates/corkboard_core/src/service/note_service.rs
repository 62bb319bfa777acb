//! Note use-case service.
//!
//! # Responsibility
//! - Scope every note operation to the authenticated caller.
//! - Run the ownership guard before reads and mutations of a single note.
//! - Emit metadata-only logging events (ids and counts, never content).
//!
//! # Invariants
//! - `update_note`/`delete_note` on a foreign note fail with
//!   `NoteNotFound` and leave the note untouched.
//! - `list_notes` only ever returns the caller's notes.
//! - The ownership check runs before, not inside, the repository write
//!   transaction. `owner_id` is immutable, so the only interleaving is a
//!   concurrent delete, which the write reports as `NoteNotFound` anyway.

use crate::model::note::{NewNote, Note, NoteId, NotePatch};
use crate::model::tag::Tag;
use crate::model::user::UserId;
use crate::repo::note_repo::NoteRepository;
use crate::service::ownership::owned_note;
use crate::service::ServiceResult;
use log::info;

/// Note service facade over a repository implementation.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a note owned by `caller`.
    pub fn create_note(&mut self, caller: UserId, note: &NewNote) -> ServiceResult<Note> {
        let created = self.repo.create(caller, note)?;
        info!(
            "event=note_create module=service status=ok note_id={} owner_id={caller} tag_count={}",
            created.id,
            created.tags.len()
        );
        Ok(created)
    }

    /// Gets one of the caller's notes.
    pub fn get_note(&self, caller: UserId, note_id: NoteId) -> ServiceResult<Note> {
        owned_note(&self.repo, caller, note_id)
    }

    /// Lists the caller's notes in creation order.
    pub fn list_notes(&self, caller: UserId) -> ServiceResult<Vec<Note>> {
        Ok(self.repo.list_for_owner(caller)?)
    }

    /// Applies a partial update to one of the caller's notes.
    pub fn update_note(
        &mut self,
        caller: UserId,
        note_id: NoteId,
        patch: &NotePatch,
    ) -> ServiceResult<Note> {
        owned_note(&self.repo, caller, note_id)?;
        let updated = self.repo.update(note_id, patch)?;
        info!(
            "event=note_update module=service status=ok note_id={note_id} owner_id={caller} empty_patch={} tags_replaced={}",
            patch.is_empty(),
            patch.tags.is_some()
        );
        Ok(updated)
    }

    /// Deletes one of the caller's notes and returns it.
    pub fn delete_note(&mut self, caller: UserId, note_id: NoteId) -> ServiceResult<Note> {
        owned_note(&self.repo, caller, note_id)?;
        let deleted = self.repo.delete(note_id)?;
        info!("event=note_delete module=service status=ok note_id={note_id} owner_id={caller}");
        Ok(deleted)
    }

    /// Lists the shared tag namespace.
    pub fn list_tags(&self) -> ServiceResult<Vec<Tag>> {
        Ok(self.repo.list_tags()?)
    }
}
