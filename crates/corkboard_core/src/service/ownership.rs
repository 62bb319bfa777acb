//! Ownership guard shared by every note use case.
//!
//! A caller that does not own a note gets the same `NoteNotFound` as a
//! caller asking for an id that never existed.

use crate::model::note::{Note, NoteId};
use crate::model::user::UserId;
use crate::repo::note_repo::NoteRepository;
use crate::service::{ServiceError, ServiceResult};
use log::debug;

/// Passes `note` through when `caller` owns it.
pub fn ensure_owner(caller: UserId, note: Note) -> ServiceResult<Note> {
    if note.is_owned_by(caller) {
        Ok(note)
    } else {
        debug!(
            "event=ownership_check module=service status=denied note_id={} caller_id={caller}",
            note.id
        );
        Err(ServiceError::NoteNotFound(note.id))
    }
}

/// Loads a note and applies [`ensure_owner`].
pub fn owned_note<R: NoteRepository + ?Sized>(
    repo: &R,
    caller: UserId,
    note_id: NoteId,
) -> ServiceResult<Note> {
    let note = repo
        .get(note_id)?
        .ok_or(ServiceError::NoteNotFound(note_id))?;
    ensure_owner(caller, note)
}
