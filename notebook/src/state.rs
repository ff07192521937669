//! Local note list and its pure reconciliation steps.
//!
//! Each step consumes the current list and returns the next one, so the
//! reconciler only ever swaps a whole value in.

use notebook_types::Note;

use crate::error::NotebookError;

/// Ordered notes; insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListState {
    notes: Vec<Note>,
}

impl NoteListState {
    /// List as returned by a full listing, in server order.
    pub fn from_listing(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Exact id match; the empty id never matches.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.position(id).map(|i| &self.notes[i])
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|n| n.is_persisted() && n.id == id)
    }

    /// Append a freshly created record at the end.
    pub fn with_created(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    /// Replace the element carrying `note.id` in place.
    ///
    /// If no element matches, the list is handed back untouched inside the
    /// error so the caller can keep it.
    pub fn with_updated(mut self, note: Note) -> std::result::Result<Self, (Self, NotebookError)> {
        match self.position(&note.id) {
            Some(index) => {
                self.notes[index] = note;
                Ok(self)
            }
            None => {
                let err = NotebookError::Inconsistent { id: note.id };
                Err((self, err))
            }
        }
    }

    /// Drop every element whose id equals `id`. Absent ids are a no-op.
    pub fn with_deleted(mut self, id: &str) -> Self {
        self.notes.retain(|n| n.id != id);
        self
    }
}
