//! Note list reconciler: keeps the local note list in step with the
//! acknowledgements of the remote note service.
//!
//! Every remote call runs under the busy flag. A second operation issued
//! while a call is in flight is rejected with `NotebookError::Busy`, never
//! queued. The view lock is never held across an `.await`.

use notebook_types::{EditBuffer, Note, ViewSnapshot};
use parking_lot::Mutex;
use std::mem;
use std::sync::Arc;

use crate::busy::{BusyFlag, BusyGuard};
use crate::error::{NotebookError, Result};
use crate::remote::NoteService;
use crate::state::NoteListState;

#[derive(Debug, Default)]
struct View {
    notes: NoteListState,
    buffer: EditBuffer,
}

pub struct Reconciler {
    service: Arc<dyn NoteService>,
    view: Mutex<View>,
    busy: BusyFlag,
}

impl Reconciler {
    pub fn new(service: Arc<dyn NoteService>) -> Self {
        Self {
            service,
            view: Mutex::new(View::default()),
            busy: BusyFlag::new(),
        }
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let view = self.view.lock();
        ViewSnapshot {
            notes: view.notes.notes().to_vec(),
            edit_buffer: view.buffer.clone(),
            busy: self.busy.is_busy(),
        }
    }

    /// Look up a note in the local list by exact id.
    pub fn note(&self, id: &str) -> Option<Note> {
        self.view.lock().notes.get(id).cloned()
    }

    /// True when the edit buffer's selected id is present in the local list.
    /// This is the only thing that decides between create and update.
    pub fn has_existing_note(&self) -> bool {
        let view = self.view.lock();
        view.notes.contains(&view.buffer.selected_id)
    }

    fn begin(&self) -> Result<BusyGuard> {
        self.busy.try_acquire().ok_or(NotebookError::Busy)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.busy.is_busy() {
            return Err(NotebookError::Busy);
        }
        Ok(())
    }

    /// Replace the local list with the full remote listing, in server order.
    pub async fn initialize(&self) -> Result<()> {
        let _guard = self.begin()?;
        log::info!("[NOTES] Loading note list");

        match self.service.list().await {
            Ok(notes) => {
                log::info!("[NOTES] Loaded {} notes", notes.len());
                self.view.lock().notes = NoteListState::from_listing(notes);
                Ok(())
            }
            Err(e) => {
                log::error!("[NOTES] Failed to load notes: {}", e);
                Err(e)
            }
        }
    }

    /// Create a new note, or update the selected one if it is still listed.
    pub async fn submit(&self, text: &str) -> Result<()> {
        if text.is_empty() {
            log::warn!("[NOTES] Ignoring empty submission");
            return Err(NotebookError::EmptyNote);
        }

        let guard = self.begin()?;

        let (selected_id, existing) = {
            let mut view = self.view.lock();
            view.buffer = mem::take(&mut view.buffer).with_text(text);
            let existing = view.notes.contains(&view.buffer.selected_id);
            (view.buffer.selected_id.clone(), existing)
        };

        if existing {
            return self.update_with(guard, selected_id, text.to_string()).await;
        }

        let created = self.service.create(text).await.inspect_err(|e| {
            log::error!("[NOTES] Create failed: {}", e);
        })?;

        log::info!("[NOTES] Created note {}", created.id);
        let mut view = self.view.lock();
        view.notes = mem::take(&mut view.notes).with_created(created);
        view.buffer = mem::take(&mut view.buffer).cleared();
        drop(view);
        drop(guard);
        Ok(())
    }

    /// Send the edit buffer as an update of the selected note.
    pub async fn update(&self) -> Result<()> {
        let guard = self.begin()?;
        let (id, text) = {
            let view = self.view.lock();
            (view.buffer.selected_id.clone(), view.buffer.text.clone())
        };
        self.update_with(guard, id, text).await
    }

    async fn update_with(&self, guard: BusyGuard, id: String, text: String) -> Result<()> {
        let updated = self.service.update(&id, &text).await.inspect_err(|e| {
            log::error!("[NOTES] Update of {} failed: {}", id, e);
        })?;

        let mut view = self.view.lock();
        let result = match mem::take(&mut view.notes).with_updated(updated) {
            Ok(next) => {
                view.notes = next;
                view.buffer = mem::take(&mut view.buffer).cleared();
                log::info!("[NOTES] Updated note {}", id);
                Ok(())
            }
            Err((kept, err)) => {
                view.notes = kept;
                log::error!("[NOTES] {}", err);
                Err(err)
            }
        };
        drop(view);
        drop(guard);
        result
    }

    /// Delete a note; the element matching the acknowledged id is dropped.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let _guard = self.begin()?;

        let deleted = self.service.delete(id).await.inspect_err(|e| {
            log::error!("[NOTES] Delete of {} failed: {}", id, e);
        })?;

        let mut view = self.view.lock();
        view.notes = mem::take(&mut view.notes).with_deleted(&deleted.id);
        log::info!("[NOTES] Deleted note {}", deleted.id);
        Ok(())
    }

    /// Load an existing note into the edit buffer.
    pub fn select(&self, note: &Note) -> Result<()> {
        self.ensure_idle()?;
        self.view.lock().buffer = EditBuffer::selecting(note);
        Ok(())
    }

    /// A keystroke in the note input.
    pub fn edit_text(&self, text: &str) -> Result<()> {
        self.ensure_idle()?;
        let mut view = self.view.lock();
        view.buffer = mem::take(&mut view.buffer).with_text(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteOp;
    use crate::remote::fake::FakeNoteService;

    fn reconciler_with(notes: Vec<Note>) -> (Arc<FakeNoteService>, Arc<Reconciler>) {
        let fake = Arc::new(FakeNoteService::with_notes(notes));
        let reconciler = Arc::new(Reconciler::new(fake.clone()));
        fake.observe(reconciler.busy_flag());
        (fake, reconciler)
    }

    fn texts(r: &Reconciler) -> Vec<String> {
        r.snapshot().notes.into_iter().map(|n| n.text).collect()
    }

    #[tokio::test]
    async fn test_initialize_keeps_server_order() {
        let (_fake, r) = reconciler_with(vec![
            Note::new("b", "second"),
            Note::new("a", "first"),
        ]);
        r.initialize().await.unwrap();
        assert_eq!(texts(&r), vec!["second", "first"]);
        assert!(!r.is_busy());
    }

    #[tokio::test]
    async fn test_initialize_failure_leaves_list_empty_and_clears_busy() {
        let (fake, r) = reconciler_with(vec![Note::new("1", "x")]);
        fake.fail(RemoteOp::List);
        let err = r.initialize().await.unwrap_err();
        assert!(matches!(err, NotebookError::Remote { op: RemoteOp::List, .. }));
        assert!(r.snapshot().notes.is_empty());
        assert!(!r.is_busy());
    }

    #[tokio::test]
    async fn test_creates_append_in_issuance_order() {
        let (fake, r) = reconciler_with(vec![]);
        r.initialize().await.unwrap();
        for text in ["one", "two", "three"] {
            r.submit(text).await.unwrap();
        }
        assert_eq!(texts(&r), vec!["one", "two", "three"]);
        let ids: Vec<String> = r.snapshot().notes.into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["n1", "n2", "n3"]);
        assert_eq!(fake.stored().len(), 3);
        assert_eq!(r.snapshot().edit_buffer, EditBuffer::default());
    }

    #[tokio::test]
    async fn test_empty_submit_makes_no_call() {
        let (fake, r) = reconciler_with(vec![Note::new("1", "keep")]);
        r.initialize().await.unwrap();
        let before = r.snapshot();

        let err = r.submit("").await.unwrap_err();
        assert!(matches!(err, NotebookError::EmptyNote));
        assert_eq!(fake.calls(), vec![RemoteOp::List]);
        assert_eq!(r.snapshot(), before);
    }

    #[tokio::test]
    async fn test_select_then_submit_updates_in_place() {
        let (fake, r) = reconciler_with(vec![Note::new("1", "Hello Duc")]);
        r.initialize().await.unwrap();

        let note = r.note("1").unwrap();
        r.select(&note).unwrap();
        assert_eq!(
            r.snapshot().edit_buffer,
            EditBuffer {
                selected_id: "1".to_string(),
                text: "Hello Duc".to_string()
            }
        );
        assert!(r.has_existing_note());

        r.submit("Hello Duc!").await.unwrap();
        assert_eq!(r.snapshot().notes, vec![Note::new("1", "Hello Duc!")]);
        assert_eq!(r.snapshot().edit_buffer, EditBuffer::default());
        assert_eq!(fake.calls(), vec![RemoteOp::List, RemoteOp::Update]);
    }

    #[tokio::test]
    async fn test_update_preserves_other_positions() {
        let (_fake, r) = reconciler_with(vec![
            Note::new("1", "a"),
            Note::new("2", "b"),
            Note::new("3", "c"),
        ]);
        r.initialize().await.unwrap();

        r.select(&Note::new("2", "b")).unwrap();
        r.edit_text("B").unwrap();
        r.update().await.unwrap();

        assert_eq!(
            r.snapshot().notes,
            vec![Note::new("1", "a"), Note::new("2", "B"), Note::new("3", "c")]
        );
    }

    #[tokio::test]
    async fn test_stale_selection_falls_back_to_create() {
        let (fake, r) = reconciler_with(vec![Note::new("1", "a")]);
        r.initialize().await.unwrap();
        r.select(&Note::new("gone", "old")).unwrap();
        assert!(!r.has_existing_note());

        r.submit("fresh").await.unwrap();
        assert_eq!(fake.calls(), vec![RemoteOp::List, RemoteOp::Create]);
        assert_eq!(texts(&r), vec!["a", "fresh"]);
        assert!(r.snapshot().edit_buffer.is_creating());
    }

    #[tokio::test]
    async fn test_update_with_unknown_response_id_is_surfaced() {
        let (fake, r) = reconciler_with(vec![Note::new("1", "a"), Note::new("2", "b")]);
        r.initialize().await.unwrap();
        fake.rewrite_update_id("ghost");

        r.select(&Note::new("1", "a")).unwrap();
        let err = r.submit("changed").await.unwrap_err();

        assert!(matches!(err, NotebookError::Inconsistent { ref id } if id == "ghost"));
        assert_eq!(r.snapshot().notes, vec![Note::new("1", "a"), Note::new("2", "b")]);
        assert_eq!(r.snapshot().edit_buffer.selected_id, "1");
        assert_eq!(r.snapshot().edit_buffer.text, "changed");
        assert!(!r.is_busy());
    }

    #[tokio::test]
    async fn test_remove_drops_exactly_one() {
        let (_fake, r) = reconciler_with(vec![
            Note::new("1", "a"),
            Note::new("2", "b"),
            Note::new("3", "c"),
        ]);
        r.initialize().await.unwrap();
        r.remove("2").await.unwrap();
        assert_eq!(texts(&r), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_remove_of_id_missing_locally_is_noop() {
        let (fake, r) = reconciler_with(vec![Note::new("1", "a")]);
        r.initialize().await.unwrap();

        // Another client creates a note this list never saw
        let other = Reconciler::new(fake.clone());
        other.submit("from elsewhere").await.unwrap();

        r.remove("n1").await.unwrap();
        assert_eq!(r.snapshot().notes, vec![Note::new("1", "a")]);
        assert_eq!(fake.stored(), vec![Note::new("1", "a")]);
    }

    #[tokio::test]
    async fn test_remove_leaves_edit_buffer_alone() {
        let (_fake, r) = reconciler_with(vec![Note::new("1", "a"), Note::new("2", "b")]);
        r.initialize().await.unwrap();
        r.select(&Note::new("1", "a")).unwrap();
        r.remove("2").await.unwrap();
        assert_eq!(r.snapshot().edit_buffer.selected_id, "1");
    }

    #[tokio::test]
    async fn test_select_is_idempotent() {
        let (_fake, r) = reconciler_with(vec![]);
        let note = Note::new("1", "Hello Duc");
        r.select(&note).unwrap();
        let first = r.snapshot().edit_buffer;
        r.select(&note).unwrap();
        assert_eq!(r.snapshot().edit_buffer, first);
    }

    #[tokio::test]
    async fn test_failures_clear_busy_and_keep_list() {
        let (fake, r) = reconciler_with(vec![Note::new("1", "a")]);
        r.initialize().await.unwrap();
        fake.fail(RemoteOp::Create);
        fake.fail(RemoteOp::Update);
        fake.fail(RemoteOp::Delete);

        assert!(r.submit("new").await.is_err());
        assert!(!r.is_busy());

        r.select(&Note::new("1", "a")).unwrap();
        assert!(r.submit("edit").await.is_err());
        assert!(!r.is_busy());

        assert!(r.remove("1").await.is_err());
        assert!(!r.is_busy());

        assert_eq!(r.snapshot().notes, vec![Note::new("1", "a")]);

        fake.recover(RemoteOp::Update);
        r.submit("edit").await.unwrap();
        assert_eq!(r.snapshot().notes, vec![Note::new("1", "edit")]);
    }

    #[tokio::test]
    async fn test_busy_is_set_during_every_remote_call() {
        let (fake, r) = reconciler_with(vec![Note::new("1", "a")]);

        r.initialize().await.unwrap();
        assert!(!r.is_busy());
        r.submit("b").await.unwrap();
        assert!(!r.is_busy());
        r.select(&Note::new("1", "a")).unwrap();
        r.submit("a2").await.unwrap();
        assert!(!r.is_busy());
        r.remove("1").await.unwrap();
        assert!(!r.is_busy());

        assert_eq!(
            fake.calls(),
            vec![RemoteOp::List, RemoteOp::Create, RemoteOp::Update, RemoteOp::Delete]
        );
        assert_eq!(fake.busy_seen(), vec![true, true, true, true]);
    }

    #[tokio::test]
    async fn test_operations_rejected_while_call_in_flight() {
        let (fake, r) = reconciler_with(vec![Note::new("1", "a")]);
        r.initialize().await.unwrap();
        fake.hold();

        let task = tokio::spawn({
            let r = r.clone();
            async move { r.submit("pending").await }
        });

        while fake.calls().len() < 2 {
            tokio::task::yield_now().await;
        }
        assert!(r.is_busy());
        assert!(r.snapshot().busy);

        assert!(matches!(r.submit("other").await, Err(NotebookError::Busy)));
        assert!(matches!(r.update().await, Err(NotebookError::Busy)));
        assert!(matches!(r.remove("1").await, Err(NotebookError::Busy)));
        assert!(matches!(r.initialize().await, Err(NotebookError::Busy)));
        assert!(matches!(r.select(&Note::new("1", "a")), Err(NotebookError::Busy)));
        assert!(matches!(r.edit_text("x"), Err(NotebookError::Busy)));

        fake.release();
        task.await.unwrap().unwrap();

        assert!(!r.is_busy());
        assert_eq!(fake.calls(), vec![RemoteOp::List, RemoteOp::Create]);
        assert_eq!(texts(&r), vec!["a", "pending"]);
    }

    #[tokio::test]
    async fn test_dropped_call_clears_busy() {
        let (fake, r) = reconciler_with(vec![]);
        fake.hold();

        let task = tokio::spawn({
            let r = r.clone();
            async move { r.initialize().await }
        });
        while fake.calls().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(r.is_busy());

        task.abort();
        let _ = task.await;
        assert!(!r.is_busy());
    }
}
