//! In-memory note service for tests.

use async_trait::async_trait;
use notebook_types::Note;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::{NoteService, NoteServiceFactory};
use crate::auth::AuthSession;
use crate::busy::BusyFlag;
use crate::error::{NotebookError, RemoteOp, Result};

#[derive(Default)]
struct FakeState {
    notes: Vec<Note>,
    next_id: u64,
    failing: HashSet<RemoteOp>,
    update_id_override: Option<String>,
    calls: Vec<RemoteOp>,
    busy_seen: Vec<bool>,
}

/// Assigns ids `n1`, `n2`, ... and can fail chosen operations, hold calls
/// open until released, and record the busy flag seen during each call.
#[derive(Default)]
pub(crate) struct FakeNoteService {
    state: Mutex<FakeState>,
    observed: Mutex<Option<BusyFlag>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeNoteService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_notes(notes: Vec<Note>) -> Self {
        let fake = Self::default();
        fake.state.lock().notes = notes;
        fake
    }

    pub(crate) fn observe(&self, flag: BusyFlag) {
        *self.observed.lock() = Some(flag);
    }

    pub(crate) fn fail(&self, op: RemoteOp) {
        self.state.lock().failing.insert(op);
    }

    pub(crate) fn recover(&self, op: RemoteOp) {
        self.state.lock().failing.remove(&op);
    }

    /// Make the update response carry a different id than requested.
    pub(crate) fn rewrite_update_id(&self, id: &str) {
        self.state.lock().update_id_override = Some(id.to_string());
    }

    /// Every following call waits for a matching `release()`.
    pub(crate) fn hold(&self) {
        *self.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    pub(crate) fn release(&self) {
        if let Some(gate) = self.gate.lock().as_ref() {
            gate.add_permits(1);
        }
    }

    pub(crate) fn calls(&self) -> Vec<RemoteOp> {
        self.state.lock().calls.clone()
    }

    pub(crate) fn busy_seen(&self) -> Vec<bool> {
        self.state.lock().busy_seen.clone()
    }

    pub(crate) fn stored(&self) -> Vec<Note> {
        self.state.lock().notes.clone()
    }

    async fn enter(&self, op: RemoteOp) -> Result<()> {
        let busy = self.observed.lock().as_ref().map(BusyFlag::is_busy);
        {
            let mut state = self.state.lock();
            state.calls.push(op);
            if let Some(b) = busy {
                state.busy_seen.push(b);
            }
        }

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        if self.state.lock().failing.contains(&op) {
            return Err(NotebookError::remote(op, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl NoteService for FakeNoteService {
    async fn list(&self) -> Result<Vec<Note>> {
        self.enter(RemoteOp::List).await?;
        Ok(self.state.lock().notes.clone())
    }

    async fn create(&self, text: &str) -> Result<Note> {
        self.enter(RemoteOp::Create).await?;
        let mut state = self.state.lock();
        state.next_id += 1;
        let note = Note::new(format!("n{}", state.next_id), text);
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn update(&self, id: &str, text: &str) -> Result<Note> {
        self.enter(RemoteOp::Update).await?;
        let mut state = self.state.lock();
        let stored = state
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NotebookError::remote(RemoteOp::Update, "note not found"))?;
        stored.text = text.to_string();
        let mut note = stored.clone();
        if let Some(ref other) = state.update_id_override {
            note.id = other.clone();
        }
        Ok(note)
    }

    async fn delete(&self, id: &str) -> Result<Note> {
        self.enter(RemoteOp::Delete).await?;
        let mut state = self.state.lock();
        let index = state
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| NotebookError::remote(RemoteOp::Delete, "note not found"))?;
        Ok(state.notes.remove(index))
    }
}

/// Hands every session the same fake.
pub(crate) struct SharedFake(pub(crate) Arc<FakeNoteService>);

impl NoteServiceFactory for SharedFake {
    fn for_session(&self, _session: &AuthSession) -> Arc<dyn NoteService> {
        self.0.clone()
    }
}
