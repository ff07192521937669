//! Notebook: a note list kept in step with a managed GraphQL notes API,
//! behind a sign-in gate.

use std::sync::Arc;

pub mod auth;
pub mod busy;
pub mod config;
pub mod controllers;
pub mod error;
pub mod http;
pub mod reconciler;
pub mod remote;
pub mod render;
pub mod state;

use auth::{IdentityProvider, SessionRegistry};
use remote::NoteServiceFactory;

pub use error::{NotebookError, Result};
pub use reconciler::Reconciler;

pub struct AppState {
    /// Identity gate every session passes before its notes are loaded
    pub identity: Arc<dyn IdentityProvider>,
    /// Builds each signed-in user's note service
    pub notes: Arc<dyn NoteServiceFactory>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(identity: Arc<dyn IdentityProvider>, notes: Arc<dyn NoteServiceFactory>) -> Self {
        Self {
            identity,
            notes,
            sessions: SessionRegistry::new(),
        }
    }
}
