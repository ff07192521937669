//! Remote note service boundary.
//!
//! The service owns persistence and id assignment; this crate only sends
//! requests and applies the returned records.

use async_trait::async_trait;
use notebook_types::Note;
use std::sync::Arc;

use crate::auth::AuthSession;
use crate::error::Result;

pub mod graphql;

#[cfg(test)]
pub(crate) mod fake;

pub use graphql::{GraphQlEndpoint, GraphQlNoteService};

#[async_trait]
pub trait NoteService: Send + Sync {
    /// Full listing, in server order
    async fn list(&self) -> Result<Vec<Note>>;

    /// Persist a new note; the returned record carries the assigned id
    async fn create(&self, text: &str) -> Result<Note>;

    async fn update(&self, id: &str, text: &str) -> Result<Note>;

    /// Returns the deleted record so the caller can confirm its id
    async fn delete(&self, id: &str) -> Result<Note>;
}

/// Builds a note service bound to one signed-in user.
pub trait NoteServiceFactory: Send + Sync {
    fn for_session(&self, session: &AuthSession) -> Arc<dyn NoteService>;
}
