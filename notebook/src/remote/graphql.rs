//! Typed GraphQL client for the managed notes API.

use async_trait::async_trait;
use notebook_types::Note;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use super::{NoteService, NoteServiceFactory};
use crate::auth::AuthSession;
use crate::error::{NotebookError, RemoteOp, Result};

// ── Documents ───────────────────────────────────────

pub const LIST_NOTES: &str = "query ListNotes {
  listNotes {
    items {
      id
      note
    }
  }
}";

pub const CREATE_NOTE: &str = "mutation CreateNote($input: CreateNoteInput!) {
  createNote(input: $input) {
    id
    note
  }
}";

pub const UPDATE_NOTE: &str = "mutation UpdateNote($input: UpdateNoteInput!) {
  updateNote(input: $input) {
    id
    note
  }
}";

pub const DELETE_NOTE: &str = "mutation DeleteNote($input: DeleteNoteInput!) {
  deleteNote(input: $input) {
    id
    note
  }
}";

// ── Wire types ──────────────────────────────────────

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
}

/// The schema calls the text field `note`.
#[derive(Debug, Deserialize)]
struct WireNote {
    id: String,
    #[serde(default)]
    note: Option<String>,
}

impl From<WireNote> for Note {
    fn from(w: WireNote) -> Self {
        Note {
            id: w.id,
            text: w.note.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NoteConnection {
    #[serde(default)]
    items: Vec<Option<WireNote>>,
}

/// Pull the root field named after `op` out of a response body.
fn decode<T: DeserializeOwned>(op: RemoteOp, body: &str) -> Result<T> {
    let response: GraphQlResponse = serde_json::from_str(body)
        .map_err(|e| NotebookError::remote(op, format!("Invalid response JSON: {}", e)))?;

    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(NotebookError::remote(op, messages.join("; ")));
    }

    let field = op.to_string();
    let value = response
        .data
        .and_then(|mut data| data.get_mut(&field).map(Value::take))
        .filter(|v| !v.is_null())
        .ok_or_else(|| NotebookError::remote(op, format!("Response has no '{}' data", field)))?;

    serde_json::from_value(value)
        .map_err(|e| NotebookError::remote(op, format!("Unexpected '{}' shape: {}", field, e)))
}

// ── Client impl ─────────────────────────────────────

pub struct GraphQlNoteService {
    endpoint: String,
    id_token: String,
    api_key: Option<String>,
    client: Client,
}

impl GraphQlNoteService {
    pub fn new(endpoint: &str, id_token: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            id_token: id_token.into(),
            api_key,
            client: crate::http::shared_client().clone(),
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        op: RemoteOp,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        log::debug!("[GRAPHQL] {} -> {}", op, self.endpoint);

        let mut req = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.id_token)
            .json(&GraphQlRequest { query, variables });

        if let Some(ref key) = self.api_key {
            req = req.header("x-api-key", key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| NotebookError::remote(op, format!("Request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| NotebookError::remote(op, format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            log::warn!("[GRAPHQL] {} returned HTTP {}", op, status);
            return Err(NotebookError::remote(op, format!("HTTP {}: {}", status, body)));
        }

        decode(op, &body)
    }
}

#[async_trait]
impl NoteService for GraphQlNoteService {
    async fn list(&self) -> Result<Vec<Note>> {
        let connection: NoteConnection = self
            .execute(RemoteOp::List, LIST_NOTES, json!({}))
            .await?;
        Ok(connection
            .items
            .into_iter()
            .flatten()
            .map(Note::from)
            .collect())
    }

    async fn create(&self, text: &str) -> Result<Note> {
        let note: WireNote = self
            .execute(RemoteOp::Create, CREATE_NOTE, json!({ "input": { "note": text } }))
            .await?;
        Ok(note.into())
    }

    async fn update(&self, id: &str, text: &str) -> Result<Note> {
        let note: WireNote = self
            .execute(
                RemoteOp::Update,
                UPDATE_NOTE,
                json!({ "input": { "id": id, "note": text } }),
            )
            .await?;
        Ok(note.into())
    }

    async fn delete(&self, id: &str) -> Result<Note> {
        let note: WireNote = self
            .execute(RemoteOp::Delete, DELETE_NOTE, json!({ "input": { "id": id } }))
            .await?;
        Ok(note.into())
    }
}

/// Endpoint settings shared by every session's client.
#[derive(Debug, Clone)]
pub struct GraphQlEndpoint {
    pub url: String,
    pub api_key: Option<String>,
}

impl NoteServiceFactory for GraphQlEndpoint {
    fn for_session(&self, session: &AuthSession) -> Arc<dyn NoteService> {
        Arc::new(GraphQlNoteService::new(
            &self.url,
            session.id_token.clone(),
            self.api_key.clone(),
        ))
    }
}
