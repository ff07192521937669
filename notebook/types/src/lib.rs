//! Shared types for the notebook service and its RPC clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Domain Types
// =====================================================

/// A unit of persisted text. The id is assigned by the remote service;
/// an empty id means the note has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
}

impl Note {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Only persisted notes take part in id matching.
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Transient form contents: the note being composed or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBuffer {
    /// Empty while composing a new note
    #[serde(default)]
    pub selected_id: String,
    #[serde(default)]
    pub text: String,
}

impl EditBuffer {
    /// Buffer after the user picks an existing note.
    pub fn selecting(note: &Note) -> Self {
        Self {
            selected_id: note.id.clone(),
            text: note.text.clone(),
        }
    }

    /// Buffer after a keystroke replaced the text.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self
        }
    }

    /// Back to "creating new" with empty text.
    pub fn cleared(self) -> Self {
        Self::default()
    }

    pub fn is_creating(&self) -> bool {
        self.selected_id.is_empty()
    }
}

/// Read-only copy of the reconciler state handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub notes: Vec<Note>,
    pub edit_buffer: EditBuffer,
    pub busy: bool,
}

// =====================================================
// RPC Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> RpcResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
