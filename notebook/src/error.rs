use std::fmt;

use thiserror::Error;

/// The four calls the remote note service accepts. `Display` yields the
/// GraphQL root field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for RemoteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoteOp::List => "listNotes",
            RemoteOp::Create => "createNote",
            RemoteOp::Update => "updateNote",
            RemoteOp::Delete => "deleteNote",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum NotebookError {
    /// Submitted text was empty; nothing was sent.
    #[error("Note empty!")]
    EmptyNote,

    /// Another remote call is still in flight.
    #[error("A request is already in progress")]
    Busy,

    #[error("{op} failed: {message}")]
    Remote { op: RemoteOp, message: String },

    /// The server acknowledged an update for a note the local list does not hold.
    #[error("Updated note '{id}' is not in the local list")]
    Inconsistent { id: String },

    #[error("Sign-in failed: {0}")]
    Auth(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl NotebookError {
    pub fn remote(op: RemoteOp, message: impl Into<String>) -> Self {
        NotebookError::Remote {
            op,
            message: message.into(),
        }
    }

    /// Errors the user caused and can fix by changing their input.
    pub fn is_user_error(&self) -> bool {
        matches!(self, NotebookError::EmptyNote | NotebookError::Busy)
    }
}

pub type Result<T> = std::result::Result<T, NotebookError>;
