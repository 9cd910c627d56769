//! Core types shared between the UI and the backend client.
//!
//! Wire types mirror the backend's JSON field names exactly
//! (`isLoggedIn`, `session_name`, ...), so everything that crosses
//! the network carries serde rename attributes where needed.

use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;

/// Login/session state for the current app run.
///
/// Populated once at startup by the login-status check and mutated
/// only by the login, logout, and delete-account flows. Never
/// persisted; a fresh launch starts logged out until the check
/// completes.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub is_logged_in: bool,
    pub username: String,
    /// Active session name reported by the backend, if any.
    pub session_name: Option<String>,
}

impl SessionState {
    /// Label shown next to the username in the account dropdown.
    pub fn session_label(&self) -> String {
        match &self.session_name {
            Some(name) => format!("Session: {}", name),
            None => "No active session found".to_string(),
        }
    }
}

/// Message the user is composing: pending text plus an optional
/// validated attachment. Cleared after every send attempt.
#[derive(Debug, Default)]
pub struct PendingMessage {
    pub text: String,
    pub file: Option<Attachment>,
}

impl PendingMessage {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.file.is_none()
    }

    /// Reset the attachment only. The text input is cleared
    /// separately, at echo time.
    pub fn reset_file(&mut self) {
        self.file = None;
    }
}

/// Whether a chat entry came from the user or the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// Lightweight reference to an attachment for rendering a chat
/// entry. Images keep their decoded pixels for an inline preview;
/// everything else renders its file name only.
#[derive(Debug, Clone)]
pub enum AttachmentRef {
    Image {
        file_name: String,
        /// RGBA8 pixels, for upload into a UI texture.
        rgba: Vec<u8>,
        width: usize,
        height: usize,
    },
    File { file_name: String },
}

impl AttachmentRef {
    pub fn file_name(&self) -> &str {
        match self {
            AttachmentRef::Image { file_name, .. } => file_name,
            AttachmentRef::File { file_name } => file_name,
        }
    }
}

/// One entry in the visible chat log. Append-only; not persisted
/// client-side.
#[derive(Debug, Clone)]
pub struct ChatEntry {
    pub direction: Direction,
    pub content: String,
    pub attachment: Option<AttachmentRef>,
    /// Display timestamp, already formatted.
    pub timestamp: String,
}

impl ChatEntry {
    pub fn outgoing(content: impl Into<String>, attachment: Option<AttachmentRef>) -> Self {
        Self {
            direction: Direction::Outgoing,
            content: content.into(),
            attachment,
            timestamp: now_display(),
        }
    }

    pub fn incoming(content: impl Into<String>) -> Self {
        Self {
            direction: Direction::Incoming,
            content: content.into(),
            attachment: None,
            timestamp: now_display(),
        }
    }
}

fn now_display() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Response from `GET /check_login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginStatus {
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "sessionname", default)]
    pub session_name: Option<String>,
}

impl LoginStatus {
    pub fn into_session_state(self) -> SessionState {
        SessionState {
            is_logged_in: self.is_logged_in,
            username: self.username,
            session_name: self.session_name,
        }
    }
}

/// Response from `POST /process`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessReply {
    #[serde(default)]
    pub response: Option<String>,
}

/// One record from `GET /get_chat_history`. Read-only on the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub session_name: Option<String>,
    pub message: String,
    pub response: String,
    pub timestamp: String,
}

impl HistoryRecord {
    /// Session label for display; the backend can return null names.
    pub fn session_label(&self) -> &str {
        self.session_name
            .as_deref()
            .unwrap_or("No session name available")
    }
}

/// Envelope for `GET /get_chat_history`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    #[serde(default)]
    pub chat_history: Vec<HistoryRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope for `DELETE /clear_chat_history` and
/// `DELETE /delete_account`.
#[derive(Debug, Clone, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
