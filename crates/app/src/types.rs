//! Core types for Chat Desk.
//!
//! `AppState` owns every piece of mutable UI state: the login
//! session, the message being composed, the visible chat log, the
//! history panel, and the report uploader. All network work happens
//! on background threads (see `state.rs`); results come back over
//! mpsc channels polled once per frame. Nothing here blocks the
//! rendering thread.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

use services::config::load_settings_or_default;
use services::{BackendClient, ClientSettings};
use shared::attachment::Attachment;
use shared::sessions::unique_session_names;
use shared::timers::{
    Debouncer, HoverGrace, SimulatedProgress, DROPDOWN_HIDE_GRACE, HISTORY_TOGGLE_DEBOUNCE,
};
use shared::types::{
    AckResponse, AttachmentRef, ChatEntry, HistoryRecord, HistoryResponse, LoginStatus,
    PendingMessage, ProcessReply, SessionState,
};

use crate::state::{
    run_clear_history, run_delete_account, run_export_history, run_generate_report,
    run_load_history, run_login_check, run_logout, run_send_message,
};

/// How long the login prompt waits before reappearing.
pub const LOGIN_PROMPT_INTERVAL: Duration = Duration::from_secs(5);

/// How long the finished progress bar stays at 100 before cleanup.
const REPORT_CLEANUP_LINGER: Duration = Duration::from_millis(600);

/// Result from the background login-status check
#[derive(Debug)]
pub struct LoginStatusResult {
    pub outcome: Result<LoginStatus, String>,
}

/// Result from a background logout call
#[derive(Debug)]
pub struct LogoutResult {
    pub outcome: Result<(), String>,
}

/// Result from a background account deletion
#[derive(Debug)]
pub struct DeleteAccountResult {
    pub outcome: Result<AckResponse, String>,
}

/// Result from a background chat send
#[derive(Debug)]
pub struct SendResult {
    pub outcome: Result<ProcessReply, String>,
}

/// Result from a background history fetch, tagged with the session
/// filter it was issued with (None = full history)
#[derive(Debug)]
pub struct HistoryResult {
    pub filter: Option<String>,
    pub outcome: Result<HistoryResponse, String>,
}

/// Result from a background session delete
#[derive(Debug)]
pub struct ClearHistoryResult {
    pub session_name: String,
    pub outcome: Result<AckResponse, String>,
}

/// Result from a background history export (raw blob)
#[derive(Debug)]
pub struct ExportResult {
    pub outcome: Result<Vec<u8>, String>,
}

/// Result from a background report generation (raw blob)
#[derive(Debug)]
pub struct ReportResult {
    pub outcome: Result<Vec<u8>, String>,
}

/// A destructive action waiting for the user's explicit yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteAccount,
    DeleteSession(String),
}

impl ConfirmAction {
    pub fn prompt(&self) -> String {
        match self {
            ConfirmAction::DeleteAccount => {
                "Are you sure you want to delete your account? This action cannot be undone."
                    .to_string()
            }
            ConfirmAction::DeleteSession(name) => {
                format!("Are you sure you want to delete session: {}?", name)
            }
        }
    }
}

/// Main application state
pub struct AppState {
    pub settings: ClientSettings,
    pub client: BackendClient,

    // Session
    pub session: SessionState,
    /// Whether the initial login-status check has completed.
    pub login_checked: bool,
    pub show_login_overlay: bool,
    /// When the login prompt should reappear (cleared on dismiss).
    pub login_prompt_at: Option<Instant>,

    // Composer + chat log
    pub pending: PendingMessage,
    pub composer_preview: Option<AttachmentRef>,
    pub composer_texture: Option<egui::TextureHandle>,
    pub chat_entries: Vec<ChatEntry>,
    /// Textures for inline image attachments, keyed by entry index.
    pub chat_textures: HashMap<usize, egui::TextureHandle>,
    pub send_in_flight: bool,
    /// Rendered row count of the composer last frame, for the
    /// single-line vs multi-line frame shape.
    pub composer_rows: usize,

    // History panel
    pub history_open: bool,
    pub history_toggle: Debouncer,
    /// Set when the toggle button was clicked this frame, so the
    /// click-outside close does not swallow the toggle itself.
    pub history_button_clicked: bool,
    pub history_records: Vec<HistoryRecord>,
    pub session_names: Vec<String>,
    pub selected_session: Option<String>,

    // Report uploader
    pub report_file: Option<Attachment>,
    pub report_file_label: String,
    pub report_progress: SimulatedProgress,
    pub report_in_flight: bool,
    report_cleanup_at: Option<Instant>,

    // Chrome
    pub dropdown: HoverGrace,
    pub notice: Option<String>,
    pub confirm: Option<ConfirmAction>,

    // Background result channels
    pub login_rx: Option<Receiver<LoginStatusResult>>,
    pub logout_rx: Option<Receiver<LogoutResult>>,
    pub delete_account_rx: Option<Receiver<DeleteAccountResult>>,
    pub send_rx: Option<Receiver<SendResult>>,
    pub history_rx: Option<Receiver<HistoryResult>>,
    pub clear_rx: Option<Receiver<ClearHistoryResult>>,
    pub export_rx: Option<Receiver<ExportResult>>,
    pub report_rx: Option<Receiver<ReportResult>>,
}

impl Default for AppState {
    fn default() -> Self {
        let settings = load_settings_or_default();
        let client = BackendClient::new(settings.base_url.clone());
        Self {
            settings,
            client,
            session: SessionState::default(),
            login_checked: false,
            show_login_overlay: false,
            login_prompt_at: None,
            pending: PendingMessage::default(),
            composer_preview: None,
            composer_texture: None,
            chat_entries: Vec::new(),
            chat_textures: HashMap::new(),
            send_in_flight: false,
            composer_rows: 1,
            history_open: false,
            history_toggle: Debouncer::new(HISTORY_TOGGLE_DEBOUNCE),
            history_button_clicked: false,
            history_records: Vec::new(),
            session_names: Vec::new(),
            selected_session: None,
            report_file: None,
            report_file_label: "No file chosen".to_string(),
            report_progress: SimulatedProgress::new(),
            report_in_flight: false,
            report_cleanup_at: None,
            dropdown: HoverGrace::new(DROPDOWN_HIDE_GRACE),
            notice: None,
            confirm: None,
            login_rx: None,
            logout_rx: None,
            delete_account_rx: None,
            send_rx: None,
            history_rx: None,
            clear_rx: None,
            export_rx: None,
            report_rx: None,
        }
    }
}

impl AppState {
    // ----- session state -----

    /// Kick off the startup login-status check. The one network
    /// call allowed while logged out.
    pub fn request_login_check(&mut self) {
        let (tx, rx) = channel();
        self.login_rx = Some(rx);
        let client = self.client.clone();
        std::thread::spawn(move || run_login_check(client, tx));
    }

    pub fn poll_login_status(&mut self, now: Instant) {
        let Some(rx) = &self.login_rx else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.login_rx = None;
        self.login_checked = true;

        match result.outcome {
            Ok(status) => {
                self.session = status.into_session_state();
                if self.session.is_logged_in {
                    self.show_login_overlay = false;
                    self.login_prompt_at = None;
                    self.notice = Some(format!("Welcome, {}!", self.session.username));
                    // Populate the history panel and session selector.
                    self.load_history(None);
                } else {
                    self.schedule_login_prompt(now);
                }
            }
            Err(e) => {
                // Leave the state as logged out.
                tracing::error!("Error fetching login status: {}", e);
            }
        }
    }

    fn schedule_login_prompt(&mut self, now: Instant) {
        self.show_login_overlay = true;
        self.login_prompt_at = Some(now + LOGIN_PROMPT_INTERVAL);
    }

    /// Hide the login overlay and stop it from reappearing.
    pub fn dismiss_login_overlay(&mut self) {
        self.show_login_overlay = false;
        self.login_prompt_at = None;
    }

    pub fn logout(&mut self) {
        let (tx, rx) = channel();
        self.logout_rx = Some(rx);
        let client = self.client.clone();
        std::thread::spawn(move || run_logout(client, tx));
    }

    pub fn poll_logout(&mut self) {
        let Some(rx) = &self.logout_rx else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.logout_rx = None;

        match result.outcome {
            Ok(()) => {
                self.notice = Some("You have been logged out.".to_string());
                self.reset_to_logged_out();
            }
            Err(e) => {
                tracing::error!("Logout error: {}", e);
                self.notice = Some("An error occurred while logging out.".to_string());
            }
        }
    }

    pub fn request_delete_account(&mut self) {
        self.confirm = Some(ConfirmAction::DeleteAccount);
    }

    fn delete_account(&mut self) {
        let (tx, rx) = channel();
        self.delete_account_rx = Some(rx);
        let client = self.client.clone();
        std::thread::spawn(move || run_delete_account(client, tx));
    }

    pub fn poll_delete_account(&mut self) {
        let Some(rx) = &self.delete_account_rx else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.delete_account_rx = None;

        match result.outcome {
            Ok(ack) if ack.success => {
                self.notice = Some("Your account has been deleted.".to_string());
                self.reset_to_logged_out();
            }
            Ok(_) => {
                self.notice = Some("Failed to delete your account.".to_string());
            }
            Err(e) => {
                tracing::error!("Error deleting account: {}", e);
                self.notice =
                    Some("An error occurred while trying to delete your account.".to_string());
            }
        }
    }

    /// Local equivalent of the browser's navigation back to the
    /// root page: drop the session and return to logged-out chrome.
    fn reset_to_logged_out(&mut self) {
        self.session = SessionState::default();
        self.dropdown.dismiss();
        self.history_open = false;
        self.history_records.clear();
        self.session_names.clear();
        self.selected_session = None;
    }

    // ----- composer + chat -----

    /// Validate and attach a file to the pending message. Runs
    /// regardless of login state; only the send is gated.
    pub fn attach_file(&mut self, path: &std::path::Path) {
        match Attachment::from_path(path) {
            Ok(att) => {
                self.composer_preview = Some(preview_ref(&att));
                self.composer_texture = None;
                self.pending.file = Some(att);
            }
            Err(e) => {
                tracing::warn!("rejected attachment {}: {}", path.display(), e);
                self.notice = Some(e.to_string());
            }
        }
    }

    pub fn reset_attachment(&mut self) {
        self.pending.reset_file();
        self.composer_preview = None;
        self.composer_texture = None;
    }

    /// Send the composed message: optimistic local echo, then the
    /// backend call in the background. No-op when there is nothing
    /// to send.
    pub fn send_message(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if !self.session.is_logged_in {
            if self.pending.file.is_some() {
                self.notice = Some("You must be logged in to upload a file.".to_string());
            }
            self.show_login_overlay = true;
            return;
        }

        let text = self.pending.text.trim().to_string();
        let attachment = self.pending.file.clone();
        let echo_ref = self.composer_preview.clone();

        self.chat_entries.push(ChatEntry::outgoing(text.clone(), echo_ref));
        self.pending.text.clear();

        let (tx, rx) = channel();
        self.send_rx = Some(rx);
        self.send_in_flight = true;
        let client = self.client.clone();
        std::thread::spawn(move || run_send_message(client, text, attachment, tx));
    }

    pub fn poll_send_result(&mut self) {
        let Some(rx) = &self.send_rx else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.send_rx = None;
        self.send_in_flight = false;

        match result.outcome {
            Ok(reply) => match reply.response.filter(|r| !r.is_empty()) {
                Some(response) => self.chat_entries.push(ChatEntry::incoming(response)),
                None => self
                    .chat_entries
                    .push(ChatEntry::incoming("No response from GPT")),
            },
            Err(e) => {
                tracing::error!("API Error: {}", e);
                self.chat_entries.push(ChatEntry::incoming(
                    "Sorry, there was an error processing your request.",
                ));
            }
        }
        // Attachment state is reset after every exchange.
        self.reset_attachment();
    }

    // ----- history panel -----

    /// Debounced open/close request from the toggle button.
    pub fn request_history_toggle(&mut self, now: Instant) {
        self.history_button_clicked = true;
        self.history_toggle.trigger(now);
    }

    pub fn close_history(&mut self) {
        self.history_open = false;
        self.history_toggle.cancel();
    }

    /// Fetch history, optionally scoped to one session. No-op while
    /// logged out.
    pub fn load_history(&mut self, filter: Option<String>) {
        if !self.session.is_logged_in {
            return;
        }
        let (tx, rx) = channel();
        self.history_rx = Some(rx);
        let client = self.client.clone();
        std::thread::spawn(move || run_load_history(client, filter, tx));
    }

    pub fn poll_history(&mut self) {
        let Some(rx) = &self.history_rx else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.history_rx = None;

        match result.outcome {
            Ok(resp) if resp.success => {
                if result.filter.is_none() {
                    // A full listing also refreshes the selector.
                    self.session_names = unique_session_names(&resp.chat_history);
                    if let Some(selected) = &self.selected_session {
                        if !self.session_names.contains(selected) {
                            self.selected_session = None;
                        }
                    }
                }
                self.history_records = resp.chat_history;
            }
            Ok(resp) => {
                tracing::error!(
                    "Failed to load chat history: {}",
                    resp.message.as_deref().unwrap_or("unknown error")
                );
            }
            Err(e) => {
                tracing::error!("Error loading chat history: {}", e);
            }
        }
    }

    pub fn filter_history(&mut self) {
        let Some(name) = self.selected_session.clone() else {
            self.notice = Some("Please select a session name to filter.".to_string());
            return;
        };
        self.load_history(Some(name));
    }

    pub fn request_delete_session(&mut self) {
        let Some(name) = self.selected_session.clone() else {
            self.notice = Some("Please select a session name to clear.".to_string());
            return;
        };
        self.confirm = Some(ConfirmAction::DeleteSession(name));
    }

    fn clear_session(&mut self, session_name: String) {
        let (tx, rx) = channel();
        self.clear_rx = Some(rx);
        let client = self.client.clone();
        std::thread::spawn(move || run_clear_history(client, session_name, tx));
    }

    pub fn poll_clear_history(&mut self) {
        let Some(rx) = &self.clear_rx else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.clear_rx = None;

        match result.outcome {
            Ok(ack) if ack.success => {
                self.notice = Some(format!(
                    "Chat history for session '{}' has been cleared.",
                    result.session_name
                ));
                // Refresh both the session selector and the list.
                self.load_history(None);
            }
            Ok(ack) => {
                self.notice = Some(format!(
                    "Failed to delete session: {}",
                    ack.message.as_deref().unwrap_or("unknown error")
                ));
            }
            Err(e) => {
                tracing::error!("Error deleting session: {}", e);
                self.notice = Some("An error occurred while deleting session.".to_string());
            }
        }
    }

    pub fn export_history(&mut self) {
        if !self.session.is_logged_in {
            return;
        }
        let Some(name) = self.selected_session.clone() else {
            self.notice = Some("Please select a session name to export.".to_string());
            return;
        };
        let (tx, rx) = channel();
        self.export_rx = Some(rx);
        let client = self.client.clone();
        std::thread::spawn(move || run_export_history(client, name, tx));
    }

    pub fn poll_export(&mut self) {
        let Some(rx) = &self.export_rx else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.export_rx = None;

        match result.outcome {
            Ok(bytes) => {
                let dir = self.settings.resolve_download_dir();
                match services::download::save_download(&dir, "chat_history.json", &bytes) {
                    Ok(path) => {
                        self.notice = Some(format!("Exported chat history to {}", path.display()));
                    }
                    Err(e) => tracing::error!("Error exporting chat history: {}", e),
                }
            }
            Err(e) => tracing::error!("Error exporting chat history: {}", e),
        }
    }

    // ----- report uploader -----

    /// A picked report file kicks off generation immediately.
    pub fn pick_report_file(&mut self, path: &std::path::Path, now: Instant) {
        match Attachment::from_path(path) {
            Ok(att) => {
                self.report_file_label = att.file_name.clone();
                self.report_file = Some(att);
                self.generate_report(now);
            }
            Err(e) => {
                tracing::warn!("rejected report file {}: {}", path.display(), e);
                self.notice = Some(e.to_string());
            }
        }
    }

    pub fn generate_report(&mut self, now: Instant) {
        if !self.session.is_logged_in {
            self.notice = Some("You must be logged in to generate a report.".to_string());
            self.show_login_overlay = true;
            return;
        }
        let Some(file) = self.report_file.clone() else {
            self.notice = Some("Please select a file to generate the report.".to_string());
            return;
        };

        self.report_progress.start(now);
        let (tx, rx) = channel();
        self.report_rx = Some(rx);
        self.report_in_flight = true;
        let client = self.client.clone();
        std::thread::spawn(move || run_generate_report(client, file, tx));
    }

    pub fn poll_report(&mut self, now: Instant) {
        let Some(rx) = &self.report_rx else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.report_rx = None;
        self.report_in_flight = false;

        // Response arrived: snap to 100 whatever the outcome.
        self.report_progress.complete();

        match result.outcome {
            Ok(bytes) => {
                let dir = self.settings.resolve_download_dir();
                match services::download::save_download(&dir, "report.txt", &bytes) {
                    Ok(path) => {
                        self.notice = Some(format!("Report saved to {}", path.display()));
                    }
                    Err(e) => {
                        tracing::error!("Error saving report: {}", e);
                        self.notice = Some(
                            "There was an issue generating the report. Please try again."
                                .to_string(),
                        );
                    }
                }
            }
            Err(e) => {
                tracing::error!("Error generating report: {}", e);
                self.notice = Some(
                    "There was an issue generating the report. Please try again.".to_string(),
                );
            }
        }
        // Cleanup runs shortly after, success and failure alike.
        self.report_cleanup_at = Some(now + REPORT_CLEANUP_LINGER);
    }

    // ----- confirmations -----

    pub fn confirm_accepted(&mut self) {
        match self.confirm.take() {
            Some(ConfirmAction::DeleteAccount) => self.delete_account(),
            Some(ConfirmAction::DeleteSession(name)) => self.clear_session(name),
            None => {}
        }
    }

    pub fn confirm_rejected(&mut self) {
        self.confirm = None;
    }

    // ----- frame tick -----

    /// Advance every timer-driven behavior. Called once per frame.
    pub fn tick(&mut self, now: Instant) {
        // Login prompt reappears on a fixed interval until login or
        // dismissal.
        if let Some(at) = self.login_prompt_at {
            if now >= at && !self.session.is_logged_in {
                self.show_login_overlay = true;
                self.login_prompt_at = Some(now + LOGIN_PROMPT_INTERVAL);
            }
        }

        // Debounced history toggle; loads lazily on open.
        if self.history_toggle.fire(now) {
            self.history_open = !self.history_open;
            if self.history_open {
                self.load_history(None);
            }
        }

        // Simulated report progress.
        self.report_progress.tick(now);
        if let Some(at) = self.report_cleanup_at {
            if now >= at {
                self.report_cleanup_at = None;
                self.report_progress.reset();
                self.report_file = None;
                self.report_file_label = "No file chosen".to_string();
            }
        }

        self.dropdown.poll(now);
        self.history_button_clicked = false;
    }

    /// Whether anything timer- or channel-driven is outstanding, so
    /// the frame loop keeps repainting.
    pub fn has_pending_work(&self) -> bool {
        self.login_rx.is_some()
            || self.logout_rx.is_some()
            || self.delete_account_rx.is_some()
            || self.send_rx.is_some()
            || self.history_rx.is_some()
            || self.clear_rx.is_some()
            || self.export_rx.is_some()
            || self.report_rx.is_some()
            || self.login_prompt_at.is_some()
            || self.history_toggle.is_pending()
            || self.report_progress.is_active()
            || self.report_cleanup_at.is_some()
            || self.dropdown.is_visible()
    }
}

/// Build the render-side reference for an accepted attachment:
/// decoded pixels for images, file name only for everything else.
fn preview_ref(att: &Attachment) -> AttachmentRef {
    if att.is_image() {
        if let Ok(img) = image::load_from_memory(&att.bytes) {
            let rgba = img.to_rgba8();
            let (width, height) = (rgba.width() as usize, rgba.height() as usize);
            return AttachmentRef::Image {
                file_name: att.file_name.clone(),
                rgba: rgba.into_raw(),
                width,
                height,
            };
        }
        tracing::warn!("could not decode image preview for {}", att.file_name);
    }
    AttachmentRef::File {
        file_name: att.file_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::types::Direction;

    fn logged_in_state() -> AppState {
        let mut s = AppState::default();
        s.session = SessionState {
            is_logged_in: true,
            username: "mara".into(),
            session_name: Some("1".into()),
        };
        s.login_checked = true;
        s
    }

    #[test]
    fn test_empty_send_is_a_no_op() {
        let mut s = logged_in_state();
        s.send_message();
        assert!(s.chat_entries.is_empty());
        assert!(s.send_rx.is_none(), "no network call should be issued");
    }

    #[test]
    fn test_send_echoes_outgoing_entry() {
        let mut s = logged_in_state();
        s.pending.text = "hello there".into();
        s.send_message();
        assert_eq!(s.chat_entries.len(), 1);
        assert_eq!(s.chat_entries[0].direction, Direction::Outgoing);
        assert_eq!(s.chat_entries[0].content, "hello there");
        assert!(s.pending.text.is_empty(), "input cleared after echo");
        assert!(s.send_rx.is_some());
    }

    #[test]
    fn test_send_blocked_while_logged_out() {
        let mut s = AppState::default();
        s.pending.text = "hello".into();
        s.send_message();
        assert!(s.chat_entries.is_empty());
        assert!(s.send_rx.is_none());
        assert!(s.show_login_overlay, "login screen surfaces instead");
    }

    #[test]
    fn test_reply_renders_incoming_entry() {
        let mut s = logged_in_state();
        let (tx, rx) = channel();
        s.send_rx = Some(rx);
        s.send_in_flight = true;
        tx.send(SendResult {
            outcome: Ok(ProcessReply {
                response: Some("hi!".into()),
            }),
        })
        .unwrap();

        s.poll_send_result();
        assert_eq!(s.chat_entries.len(), 1);
        assert_eq!(s.chat_entries[0].direction, Direction::Incoming);
        assert_eq!(s.chat_entries[0].content, "hi!");
        assert!(!s.send_in_flight);
    }

    #[test]
    fn test_missing_reply_renders_literal_fallback() {
        let mut s = logged_in_state();
        let (tx, rx) = channel();
        s.send_rx = Some(rx);
        tx.send(SendResult {
            outcome: Ok(ProcessReply { response: None }),
        })
        .unwrap();

        s.poll_send_result();
        assert_eq!(s.chat_entries[0].content, "No response from GPT");
    }

    #[test]
    fn test_failed_send_renders_error_entry_and_resets_attachment() {
        let mut s = logged_in_state();
        s.pending.file = Some(Attachment {
            path: "pic.png".into(),
            file_name: "pic.png".into(),
            mime_type: "image/png".into(),
            size_bytes: 4,
            bytes: vec![0; 4],
        });
        let (tx, rx) = channel();
        s.send_rx = Some(rx);
        tx.send(SendResult {
            outcome: Err("connection refused".into()),
        })
        .unwrap();

        s.poll_send_result();
        assert_eq!(
            s.chat_entries[0].content,
            "Sorry, there was an error processing your request."
        );
        assert!(s.pending.file.is_none(), "attachment always reset");
    }

    #[test]
    fn test_filter_without_selection_prompts_and_skips_request() {
        let mut s = logged_in_state();
        s.filter_history();
        assert_eq!(
            s.notice.as_deref(),
            Some("Please select a session name to filter.")
        );
        assert!(s.history_rx.is_none());
    }

    #[test]
    fn test_filtered_history_replaces_records() {
        let mut s = logged_in_state();
        let (tx, rx) = channel();
        s.history_rx = Some(rx);
        tx.send(HistoryResult {
            filter: Some("2".into()),
            outcome: Ok(HistoryResponse {
                success: true,
                chat_history: vec![HistoryRecord {
                    session_name: Some("2".into()),
                    message: "q".into(),
                    response: "a".into(),
                    timestamp: "t".into(),
                }],
                message: None,
            }),
        })
        .unwrap();

        s.poll_history();
        assert_eq!(s.history_records.len(), 1);
        assert_eq!(s.history_records[0].session_name.as_deref(), Some("2"));
    }

    #[test]
    fn test_full_history_refreshes_session_selector() {
        let mut s = logged_in_state();
        s.selected_session = Some("gone".into());
        let (tx, rx) = channel();
        s.history_rx = Some(rx);
        let record = |name: &str| HistoryRecord {
            session_name: Some(name.into()),
            message: "q".into(),
            response: "a".into(),
            timestamp: "t".into(),
        };
        tx.send(HistoryResult {
            filter: None,
            outcome: Ok(HistoryResponse {
                success: true,
                chat_history: vec![record("1"), record("2"), record("1")],
                message: None,
            }),
        })
        .unwrap();

        s.poll_history();
        assert_eq!(s.session_names, vec!["1", "2"]);
        assert!(s.selected_session.is_none(), "stale selection dropped");
    }

    #[test]
    fn test_delete_session_requires_confirmation() {
        let mut s = logged_in_state();
        s.selected_session = Some("3".into());
        s.request_delete_session();
        assert_eq!(s.confirm, Some(ConfirmAction::DeleteSession("3".into())));
        assert!(s.clear_rx.is_none(), "no request before confirmation");

        s.confirm_rejected();
        assert!(s.clear_rx.is_none());

        s.request_delete_session();
        s.confirm_accepted();
        assert!(s.clear_rx.is_some(), "confirmed delete issues the call");
    }

    #[test]
    fn test_confirmed_delete_refreshes_sessions_and_history() {
        let mut s = logged_in_state();
        let (tx, rx) = channel();
        s.clear_rx = Some(rx);
        tx.send(ClearHistoryResult {
            session_name: "3".into(),
            outcome: Ok(AckResponse {
                success: true,
                message: None,
            }),
        })
        .unwrap();

        s.poll_clear_history();
        assert!(s
            .notice
            .as_deref()
            .unwrap()
            .contains("session '3' has been cleared"));
        assert!(s.history_rx.is_some(), "refresh fetch issued");
    }

    #[test]
    fn test_delete_failure_surfaces_server_message() {
        let mut s = logged_in_state();
        let (tx, rx) = channel();
        s.clear_rx = Some(rx);
        tx.send(ClearHistoryResult {
            session_name: "3".into(),
            outcome: Ok(AckResponse {
                success: false,
                message: Some("Session not found".into()),
            }),
        })
        .unwrap();

        s.poll_clear_history();
        assert_eq!(
            s.notice.as_deref(),
            Some("Failed to delete session: Session not found")
        );
        assert!(s.history_rx.is_none(), "no refresh on failure");
    }

    #[test]
    fn test_load_history_noop_when_logged_out() {
        let mut s = AppState::default();
        s.load_history(None);
        assert!(s.history_rx.is_none());
    }

    #[test]
    fn test_history_toggle_is_debounced() {
        let mut s = logged_in_state();
        let start = Instant::now();
        s.request_history_toggle(start);
        // Rapid second click retriggers rather than stacking.
        s.request_history_toggle(start + Duration::from_millis(100));

        s.tick(start + Duration::from_millis(250));
        assert!(!s.history_open, "deadline not reached yet");
        s.tick(start + Duration::from_millis(450));
        assert!(s.history_open, "single toggle after the quiet period");
        assert!(s.history_rx.is_some(), "history loads lazily on open");
    }

    #[test]
    fn test_report_requires_login() {
        let mut s = AppState::default();
        let now = Instant::now();
        s.generate_report(now);
        assert_eq!(
            s.notice.as_deref(),
            Some("You must be logged in to generate a report.")
        );
        assert!(s.report_rx.is_none());
        assert!(s.show_login_overlay);
    }

    #[test]
    fn test_report_requires_file() {
        let mut s = logged_in_state();
        s.generate_report(Instant::now());
        assert_eq!(
            s.notice.as_deref(),
            Some("Please select a file to generate the report.")
        );
        assert!(s.report_rx.is_none());
    }

    #[test]
    fn test_report_progress_lifecycle() {
        let mut s = logged_in_state();
        let start = Instant::now();
        s.report_file = Some(Attachment {
            path: "data.csv".into(),
            file_name: "data.csv".into(),
            mime_type: "text/csv".into(),
            size_bytes: 2,
            bytes: b"a\n".to_vec(),
        });
        s.generate_report(start);
        assert!(s.report_progress.is_active());

        // In-flight: capped at the ceiling no matter how long.
        for i in 1..30u64 {
            s.tick(start + Duration::from_millis(500 * i));
        }
        assert_eq!(s.report_progress.value(), SimulatedProgress::CEILING);

        // Drain the real worker result (connection error in tests)
        // and replace it with a deterministic failure.
        s.report_rx = None;
        let (tx, rx) = channel();
        s.report_rx = Some(rx);
        tx.send(ReportResult {
            outcome: Err("connection refused".into()),
        })
        .unwrap();
        let landed = start + Duration::from_secs(20);
        s.poll_report(landed);
        assert_eq!(s.report_progress.value(), 100, "snapped on completion");

        // Cleanup hides and resets the uploader state.
        s.tick(landed + Duration::from_secs(1));
        assert!(!s.report_progress.is_active());
        assert_eq!(s.report_file_label, "No file chosen");
        assert!(s.report_file.is_none());
    }

    #[test]
    fn test_login_prompt_reappears_until_dismissed() {
        let mut s = AppState::default();
        let start = Instant::now();
        let (tx, rx) = channel();
        s.login_rx = Some(rx);
        tx.send(LoginStatusResult {
            outcome: Ok(LoginStatus {
                is_logged_in: false,
                username: String::new(),
                session_name: None,
            }),
        })
        .unwrap();

        s.poll_login_status(start);
        assert!(s.show_login_overlay);

        s.show_login_overlay = false;
        s.tick(start + Duration::from_secs(6));
        assert!(s.show_login_overlay, "prompt reappears on the interval");

        s.dismiss_login_overlay();
        s.tick(start + Duration::from_secs(60));
        assert!(!s.show_login_overlay, "dismissal stops the timer");
    }

    #[test]
    fn test_export_requires_selection() {
        let mut s = logged_in_state();
        s.export_history();
        assert_eq!(
            s.notice.as_deref(),
            Some("Please select a session name to export.")
        );
        assert!(s.export_rx.is_none());
    }

    #[test]
    fn test_logout_resets_session_state() {
        let mut s = logged_in_state();
        s.history_open = true;
        let (tx, rx) = channel();
        s.logout_rx = Some(rx);
        tx.send(LogoutResult { outcome: Ok(()) }).unwrap();

        s.poll_logout();
        assert!(!s.session.is_logged_in);
        assert!(!s.history_open);
        assert_eq!(s.notice.as_deref(), Some("You have been logged out."));
    }
}
