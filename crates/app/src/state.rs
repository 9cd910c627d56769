//! Background network workers.
//!
//! Each worker runs on its own thread with its own tokio runtime
//! and reports back over an mpsc channel; the UI thread polls the
//! receiving end once per frame and never blocks. There is no
//! cancellation: a superseded request still delivers, and the last
//! result to arrive wins.

use std::sync::mpsc::Sender;

use services::BackendClient;
use shared::attachment::Attachment;

use crate::types::{
    ClearHistoryResult, DeleteAccountResult, ExportResult, HistoryResult, LoginStatusResult,
    LogoutResult, ReportResult, SendResult,
};

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Runtime::new().map_err(|e| format!("Failed to start async runtime: {}", e))
}

pub fn run_login_check(client: BackendClient, tx: Sender<LoginStatusResult>) {
    let outcome = match runtime() {
        Ok(rt) => rt
            .block_on(client.check_login())
            .map_err(|e| e.to_string()),
        Err(e) => Err(e),
    };
    let _ = tx.send(LoginStatusResult { outcome });
}

pub fn run_logout(client: BackendClient, tx: Sender<LogoutResult>) {
    let outcome = match runtime() {
        Ok(rt) => rt.block_on(client.logout()).map_err(|e| e.to_string()),
        Err(e) => Err(e),
    };
    let _ = tx.send(LogoutResult { outcome });
}

pub fn run_delete_account(client: BackendClient, tx: Sender<DeleteAccountResult>) {
    let outcome = match runtime() {
        Ok(rt) => rt
            .block_on(client.delete_account())
            .map_err(|e| e.to_string()),
        Err(e) => Err(e),
    };
    let _ = tx.send(DeleteAccountResult { outcome });
}

pub fn run_send_message(
    client: BackendClient,
    text: String,
    file: Option<Attachment>,
    tx: Sender<SendResult>,
) {
    let text_arg = if text.is_empty() { None } else { Some(text) };
    let outcome = match runtime() {
        Ok(rt) => rt
            .block_on(client.send_message(text_arg.as_deref(), file.as_ref()))
            .map_err(|e| e.to_string()),
        Err(e) => Err(e),
    };
    let _ = tx.send(SendResult { outcome });
}

pub fn run_load_history(
    client: BackendClient,
    filter: Option<String>,
    tx: Sender<HistoryResult>,
) {
    let outcome = match runtime() {
        Ok(rt) => rt
            .block_on(client.chat_history(filter.as_deref()))
            .map_err(|e| e.to_string()),
        Err(e) => Err(e),
    };
    let _ = tx.send(HistoryResult { filter, outcome });
}

pub fn run_clear_history(client: BackendClient, session_name: String, tx: Sender<ClearHistoryResult>) {
    let outcome = match runtime() {
        Ok(rt) => rt
            .block_on(client.clear_history(&session_name))
            .map_err(|e| e.to_string()),
        Err(e) => Err(e),
    };
    let _ = tx.send(ClearHistoryResult {
        session_name,
        outcome,
    });
}

pub fn run_export_history(client: BackendClient, session_name: String, tx: Sender<ExportResult>) {
    let outcome = match runtime() {
        Ok(rt) => rt
            .block_on(client.export_history(&session_name))
            .map_err(|e| e.to_string()),
        Err(e) => Err(e),
    };
    let _ = tx.send(ExportResult { outcome });
}

pub fn run_generate_report(client: BackendClient, file: Attachment, tx: Sender<ReportResult>) {
    let outcome = match runtime() {
        Ok(rt) => rt
            .block_on(client.generate_report(&file))
            .map_err(|e| e.to_string()),
        Err(e) => Err(e),
    };
    let _ = tx.send(ReportResult { outcome });
}
