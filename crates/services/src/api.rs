//! Typed client for the chat/report backend.
//!
//! One method per endpoint, thin by design: each call maps a single
//! HTTP round trip to a typed result and nothing else. Retry,
//! gating on login state, and user-facing error text are the UI's
//! responsibility.

use anyhow::{anyhow, Result};
use reqwest::multipart;

use shared::attachment::Attachment;
use shared::types::{AckResponse, HistoryResponse, LoginStatus, ProcessReply};

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        // The backend authenticates with session cookies, so the
        // client keeps a cookie store across calls.
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /check_login` — the one call allowed while logged out.
    pub async fn check_login(&self) -> Result<LoginStatus> {
        let response = self.client.get(self.url("/check_login")).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Failed to check login status"));
        }
        Ok(response.json().await?)
    }

    /// `GET /logout` — invalidates the server session.
    pub async fn logout(&self) -> Result<()> {
        let response = self.client.get(self.url("/logout")).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Logout failed: {}", response.status()));
        }
        // Acknowledgement body is JSON but carries nothing we use.
        let _ = response.text().await;
        Ok(())
    }

    /// `POST /process` — chat message with optional text and file,
    /// as multipart form data.
    pub async fn send_message(
        &self,
        text: Option<&str>,
        file: Option<&Attachment>,
    ) -> Result<ProcessReply> {
        let mut form = multipart::Form::new();
        if let Some(text) = text {
            if !text.is_empty() {
                form = form.text("message", text.to_string());
            }
        }
        if let Some(att) = file {
            form = form.part("file", file_part(att)?);
        }

        let response = self
            .client
            .post(self.url("/process"))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("Chat request failed: {}", response.status()));
        }
        Ok(response.json().await?)
    }

    /// `POST /report` — upload a file, receive the generated report
    /// as raw bytes.
    pub async fn generate_report(&self, file: &Attachment) -> Result<Vec<u8>> {
        let form = multipart::Form::new().part("file", file_part(file)?);
        let response = self
            .client
            .post(self.url("/report"))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("Failed to generate report"));
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// `GET /get_chat_history`, optionally scoped to one session.
    pub async fn chat_history(&self, session_name: Option<&str>) -> Result<HistoryResponse> {
        let mut request = self.client.get(self.url("/get_chat_history"));
        if let Some(name) = session_name {
            request = request.query(&[("session_name", name)]);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("History request failed: {}", response.status()));
        }
        Ok(response.json().await?)
    }

    /// `DELETE /clear_chat_history?session_name=` — scoped delete.
    pub async fn clear_history(&self, session_name: &str) -> Result<AckResponse> {
        let response = self
            .client
            .delete(self.url("/clear_chat_history"))
            .query(&[("session_name", session_name)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("Delete request failed: {}", response.status()));
        }
        Ok(response.json().await?)
    }

    /// `DELETE /delete_account`.
    pub async fn delete_account(&self) -> Result<AckResponse> {
        let response = self
            .client
            .delete(self.url("/delete_account"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("Account deletion failed: {}", response.status()));
        }
        Ok(response.json().await?)
    }

    /// `GET /export_chat_history?session_name=` — export blob.
    pub async fn export_history(&self, session_name: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.url("/export_chat_history"))
            .query(&[("session_name", session_name)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("Export request failed: {}", response.status()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

fn file_part(att: &Attachment) -> Result<multipart::Part> {
    let part = multipart::Part::bytes(att.bytes.clone())
        .file_name(att.file_name.clone())
        .mime_str(&att.mime_type)?;
    Ok(part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = BackendClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/check_login"), "http://localhost:5000/check_login");
    }

    #[test]
    fn test_file_part_builds_for_valid_mime() {
        let att = Attachment {
            path: "notes.txt".into(),
            file_name: "notes.txt".into(),
            mime_type: "text/plain".into(),
            size_bytes: 5,
            bytes: b"hello".to_vec(),
        };
        assert!(file_part(&att).is_ok());
    }
}
