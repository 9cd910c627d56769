//! Attachment validation and loading.
//!
//! The backend accepts a fixed set of document and image types, and
//! nothing over 5 MB. A file passes the type check when either its
//! MIME type or its extension is on the allow-list; both have to
//! fail for a rejection. Validation runs at selection time so the
//! composer can show a preview before anything touches the network.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Hard size cap, matching the backend's upload limit.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/json",
    "text/plain",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/x-regedit",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "application/pdf",
    "text/markdown",
];

const ALLOWED_EXTENSIONS: &[&str] = &[
    ".reg", ".json", ".txt", ".img", ".docx", ".pdf", ".jpg", ".jpeg", ".png", ".csv", ".xlsx",
    ".md",
];

/// Why a selected file was refused. The display strings are the
/// exact notices shown to the user.
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("File size exceeds 5MB.")]
    TooLarge,
    #[error("The file type is not supported.")]
    UnsupportedType,
    #[error("Could not read file: {0}")]
    Io(#[from] std::io::Error),
}

/// A user-selected file that already passed validation, with its
/// bytes loaded for upload and preview.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Validate and load a file from disk. The size check runs
    /// before the type check and before any bytes are read.
    pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        let metadata = std::fs::metadata(path)?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(AttachmentError::TooLarge);
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mime_type = guess_mime_type(&file_name);

        if !is_allowed(&mime_type, &file_name) {
            return Err(AttachmentError::UnsupportedType);
        }

        let bytes = std::fs::read(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime_type,
            size_bytes: metadata.len(),
            bytes,
        })
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Allow-list check: MIME type or extension, either one is enough.
pub fn is_allowed(mime_type: &str, file_name: &str) -> bool {
    if ALLOWED_MIME_TYPES.contains(&mime_type) {
        return true;
    }
    let ext = extension_of(file_name);
    ALLOWED_EXTENSIONS.contains(&ext.as_str())
}

/// Lowercased extension including the dot, or empty when absent.
fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) => file_name[idx..].to_lowercase(),
        None => String::new(),
    }
}

/// Map a file name to the MIME type the backend expects. Unknown
/// extensions fall through to octet-stream and rely on the
/// extension check instead.
pub fn guess_mime_type(file_name: &str) -> String {
    let mime = match extension_of(file_name).as_str() {
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".json" => "application/json",
        ".txt" => "text/plain",
        ".md" => "text/markdown",
        ".pdf" => "application/pdf",
        ".docx" => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        ".xlsx" => {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        }
        ".csv" => "text/csv",
        ".reg" => "application/x-regedit",
        _ => "application/octet-stream",
    };
    mime.to_string()
}
