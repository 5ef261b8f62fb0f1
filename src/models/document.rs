//! Title documents submitted for verification.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{string_or_number, EntityId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(
        rename = "uploadDate",
        alias = "upload_date",
        alias = "created_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub status: DocumentStatus,
}

/// A local file plus the metadata sent alongside it.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub path: PathBuf,
    pub name: Option<String>,
    pub doc_type: Option<String>,
    pub category: Option<String>,
}

impl DocumentUpload {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: None,
            doc_type: None,
            category: None,
        }
    }

    /// Display name, falling back to the file name.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string())
    }

    /// MIME type guessed from the extension.
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => "application/pdf",
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("doc") => "application/msword",
            Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            _ => "application/octet-stream",
        }
    }
}
