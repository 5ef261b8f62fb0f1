//! Document upload and listing (bearer-authenticated).

use reqwest::multipart::{Form, Part};

use crate::api::client::{Auth, RegistryClient};
use crate::api::error::{ApiError, ApiResult};
use crate::api::reply::{decode_list, ApiReply};
use crate::models::{Document, DocumentUpload};

impl RegistryClient {
    /// `POST /documents/upload` as `multipart/form-data`.
    ///
    /// The file goes in part `file`; `name`, `type` and `category` are text parts.
    pub async fn upload_document(&self, upload: &DocumentUpload) -> ApiResult<ApiReply> {
        let url = self.url(&["documents", "upload"])?;
        if !self.has_token() {
            return Err(ApiError::MissingToken);
        }

        let bytes = tokio::fs::read(&upload.path).await.map_err(|e| {
            ApiError::InvalidRequest(format!("Cannot read {}: {}", upload.path.display(), e))
        })?;
        let size = bytes.len();
        let name = upload.display_name();

        let file_name = upload
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(upload.mime_type())?;

        let mut form = Form::new().part("file", part).text("name", name.clone());
        if let Some(doc_type) = &upload.doc_type {
            form = form.text("type", doc_type.clone());
        }
        if let Some(category) = &upload.category {
            form = form.text("category", category.clone());
        }

        let body = self.send_multipart(url, Auth::Bearer, form).await?;
        tracing::info!(name = %name, size, "Document uploaded");
        ApiReply::from_value(body)
    }

    /// `GET /documents`.
    pub async fn get_documents(&self) -> ApiResult<Vec<Document>> {
        let url = self.url(&["documents"])?;
        let body = self.get_json(url, Auth::Bearer).await?;
        decode_list(body, "documents")
    }
}
