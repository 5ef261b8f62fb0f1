//! "Empty on failure" view of the client.
//!
//! Read operations never fail here: any error is logged at `warn` and turned
//! into an empty collection or `None`. Callers that render "no data" and
//! "error" identically can use this; everything else should use
//! [`RegistryClient`] directly and match on [`ApiError`].
//!
//! [`ApiError`]: crate::api::ApiError

use std::future::Future;

use crate::api::client::RegistryClient;
use crate::api::error::ApiResult;
use crate::models::{Document, EntityId, Estate, Plot, Transaction, User};

#[derive(Debug, Clone)]
pub struct LenientClient {
    inner: RegistryClient,
}

async fn or_empty<T, F>(operation: &'static str, fut: F) -> Vec<T>
where
    F: Future<Output = ApiResult<Vec<T>>>,
{
    match fut.await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(operation, error = %e, "Request failed, returning empty list");
            Vec::new()
        }
    }
}

impl LenientClient {
    pub fn new(inner: RegistryClient) -> Self {
        Self { inner }
    }

    /// The strict client underneath.
    pub fn strict(&self) -> &RegistryClient {
        &self.inner
    }

    pub async fn get_estates(&self) -> Vec<Estate> {
        or_empty("get_estates", self.inner.get_estates()).await
    }

    /// Same as the strict lookup; "Estate not found" stays an error.
    pub async fn get_estate(&self, slug: &str) -> ApiResult<Estate> {
        self.inner.get_estate(slug).await
    }

    pub async fn get_estate_by_id(&self, id: &EntityId) -> Option<Estate> {
        match self.inner.get_estate_by_id(id).await {
            Ok(estate) => Some(estate),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Estate lookup failed");
                None
            }
        }
    }

    pub async fn get_plots(&self, estate_id: &EntityId) -> Vec<Plot> {
        or_empty("get_plots", self.inner.get_plots(estate_id)).await
    }

    pub async fn get_transactions(&self) -> Vec<Transaction> {
        or_empty("get_transactions", self.inner.get_transactions()).await
    }

    pub async fn get_documents(&self) -> Vec<Document> {
        or_empty("get_documents", self.inner.get_documents()).await
    }

    pub async fn get_users(&self) -> Vec<User> {
        or_empty("get_users", self.inner.get_users()).await
    }

    pub async fn get_all_transactions(&self) -> Vec<Transaction> {
        or_empty("get_all_transactions", self.inner.get_all_transactions()).await
    }
}

impl From<RegistryClient> for LenientClient {
    fn from(inner: RegistryClient) -> Self {
        Self::new(inner)
    }
}
