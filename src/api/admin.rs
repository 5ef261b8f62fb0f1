//! Admin endpoints (bearer-authenticated).

use reqwest::Method;

use crate::api::client::{Auth, RegistryClient};
use crate::api::error::ApiResult;
use crate::api::reply::{decode_list, ApiReply};
use crate::models::{EntityId, EstateInput, Transaction, User};

impl RegistryClient {
    /// `GET /admin/users`.
    pub async fn get_users(&self) -> ApiResult<Vec<User>> {
        let url = self.url(&["admin", "users"])?;
        let body = self.get_json(url, Auth::Bearer).await?;
        decode_list(body, "users")
    }

    /// `GET /admin/transactions`.
    pub async fn get_all_transactions(&self) -> ApiResult<Vec<Transaction>> {
        let url = self.url(&["admin", "transactions"])?;
        let body = self.get_json(url, Auth::Bearer).await?;
        decode_list(body, "transactions")
    }

    /// `POST /admin/estates`.
    pub async fn create_estate(&self, estate: &EstateInput) -> ApiResult<ApiReply> {
        let url = self.url(&["admin", "estates"])?;
        let body = self.send_json(Method::POST, url, Auth::Bearer, Some(estate)).await?;
        tracing::info!(name = %estate.name, "Estate created");
        ApiReply::from_value(body)
    }

    /// `PUT /admin/estates/:id`.
    pub async fn update_estate(&self, id: &EntityId, estate: &EstateInput) -> ApiResult<ApiReply> {
        let id = id.to_string();
        let url = self.url(&["admin", "estates", id.as_str()])?;
        let body = self.send_json(Method::PUT, url, Auth::Bearer, Some(estate)).await?;
        tracing::info!(id = %id, "Estate updated");
        ApiReply::from_value(body)
    }

    /// `DELETE /admin/estates/:id`.
    pub async fn delete_estate(&self, id: &EntityId) -> ApiResult<ApiReply> {
        let id = id.to_string();
        let url = self.url(&["admin", "estates", id.as_str()])?;
        let body = self
            .send_json::<()>(Method::DELETE, url, Auth::Bearer, None)
            .await?;
        tracing::info!(id = %id, "Estate deleted");
        ApiReply::from_value(body)
    }
}
