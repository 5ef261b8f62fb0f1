//! Purchase transactions (bearer-authenticated).

use reqwest::Method;

use crate::api::client::{Auth, RegistryClient};
use crate::api::error::ApiResult;
use crate::api::reply::{decode_list, ApiReply};
use crate::models::{NewTransaction, Transaction};

impl RegistryClient {
    /// `POST /transactions`. The reply is returned untransformed.
    pub async fn create_transaction(&self, transaction: &NewTransaction) -> ApiResult<ApiReply> {
        let url = self.url(&["transactions"])?;
        let body = self
            .send_json(Method::POST, url, Auth::Bearer, Some(transaction))
            .await?;
        tracing::info!(reference = %transaction.reference, plot_id = %transaction.plot_id, "Transaction recorded");
        ApiReply::from_value(body)
    }

    /// `GET /transactions` for the logged-in user.
    pub async fn get_transactions(&self) -> ApiResult<Vec<Transaction>> {
        let url = self.url(&["transactions"])?;
        let body = self.get_json(url, Auth::Bearer).await?;
        decode_list(body, "transactions")
    }
}
