//! Estate and plot lookup.

use crate::api::client::{Auth, RegistryClient};
use crate::api::error::{ApiError, ApiResult};
use crate::api::reply::{decode_item, decode_list};
use crate::models::{EntityId, Estate, Plot};

/// Message used when neither lookup path finds the estate.
pub const ESTATE_NOT_FOUND: &str = "Estate not found";

impl RegistryClient {
    /// `GET /estates`.
    pub async fn get_estates(&self) -> ApiResult<Vec<Estate>> {
        let url = self.url(&["estates"])?;
        let body = self.get_json(url, Auth::Anonymous).await?;
        decode_list(body, "estates")
    }

    /// Look up an estate by slug, or by id given as a string.
    ///
    /// Tries `GET /estates/:slug` first. If that fails for any reason the
    /// full list is fetched and scanned for a matching slug or stringified id.
    pub async fn get_estate(&self, slug: &str) -> ApiResult<Estate> {
        let direct = async {
            let url = self.url(&["estates", slug])?;
            let body = self.get_json(url, Auth::Anonymous).await?;
            decode_item::<Estate>(body, "estate")
        };

        match direct.await {
            Ok(estate) => Ok(estate),
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(e) => {
                tracing::debug!(slug = %slug, error = %e, "Direct estate lookup failed, scanning list");
                let estates = self.get_estates().await?;
                estates
                    .into_iter()
                    .find(|estate| estate.matches_key(slug))
                    .ok_or_else(|| ApiError::NotFound(ESTATE_NOT_FOUND.to_string()))
            }
        }
    }

    /// `GET /estates/:id`, without the list fallback.
    pub async fn get_estate_by_id(&self, id: &EntityId) -> ApiResult<Estate> {
        let id = id.to_string();
        let url = self.url(&["estates", id.as_str()])?;
        let body = self.get_json(url, Auth::Anonymous).await?;
        decode_item(body, "estate")
    }

    /// `GET /plots?estate_id=:id`.
    pub async fn get_plots(&self, estate_id: &EntityId) -> ApiResult<Vec<Plot>> {
        let mut url = self.url(&["plots"])?;
        url.query_pairs_mut()
            .append_pair("estate_id", &estate_id.to_string());
        let body = self.get_json(url, Auth::Anonymous).await?;
        decode_list(body, "plots")
    }
}
