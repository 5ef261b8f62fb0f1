//! Timeout enforcement.
//!
//! Every backend call has a deadline; a timed-out call surfaces as
//! [`ApiError::Timeout`], distinct from other failures.

use std::future::Future;
use std::time::Duration;

use crate::api::error::{ApiError, ApiResult};

/// Run `fut` with a deadline of `secs` seconds.
pub async fn with_timeout<T, F>(secs: u64, fut: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    match tokio::time::timeout(Duration::from_secs(secs), fut).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout(secs)),
    }
}
