//! Authentication endpoints.

use reqwest::Method;
use serde_json::Value;

use crate::api::client::{Auth, RegistryClient};
use crate::api::error::ApiResult;
use crate::api::reply::decode;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, VerifyOtpRequest};

fn auth_response(value: Value) -> ApiResult<AuthResponse> {
    match value {
        Value::Null => Ok(AuthResponse::default()),
        other => decode(other),
    }
}

impl RegistryClient {
    /// `POST /auth/register`.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        let url = self.url(&["auth", "register"])?;
        let body = self.send_json(Method::POST, url, Auth::Anonymous, Some(request)).await?;
        tracing::info!(email = %request.email, "Registration submitted");
        auth_response(body)
    }

    /// `POST /auth/verify-otp`.
    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> ApiResult<AuthResponse> {
        let url = self.url(&["auth", "verify-otp"])?;
        let body = self.send_json(Method::POST, url, Auth::Anonymous, Some(request)).await?;
        let response = auth_response(body)?;
        if let Some(token) = &response.token {
            self.set_token(Some(token.clone()));
        }
        Ok(response)
    }

    /// `POST /auth/login`.
    ///
    /// The body is returned as received. A token in it also becomes this
    /// client's bearer token.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        let url = self.url(&["auth", "login"])?;
        let body = self.send_json(Method::POST, url, Auth::Anonymous, Some(request)).await?;
        let response = auth_response(body)?;
        if let Some(token) = &response.token {
            self.set_token(Some(token.clone()));
            tracing::info!(email = %request.email, "Logged in");
        }
        Ok(response)
    }
}
