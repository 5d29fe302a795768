//! reqwest-backed admin session.

use crate::client::types::{AuthResponse, CollectionPage, RemoteCollection, ServerErrorBody};
use crate::client::AdminApi;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Path of the admin password login endpoint.
pub const ADMIN_AUTH_PATH: &str = "/api/admins/auth-with-password";

/// Where to connect and who to log in as.
#[derive(Clone)]
pub struct Credentials {
    pub base_url: String,
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(base_url: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Credentials {
            base_url: base_url.trim_end_matches('/').to_string(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Authenticated admin session. The token is attached to every request.
pub struct HttpSession {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpSession {
    /// Log in with admin email and password.
    pub async fn authenticate(credentials: &Credentials) -> Result<Self, ApiError> {
        let client = Client::new();
        let url = format!("{}{}", credentials.base_url, ADMIN_AUTH_PATH);
        let body = serde_json::json!({
            "identity": credentials.email,
            "password": credentials.password,
        });
        let response = client.post(&url).json(&body).send().await?;
        let auth: AuthResponse = decode(response).await?;
        if auth.token.is_empty() {
            return Err(ApiError::Decode("auth response carried an empty token".into()));
        }
        tracing::info!(url = %credentials.base_url, email = %credentials.email, "authenticated as admin");
        Ok(HttpSession {
            client,
            base_url: credentials.base_url.clone(),
            token: auth.token,
        })
    }
}

#[async_trait]
impl AdminApi for HttpSession {
    async fn list_collections(&self, page: u32, per_page: u32) -> Result<CollectionPage, ApiError> {
        let url = format!("{}/api/collections", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.token.as_str())
            .query(&[("page", page), ("perPage", per_page)])
            .send()
            .await?;
        decode(response).await
    }

    async fn create_collection(&self, body: &Value) -> Result<RemoteCollection, ApiError> {
        let url = format!("{}/api/collections", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.token.as_str())
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    async fn update_collection(&self, id: &str, body: &Value) -> Result<RemoteCollection, ApiError> {
        let url = format!("{}/api/collections/{}", self.base_url, id);
        let response = self
            .client
            .patch(&url)
            .header("Authorization", self.token.as_str())
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(match serde_json::from_str::<ServerErrorBody>(&text) {
            Ok(body) if !body.message.is_empty() => ApiError::Status {
                status: status.as_u16(),
                message: body.message,
                data: body.data,
            },
            _ => ApiError::status(status.as_u16(), text),
        });
    }
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}
