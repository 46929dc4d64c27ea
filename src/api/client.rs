//! HTTP client wrapper for task service requests.

use super::error::{ApiError, error_message};
use super::types::{Credentials, NewTask, Registration, Task, TaskPatch, TokenResponse};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};

/// Client for the remote task service.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the given base URL. A trailing slash is stripped
    /// so endpoint paths can always start with one.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            client: super::create_http_client(),
            base_url,
            token: None,
        }
    }

    /// Set or clear the bearer token used to authorize task endpoints.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Build headers including authentication when a token is set.
    fn build_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Send a request and map non-success statuses to a typed error.
    async fn send<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let headers = self.build_headers()?;

        tracing::debug!(method = %method, url, "api request");

        let mut request = self.client.request(method, &url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }

        Ok(response)
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        parse_body(response).await
    }

    async fn post_json<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        parse_body(response).await
    }

    /// Exchange credentials for an access token.
    pub async fn get_token(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let response: TokenResponse = self
            .post_json("/users/get-token", &Credentials { username, password })
            .await?;
        Ok(response.access_token)
    }

    /// Create a user account. The service logs the new user in and returns
    /// an access token; failures carry a server-provided message.
    pub async fn register(
        &self,
        username: &str,
        firstname: &str,
        lastname: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let response: TokenResponse = self
            .post_json(
                "/users",
                &Registration {
                    username,
                    firstname,
                    lastname,
                    new_password: password,
                },
            )
            .await?;
        Ok(response.access_token)
    }

    /// Fetch the full task list for the authenticated user.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.get_json("/tasks").await
    }

    /// Create a task; returns the server's representation with its assigned id.
    pub async fn create_task(&self, title: &str) -> Result<Task, ApiError> {
        self.post_json(
            "/tasks",
            &NewTask {
                title,
                marked_as_done: false,
            },
        )
        .await
    }

    /// Apply a partial update to one task.
    pub async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), ApiError> {
        self.send(Method::PUT, &format!("/tasks/{id}"), Some(patch))
            .await?;
        Ok(())
    }

    /// Delete a task.
    pub async fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, &format!("/tasks/{id}"), None)
            .await?;
        Ok(())
    }
}

async fn parse_body<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ApiError::Parse(format!("{e}\nBody: {text}")))
}
