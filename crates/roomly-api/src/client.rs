//! Typed HTTP client over a single `reqwest` connection pool.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::middleware::Middleware;

/// Error payload shape the backend uses; both keys occur in the wild.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

/// The single outbound HTTP channel of the client stack.
///
/// Cheap to clone; all clones share one connection pool and middleware
/// chain. Verbs deserialize JSON responses into caller-chosen types and
/// classify every failure into an [`ApiError`].
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl ApiClient {
    /// Create a client for the configured backend with the given middleware
    /// chain. Middleware runs in installation order.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should never happen with
    /// default TLS).
    #[must_use]
    pub fn new(config: &ApiConfig, middleware: Vec<Arc<dyn Middleware>>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("failed to create HTTP client");

        Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                middleware,
            }),
        }
    }

    /// The configured backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for any failure.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.inner.http.get(self.url(path));
        self.execute(request).await
    }

    /// `GET` a JSON resource with query string pairs.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for any failure.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.inner.http.get(self.url(path)).query(query);
        self.execute(request).await
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for any failure.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.inner.http.post(self.url(path)).json(body);
        self.execute(request).await
    }

    /// `PUT` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for any failure.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.inner.http.put(self.url(path)).json(body);
        self.execute(request).await
    }

    /// `DELETE` a resource. Tolerates an empty response body.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for any failure.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let request = self.inner.http.delete(self.url(path));
        self.send(request).await.map(|_| ())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    async fn execute<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let status = response.status().as_u16();

        match response.json::<T>().await {
            Ok(value) => Ok(value),
            Err(e) => {
                // The status was a success, so the server broke the payload
                // contract rather than the transport failing.
                let error = ApiError::Server {
                    status,
                    message: format!("invalid response body: {e}"),
                };
                self.notify(&error);
                Err(error)
            }
        }
    }

    /// Run the middleware chain, send, and classify any failure.
    async fn send(&self, mut request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        for middleware in &self.inner.middleware {
            request = middleware.on_request(request);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = ApiError::Network(e.to_string());
                self.notify(&error);
                return Err(error);
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| status.to_string());

        let error = match status.as_u16() {
            401 => ApiError::Unauthorized,
            code if status.is_client_error() => ApiError::Client {
                status: code,
                message,
            },
            code => ApiError::Server {
                status: code,
                message,
            },
        };

        tracing::debug!(status = status.as_u16(), error = %error, "Request failed");
        self.notify(&error);
        Err(error)
    }

    fn notify(&self, error: &ApiError) {
        for middleware in &self.inner.middleware {
            middleware.on_error(error);
        }
    }
}
