//! The gateways implemented over the finance service's JSON HTTP API.
//!
//! Every request carries the session's bearer token when there is one, and
//! 401/403 responses become [Error::Unauthorized].

mod auth;
mod transactions;
mod users;

use std::sync::Arc;

use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Error,
    config::ApiConfig,
    logging::{log_request, log_response},
    session::SessionProvider,
};

pub use auth::log_in;
pub use transactions::HttpTransactionGateway;
pub use users::HttpUserGateway;

/// A connection to the finance service shared by the HTTP gateways.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl ApiClient {
    /// Create a client for the service at `config.base_url`.
    ///
    /// # Errors
    /// Returns [Error::InvalidBaseUrl] if the URL is not an absolute http(s)
    /// URL, or [Error::Network] if the HTTP client could not be initialised.
    pub fn new(config: &ApiConfig, session: Arc<dyn SessionProvider>) -> Result<Self, Error> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();

        match reqwest::Url::parse(&base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(Error::InvalidBaseUrl(config.base_url.clone())),
        }

        let http = reqwest::Client::builder()
            .build()
            .inspect_err(|error| tracing::error!("could not build the HTTP client: {error}"))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// The full URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body of a successful response.
    ///
    /// # Errors
    /// Returns [Error::Unauthorized] for 401 and 403 responses,
    /// [Error::Status] for any other non-success status and [Error::Network]
    /// if the service could not be reached.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<String, Error> {
        let url = self.url(path);
        log_request(&method, &url, body);

        let mut request = self.http.request(method.clone(), &url);

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        log_response(&method, &url, status, &text);

        if !status.is_success() {
            let error = Error::from_status(status, text);
            tracing::warn!("{method} {url} failed: {error}");
            return Err(error);
        }

        Ok(text)
    }

    /// Send a GET request and decode the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let text = self.send(Method::GET, path, query, None).await?;

        decode(&text)
    }

    /// Send `body` as JSON and decode the JSON response.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let body = encode(body)?;
        let text = self.send(method, path, &[], Some(&body)).await?;

        decode(&text)
    }
}

fn encode(body: &impl Serialize) -> Result<Value, Error> {
    serde_json::to_value(body).map_err(|error| {
        tracing::error!("could not encode request body: {error}");
        Error::Decode(error.to_string())
    })
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    serde_json::from_str(text).map_err(|error| {
        tracing::error!("could not decode response body: {error}");
        Error::Decode(error.to_string())
    })
}
