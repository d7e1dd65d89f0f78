use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{Error, endpoints};

use super::ApiClient;

#[derive(Serialize)]
struct Credentials<'a> {
    login: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// Exchange a login and password for a bearer token.
///
/// The caller is responsible for storing the token, e.g. with
/// [crate::Session::set_token].
///
/// # Errors
/// Returns [Error::InvalidCredentials] if the service rejects the credentials
/// or responds with an empty token, otherwise the same errors as any other
/// request.
pub async fn log_in(client: &ApiClient, login: &str, password: &str) -> Result<String, Error> {
    let response: TokenResponse = client
        .send_json(
            Method::POST,
            endpoints::LOG_IN_API,
            &Credentials { login, password },
        )
        .await
        .map_err(|error| match error {
            Error::Unauthorized(_) => Error::InvalidCredentials,
            error => error,
        })?;

    if response.token.is_empty() {
        tracing::warn!("The service accepted the log in for {login} but sent an empty token.");
        return Err(Error::InvalidCredentials);
    }

    tracing::info!("Logged in as {login}.");

    Ok(response.token)
}
