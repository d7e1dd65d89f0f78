use async_trait::async_trait;
use reqwest::Method;

use crate::{
    Error,
    endpoints::{self, format_endpoint},
    gateway::UserGateway,
    user::{ProfileUpdate, UserID, UserProfile},
};

use super::{ApiClient, encode};

/// Reads and changes the logged in user through the finance service.
#[derive(Clone)]
pub struct HttpUserGateway {
    client: ApiClient,
}

impl HttpUserGateway {
    /// Create a gateway that sends its requests with `client`.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserGateway for HttpUserGateway {
    async fn get_current(&self) -> Result<UserProfile, Error> {
        self.client.get_json(endpoints::CURRENT_USER_API, &[]).await
    }

    async fn update(&self, id: UserID, profile: &ProfileUpdate) -> Result<(), Error> {
        let body = encode(profile)?;

        // The echoed user is ignored.
        self.client
            .send(
                Method::PUT,
                &format_endpoint(endpoints::USER_API, id.as_i64()),
                &[],
                Some(&body),
            )
            .await
            .map(|_| ())
    }

    async fn delete_account(&self) -> Result<(), Error> {
        self.client
            .send(Method::DELETE, endpoints::DELETE_ACCOUNT_API, &[], None)
            .await
            .map(|_| ())
    }
}
