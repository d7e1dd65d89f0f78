use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::{
    Error,
    endpoints,
    gateway::TransactionGateway,
    transaction::{Transaction, TransactionKind, coerce_amount},
};

use super::ApiClient;

/// Reads and creates transactions through the finance service.
#[derive(Clone)]
pub struct HttpTransactionGateway {
    client: ApiClient,
}

impl HttpTransactionGateway {
    /// Create a gateway that sends its requests with `client`.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TransactionGateway for HttpTransactionGateway {
    async fn create(&self, transaction: &Transaction) -> Result<Transaction, Error> {
        self.client
            .send_json(Method::POST, endpoints::TRANSACTIONS_API, transaction)
            .await
    }

    async fn list_mine(&self, kind: Option<TransactionKind>) -> Result<Vec<Transaction>, Error> {
        let query: Vec<(&str, String)> = kind
            .map(|kind| vec![("tipo", kind.as_query_value().to_owned())])
            .unwrap_or_default();

        self.client
            .get_json(endpoints::MY_TRANSACTIONS_API, &query)
            .await
    }

    async fn balance(&self) -> Result<Option<f64>, Error> {
        let text = self
            .client
            .send(Method::GET, endpoints::BALANCE_API, &[], None)
            .await?;

        let balance = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|value| coerce_amount(&value));

        if balance.is_none() {
            tracing::warn!("The balance \"{text}\" is not a number, showing zero instead.");
        }

        Ok(balance)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Transaction>, Error> {
        self.client
            .get_json(
                endpoints::RECENT_TRANSACTIONS_API,
                &[("limit", limit.to_string())],
            )
            .await
    }
}
