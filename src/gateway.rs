//! The boundaries between the dashboard and the finance service.
//!
//! The dashboard only talks to these traits. [crate::http] implements them
//! over HTTP, and tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::{
    Error,
    transaction::{Transaction, TransactionKind},
    user::{ProfileUpdate, UserID, UserProfile},
};

/// Reads and creates the logged in user's transactions.
///
/// Every method fails with [Error::Unauthorized] when the service rejects the
/// session.
#[async_trait]
pub trait TransactionGateway: Send + Sync {
    /// Store a new transaction and return it as the service saved it.
    async fn create(&self, transaction: &Transaction) -> Result<Transaction, Error>;

    /// Every transaction of the user, optionally only those of `kind`.
    async fn list_mine(&self, kind: Option<TransactionKind>) -> Result<Vec<Transaction>, Error>;

    /// The user's balance, or `None` if the service sent something that is
    /// not a number.
    async fn balance(&self) -> Result<Option<f64>, Error>;

    /// The user's `limit` most recent transactions, newest first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Transaction>, Error>;
}

/// Reads and changes the logged in user's profile.
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// The logged in user.
    async fn get_current(&self) -> Result<UserProfile, Error>;

    /// Replace the details of the user with `id`.
    async fn update(&self, id: UserID, profile: &ProfileUpdate) -> Result<(), Error>;

    /// Permanently delete the logged in user's account.
    async fn delete_account(&self) -> Result<(), Error>;
}
