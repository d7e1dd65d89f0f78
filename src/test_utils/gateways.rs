//! In-memory gateways that record their calls.
//!
//! Responses are decided when a call starts, so a call held back by a gate
//! answers with the data as it was when the call was made.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, mpsc},
};

use async_trait::async_trait;
use tokio::sync::{Semaphore, oneshot};

use crate::{
    Error,
    gateway::{TransactionGateway, UserGateway},
    transaction::{Transaction, TransactionKind},
    user::{ProfileUpdate, UserID, UserProfile},
};

use super::sample_profile;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TransactionCall {
    Create(Transaction),
    ListMine(Option<TransactionKind>),
    Balance,
    ListRecent(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UserCall {
    GetCurrent,
    Update(UserID, ProfileUpdate),
    DeleteAccount,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap()
}

/// Wait for `gate` to be opened with [Semaphore::add_permits].
async fn pass(gate: Option<Arc<Semaphore>>) {
    if let Some(gate) = gate {
        gate.acquire().await.unwrap().forget();
    }
}

#[derive(Default)]
pub(crate) struct FakeTransactionGateway {
    transactions: Mutex<Vec<Transaction>>,
    balance: Mutex<Option<f64>>,
    balance_error: Mutex<Option<Error>>,
    list_error: Mutex<Option<Error>>,
    create_error: Mutex<Option<Error>>,
    list_gates: Mutex<VecDeque<Arc<Semaphore>>>,
    create_gate: Mutex<Option<Arc<Semaphore>>>,
    balance_block: Mutex<Option<(oneshot::Sender<()>, mpsc::Receiver<()>)>>,
    calls: Mutex<Vec<TransactionCall>>,
}

impl FakeTransactionGateway {
    pub(crate) fn set_transactions(&self, transactions: Vec<Transaction>) {
        *lock(&self.transactions) = transactions;
    }

    pub(crate) fn set_balance(&self, balance: Option<f64>) {
        *lock(&self.balance) = balance;
        *lock(&self.balance_error) = None;
    }

    pub(crate) fn fail_balance(&self, error: Error) {
        *lock(&self.balance_error) = Some(error);
    }

    pub(crate) fn fail_lists(&self, error: Error) {
        *lock(&self.list_error) = Some(error);
    }

    pub(crate) fn fail_create(&self, error: Error) {
        *lock(&self.create_error) = Some(error);
    }

    /// Hold back the next list call that has no gate yet until the returned
    /// gate is given a permit.
    pub(crate) fn gate_next_list(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        lock(&self.list_gates).push_back(Arc::clone(&gate));
        gate
    }

    pub(crate) fn gate_next_create(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *lock(&self.create_gate) = Some(Arc::clone(&gate));
        gate
    }

    /// Block the thread polling the next balance call until the returned
    /// sender is used or dropped.
    ///
    /// Unlike the list gates this stalls the whole task, so the other futures
    /// joined with the balance call are not polled either. The returned
    /// receiver fires once the call has started.
    pub(crate) fn block_next_balance(&self) -> (oneshot::Receiver<()>, mpsc::Sender<()>) {
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *lock(&self.balance_block) = Some((started_tx, release_rx));
        (started_rx, release_tx)
    }

    pub(crate) fn calls(&self) -> Vec<TransactionCall> {
        lock(&self.calls).clone()
    }

    fn list(
        &self,
        call: TransactionCall,
        select: impl FnOnce(&[Transaction]) -> Vec<Transaction>,
    ) -> (Result<Vec<Transaction>, Error>, Option<Arc<Semaphore>>) {
        lock(&self.calls).push(call);

        let result = match lock(&self.list_error).clone() {
            Some(error) => Err(error),
            None => Ok(select(&lock(&self.transactions))),
        };

        (result, lock(&self.list_gates).pop_front())
    }
}

#[async_trait]
impl TransactionGateway for FakeTransactionGateway {
    async fn create(&self, transaction: &Transaction) -> Result<Transaction, Error> {
        lock(&self.calls).push(TransactionCall::Create(transaction.clone()));
        let gate = lock(&self.create_gate).take();
        let error = lock(&self.create_error).clone();

        pass(gate).await;

        if let Some(error) = error {
            return Err(error);
        }

        let mut transactions = lock(&self.transactions);
        let mut created = transaction.clone();
        created.id = Some(transactions.len() as i64 + 1);
        created.owner_id = Some(sample_profile().id.as_i64());
        transactions.insert(0, created.clone());

        Ok(created)
    }

    async fn list_mine(&self, kind: Option<TransactionKind>) -> Result<Vec<Transaction>, Error> {
        let (result, gate) = self.list(TransactionCall::ListMine(kind), |transactions| {
            transactions
                .iter()
                .filter(|transaction| kind.is_none_or(|kind| transaction.kind == kind))
                .cloned()
                .collect()
        });

        pass(gate).await;
        result
    }

    async fn balance(&self) -> Result<Option<f64>, Error> {
        lock(&self.calls).push(TransactionCall::Balance);

        let block = lock(&self.balance_block).take();
        if let Some((started, release)) = block {
            let _ = started.send(());
            let _ = release.recv();
        }

        match lock(&self.balance_error).clone() {
            Some(error) => Err(error),
            None => Ok(*lock(&self.balance)),
        }
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Transaction>, Error> {
        let (result, gate) = self.list(TransactionCall::ListRecent(limit), |transactions| {
            transactions.iter().take(limit).cloned().collect()
        });

        pass(gate).await;
        result
    }
}

pub(crate) struct FakeUserGateway {
    profile: Mutex<UserProfile>,
    get_error: Mutex<Option<Error>>,
    update_error: Mutex<Option<Error>>,
    delete_error: Mutex<Option<Error>>,
    calls: Mutex<Vec<UserCall>>,
}

impl Default for FakeUserGateway {
    fn default() -> Self {
        Self {
            profile: Mutex::new(sample_profile()),
            get_error: Mutex::default(),
            update_error: Mutex::default(),
            delete_error: Mutex::default(),
            calls: Mutex::default(),
        }
    }
}

impl FakeUserGateway {
    pub(crate) fn fail_get(&self, error: Error) {
        *lock(&self.get_error) = Some(error);
    }

    pub(crate) fn fail_update(&self, error: Error) {
        *lock(&self.update_error) = Some(error);
    }

    pub(crate) fn fail_delete(&self, error: Error) {
        *lock(&self.delete_error) = Some(error);
    }

    pub(crate) fn calls(&self) -> Vec<UserCall> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl UserGateway for FakeUserGateway {
    async fn get_current(&self) -> Result<UserProfile, Error> {
        lock(&self.calls).push(UserCall::GetCurrent);

        match lock(&self.get_error).clone() {
            Some(error) => Err(error),
            None => Ok(lock(&self.profile).clone()),
        }
    }

    async fn update(&self, id: UserID, profile: &ProfileUpdate) -> Result<(), Error> {
        lock(&self.calls).push(UserCall::Update(id, profile.clone()));

        match lock(&self.update_error).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn delete_account(&self) -> Result<(), Error> {
        lock(&self.calls).push(UserCall::DeleteAccount);

        match lock(&self.delete_error).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
