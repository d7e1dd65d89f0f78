#![allow(missing_docs)]

pub(crate) mod gateways;
pub(crate) mod harness;

pub(crate) use gateways::{FakeTransactionGateway, FakeUserGateway, TransactionCall, UserCall};
pub(crate) use harness::{Harness, inflow, outflow, sample_profile};

/// Let spawned tasks run until they block again.
pub(crate) async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}
