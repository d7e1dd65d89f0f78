use std::sync::Arc;

use crate::{
    config::DashboardConfig,
    dashboard::Dashboard,
    endpoints,
    navigation::Navigator,
    session::Session,
    toast::ToastQueue,
    transaction::{Transaction, TransactionKind},
    user::{UserID, UserProfile},
};

use super::{FakeTransactionGateway, FakeUserGateway};

/// A dashboard wired to fake gateways, with handles to everything it uses.
pub(crate) struct Harness {
    pub dashboard: Arc<Dashboard>,
    pub transactions: Arc<FakeTransactionGateway>,
    pub users: Arc<FakeUserGateway>,
    pub session: Arc<Session>,
    pub toasts: ToastQueue,
    pub navigator: Arc<Navigator>,
    pub config: DashboardConfig,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let config = DashboardConfig::default();
        let transactions = Arc::new(FakeTransactionGateway::default());
        transactions.set_balance(Some(0.0));
        let users = Arc::new(FakeUserGateway::default());
        let session = Arc::new(Session::new(Some("test-token".to_owned())));
        let toasts = ToastQueue::new(config.toast_ttl);
        let navigator = Arc::new(Navigator::new(endpoints::DASHBOARD_VIEW));

        let dashboard = Arc::new(Dashboard::new(
            transactions.clone(),
            users.clone(),
            session.clone(),
            toasts.clone(),
            navigator.clone(),
            config,
        ));

        Self {
            dashboard,
            transactions,
            users,
            session,
            toasts,
            navigator,
            config,
        }
    }
}

pub(crate) fn sample_profile() -> UserProfile {
    UserProfile {
        id: UserID::new(7),
        tax_id: "123.456.789-09".to_owned(),
        name: "Maria Silva".to_owned(),
        email: "maria@example.com".to_owned(),
        created_at: Some("01/02/2024 10:00:00".to_owned()),
        account_ids: vec![1, 2],
        cost_center_ids: vec![3],
    }
}

fn transaction(id: i64, kind: TransactionKind, amount: f64, note: &str) -> Transaction {
    Transaction {
        id: Some(id),
        kind,
        amount,
        occurred_at: Some(format!("{:02}/01/2025 12:00:00", id.clamp(1, 28))),
        note: Some(note.to_owned()),
        owner_id: Some(7),
    }
}

pub(crate) fn inflow(id: i64, amount: f64, note: &str) -> Transaction {
    transaction(id, TransactionKind::Inflow, amount, note)
}

pub(crate) fn outflow(id: i64, amount: f64, note: &str) -> Transaction {
    transaction(id, TransactionKind::Outflow, amount, note)
}
