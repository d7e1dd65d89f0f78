//! Dashboard module
//!
//! Aggregates the user's profile, balance and transactions into one
//! observable state, keeps it fresh while mounted and runs the dashboard's
//! actions: filtering, editing the profile, adding transactions and deleting
//! the account.

mod aggregator;
mod lifecycle;
mod sequence;
mod state;

pub use aggregator::Dashboard;
pub use lifecycle::DashboardScope;
pub use state::{DashboardPhase, DashboardState};
