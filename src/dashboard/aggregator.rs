//! The dashboard aggregator: loads the profile, balance and transactions and
//! runs the user's actions against the gateways.

use std::sync::{Arc, atomic::AtomicBool};

use tokio::sync::watch;

use crate::{
    Error,
    config::DashboardConfig,
    endpoints,
    gateway::{TransactionGateway, UserGateway},
    navigation::Navigator,
    session::SessionProvider,
    toast::ToastQueue,
    transaction::{NewTransactionDraft, Transaction, TransactionFilter},
    user::ProfileDraft,
};

use super::{
    sequence::{SliceSequences, Ticket},
    state::{DashboardPhase, DashboardState, Slice},
};

const PROFILE_LOAD_FAILED: &str = "Could not load your details. Try again later.";
const PROFILE_UPDATED: &str = "Your details have been updated.";
const PROFILE_UPDATE_FAILED: &str = "Could not update your details.";
const TRANSACTION_CREATED: &str = "Transaction added.";
const TRANSACTION_CREATE_FAILED: &str = "Could not add the transaction.";
const ACCOUNT_DELETED: &str = "Your account has been deleted.";
const ACCOUNT_DELETE_FAILED: &str = "Could not delete your account.";

/// The single owner of the dashboard's state.
///
/// Every response is applied to the slice of state it belongs to, so one
/// failing request never blocks the others. A 401 or 403 from any request
/// logs the user out and sends them to the log in page, after which the
/// dashboard ignores every further response.
///
/// Use [Dashboard::mount] to start the background refresh.
pub struct Dashboard {
    transactions: Arc<dyn TransactionGateway>,
    users: Arc<dyn UserGateway>,
    session: Arc<dyn SessionProvider>,
    toasts: ToastQueue,
    pub(super) navigator: Arc<Navigator>,
    pub(super) config: DashboardConfig,
    state: watch::Sender<DashboardState>,
    sequences: SliceSequences,
    pub(super) mounted: AtomicBool,
}

impl Dashboard {
    /// Create an idle dashboard.
    pub fn new(
        transactions: Arc<dyn TransactionGateway>,
        users: Arc<dyn UserGateway>,
        session: Arc<dyn SessionProvider>,
        toasts: ToastQueue,
        navigator: Arc<Navigator>,
        config: DashboardConfig,
    ) -> Self {
        let (state, _) = watch::channel(DashboardState::default());

        Self {
            transactions,
            users,
            session,
            toasts,
            navigator,
            config,
            state,
            sequences: SliceSequences::default(),
            mounted: AtomicBool::new(false),
        }
    }

    /// A copy of the current state.
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Watch the state for changes.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// The queue the dashboard reports outcomes to.
    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    /// Whether the dashboard still accepts responses and actions.
    pub fn is_active(&self) -> bool {
        self.state.borrow().accepts_updates()
    }

    /// Load the user's profile.
    ///
    /// A failure other than an auth failure clears the profile and records an
    /// inline error.
    pub async fn load_profile(&self) {
        let Some(ticket) = self.begin(Slice::Profile) else {
            return;
        };

        match self.users.get_current().await {
            Ok(profile) => {
                self.apply(Slice::Profile, ticket, |state| state.apply_profile(profile));
            }
            Err(error) if error.is_auth_failure() => self.handle_auth_failure(),
            Err(error) => {
                tracing::error!("Could not load the user profile: {error}");
                self.apply(Slice::Profile, ticket, |state| {
                    state.fail_profile(PROFILE_LOAD_FAILED.to_owned())
                });
            }
        }
    }

    /// Load the user's balance.
    ///
    /// A failure other than an auth failure is only logged and the last
    /// balance is kept.
    pub async fn load_balance(&self) {
        let Some(ticket) = self.begin(Slice::Balance) else {
            return;
        };

        match self.transactions.balance().await {
            Ok(balance) => {
                self.apply(Slice::Balance, ticket, |state| state.apply_balance(balance));
            }
            Err(error) if error.is_auth_failure() => self.handle_auth_failure(),
            Err(error) => {
                tracing::error!("Could not load the balance: {error}");
                self.apply(Slice::Balance, ticket, |_| ());
            }
        }
    }

    /// Load the transactions selected by `filter` and make it the active
    /// filter.
    ///
    /// [TransactionFilter::All] lists the most recent transactions, any other
    /// filter lists every transaction of that kind. A failure other than an
    /// auth failure is only logged and the last list is kept.
    pub async fn load_transactions(&self, filter: TransactionFilter) {
        self.fetch_transactions(Some(filter)).await;
    }

    /// Load the transactions for `filter`, or for the active filter if `None`.
    async fn fetch_transactions(&self, filter: Option<TransactionFilter>) {
        let Some((ticket, filter)) = self.begin_transactions(filter) else {
            return;
        };

        let result = match filter.kind() {
            None => self.transactions.list_recent(self.config.recent_limit).await,
            Some(kind) => self.transactions.list_mine(Some(kind)).await,
        };

        match result {
            Ok(transactions) => {
                self.apply(Slice::Transactions, ticket, |state| {
                    state.apply_transactions(transactions)
                });
            }
            Err(error) if error.is_auth_failure() => self.handle_auth_failure(),
            Err(error) => {
                tracing::error!("Could not load the {filter} transactions: {error}");
                self.apply(Slice::Transactions, ticket, |_| ());
            }
        }
    }

    /// Change which transactions are listed and fetch them.
    pub async fn set_filter(&self, filter: TransactionFilter) {
        self.fetch_transactions(Some(filter)).await;
    }

    /// Refresh the balance and transaction list.
    pub async fn refresh(&self) {
        if self
            .mutate(|state| state.begin_loading(&[Slice::Balance, Slice::Transactions]))
            .is_none()
        {
            return;
        }

        tokio::join!(self.load_balance(), self.fetch_transactions(None));
    }

    /// Load the profile, balance and transaction list.
    pub async fn reload(&self) {
        if self.mutate(DashboardState::begin_reload).is_none() {
            return;
        }

        tokio::join!(
            self.load_profile(),
            self.load_balance(),
            self.fetch_transactions(None)
        );
    }

    /// Show the profile panel.
    ///
    /// Leaves edit mode and loads the profile if it has not been loaded yet.
    pub async fn open_profile_view(&self) {
        if self.mutate(DashboardState::open_profile_view) == Some(true) {
            self.load_profile().await;
        }
    }

    /// Hide the profile panel.
    ///
    /// This also leaves edit mode and resets the draft from the profile, so
    /// reopening the panel never shows a half-finished edit.
    pub fn close_profile_view(&self) {
        self.mutate(DashboardState::close_profile_view);
    }

    /// Start editing the profile.
    ///
    /// If no profile has been loaded this loads it instead and stays out of
    /// edit mode.
    pub async fn enter_edit_mode(&self) {
        if self.mutate(DashboardState::enter_edit_mode) == Some(false) {
            tracing::debug!("No profile loaded yet, loading it instead of editing.");
            self.load_profile().await;
        }
    }

    /// Stop editing the profile and discard the draft.
    pub fn cancel_edit_mode(&self) {
        self.mutate(DashboardState::leave_edit_mode);
    }

    /// Save the edited profile.
    ///
    /// The draft is kept in the state so that it survives a failed save. On
    /// success edit mode closes and the profile is reloaded.
    ///
    /// # Errors
    /// Returns [Error::Validation] without contacting the service if the
    /// password is empty, [Error::NotEditing] if edit mode is closed,
    /// [Error::Inactive] if the dashboard no longer accepts actions, or the
    /// gateway's error if the update failed.
    pub async fn save_profile_edit(&self, draft: ProfileDraft) -> Result<(), Error> {
        self.ensure_active()?;

        if !self.state.borrow().edit_mode {
            return Err(Error::NotEditing);
        }

        if let Err(error) = draft.validate() {
            self.mutate(|state| {
                state.edit_draft = Some(draft);
                state.edit_error = Some(error);
            });

            return Err(error.into());
        }

        let id = draft.id;
        let update = draft.to_update();
        self.mutate(|state| {
            state.edit_draft = Some(draft);
            state.edit_error = None;
        });

        match self.users.update(id, &update).await {
            Ok(()) => {
                tracing::info!("Updated the details of user {id}.");
                self.mutate(DashboardState::leave_edit_mode);
                self.toasts.success(PROFILE_UPDATED, None);
                self.load_profile().await;

                Ok(())
            }
            Err(error) if error.is_auth_failure() => {
                self.handle_auth_failure();
                Err(error)
            }
            Err(error) => {
                tracing::error!("Could not update the details of user {id}: {error}");
                self.toasts.error(PROFILE_UPDATE_FAILED, None);
                Err(error)
            }
        }
    }

    /// Open the new-transaction form with an empty inflow draft.
    pub fn open_new_transaction_form(&self) {
        self.mutate(DashboardState::open_new_transaction_form);
    }

    /// Close the new-transaction form without submitting it.
    pub fn cancel_new_transaction_form(&self) {
        self.mutate(DashboardState::cancel_new_transaction_form);
    }

    /// Submit a new transaction.
    ///
    /// An invalid draft is reported with an info toast and never sent. A valid
    /// one closes the form before it is sent. On success the balance and
    /// transaction list are reloaded.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the draft has no kind or a non-positive
    /// amount, [Error::SubmissionInFlight] if another submission has not
    /// finished, [Error::Inactive] if the dashboard no longer accepts actions,
    /// or the gateway's error if the service rejected the transaction.
    pub async fn submit_new_transaction(
        &self,
        draft: NewTransactionDraft,
    ) -> Result<Transaction, Error> {
        self.ensure_active()?;

        let transaction = match draft.into_transaction() {
            Ok(transaction) => transaction,
            Err(error) => {
                self.toasts.info(error.to_string(), None);
                return Err(error.into());
            }
        };

        match self.mutate(DashboardState::start_submission) {
            None => return Err(Error::Inactive),
            Some(false) => return Err(Error::SubmissionInFlight),
            Some(true) => {}
        }

        let result = self.transactions.create(&transaction).await;
        self.mutate(|state| state.saving_transaction = false);

        match result {
            Ok(created) => {
                tracing::info!(
                    "Created {} transaction of {}.",
                    created.kind.label(),
                    created.amount
                );
                self.toasts.success(TRANSACTION_CREATED, None);

                tokio::join!(self.load_balance(), self.fetch_transactions(None));

                Ok(created)
            }
            Err(error) if error.is_auth_failure() => {
                self.handle_auth_failure();
                Err(error)
            }
            Err(error) => {
                tracing::error!("Could not create the transaction: {error}");
                self.toasts.error(TRANSACTION_CREATE_FAILED, None);
                Err(error)
            }
        }
    }

    /// Permanently delete the user's account, then log out.
    ///
    /// # Errors
    /// Returns [Error::Inactive] if the dashboard no longer accepts actions or
    /// the gateway's error if the account could not be deleted.
    pub async fn delete_account(&self) -> Result<(), Error> {
        self.ensure_active()?;

        match self.users.delete_account().await {
            Ok(()) => {
                tracing::info!("Deleted the user's account.");
                self.toasts.info(ACCOUNT_DELETED, None);
                self.mark_signed_out();
                self.end_session();

                Ok(())
            }
            Err(error) if error.is_auth_failure() => {
                self.handle_auth_failure();
                Err(error)
            }
            Err(error) => {
                tracing::error!("Could not delete the user's account: {error}");
                self.toasts.error(ACCOUNT_DELETE_FAILED, None);
                Err(error)
            }
        }
    }

    /// Move to the terminal unmounted phase.
    pub(super) fn mark_unmounted(&self) {
        self.state.send_if_modified(|state| {
            if !state.accepts_updates() {
                return false;
            }

            state.phase = DashboardPhase::Unmounted;
            true
        });
    }

    fn ensure_active(&self) -> Result<(), Error> {
        if self.is_active() {
            Ok(())
        } else {
            Err(Error::Inactive)
        }
    }

    /// Apply `change` unless the dashboard has been torn down.
    ///
    /// Returns `None` if the change was not applied.
    fn mutate<R>(&self, change: impl FnOnce(&mut DashboardState) -> R) -> Option<R> {
        let mut result = None;

        self.state.send_if_modified(|state| {
            if !state.accepts_updates() {
                return false;
            }

            result = Some(change(state));
            true
        });

        result
    }

    /// Issue a ticket for a request for `slice`, or `None` if the dashboard
    /// has been torn down.
    fn begin(&self, slice: Slice) -> Option<Ticket> {
        let ticket = self.sequences.get(slice).issue();

        self.mutate(|state| state.begin_loading(&[slice]))
            .map(|_| ticket)
    }

    /// Issue a ticket for a transactions request together with the filter it
    /// is for, switching to `filter` first if one is given.
    ///
    /// The filter is read in the same state update that issues the ticket, so
    /// the newest ticket is always for the active filter.
    fn begin_transactions(
        &self,
        filter: Option<TransactionFilter>,
    ) -> Option<(Ticket, TransactionFilter)> {
        let sequence = self.sequences.get(Slice::Transactions);

        self.mutate(|state| {
            if let Some(filter) = filter {
                state.filter = filter;
            }

            state.begin_loading(&[Slice::Transactions]);
            (sequence.issue(), state.filter)
        })
    }

    /// Apply the response to the request with `ticket` if it is still the
    /// newest request for `slice`.
    fn apply(&self, slice: Slice, ticket: Ticket, change: impl FnOnce(&mut DashboardState)) {
        let sequence = self.sequences.get(slice);
        let mut applied = false;

        self.state.send_if_modified(|state| {
            if !state.accepts_updates() || !sequence.is_latest(ticket) {
                return false;
            }

            change(state);
            state.resolve(slice);
            applied = true;
            true
        });

        if !applied {
            tracing::debug!("Discarded a stale {slice:?} response.");
        }
    }

    /// Tear down the session after the service rejected it.
    ///
    /// Only the first auth failure logs out and navigates, and failures after
    /// the dashboard was unmounted are ignored.
    fn handle_auth_failure(&self) {
        if self.mark_signed_out() {
            tracing::warn!("The session was rejected, logging out.");
            self.end_session();
        } else {
            tracing::debug!("Ignoring an auth failure after the dashboard was torn down.");
        }
    }

    fn mark_signed_out(&self) -> bool {
        self.state.send_if_modified(|state| {
            if !state.accepts_updates() {
                return false;
            }

            state.phase = DashboardPhase::Unauthorized;
            true
        })
    }

    fn end_session(&self) {
        self.session.logout();
        self.navigator.navigate(endpoints::LOG_IN_VIEW);
    }
}
