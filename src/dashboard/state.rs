//! The dashboard's state and the pure transitions between its states.

use std::collections::HashSet;

use crate::{
    error::ValidationError,
    transaction::{NewTransactionDraft, Transaction, TransactionFilter, TransactionView},
    user::{ProfileDraft, UserProfile},
};

/// Where the dashboard is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashboardPhase {
    /// Created but not yet mounted.
    #[default]
    Idle,
    /// The first load of the profile, balance and transactions is in flight.
    Loading,
    /// Everything has loaded at least once.
    Ready,
    /// The service rejected the session. Terminal.
    Unauthorized,
    /// The dashboard was unmounted. Terminal.
    Unmounted,
}

/// A part of the state loaded by its own request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Slice {
    Profile,
    Balance,
    Transactions,
}

impl Slice {
    pub(crate) const ALL: [Slice; 3] = [Slice::Profile, Slice::Balance, Slice::Transactions];
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// Where the dashboard is in its lifecycle.
    pub phase: DashboardPhase,
    /// The user's balance, zero until loaded.
    pub balance: f64,
    /// The listed transactions in the order the service sent them.
    pub transactions: Vec<TransactionView>,
    /// Which transactions are listed.
    pub filter: TransactionFilter,
    /// The last successfully loaded profile.
    pub profile: Option<UserProfile>,
    /// Whether a profile request is in flight.
    pub profile_loading: bool,
    /// Why the profile could not be loaded, shown inline.
    pub profile_error: Option<String>,
    /// Whether the profile panel is open.
    pub show_profile: bool,
    /// Whether the profile is being edited.
    pub edit_mode: bool,
    /// The profile edit form.
    pub edit_draft: Option<ProfileDraft>,
    /// Why the profile edit could not be saved, shown inline.
    pub edit_error: Option<ValidationError>,
    /// The new-transaction form, `None` while it is closed.
    pub new_transaction: Option<NewTransactionDraft>,
    /// Whether a new transaction is being submitted.
    pub saving_transaction: bool,
    pending: HashSet<Slice>,
}

impl DashboardState {
    /// Whether responses and user actions may still change the state.
    pub fn accepts_updates(&self) -> bool {
        !matches!(
            self.phase,
            DashboardPhase::Unauthorized | DashboardPhase::Unmounted
        )
    }

    /// Mark `slices` as waiting for a response.
    pub(crate) fn begin_loading(&mut self, slices: &[Slice]) {
        self.pending.extend(slices.iter().copied());

        if slices.contains(&Slice::Profile) {
            self.profile_loading = true;
        }
    }

    /// Start the full load done on mount and route re-entry.
    pub(crate) fn begin_reload(&mut self) {
        self.begin_loading(&Slice::ALL);

        if self.phase == DashboardPhase::Idle {
            self.phase = DashboardPhase::Loading;
        }
    }

    /// Mark `slice` as answered, successfully or not.
    pub(crate) fn resolve(&mut self, slice: Slice) {
        self.pending.remove(&slice);

        if slice == Slice::Profile {
            self.profile_loading = false;
        }

        if self.phase == DashboardPhase::Loading && self.pending.is_empty() {
            self.phase = DashboardPhase::Ready;
        }
    }

    pub(crate) fn apply_profile(&mut self, profile: UserProfile) {
        // An open edit form keeps what the user has typed.
        if !self.edit_mode {
            self.edit_draft = Some(ProfileDraft::from(&profile));
        }

        self.profile = Some(profile);
        self.profile_error = None;
    }

    pub(crate) fn fail_profile(&mut self, message: String) {
        self.profile = None;
        self.profile_error = Some(message);

        if !self.edit_mode {
            self.edit_draft = None;
        }
    }

    /// Store a balance, treating a missing or non-numeric one as zero.
    pub(crate) fn apply_balance(&mut self, balance: Option<f64>) {
        self.balance = balance.unwrap_or(0.0);
    }

    pub(crate) fn apply_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions
            .into_iter()
            .map(TransactionView::from)
            .collect();
    }

    /// Open the profile panel, leaving edit mode.
    ///
    /// Returns whether the profile still has to be loaded.
    pub(crate) fn open_profile_view(&mut self) -> bool {
        self.show_profile = true;
        self.leave_edit_mode();

        self.profile.is_none()
    }

    pub(crate) fn close_profile_view(&mut self) {
        self.show_profile = false;
        self.leave_edit_mode();
    }

    /// Start editing the loaded profile.
    ///
    /// Returns false, leaving edit mode closed, if no profile has been loaded.
    pub(crate) fn enter_edit_mode(&mut self) -> bool {
        let Some(profile) = &self.profile else {
            return false;
        };

        self.edit_draft = Some(ProfileDraft::from(profile));
        self.edit_error = None;
        self.edit_mode = true;

        true
    }

    /// Close the edit form and reset the draft to the loaded profile.
    pub(crate) fn leave_edit_mode(&mut self) {
        self.edit_mode = false;
        self.edit_error = None;
        self.edit_draft = self.profile.as_ref().map(ProfileDraft::from);
    }

    pub(crate) fn open_new_transaction_form(&mut self) {
        self.new_transaction = Some(NewTransactionDraft::default());
    }

    pub(crate) fn cancel_new_transaction_form(&mut self) {
        self.new_transaction = None;
    }

    /// Claim the single submission slot and close the form.
    ///
    /// Returns false if a submission is already in flight.
    pub(crate) fn start_submission(&mut self) -> bool {
        if self.saving_transaction {
            return false;
        }

        self.saving_transaction = true;
        self.new_transaction = None;

        true
    }
}
