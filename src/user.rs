//! The logged in user's profile and the draft behind the profile edit form.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The logged in user as returned by the finance service.
///
/// The password is write-only, so it never appears here. See [ProfileDraft].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's ID.
    pub id: UserID,
    /// The user's tax ID (CPF).
    #[serde(rename = "cpf")]
    pub tax_id: String,
    /// The user's display name.
    #[serde(rename = "nome")]
    pub name: String,
    /// The user's email address, also used to log in.
    pub email: String,
    /// When the account was created, formatted by the service.
    #[serde(rename = "dataCriacao", default)]
    pub created_at: Option<String>,
    /// The IDs of the bank accounts owned by the user.
    #[serde(rename = "contasIds", default)]
    pub account_ids: Vec<i64>,
    /// The IDs of the cost centres owned by the user.
    #[serde(rename = "centrosCustoIds", default)]
    pub cost_center_ids: Vec<i64>,
}

/// A transient, editable copy of a [UserProfile].
///
/// Always created from the last successfully loaded profile, with the password
/// cleared. The service requires the password to be re-entered on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    /// The ID of the user being edited.
    pub id: UserID,
    /// The user's tax ID (CPF).
    pub tax_id: String,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The user's current password, required to save the edit.
    pub password: String,
    /// Carried over from the profile unchanged.
    pub account_ids: Vec<i64>,
    /// Carried over from the profile unchanged.
    pub cost_center_ids: Vec<i64>,
}

impl From<&UserProfile> for ProfileDraft {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            tax_id: profile.tax_id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            password: String::new(),
            account_ids: profile.account_ids.clone(),
            cost_center_ids: profile.cost_center_ids.clone(),
        }
    }
}

impl ProfileDraft {
    /// Check the draft can be sent to the service.
    ///
    /// # Errors
    /// Returns [ValidationError::PasswordRequired] if the password is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.password.is_empty() {
            return Err(ValidationError::PasswordRequired);
        }

        Ok(())
    }

    /// The request body for updating the user.
    ///
    /// The service replaces the user's account and cost centre links with the
    /// lists in the body, so the ones from the loaded profile are sent back
    /// unchanged. Empty lists would unlink them all.
    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            id: self.id,
            tax_id: self.tax_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            account_ids: self.account_ids.clone(),
            cost_center_ids: self.cost_center_ids.clone(),
        }
    }
}

/// The request body for updating a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct ProfileUpdate {
    pub id: UserID,
    #[serde(rename = "cpf")]
    pub tax_id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "contasIds")]
    pub account_ids: Vec<i64>,
    #[serde(rename = "centrosCustoIds")]
    pub cost_center_ids: Vec<i64>,
}
