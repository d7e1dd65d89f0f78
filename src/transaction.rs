//! Transactions as the finance service sends them, the dashboard's derived
//! view of them, and the draft behind the new-transaction form.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::PrimitiveDateTime;

use crate::{
    datetime::{local_input_to_transport, parse_transport_datetime},
    error::ValidationError,
};

/// The service-assigned ID of a transaction.
pub type TransactionId = i64;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money coming into the account, e.g. a salary.
    #[serde(rename = "ENTRADA")]
    Inflow,
    /// Money leaving the account, e.g. rent.
    #[serde(rename = "SAIDA")]
    Outflow,
}

impl TransactionKind {
    /// The value the service expects in the `tipo` query parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Inflow => "ENTRADA",
            Self::Outflow => "SAIDA",
        }
    }

    /// A human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Inflow => "Inflow",
            Self::Outflow => "Outflow",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inflow" | "in" | "entrada" => Ok(Self::Inflow),
            "outflow" | "out" | "saida" => Ok(Self::Outflow),
            other => Err(format!(
                "unknown transaction kind \"{other}\", expected \"inflow\" or \"outflow\""
            )),
        }
    }
}

/// An inflow or outflow of money recorded by the finance service.
///
/// Transactions are immutable once the service has stored them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, absent until the service has stored it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TransactionId>,
    /// Whether money came in or went out.
    #[serde(rename = "tipo")]
    pub kind: TransactionKind,
    /// The amount of money moved, always positive. The direction is given by `kind`.
    #[serde(rename = "valor")]
    pub amount: f64,
    /// When the transaction happened, as `dd/mm/yyyy HH:mm:ss`.
    ///
    /// When a new transaction is sent without a date the service uses the
    /// current time.
    #[serde(rename = "data", default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<String>,
    /// A text description of what the transaction was for.
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// The user the transaction belongs to. Set by the service, never sent.
    #[serde(rename = "usuarioId", default, skip_serializing)]
    pub owner_id: Option<i64>,
}

/// A transaction as displayed on the dashboard.
///
/// Derived from [Transaction] every time the list is refreshed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionView {
    /// The ID of the transaction.
    pub id: Option<TransactionId>,
    /// Whether money came in or went out.
    pub kind: TransactionKind,
    /// The amount of money moved, always positive.
    pub amount: f64,
    /// The date-time string exactly as the service sent it.
    pub occurred_at_raw: Option<String>,
    /// The parsed date-time, absent if the service sent none or it was malformed.
    pub occurred_at: Option<PrimitiveDateTime>,
    /// A text description of what the transaction was for.
    pub note: Option<String>,
}

impl TransactionView {
    /// The amount with outflows negated.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Inflow => self.amount,
            TransactionKind::Outflow => -self.amount,
        }
    }
}

impl From<Transaction> for TransactionView {
    fn from(transaction: Transaction) -> Self {
        let occurred_at = transaction
            .occurred_at
            .as_deref()
            .and_then(parse_transport_datetime);

        Self {
            id: transaction.id,
            kind: transaction.kind,
            amount: transaction.amount,
            occurred_at_raw: transaction.occurred_at,
            occurred_at,
            note: transaction.note,
        }
    }
}

/// Which transactions the dashboard lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionFilter {
    /// The most recent transactions of any kind.
    #[default]
    All,
    /// Every inflow.
    Inflow,
    /// Every outflow.
    Outflow,
}

impl TransactionFilter {
    /// The kind to request from the service, or `None` for the recent view.
    pub fn kind(self) -> Option<TransactionKind> {
        match self {
            Self::All => None,
            Self::Inflow => Some(TransactionKind::Inflow),
            Self::Outflow => Some(TransactionKind::Outflow),
        }
    }
}

impl Display for TransactionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::All => "all",
            Self::Inflow => "inflow",
            Self::Outflow => "outflow",
        };

        f.write_str(label)
    }
}

impl FromStr for TransactionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        match TransactionKind::from_str(s)? {
            TransactionKind::Inflow => Ok(Self::Inflow),
            TransactionKind::Outflow => Ok(Self::Outflow),
        }
    }
}

/// The contents of the new-transaction form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransactionDraft {
    /// Whether money came in or went out. `None` if the user has not chosen.
    pub kind: Option<TransactionKind>,
    /// The amount of money moved. Must be greater than zero to submit.
    pub amount: f64,
    /// The local date-time input, `yyyy-mm-ddThh:mm`, or empty to let the
    /// service use the current time.
    pub occurred_at_local: String,
    /// A text description of what the transaction was for.
    pub note: String,
}

impl Default for NewTransactionDraft {
    fn default() -> Self {
        Self {
            kind: Some(TransactionKind::Inflow),
            amount: 0.0,
            occurred_at_local: String::new(),
            note: String::new(),
        }
    }
}

impl NewTransactionDraft {
    /// Check the draft can be submitted.
    ///
    /// # Errors
    /// Returns a [ValidationError::MissingKind] if no kind was chosen or a
    /// [ValidationError::NonPositiveAmount] if the amount is not greater than zero.
    pub fn validate(&self) -> Result<TransactionKind, ValidationError> {
        let kind = self.kind.ok_or(ValidationError::MissingKind)?;

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }

        Ok(kind)
    }

    /// Validate the draft and convert it into the transaction to send.
    ///
    /// A date-time input that is empty or malformed is left out, in which case
    /// the service records the current time.
    ///
    /// # Errors
    /// Returns the same errors as [NewTransactionDraft::validate].
    pub fn into_transaction(self) -> Result<Transaction, ValidationError> {
        let kind = self.validate()?;
        let note = self.note.trim();

        Ok(Transaction {
            id: None,
            kind,
            amount: self.amount,
            occurred_at: local_input_to_transport(&self.occurred_at_local),
            note: (!note.is_empty()).then(|| note.to_owned()),
            owner_id: None,
        })
    }
}

/// Read a balance the service sent as a JSON number, a numeric string, or null.
///
/// Returns `None` for anything that is not a finite number.
pub fn coerce_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    amount.filter(|amount| amount.is_finite())
}
