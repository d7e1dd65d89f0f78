//! Text formatting for amounts, dates and notes shown to the user.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use unicode_segmentation::UnicodeSegmentation;

use crate::{datetime::format_transport_datetime, transaction::TransactionView};

/// The max number of graphemes to display in a transaction row before
/// truncating and displaying ellipses.
pub const MAX_NOTE_GRAPHEMES: usize = 32;

/// Format `number` as a currency amount with two decimal places, e.g. "$1,234.50".
pub fn currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let formatted = if number < 0.0 {
        negative_fmt
            .as_ref()
            .map(|formatter| formatter.fmt_string(number.abs()))
    } else if number > 0.0 {
        positive_fmt
            .as_ref()
            .map(|formatter| formatter.fmt_string(number))
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        Some("$0.00".to_owned())
    };

    let Some(mut formatted_string) = formatted else {
        return format!("${number:.2}");
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    let bytes = formatted_string.as_bytes();
    if bytes.len() < 3 || bytes[bytes.len() - 3] != b'.' {
        if bytes.len() >= 2 && bytes[bytes.len() - 2] == b'.' {
            formatted_string.push('0');
        } else if !formatted_string.contains('.') {
            formatted_string.push_str(".00");
        }
    }

    formatted_string
}

/// Shorten `note` to [MAX_NOTE_GRAPHEMES], ending in "..." when truncated.
pub fn truncate_note(note: &str) -> String {
    let note_length = note.graphemes(true).count();

    if note_length <= MAX_NOTE_GRAPHEMES {
        note.to_owned()
    } else {
        let truncated: String = note.graphemes(true).take(MAX_NOTE_GRAPHEMES - 3).collect();
        truncated + "..."
    }
}

/// The date shown for a transaction: the parsed timestamp when available,
/// otherwise whatever the service sent, otherwise a dash.
pub fn occurred_at_label(transaction: &TransactionView) -> String {
    match (transaction.occurred_at, &transaction.occurred_at_raw) {
        (Some(occurred_at), _) => format_transport_datetime(occurred_at),
        (None, Some(raw)) => raw.clone(),
        (None, None) => "-".to_owned(),
    }
}
