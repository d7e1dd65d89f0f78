//! Helpers for logging requests to and responses from the finance service.

use serde_json::Value;

/// Request and response bodies longer than this many characters are truncated
/// at the `debug` level and logged in full at the `trace` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Fields whose values must never appear in the logs.
const REDACTED_FIELDS: [&str; 3] = ["password", "senha", "token"];

const REDACTED: &str = "********";

/// Replace the values of password-like fields with asterisks.
///
/// Nested objects and arrays are redacted too.
pub fn redact_secrets(body: &Value) -> Value {
    match body {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, value)| {
                    let value = if REDACTED_FIELDS.contains(&name.as_str()) {
                        Value::String(REDACTED.to_owned())
                    } else {
                        redact_secrets(value)
                    };

                    (name.clone(), value)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_secrets).collect()),
        other => other.clone(),
    }
}

/// Log an outgoing request and its body, if any, with secrets redacted.
pub fn log_request(method: &reqwest::Method, url: &str, body: Option<&Value>) {
    match body {
        Some(body) => {
            let body = redact_secrets(body).to_string();
            log_with_body(&format!("Sending {method} {url}"), &body);
        }
        None => tracing::debug!("Sending {method} {url}"),
    }
}

/// Log a response from the service.
pub fn log_response(method: &reqwest::Method, url: &str, status: reqwest::StatusCode, body: &str) {
    log_with_body(&format!("Received {status} for {method} {url}"), body);
}

fn log_with_body(summary: &str, body: &str) {
    if body.chars().count() > LOG_BODY_LENGTH_LIMIT {
        let truncated: String = body.chars().take(LOG_BODY_LENGTH_LIMIT).collect();
        tracing::debug!("{summary}\nbody: {truncated}...");
        tracing::trace!("Full body: {body:?}");
    } else {
        tracing::debug!("{summary}\nbody: {body:?}");
    }
}
