//! The route and API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/usuarios/{user_id}', use [format_endpoint].

/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/login";

/// The route for exchanging credentials for a bearer token.
pub const LOG_IN_API: &str = "/auth/login";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/transacoes";
/// The route to list all of the current user's transactions, optionally of one kind.
pub const MY_TRANSACTIONS_API: &str = "/transacoes/minhas";
/// The route to list the current user's most recent transactions.
pub const RECENT_TRANSACTIONS_API: &str = "/transacoes/minhas/ultimas";
/// The route to get the current user's balance.
pub const BALANCE_API: &str = "/transacoes/saldo";
/// The route to get the logged in user.
pub const CURRENT_USER_API: &str = "/usuarios/me";
/// The route to update a user.
pub const USER_API: &str = "/usuarios/{user_id}";
/// The route to delete the logged in user's account.
pub const DELETE_ACCOUNT_API: &str = "/usuarios/delete-account";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/usuarios/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.char_indices() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// Whether `url` points at the dashboard or one of its sub-routes.
pub fn is_dashboard_route(url: &str) -> bool {
    url.starts_with(DASHBOARD_VIEW)
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::{format_endpoint, is_dashboard_route};

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(endpoints::MY_TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(endpoints::RECENT_TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(endpoints::BALANCE_API);
        assert_endpoint_is_valid_uri(endpoints::CURRENT_USER_API);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::USER_API, 1));
        assert_endpoint_is_valid_uri(endpoints::DELETE_ACCOUNT_API);
    }

    #[test]
    fn format_endpoint_replaces_parameter() {
        assert_eq!(format_endpoint(endpoints::USER_API, 42), "/usuarios/42");
    }

    #[test]
    fn format_endpoint_without_parameter_is_unchanged() {
        assert_eq!(
            format_endpoint(endpoints::BALANCE_API, 42),
            endpoints::BALANCE_API
        );
    }

    #[test]
    fn dashboard_route_matches_sub_routes_only() {
        assert!(is_dashboard_route("/dashboard"));
        assert!(is_dashboard_route("/dashboard?tab=profile"));
        assert!(!is_dashboard_route("/login"));
        assert!(!is_dashboard_route("/"));
    }
}
