//! Endpoint handling for the WebSocket transport

use url::Url;

use crate::common::{Error, Result};

/// Query parameter the backend reads the correlation token from
pub const SESSION_PARAM: &str = "session";

/// Validate a WebSocket endpoint and embed the optional session token.
///
/// The endpoint must be an absolute `ws://` or `wss://` URI. Existing query
/// parameters are kept; the token is appended as `?session=<token>`.
pub fn build_endpoint(endpoint: &str, session_token: Option<&str>) -> Result<Url> {
    let mut url = Url::parse(endpoint).map_err(|e| Error::invalid_endpoint(endpoint, e))?;

    match url.scheme() {
        "ws" | "wss" => {}
        other => {
            return Err(Error::invalid_endpoint(
                endpoint,
                format!("unsupported scheme '{}', expected ws or wss", other),
            ))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::invalid_endpoint(endpoint, "missing host"));
    }

    if let Some(token) = session_token {
        url.query_pairs_mut().append_pair(SESSION_PARAM, token);
    }

    Ok(url)
}
