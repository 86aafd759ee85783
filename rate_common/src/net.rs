//! Endpoint constants and helpers for the rate server connection.
use std::time::Duration;

use url::Url;

use crate::error::RateError;

/// Host used when none is given on the command line.
pub const DEFAULT_HOST: &str = "localhost:8888";
/// Path of the WebSocket endpoint on the server host.
pub const WS_PATH: &str = "/ws";
/// Fixed interval of the liveness check that re-opens a closed connection.
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

/// Build the WebSocket endpoint for `host`, using `wss` when `secure` is set.
///
/// `host` may carry a port (`example.com:8888`). A missing leading slash on `path`
/// is added.
pub fn endpoint(host: &str, path: &str, secure: bool) -> Result<Url, RateError> {
    let scheme = if secure { "wss" } else { "ws" };
    let host = host.trim().trim_matches('"');
    if host.is_empty() {
        return Err(RateError::Format("empty server host".to_string()));
    }
    let path = path.trim();
    let url = if path.starts_with('/') {
        format!("{scheme}://{host}{path}")
    } else {
        format!("{scheme}://{host}/{path}")
    };
    Ok(Url::parse(&url)?)
}
