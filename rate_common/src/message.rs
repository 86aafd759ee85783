//! Messages pushed by the rate server over the WebSocket.
//!
//! Every text frame is a JSON object tagged by `type`. The client is a pure subscriber,
//! so only the inbound side is modelled here.
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Deserializer};

use crate::error::RateError;

/// Inbound server message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once after the socket opens; assigns the observer identity.
    ConnectionEstablished {
        /// Identity assigned to this viewer by the server.
        observer_id: String,
        /// Optional greeting text.
        #[serde(default)]
        message: Option<String>,
    },
    /// A complete rate snapshot replacing whatever was shown before.
    CurrencyUpdate {
        /// The snapshot itself.
        data: RateSnapshot,
        /// Echo of the receiving observer's id. Not used for display.
        #[serde(default)]
        observer_id: Option<String>,
    },
}

/// One complete currency-rate update.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RateSnapshot {
    /// Server-side time of the update, shown verbatim.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Rate of each currency against the reference currency, in payload order.
    /// Missing or `null` means no rows.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub currencies: IndexMap<String, f64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<IndexMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let currencies = Option::<IndexMap<String, f64>>::deserialize(deserializer)?;
    Ok(currencies.unwrap_or_default())
}

impl RateSnapshot {
    /// Builds a snapshot from `(code, rate)` pairs, keeping their order.
    pub fn new<I, S>(timestamp: Option<&str>, currencies: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            timestamp: timestamp.map(str::to_string),
            currencies: currencies
                .into_iter()
                .map(|(code, rate)| (code.into(), rate))
                .collect(),
        }
    }
}

impl ServerMessage {
    /// Parse a text frame.
    pub fn parse(text: &str) -> Result<Self, RateError> {
        let message = serde_json::from_str(text)?;
        Ok(message)
    }

    /// Decode a text frame. Unknown message types and malformed payloads yield `None`.
    pub fn decode(text: &str) -> Option<Self> {
        match Self::parse(text) {
            Ok(message) => Some(message),
            Err(e) => {
                debug!("Ignoring unrecognised message ({}): {}", e, text);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_decode_connection_established() {
        let text = r#"{"type":"connection_established","observer_id":"obs-42","message":"hi"}"#;
        assert_eq!(
            ServerMessage::decode(text),
            Some(ServerMessage::ConnectionEstablished {
                observer_id: "obs-42".to_string(),
                message: Some("hi".to_string()),
            })
        );
    }

    #[rstest]
    fn test_decode_currency_update_keeps_payload_order() {
        let text = r#"{"type":"currency_update","observer_id":"obs-42",
            "data":{"timestamp":"2024-01-01 12:00","currencies":{"XYZ":2,"RUB":1,"USD":91.2}}}"#;
        let Some(ServerMessage::CurrencyUpdate { data, .. }) = ServerMessage::decode(text) else {
            panic!("expected a currency update");
        };
        assert_eq!(data.timestamp.as_deref(), Some("2024-01-01 12:00"));
        let codes: Vec<&str> = data.currencies.keys().map(String::as_str).collect();
        assert_eq!(codes, ["XYZ", "RUB", "USD"]);
        assert_eq!(data.currencies["USD"], 91.2);
    }

    #[rstest]
    fn test_decode_update_without_fields_defaults() {
        let text = r#"{"type":"currency_update","data":{}}"#;
        let Some(ServerMessage::CurrencyUpdate { data, .. }) = ServerMessage::decode(text) else {
            panic!("expected a currency update");
        };
        assert_eq!(data, RateSnapshot::default());
    }

    #[rstest]
    fn test_decode_update_with_null_currencies_is_empty() {
        let text = r#"{"type":"currency_update","data":{"timestamp":"t","currencies":null}}"#;
        let Some(ServerMessage::CurrencyUpdate { data, .. }) = ServerMessage::decode(text) else {
            panic!("expected a currency update");
        };
        assert_eq!(data.timestamp.as_deref(), Some("t"));
        assert!(data.currencies.is_empty());
    }

    #[rstest]
    #[case(r#"{"type":"heartbeat"}"#)]
    #[case(r#"{"observer_id":"obs-1"}"#)]
    #[case(r#"{"type":"connection_established"}"#)]
    #[case(r#"{"type":"currency_update","data":{"currencies":{"USD":"high"}}}"#)]
    #[case("not json")]
    fn test_decode_ignores_unrecognised(#[case] text: &str) {
        assert_eq!(ServerMessage::decode(text), None);
    }
}
