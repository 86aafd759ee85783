//! Applies server messages to the view.
use log::{debug, info};
use rate_common::ServerMessage;

use crate::view::View;

/// Decode `text` and apply it to `view`. Returns `true` when the view changed.
///
/// Unknown message types and malformed payloads are dropped without touching the view.
pub fn handle_message(view: &mut View, text: &str) -> bool {
    match ServerMessage::decode(text) {
        Some(ServerMessage::ConnectionEstablished {
            observer_id,
            message,
        }) => {
            if let Some(message) = message {
                info!("{}", message);
            }
            info!("Observer ID: {}", observer_id);
            view.observer_id = Some(observer_id);
            true
        }
        Some(ServerMessage::CurrencyUpdate { data, .. }) => {
            debug!(
                "Currency update at {:?} with {} rates",
                data.timestamp,
                data.currencies.len()
            );
            view.table.update(&data);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_observer_then_update() {
        let mut view = View::default();

        assert!(handle_message(
            &mut view,
            r#"{"type":"connection_established","observer_id":"obs-42"}"#
        ));
        assert_eq!(view.observer_id.as_deref(), Some("obs-42"));

        assert!(handle_message(
            &mut view,
            r#"{"type":"currency_update","data":{"timestamp":"2024-01-01 12:00",
                "currencies":{"USD":91.2,"EUR":99.87,"RUB":1}}}"#
        ));
        let rows: Vec<(&str, &str, &str)> = view
            .table
            .rows()
            .iter()
            .map(|r| (r.code.as_str(), r.rate.as_str(), r.name.as_str()))
            .collect();
        assert_eq!(
            rows,
            [
                ("USD", "91.20", "Доллар США"),
                ("EUR", "99.87", "Евро"),
                ("RUB", "1.00", "Российский рубль"),
            ]
        );
        assert_eq!(view.table.last_update(), "2024-01-01 12:00");
    }

    #[rstest]
    fn test_null_currencies_clear_table() {
        let mut view = View::default();
        handle_message(
            &mut view,
            r#"{"type":"currency_update","data":{"timestamp":"a","currencies":{"USD":91.2}}}"#,
        );
        assert_eq!(view.table.rows().len(), 1);

        assert!(handle_message(
            &mut view,
            r#"{"type":"currency_update","data":{"timestamp":"b","currencies":null}}"#
        ));
        assert!(view.table.rows().is_empty());
        assert_eq!(view.table.last_update(), "b");
    }

    #[rstest]
    #[case(r#"{"type":"rates_reset"}"#)]
    #[case("{")]
    fn test_unrecognised_message_leaves_view(#[case] text: &str) {
        let mut view = View::default();
        view.observer_id = Some("obs-1".to_string());
        let before = view.clone();

        assert!(!handle_message(&mut view, text));
        assert_eq!(view, before);
    }
}
