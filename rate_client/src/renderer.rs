//! Rate table rendering.
//!
//! Every snapshot replaces the whole table: rows are rebuilt from scratch in display
//! priority order, so nothing from a previous update survives.
use std::fmt;

use rate_common::currency::{self, Currency};
use rate_common::RateSnapshot;

/// Shown in place of a missing timestamp or observer id.
pub const PLACEHOLDER: &str = "—";

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRow {
    pub code: String,
    pub rate: String,
    pub name: String,
}

/// Table body plus the last-update field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    rows: Vec<RateRow>,
    last_update: String,
}

/// Format `rate` for display. The reference currency is always `1.00`.
pub fn format_rate(code: &str, rate: f64) -> String {
    if Currency::from_code(code) == Some(Currency::REFERENCE) {
        "1.00".to_string()
    } else {
        two_decimals(rate)
    }
}

/// Round to two decimals, away from zero on an exact tie (`0.125` → `0.13`).
///
/// `{:.2}` alone rounds exact ties to even.
fn two_decimals(rate: f64) -> String {
    if !is_exact_tie(rate) {
        return format!("{rate:.2}");
    }
    let sign = if rate.is_sign_negative() { "-" } else { "" };
    // The next float above a tie is strictly past it and far from the next boundary.
    let above = f64::from_bits(rate.abs().to_bits() + 1);
    format!("{sign}{above:.2}")
}

/// True when the exact binary value of `rate` ends in `5` at the third decimal.
fn is_exact_tie(rate: f64) -> bool {
    if !rate.is_finite() {
        return false;
    }
    // 1074 fractional digits hold the full expansion of any finite f64.
    let exact = format!("{:.1074}", rate.abs());
    let Some((_, fraction)) = exact.split_once('.') else {
        return false;
    };
    let rest = &fraction[2..];
    rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0')
}

/// Build the rows for `snapshot` in display order.
pub fn build_rows(snapshot: &RateSnapshot) -> Vec<RateRow> {
    let mut entries: Vec<(&String, &f64)> = snapshot.currencies.iter().collect();
    // `sort_by` is stable: unknown codes keep their payload order.
    entries.sort_by(|(a, _), (b, _)| currency::compare_codes(a, b));

    entries
        .into_iter()
        .map(|(code, rate)| RateRow {
            code: code.clone(),
            rate: format_rate(code, *rate),
            name: currency::display_name(code).to_string(),
        })
        .collect()
}

impl RateTable {
    /// Replace the table contents with `snapshot`.
    pub fn update(&mut self, snapshot: &RateSnapshot) {
        self.last_update = snapshot
            .timestamp
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        self.rows.clear();
        self.rows.extend(build_rows(snapshot));
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[RateRow] {
        &self.rows
    }

    /// Timestamp of the shown snapshot, or the placeholder.
    pub fn last_update(&self) -> &str {
        &self.last_update
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            last_update: PLACEHOLDER.to_string(),
        }
    }
}

impl fmt::Display for RateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const HEADER: [&str; 3] = ["Код", "Курс", "Валюта"];

        let mut code_w = HEADER[0].chars().count();
        let mut rate_w = HEADER[1].chars().count();
        for row in &self.rows {
            code_w = code_w.max(row.code.chars().count());
            rate_w = rate_w.max(row.rate.chars().count());
        }

        writeln!(f, "{:<code_w$}  {:>rate_w$}  {}", HEADER[0], HEADER[1], HEADER[2])?;
        for row in &self.rows {
            writeln!(f, "{:<code_w$}  {:>rate_w$}  {}", row.code, row.rate, row.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn codes(table: &RateTable) -> Vec<&str> {
        table.rows().iter().map(|row| row.code.as_str()).collect()
    }

    #[rstest]
    #[case("RUB", 87.43, "1.00")]
    #[case("RUB", 1.0, "1.00")]
    #[case("USD", 92.3456, "92.35")]
    #[case("EUR", 1.0, "1.00")]
    #[case("JPY", 0.6, "0.60")]
    #[case("XYZ", 12.0, "12.00")]
    #[case("JPY", 0.125, "0.13")]
    #[case("CNY", 0.625, "0.63")]
    #[case("USD", 2.375, "2.38")]
    #[case("USD", -0.125, "-0.13")]
    #[case("EUR", 1.005, "1.00")]
    fn test_format_rate(#[case] code: &str, #[case] rate: f64, #[case] expected: &str) {
        assert_eq!(format_rate(code, rate), expected);
    }

    #[rstest]
    fn test_known_codes_follow_priority() {
        let snapshot = RateSnapshot::new(
            Some("t"),
            [("RUB", 1.0), ("JPY", 0.6), ("USD", 91.2), ("GBP", 115.0)],
        );
        let mut table = RateTable::default();
        table.update(&snapshot);
        assert_eq!(codes(&table), ["USD", "GBP", "JPY", "RUB"]);
    }

    #[rstest]
    fn test_unknown_codes_go_last_with_raw_name() {
        let snapshot = RateSnapshot::new(None, [("XYZ", 3.0), ("EUR", 99.87), ("ABC", 4.0)]);
        let mut table = RateTable::default();
        table.update(&snapshot);

        assert_eq!(codes(&table), ["EUR", "XYZ", "ABC"]);
        let xyz = &table.rows()[1];
        assert_eq!(xyz.name, "XYZ");
        assert_eq!(xyz.rate, "3.00");
        assert_eq!(table.last_update(), PLACEHOLDER);
    }

    #[rstest]
    fn test_update_replaces_previous_rows() {
        let mut table = RateTable::default();
        table.update(&RateSnapshot::new(Some("a"), [("USD", 90.0), ("CNY", 12.5)]));
        table.update(&RateSnapshot::new(Some("b"), [("EUR", 100.0)]));

        assert_eq!(codes(&table), ["EUR"]);
        assert_eq!(table.last_update(), "b");
    }

    #[rstest]
    fn test_rerender_is_idempotent() {
        let snapshot = RateSnapshot::new(Some("x"), [("RUB", 1.0), ("XYZ", 2.0), ("USD", 91.2)]);
        let mut table = RateTable::default();
        table.update(&snapshot);
        let first = table.clone();
        table.update(&snapshot);
        assert_eq!(table, first);
        assert_eq!(table.to_string(), first.to_string());
    }

    #[rstest]
    fn test_display_aligns_columns() {
        let mut table = RateTable::default();
        table.update(&RateSnapshot::new(Some("x"), [("USD", 91.2), ("RUB", 1.0)]));
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Код   Курс  Валюта");
        assert_eq!(lines[1], "USD  91.20  Доллар США");
        assert_eq!(lines[2], "RUB   1.00  Российский рубль");
    }
}
