//! Currency codes known to the rate display and their presentation helpers.
//!
//! The declaration order of [`Currency`] is the display priority: rows for listed
//! currencies are shown in that order, and any code the catalogue does not know is
//! pushed after all of them.

use std::cmp::Ordering;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Currencies with a fixed display position and a human-readable name.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Display, EnumString, EnumIter, Hash, Eq, PartialEq)]
pub enum Currency {
    USD,
    EUR,
    GBP,
    CNY,
    JPY,
    RUB,
}

impl Currency {
    /// The currency every other rate is quoted against.
    pub const REFERENCE: Currency = Currency::RUB;

    /// Resolve a wire code. Matching is exact, the server sends upper-case codes.
    pub fn from_code(code: &str) -> Option<Self> {
        code.parse().ok()
    }

    /// Position in the display order, starting at zero.
    pub fn priority(self) -> usize {
        self as usize
    }

    /// Russian display name of the currency.
    pub fn name(self) -> &'static str {
        match self {
            Currency::USD => "Доллар США",
            Currency::EUR => "Евро",
            Currency::GBP => "Фунт стерлингов",
            Currency::CNY => "Китайский юань",
            Currency::JPY => "Японская иена",
            Currency::RUB => "Российский рубль",
        }
    }

    /// All catalogue currencies in display order.
    pub fn display_order() -> impl Iterator<Item = Currency> {
        Currency::iter()
    }
}

/// Display name for `code`, or the code itself when it is not in the catalogue.
pub fn display_name(code: &str) -> &str {
    match Currency::from_code(code) {
        Some(currency) => currency.name(),
        None => code,
    }
}

/// Orders two wire codes by display priority. Unknown codes compare equal to each
/// other and greater than every known code, so a stable sort keeps their encounter
/// order at the end.
pub fn compare_codes(a: &str, b: &str) -> Ordering {
    let rank = |code: &str| Currency::from_code(code).map_or(usize::MAX, Currency::priority);
    rank(a).cmp(&rank(b))
}
