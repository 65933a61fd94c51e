//! ISO 4217 numeric currency codes carried in an [`crate::account_id::AccountId`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LedgerError;

/// A currency recognized by this ledger, keyed by its ISO 4217 numeric code.
///
/// The set is closed: an account identifier whose embedded currency field
/// does not match one of these codes fails to decode rather than producing
/// an `Unknown` variant, so callers never have to guard against a silently
/// invalid currency leaking past the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Currency {
    Eur = 978,
    Gbp = 826,
    Idr = 360,
    Sek = 752,
    Dkk = 208,
    Usd = 840,
}

impl Currency {
    pub const ALL: [Currency; 6] = [
        Currency::Eur,
        Currency::Gbp,
        Currency::Idr,
        Currency::Sek,
        Currency::Dkk,
        Currency::Usd,
    ];

    /// The 24-bit wire value stored in bytes 9-11 of an `AccountId`.
    pub const fn numeric_code(self) -> u32 {
        self as u32
    }

    pub fn from_numeric_code(code: u32) -> Result<Self, LedgerError> {
        Self::ALL
            .into_iter()
            .find(|c| c.numeric_code() == code)
            .ok_or(LedgerError::UnknownCurrency { code })
    }

    pub const fn alpha_code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Idr => "IDR",
            Currency::Sek => "SEK",
            Currency::Dkk => "DKK",
            Currency::Usd => "USD",
        }
    }

    pub fn from_alpha_code(code: &str) -> Result<Self, LedgerError> {
        Self::ALL
            .into_iter()
            .find(|c| c.alpha_code().eq_ignore_ascii_case(code))
            .ok_or_else(|| LedgerError::UnknownCurrency {
                code: code.parse().unwrap_or(0),
            })
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alpha_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_roundtrip() {
        for c in Currency::ALL {
            assert_eq!(Currency::from_numeric_code(c.numeric_code()).unwrap(), c);
        }
    }

    #[test]
    fn alpha_roundtrip() {
        for c in Currency::ALL {
            assert_eq!(Currency::from_alpha_code(c.alpha_code()).unwrap(), c);
        }
    }

    #[test]
    fn unknown_numeric_code_rejected() {
        assert!(matches!(
            Currency::from_numeric_code(999),
            Err(LedgerError::UnknownCurrency { code: 999 })
        ));
    }
}
