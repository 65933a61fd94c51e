//! Time-ordered 128-bit identifiers shared by postings and correlation tokens.
//!
//! Resolves the open question of random vs. time-ordered ids in favor of
//! time-ordered (UUIDv7): roughly-monotonic ids keep engine-side indexes
//! local without giving up the full 128 bits of entropy a posting id needs.

use uuid::Uuid;

use crate::error::LedgerError;

/// Generate a new time-ordered 128-bit identifier.
pub fn generate() -> Result<u128, LedgerError> {
    Ok(Uuid::now_v7().as_u128())
}

pub fn to_hex(id: u128) -> String {
    hex::encode(id.to_be_bytes())
}

pub fn decimal_string(id: u128) -> String {
    id.to_string()
}

pub fn from_decimal_string(s: &str) -> Result<u128, LedgerError> {
    s.parse().map_err(|_| LedgerError::InvalidDecimalId {
        value: s.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_nonzero() {
        let a = generate().unwrap();
        let b = generate().unwrap();
        assert_ne!(a, b);
        assert_ne!(a, 0);
    }

    #[test]
    fn decimal_roundtrip() {
        let id = generate().unwrap();
        assert_eq!(from_decimal_string(&decimal_string(id)).unwrap(), id);
    }
}
