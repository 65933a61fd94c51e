//! The 128-bit account identifier codec (C2).
//!
//! Wire layout, big-endian throughout:
//!
//! ```text
//! byte   0..8    tenant id       (u64)
//! byte   8       account class   (u8)
//! byte   9..12   currency        (24-bit ISO 4217 numeric)
//! byte  12..16   reserved        (must be zero)
//! ```
//!
//! Sixteen bytes total, matching the 128-bit account id the accounting
//! engine expects. The reserved bytes are not padding to be tolerant of —
//! a non-zero value there means the id was built by something that doesn't
//! speak this layout, and decoding rejects it the same way
//! `UniversalAddress::from_bytes32_strict` rejects a non-zero reserved tail.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::account_class::AccountClass;
use crate::currency::Currency;
use crate::error::LedgerError;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 16]);

impl AccountId {
    /// Compose an account id from its three semantic fields.
    pub fn compose(tenant_id: u64, class: AccountClass, currency: Currency) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&tenant_id.to_be_bytes());
        bytes[8] = class.wire_code();
        let currency_code = currency.numeric_code().to_be_bytes(); // 4 bytes, top byte 0
        bytes[9..12].copy_from_slice(&currency_code[1..4]);
        // bytes[12..16] stay zero (reserved).
        AccountId(bytes)
    }

    /// Compose a tenant id from the low 64 bits of a UUID, for callers that
    /// mint tenants with a UUID rather than a sequential integer.
    pub fn compose_from_uuid(tenant_uuid: Uuid, class: AccountClass, currency: Currency) -> Self {
        let (_, low) = tenant_uuid.as_u64_pair();
        Self::compose(low, class, currency)
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Result<Self, LedgerError> {
        let reserved = u32::from_be_bytes(bytes[12..16].try_into().unwrap());
        if reserved != 0 {
            return Err(LedgerError::ReservedBitsNonZero { value: reserved });
        }
        // Validate the class and currency bytes decode to known values;
        // this also guards against silently accepting a malformed id.
        AccountClass::from_wire_code(bytes[8])?;
        let currency_code =
            u32::from_be_bytes([0, bytes[9], bytes[10], bytes[11]]);
        Currency::from_numeric_code(currency_code)?;
        Ok(AccountId(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn tenant_id(&self) -> u64 {
        u64::from_be_bytes(self.0[0..8].try_into().unwrap())
    }

    pub fn account_class(&self) -> AccountClass {
        AccountClass::from_wire_code(self.0[8])
            .expect("class bytes validated at construction/decode time")
    }

    pub fn currency(&self) -> Currency {
        let code = u32::from_be_bytes([0, self.0[9], self.0[10], self.0[11]]);
        Currency::from_numeric_code(code)
            .expect("currency bytes validated at construction/decode time")
    }

    /// An identifier is system-owned iff its tenant field is zero —
    /// independent of account class, since a class alone never tells you
    /// which tenant (if any) owns a given account.
    pub fn is_system(&self) -> bool {
        self.tenant_id() == 0
    }

    /// Decimal serialization for storage in a `NUMERIC(39,0)` column or
    /// transmission where hex framing is undesirable.
    pub fn to_decimal_string(&self) -> String {
        u128::from_be_bytes(self.0).to_string()
    }

    pub fn from_decimal_string(s: &str) -> Result<Self, LedgerError> {
        let value: u128 = s.parse().map_err(|_| LedgerError::InvalidDecimalId {
            value: s.to_string(),
        })?;
        Self::from_bytes(value.to_be_bytes())
    }

    /// Compact `CLASS:CURRENCY:TENANT_HEX` representation for logs.
    pub fn to_debug_string(&self) -> String {
        format!(
            "{}:{}:{:016x}",
            self.account_class(),
            self.currency(),
            self.tenant_id()
        )
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_debug_string())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_debug_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_then_decode_roundtrips() {
        let id = AccountId::compose(42, AccountClass::TenantWallet, Currency::Eur);
        let decoded = AccountId::from_bytes(*id.as_bytes()).unwrap();
        assert_eq!(decoded.tenant_id(), 42);
        assert_eq!(decoded.account_class(), AccountClass::TenantWallet);
        assert_eq!(decoded.currency(), Currency::Eur);
    }

    #[test]
    fn layout_is_stable_big_endian() {
        let id = AccountId::compose(1, AccountClass::FeeRevenue, Currency::Usd);
        let b = id.as_bytes();
        assert_eq!(&b[0..8], &1u64.to_be_bytes());
        assert_eq!(b[8], 0x02);
        assert_eq!(&b[9..12], &[0x00, 0x03, 0x48]); // 840 big-endian, 24-bit
        assert_eq!(&b[12..16], &[0, 0, 0, 0]);
    }

    #[test]
    fn reserved_bits_must_be_zero() {
        let mut bytes = *AccountId::compose(1, AccountClass::TenantWallet, Currency::Gbp).as_bytes();
        bytes[15] = 0x01;
        assert!(matches!(
            AccountId::from_bytes(bytes),
            Err(LedgerError::ReservedBitsNonZero { .. })
        ));
    }

    #[test]
    fn decimal_roundtrip() {
        let id = AccountId::compose(7, AccountClass::RegionalSettlement, Currency::Sek);
        let s = id.to_decimal_string();
        assert_eq!(AccountId::from_decimal_string(&s).unwrap(), id);
    }

    #[test]
    fn debug_string_matches_class_currency_tenant_hex_format() {
        let id = AccountId::compose(0x00abcdef, AccountClass::TenantWallet, Currency::Eur);
        assert_eq!(id.to_debug_string(), "TENANT_WALLET:EUR:0000000000abcdef");
    }

    #[test]
    fn system_ownership_is_determined_by_tenant_not_class() {
        let sys = AccountId::compose(0, AccountClass::FxSettlement, Currency::Dkk);
        assert!(sys.is_system());
        // Tenant zero is system-owned regardless of class.
        let zero_tenant_wallet = AccountId::compose(0, AccountClass::TenantWallet, Currency::Dkk);
        assert!(zero_tenant_wallet.is_system());
        // A nonzero tenant is never system-owned, even for a system-shaped class.
        let tenant_owned = AccountId::compose(7, AccountClass::TenantWallet, Currency::Dkk);
        assert!(!tenant_owned.is_system());
    }
}
