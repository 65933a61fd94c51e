//! Account class byte embedded in an [`crate::account_id::AccountId`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LedgerError;

/// The role an account plays, fixed at one byte on the wire.
///
/// Wire codes are part of the on-disk/on-wire contract and must never be
/// renumbered; add new classes at the next free code instead of reusing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AccountClass {
    TenantWallet = 0x01,
    FeeRevenue = 0x02,
    FxSettlement = 0x03,
    PendingInbound = 0x04,
    PendingOutbound = 0x05,
    RegionalSettlement = 0x06,
}

impl AccountClass {
    pub const ALL: [AccountClass; 6] = [
        AccountClass::TenantWallet,
        AccountClass::FeeRevenue,
        AccountClass::FxSettlement,
        AccountClass::PendingInbound,
        AccountClass::PendingOutbound,
        AccountClass::RegionalSettlement,
    ];

    pub const fn wire_code(self) -> u8 {
        self as u8
    }

    pub fn from_wire_code(code: u8) -> Result<Self, LedgerError> {
        Self::ALL
            .into_iter()
            .find(|c| c.wire_code() == code)
            .ok_or(LedgerError::UnknownAccountClass { code })
    }

}

impl fmt::Display for AccountClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Screaming-snake-case diagnostic names, matching spec.md's
        // `to_debug_string` example (`TENANT_WALLET:EUR:...`).
        let s = match self {
            AccountClass::TenantWallet => "TENANT_WALLET",
            AccountClass::FeeRevenue => "FEE_REVENUE",
            AccountClass::FxSettlement => "FX_SETTLEMENT",
            AccountClass::PendingInbound => "PENDING_INBOUND",
            AccountClass::PendingOutbound => "PENDING_OUTBOUND",
            AccountClass::RegionalSettlement => "REGIONAL_SETTLEMENT",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_are_stable() {
        assert_eq!(AccountClass::TenantWallet.wire_code(), 0x01);
        assert_eq!(AccountClass::FeeRevenue.wire_code(), 0x02);
        assert_eq!(AccountClass::FxSettlement.wire_code(), 0x03);
        assert_eq!(AccountClass::PendingInbound.wire_code(), 0x04);
        assert_eq!(AccountClass::PendingOutbound.wire_code(), 0x05);
        assert_eq!(AccountClass::RegionalSettlement.wire_code(), 0x06);
    }

    #[test]
    fn roundtrip() {
        for c in AccountClass::ALL {
            assert_eq!(AccountClass::from_wire_code(c.wire_code()).unwrap(), c);
        }
    }

    #[test]
    fn unknown_code_rejected() {
        assert!(AccountClass::from_wire_code(0x00).is_err());
        assert!(AccountClass::from_wire_code(0x07).is_err());
    }
}
