//! Anti-whale transaction and wallet limits.

use crate::address::Address;
use crate::error::LedgerError;
use crate::policy::AccessPolicy;

/// Per-transaction and per-wallet caps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LimitConfig {
    /// Owner toggle; when false neither cap is enforced.
    pub enabled: bool,

    /// Largest amount a single transfer may move.
    pub max_tx: u128,

    /// Largest effective balance a destination may reach.
    pub max_wallet: u128,
}

impl LimitConfig {
    /// Default caps for a given supply: 1% per transaction, 2% per wallet.
    pub fn for_supply(total_supply: u128) -> Self {
        Self {
            enabled: true,
            max_tx: total_supply / 100,
            max_wallet: total_supply / 50,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_tx: u128::MAX,
            max_wallet: u128::MAX,
        }
    }

    /// Check a pending transfer.
    ///
    /// `resulting_balance` yields the destination's effective balance after
    /// the transfer and is only evaluated when the wallet cap applies.
    pub fn enforce(
        &self,
        policy: &AccessPolicy,
        from: &Address,
        to: &Address,
        amount: u128,
        resulting_balance: impl FnOnce() -> u128,
    ) -> Result<(), LedgerError> {
        if !self.enabled
            || policy.is_excluded_from_limits(from)
            || policy.is_excluded_from_limits(to)
        {
            return Ok(());
        }

        if amount > self.max_tx {
            return Err(LedgerError::TxLimitExceeded {
                amount,
                max_tx: self.max_tx,
            });
        }

        if !policy.is_liquidity_pair(to) {
            let resulting = resulting_balance();
            if resulting > self.max_wallet {
                return Err(LedgerError::WalletLimitExceeded {
                    resulting,
                    max_wallet: self.max_wallet,
                });
            }
        }

        Ok(())
    }
}
