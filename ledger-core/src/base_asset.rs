//! Base-asset balances observed by the ledger.
//!
//! The contract holds base asset from swap-backs, reserve deposits and
//! accidental sends. Payouts to receivers, burners and the owner are recorded
//! per address.

use std::collections::BTreeMap;

use crate::address::Address;
use crate::error::LedgerError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseAssetBook {
    contract: u128,
    accounts: BTreeMap<Address, u128>,
}

impl BaseAssetBook {
    /// Base asset held by the contract itself.
    pub fn contract_balance(&self) -> u128 {
        self.contract
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.accounts.get(account).copied().unwrap_or(0)
    }

    /// Record base asset paid to `account` from outside the contract.
    pub fn credit(&mut self, account: Address, amount: u128) {
        if amount == 0 {
            return;
        }
        let entry = self.accounts.entry(account).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    pub(crate) fn receive(&mut self, amount: u128) {
        self.contract = self.contract.saturating_add(amount);
    }

    /// Pay `amount` out of the contract balance to `to`.
    pub(crate) fn pay(&mut self, to: Address, amount: u128) -> Result<(), LedgerError> {
        if self.contract < amount {
            return Err(LedgerError::InsufficientReserve {
                available: self.contract,
                requested: amount,
            });
        }
        self.contract -= amount;
        self.credit(to, amount);
        Ok(())
    }
}
