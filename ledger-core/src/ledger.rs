//! Base balances and global aggregates.
//!
//! The ledger is the unit of record. It stores raw base balances, the
//! fixed-at-creation supply, the reflection accumulator `R` and the derived
//! out-of-pool supply `S`. Everything a holder sees is computed from these
//! through [`reflected_balance`].
//!
//! Conservation: `Σ base_balance == total_supply` holds after every public
//! method returns, whether it succeeded or failed.

use std::collections::BTreeMap;

use crate::address::Address;
use crate::error::LedgerError;
use crate::policy::AccessPolicy;
use crate::reflection::{base_for_reflected, reflected_balance};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ledger {
    balances: BTreeMap<Address, u128>,
    total_supply: u128,
    total_reflected: u128,
    total_sub_lp_balance: u128,
}

impl Ledger {
    /// Create a ledger with the whole supply held by `holder`.
    ///
    /// `holder` must not be a liquidity pair; pairs are registered afterwards.
    pub fn with_genesis(holder: Address, total_supply: u128) -> Self {
        let mut balances = BTreeMap::new();
        if total_supply > 0 {
            balances.insert(holder, total_supply);
        }
        Self {
            balances,
            total_supply,
            total_reflected: 0,
            total_sub_lp_balance: total_supply,
        }
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// `R`: reflection accumulated so far.
    pub fn total_reflected(&self) -> u128 {
        self.total_reflected
    }

    /// `S`: supply held outside liquidity pairs.
    pub fn total_sub_lp_balance(&self) -> u128 {
        self.total_sub_lp_balance
    }

    pub fn base_balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Reported balance: raw for pairs, reflection-adjusted otherwise.
    pub fn effective_balance(&self, account: &Address, policy: &AccessPolicy) -> u128 {
        let base = self.base_balance_of(account);
        if policy.is_liquidity_pair(account) {
            base
        } else {
            reflected_balance(base, self.total_sub_lp_balance, self.total_reflected)
        }
    }

    /// Reported amount corresponding to `amount` base units held by `account`.
    pub fn base_to_reflection_amount(
        &self,
        amount: u128,
        account: &Address,
        policy: &AccessPolicy,
    ) -> u128 {
        if policy.is_liquidity_pair(account) {
            amount
        } else {
            reflected_balance(amount, self.total_sub_lp_balance, self.total_reflected)
        }
    }

    /// Base units `account` must spend to move `amount` of its reported
    /// balance. Rounds down, so the whole reported balance converts to at
    /// most the base balance.
    pub fn reflection_to_base_amount(
        &self,
        amount: u128,
        account: &Address,
        policy: &AccessPolicy,
    ) -> u128 {
        if policy.is_liquidity_pair(account) {
            amount
        } else {
            base_for_reflected(amount, self.total_sub_lp_balance, self.total_reflected)
        }
    }

    /// Accounts with a non-zero base balance, in address order.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &u128)> + '_ {
        self.balances.iter()
    }

    pub fn sum_of_balances(&self) -> u128 {
        self.balances.values().fold(0u128, |acc, b| acc.saturating_add(*b))
    }

    /// Whether base balances add up to the total supply.
    pub fn is_conserved(&self) -> bool {
        self.sum_of_balances() == self.total_supply
    }

    /// Move `amount` base units from `from` to `to`.
    pub fn transfer_base(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
        policy: &AccessPolicy,
    ) -> Result<(), LedgerError> {
        self.distribute(from, &[(to, amount)], policy)
    }

    /// Debit the sum of `credits` from `from` and credit each destination.
    ///
    /// The balance check covers the whole batch before anything is written.
    pub(crate) fn distribute(
        &mut self,
        from: Address,
        credits: &[(Address, u128)],
        policy: &AccessPolicy,
    ) -> Result<(), LedgerError> {
        let requested = credits
            .iter()
            .fold(0u128, |acc, (_, amount)| acc.saturating_add(*amount));
        let available = self.base_balance_of(&from);
        if available < requested {
            return Err(LedgerError::InsufficientBalance {
                available,
                requested,
            });
        }

        self.set_balance(from, available - requested);
        for (to, amount) in credits {
            let current = self.base_balance_of(to);
            self.set_balance(*to, current + amount);
        }

        let touches_pair = policy.is_liquidity_pair(&from)
            || credits.iter().any(|(to, _)| policy.is_liquidity_pair(to));
        if touches_pair {
            self.recompute_sub_lp_balance(policy);
        }
        Ok(())
    }

    /// Grow `R`. Only the fee engine feeds reflection.
    pub(crate) fn adjust_reflection(&mut self, delta: u128) {
        self.total_reflected = self.total_reflected.saturating_add(delta);
    }

    /// Destroy `amount` of `account`'s base balance, shrinking supply.
    pub(crate) fn burn(
        &mut self,
        account: Address,
        amount: u128,
        policy: &AccessPolicy,
    ) -> Result<(), LedgerError> {
        let available = self.base_balance_of(&account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                available,
                requested: amount,
            });
        }
        self.set_balance(account, available - amount);
        self.total_supply -= amount;
        self.recompute_sub_lp_balance(policy);
        Ok(())
    }

    /// Recompute `S = total_supply − Σ pair balances`.
    pub fn recompute_sub_lp_balance(&mut self, policy: &AccessPolicy) {
        let in_pairs = policy
            .liquidity_pairs()
            .map(|pair| self.base_balance_of(pair))
            .fold(0u128, |acc, b| acc.saturating_add(b));
        self.total_sub_lp_balance = self.total_supply.saturating_sub(in_pairs);
    }

    fn set_balance(&mut self, account: Address, balance: u128) {
        if balance == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPLY: u128 = 1_000_000;

    fn setup_test() -> (Ledger, AccessPolicy, Address, Address, Address) {
        let owner = Address::from_low_u64(1);
        let alice = Address::from_low_u64(2);
        let pair = Address::from_low_u64(3);
        let mut policy = AccessPolicy::new(owner, 0, 0);
        policy.mark_liquidity_pair(pair, true);
        let mut ledger = Ledger::with_genesis(owner, SUPPLY);
        ledger.recompute_sub_lp_balance(&policy);
        (ledger, policy, owner, alice, pair)
    }

    #[test]
    fn test_genesis() {
        let (ledger, _, owner, alice, _) = setup_test();
        assert_eq!(ledger.total_supply(), SUPPLY);
        assert_eq!(ledger.base_balance_of(&owner), SUPPLY);
        assert_eq!(ledger.base_balance_of(&alice), 0);
        assert_eq!(ledger.total_sub_lp_balance(), SUPPLY);
        assert!(ledger.is_conserved());
    }

    #[test]
    fn test_transfer_base() {
        let (mut ledger, policy, owner, alice, _) = setup_test();
        ledger.transfer_base(owner, alice, 400, &policy).unwrap();
        assert_eq!(ledger.base_balance_of(&owner), SUPPLY - 400);
        assert_eq!(ledger.base_balance_of(&alice), 400);
        assert!(ledger.is_conserved());
    }

    #[test]
    fn test_insufficient_balance_leaves_state_untouched() {
        let (mut ledger, policy, _, alice, _) = setup_test();
        let before = ledger.clone();
        let err = ledger
            .transfer_base(alice, Address::from_low_u64(9), 1, &policy)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                available: 0,
                requested: 1
            }
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_self_transfer_is_neutral() {
        let (mut ledger, policy, owner, _, _) = setup_test();
        ledger.transfer_base(owner, owner, 10, &policy).unwrap();
        assert_eq!(ledger.base_balance_of(&owner), SUPPLY);
    }

    #[test]
    fn test_pair_transfers_update_sub_lp_balance() {
        let (mut ledger, policy, owner, alice, pair) = setup_test();
        ledger.transfer_base(owner, pair, 750_000, &policy).unwrap();
        assert_eq!(ledger.total_sub_lp_balance(), 250_000);

        ledger.transfer_base(pair, alice, 50_000, &policy).unwrap();
        assert_eq!(ledger.total_sub_lp_balance(), 300_000);
        assert!(ledger.is_conserved());
    }

    #[test]
    fn test_pair_reports_raw_balance() {
        let (mut ledger, policy, owner, _, pair) = setup_test();
        ledger.transfer_base(owner, pair, 500_000, &policy).unwrap();
        ledger.adjust_reflection(10_000);
        assert_eq!(ledger.effective_balance(&pair, &policy), 500_000);
        assert!(ledger.effective_balance(&owner, &policy) > 500_000);
    }

    #[test]
    fn test_unit_conversions() {
        let (mut ledger, policy, owner, alice, pair) = setup_test();
        ledger.transfer_base(owner, pair, 500_000, &policy).unwrap();
        ledger.transfer_base(owner, alice, 12_345, &policy).unwrap();
        ledger.adjust_reflection(2_000);

        let shown = ledger.effective_balance(&alice, &policy);
        assert_eq!(ledger.base_to_reflection_amount(12_345, &alice, &policy), shown);
        assert_eq!(ledger.reflection_to_base_amount(shown, &alice, &policy), 12_345);

        // pairs convert one to one
        assert_eq!(ledger.base_to_reflection_amount(777, &pair, &policy), 777);
        assert_eq!(ledger.reflection_to_base_amount(777, &pair, &policy), 777);
    }

    #[test]
    fn test_distribute_is_all_or_nothing() {
        let (mut ledger, policy, owner, alice, _) = setup_test();
        ledger.transfer_base(owner, alice, 100, &policy).unwrap();
        let before = ledger.clone();

        let bob = Address::from_low_u64(4);
        let err = ledger
            .distribute(alice, &[(bob, 60), (owner, 60)], &policy)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { requested: 120, .. }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_burn_reduces_supply() {
        let (mut ledger, policy, owner, _, pair) = setup_test();
        ledger.transfer_base(owner, pair, 100_000, &policy).unwrap();
        ledger.burn(owner, 1_000, &policy).unwrap();
        assert_eq!(ledger.total_supply(), SUPPLY - 1_000);
        assert_eq!(ledger.total_sub_lp_balance(), SUPPLY - 1_000 - 100_000);
        assert!(ledger.is_conserved());
    }
}
