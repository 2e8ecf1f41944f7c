//! Access control and per-account flags.
//!
//! There is no ambient owner. Every mutating operation receives an
//! [`OpContext`] naming the caller and the current time, together with a
//! reference to the [`AccessPolicy`] that decides what the caller may do and
//! which accounts are exempt from fees, limits or reflection.

use std::collections::BTreeMap;

use tracing::info;

use crate::address::Address;
use crate::error::LedgerError;

/// Identity and clock for a single operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpContext {
    /// Account initiating the operation.
    pub caller: Address,

    /// Seconds since the Unix epoch.
    pub now: u64,
}

impl OpContext {
    pub fn new(caller: Address, now: u64) -> Self {
        Self { caller, now }
    }
}

/// Exemption flags attached to an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountFlags {
    /// Transfers touching this account pay no fee.
    pub excluded_from_fee: bool,

    /// Transfers touching this account skip the limit guard.
    pub excluded_from_limits: bool,

    /// Account is an AMM pool; its balance is reported without reflection.
    pub is_liquidity_pair: bool,

    /// Fee-free while the launch grace window is open.
    pub grace_exempt: bool,
}

impl AccountFlags {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Owner identity, account flags and the launch grace window.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessPolicy {
    owner: Address,
    flags: BTreeMap<Address, AccountFlags>,
    activated_at: u64,
    grace_period_secs: u64,
}

impl AccessPolicy {
    pub fn new(owner: Address, activated_at: u64, grace_period_secs: u64) -> Self {
        Self {
            owner,
            flags: BTreeMap::new(),
            activated_at,
            grace_period_secs,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_owner(&self, caller: &Address) -> bool {
        *caller == self.owner
    }

    /// Fail with `Unauthorized` unless `caller` is the owner.
    pub fn ensure_owner(&self, caller: &Address) -> Result<(), LedgerError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized { caller: *caller })
        }
    }

    pub fn flags(&self, account: &Address) -> AccountFlags {
        self.flags.get(account).copied().unwrap_or_default()
    }

    pub fn is_excluded_from_fee(&self, account: &Address) -> bool {
        self.flags(account).excluded_from_fee
    }

    pub fn is_excluded_from_limits(&self, account: &Address) -> bool {
        self.flags(account).excluded_from_limits
    }

    pub fn is_liquidity_pair(&self, account: &Address) -> bool {
        self.flags(account).is_liquidity_pair
    }

    /// All accounts currently flagged as liquidity pairs.
    pub fn liquidity_pairs(&self) -> impl Iterator<Item = &Address> + '_ {
        self.flags
            .iter()
            .filter(|(_, f)| f.is_liquidity_pair)
            .map(|(addr, _)| addr)
    }

    pub fn activated_at(&self) -> u64 {
        self.activated_at
    }

    pub fn grace_period_secs(&self) -> u64 {
        self.grace_period_secs
    }

    /// Whether the launch grace window is still open at `now`.
    pub fn in_grace_window(&self, now: u64) -> bool {
        now < self.activated_at.saturating_add(self.grace_period_secs)
    }

    /// Whether `account` trades fee-free at `now` because of the grace window.
    pub fn grace_applies(&self, account: &Address, now: u64) -> bool {
        self.flags(account).grace_exempt && self.in_grace_window(now)
    }

    pub fn set_fee_exempt(
        &mut self,
        ctx: &OpContext,
        account: Address,
        exempt: bool,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(&ctx.caller)?;
        self.update(account, |f| f.excluded_from_fee = exempt);
        info!(%account, exempt, "fee exemption updated");
        Ok(())
    }

    pub fn set_limit_exempt(
        &mut self,
        ctx: &OpContext,
        account: Address,
        exempt: bool,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(&ctx.caller)?;
        self.update(account, |f| f.excluded_from_limits = exempt);
        info!(%account, exempt, "limit exemption updated");
        Ok(())
    }

    pub fn set_grace_exempt(
        &mut self,
        ctx: &OpContext,
        account: Address,
        exempt: bool,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(&ctx.caller)?;
        self.update(account, |f| f.grace_exempt = exempt);
        info!(%account, exempt, "grace exemption updated");
        Ok(())
    }

    /// Pair registration changes `S`, so it is only reachable through the
    /// token, which recomputes the aggregate afterwards.
    pub(crate) fn mark_liquidity_pair(&mut self, account: Address, is_pair: bool) {
        self.update(account, |f| f.is_liquidity_pair = is_pair);
    }

    /// Exempt a system account from fees and limits at genesis.
    pub(crate) fn exempt_system_account(&mut self, account: Address) {
        self.update(account, |f| {
            f.excluded_from_fee = true;
            f.excluded_from_limits = true;
        });
    }

    /// The owner seeds liquidity and funds holders, so it skips the limit
    /// guard from genesis. It still pays fees like any other holder.
    pub(crate) fn exempt_owner_from_limits(&mut self) {
        let owner = self.owner;
        self.update(owner, |f| f.excluded_from_limits = true);
    }

    fn update(&mut self, account: Address, apply: impl FnOnce(&mut AccountFlags)) {
        let mut flags = self.flags(&account);
        apply(&mut flags);
        if flags.is_empty() {
            self.flags.remove(&account);
        } else {
            self.flags.insert(account, flags);
        }
    }
}
