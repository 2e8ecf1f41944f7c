//! Transfer taxation.
//!
//! Every taxed transfer is split four ways:
//!
//! | Part         | Amount                         | Destination                      |
//! |--------------|--------------------------------|----------------------------------|
//! | `fee`        | `⌊amount · total_bps / 10000⌋` | (sum of the two below)           |
//! | `reflection` | `min(amount / 100, fee)`       | reflection pool, grows `R`       |
//! | `tax`        | `fee − reflection`             | contract tax-collection account  |
//! | `net`        | `amount − fee`                 | recipient                        |
//!
//! With the default 600 bps schedule a holder-to-holder transfer credits 94%
//! to the recipient, 1% to reflection and 5% to the contract.
//!
//! ## Schedules
//!
//! | Direction | Condition             | Schedule |
//! |-----------|-----------------------|----------|
//! | Buy       | `from` is a pair      | buy      |
//! | Sell      | `to` is a pair        | sell     |
//! | Plain     | neither               | buy      |
//!
//! Collected tax is attributed to the four receivers by schedule share in
//! [`TaxBuckets`] and paid out in base asset at the next swap-back.

use crate::address::Address;
use crate::error::LedgerError;
use crate::policy::AccessPolicy;
use crate::reflection::mul_div;

/// Fee rate in basis points (10000 = 100%).
pub type FeeRateBps = u32;

pub const BPS_DENOMINATOR: u128 = 10_000;

/// Upper bound on a schedule's declared total.
pub const MAX_FEE: FeeRateBps = 2_500;

/// The reflection slice is `amount / REFLECTION_DIVISOR`.
pub const REFLECTION_DIVISOR: u128 = 100;

/// Direction of a transfer relative to the liquidity pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferKind {
    Buy,
    Sell,
    Plain,
}

impl TransferKind {
    pub fn classify(from: &Address, to: &Address, policy: &AccessPolicy) -> Self {
        if policy.is_liquidity_pair(from) {
            Self::Buy
        } else if policy.is_liquidity_pair(to) {
            Self::Sell
        } else {
            Self::Plain
        }
    }
}

/// Per-receiver shares of a schedule, in basis points of the transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeShares {
    pub marketing: FeeRateBps,
    pub liquidity: FeeRateBps,
    pub buyback: FeeRateBps,
    pub treasury: FeeRateBps,
}

impl FeeShares {
    pub fn new(
        marketing: FeeRateBps,
        liquidity: FeeRateBps,
        buyback: FeeRateBps,
        treasury: FeeRateBps,
    ) -> Self {
        Self {
            marketing,
            liquidity,
            buyback,
            treasury,
        }
    }

    pub fn sum(&self) -> FeeRateBps {
        self.marketing
            .saturating_add(self.liquidity)
            .saturating_add(self.buyback)
            .saturating_add(self.treasury)
    }

    /// Shares in `[marketing, liquidity, buyback, treasury]` order.
    pub fn as_array(&self) -> [FeeRateBps; 4] {
        [self.marketing, self.liquidity, self.buyback, self.treasury]
    }
}

/// One direction's fee schedule: shares plus a declared total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeSchedule {
    pub shares: FeeShares,
    pub total: FeeRateBps,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::new(FeeShares::new(200, 100, 100, 200))
    }
}

impl FeeSchedule {
    /// Schedule whose total is the sum of `shares`.
    pub fn new(shares: FeeShares) -> Self {
        Self {
            total: shares.sum(),
            shares,
        }
    }

    /// Schedule with an explicitly declared total, validated on use.
    pub fn with_total(shares: FeeShares, total: FeeRateBps) -> Self {
        Self { shares, total }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.total > MAX_FEE {
            return Err(LedgerError::FeeTooHigh {
                total: self.total,
                max: MAX_FEE,
            });
        }
        let sum = self.shares.sum();
        if sum != self.total {
            return Err(LedgerError::FeeScheduleMismatch {
                declared: self.total,
                sum,
            });
        }
        Ok(())
    }

    /// Split `amount` according to this schedule.
    pub fn split(&self, kind: TransferKind, amount: u128) -> FeeSplit {
        let fee = mul_div(amount, self.total as u128, BPS_DENOMINATOR);
        let reflection = (amount / REFLECTION_DIVISOR).min(fee);
        FeeSplit {
            kind,
            amount,
            fee,
            reflection,
            tax: fee - reflection,
            net: amount - fee,
        }
    }
}

/// Buy and sell schedules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeConfig {
    pub buy: FeeSchedule,
    pub sell: FeeSchedule,
}

impl FeeConfig {
    /// Schedule applied to a transfer of the given kind. Plain transfers use
    /// the buy schedule.
    pub fn schedule_for(&self, kind: TransferKind) -> &FeeSchedule {
        match kind {
            TransferKind::Buy | TransferKind::Plain => &self.buy,
            TransferKind::Sell => &self.sell,
        }
    }

    /// Replace both schedules, or neither if either is invalid.
    pub fn replace(&mut self, buy: FeeSchedule, sell: FeeSchedule) -> Result<(), LedgerError> {
        buy.validate()?;
        sell.validate()?;
        self.buy = buy;
        self.sell = sell;
        Ok(())
    }
}

/// Outcome of splitting one transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeSplit {
    pub kind: TransferKind,
    pub amount: u128,
    pub fee: u128,
    pub reflection: u128,
    pub tax: u128,
    pub net: u128,
}

impl FeeSplit {
    /// Fee-free split: the full amount reaches the recipient.
    pub fn exempt(kind: TransferKind, amount: u128) -> Self {
        Self {
            kind,
            amount,
            fee: 0,
            reflection: 0,
            tax: 0,
            net: amount,
        }
    }
}

/// Collected tax attributed to each receiver, in tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaxBuckets {
    pub marketing: u128,
    pub liquidity: u128,
    pub buyback: u128,
    pub treasury: u128,
}

impl TaxBuckets {
    /// Attribute `tax` by `shares`. Treasury takes the rounding remainder,
    /// or everything if the shares are all zero.
    pub fn record(&mut self, tax: u128, shares: &FeeShares) {
        let parts = proportion(tax, shares.as_array().map(u128::from));
        self.marketing = self.marketing.saturating_add(parts[0]);
        self.liquidity = self.liquidity.saturating_add(parts[1]);
        self.buyback = self.buyback.saturating_add(parts[2]);
        self.treasury = self.treasury.saturating_add(parts[3]);
    }

    pub fn total(&self) -> u128 {
        self.as_array()
            .iter()
            .fold(0u128, |acc, v| acc.saturating_add(*v))
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn as_array(&self) -> [u128; 4] {
        [self.marketing, self.liquidity, self.buyback, self.treasury]
    }
}

/// Split `amount` across four weights; the last slot absorbs the remainder.
pub(crate) fn proportion(amount: u128, weights: [u128; 4]) -> [u128; 4] {
    let total = weights
        .iter()
        .fold(0u128, |acc, w| acc.saturating_add(*w));
    if total == 0 {
        return [0, 0, 0, amount];
    }
    let mut parts = [0u128; 4];
    let mut assigned = 0u128;
    for i in 0..3 {
        parts[i] = mul_div(amount, weights[i], total);
        assigned += parts[i];
    }
    parts[3] = amount - assigned;
    parts
}
