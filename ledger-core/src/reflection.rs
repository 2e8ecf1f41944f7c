//! Reflection-adjusted balance arithmetic.
//!
//! Holders never claim reflection. Instead every non-pair balance is reported
//! through a fixed formula over two global aggregates:
//!
//! ```text
//! effective = 2·base − ⌊ base·S / (C·R + S) ⌋
//! ```
//!
//! | Symbol | Meaning                                                    |
//! |--------|------------------------------------------------------------|
//! | `S`    | total supply held outside liquidity pairs                  |
//! | `R`    | total reflected, grown by the reflection slice of each fee |
//! | `C`    | growth factor, fixed at 100                                |
//!
//! With `R = 0` the quotient equals `base`, so `effective = base`. As `R`
//! grows the quotient shrinks toward zero and `effective` approaches
//! `2·base`. The quotient is floored, so the reported balance rounds up by
//! at most one unit. Products are taken in 256 bits; nothing here can
//! overflow for any `u128` input.

use primitive_types::U256;

/// Growth constant `C` in the reflection formula.
pub const REFLECTION_GROWTH_FACTOR: u128 = 100;

/// Effective balance of a non-pair account holding `base` units.
///
/// If `C·R + S` is zero the quotient is taken as `base` and the account
/// reports its raw balance.
pub fn reflected_balance(base: u128, sub_lp_balance: u128, total_reflected: u128) -> u128 {
    let denominator = U256::from(REFLECTION_GROWTH_FACTOR) * U256::from(total_reflected)
        + U256::from(sub_lp_balance);
    if denominator.is_zero() {
        return base;
    }
    let quotient = U256::from(base) * U256::from(sub_lp_balance) / denominator;
    saturate(U256::from(base) * 2 - quotient)
}

/// Base units behind a reported balance of `reflected`: the floor inverse of
/// [`reflected_balance`].
///
/// Since `reflected_balance(b) = b·(2C·R + S)/(C·R + S)` up to the floored
/// term, the inverse is `⌊reflected·(C·R + S) / (2C·R + S)⌋`. For any `b`
/// whose reported balance does not saturate this returns `b` exactly, so a
/// holder can always spend the whole balance it is shown.
pub fn base_for_reflected(reflected: u128, sub_lp_balance: u128, total_reflected: u128) -> u128 {
    let scaled = U256::from(REFLECTION_GROWTH_FACTOR) * U256::from(total_reflected);
    let denominator: U256 = scaled * 2 + U256::from(sub_lp_balance);
    if denominator.is_zero() {
        return reflected;
    }
    let numerator = U256::from(reflected) * (scaled + U256::from(sub_lp_balance));
    saturate(numerator / denominator)
}

/// `⌊a·b / denominator⌋`, saturating at `u128::MAX`. Zero denominator yields 0.
pub(crate) fn mul_div(a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        return 0;
    }
    saturate(U256::from(a) * U256::from(b) / U256::from(denominator))
}

fn saturate(value: U256) -> u128 {
    if value.bits() > 128 {
        u128::MAX
    } else {
        value.low_u128()
    }
}
