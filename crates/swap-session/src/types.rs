//! Common types, error taxonomy, and unit-scaling helpers.

use alloy_primitives::Address;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::token_list::Token;

/// User-facing failure taxonomy. The display strings are the fixed messages
/// handed to the notification sink; `StaleResult` is handled internally and
/// never surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("There is no liquidity pool for this token pair.")]
    NoLiquidity,
    #[error("stale result discarded")]
    StaleResult,
    #[error("You have insufficient funds for this swap.")]
    InsufficientFunds,
    #[error("The signing request was declined in your wallet.")]
    UserCancelled,
    #[error("Failed to approve token for transfer.")]
    ApprovalFailed,
    #[error("Something went wrong with the swap you attempted.")]
    SwapFailed,
}

pub type Result<T> = std::result::Result<T, SwapError>;

/// Which of the two amount inputs an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    From,
    To,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::From => Side::To,
            Side::To => Side::From,
        }
    }
}

/// Ordered two-token path carrying full token values, so decimal scaling is
/// taken from each token rather than a shared default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairPath {
    pub from: Token,
    pub to: Token,
}

impl PairPath {
    pub fn addresses(&self) -> [Address; 2] {
        [self.from.address, self.to.address]
    }

    /// Pools order their reserve slots by raw address magnitude, smallest
    /// first. The pair is "flipped" when the from token lands in slot 1.
    pub fn flipped(&self) -> bool {
        self.from.address > self.to.address
    }
}

/// Decimal-scaled, orientation-corrected reserve snapshot. `reserve_from`
/// always corresponds to the session's from token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairReserves {
    pub reserve_from: Decimal,
    pub reserve_to: Decimal,
}

impl PairReserves {
    /// Derived mid price in both directions. Undefined when either reserve
    /// is zero.
    pub fn price(&self) -> Option<PairPrice> {
        if self.reserve_from.is_zero() || self.reserve_to.is_zero() {
            return None;
        }
        Some(PairPrice {
            from_per_to: self.reserve_from / self.reserve_to,
            to_per_from: self.reserve_to / self.reserve_from,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairPrice {
    pub from_per_to: Decimal,
    pub to_per_from: Decimal,
}

/// Convert a raw integer chain quantity into a decimal amount using the
/// owning token's precision. Splitting into whole and fractional parts keeps
/// reserves near the top of the u128 range representable.
pub fn from_base_units(raw: u128, decimals: u32) -> Decimal {
    let scale = 10u128.pow(decimals.min(28));
    let whole = raw / scale;
    let frac = raw % scale;
    let whole_dec = Decimal::from_u128(whole)
        .or_else(|| Decimal::from_f64(whole as f64))
        .unwrap_or(Decimal::ZERO);
    let scale_dec = Decimal::from_u128(scale).unwrap_or(Decimal::ONE);
    whole_dec + Decimal::from_u128(frac).unwrap_or_default() / scale_dec
}

/// Convert a decimal amount into raw base units for the given precision.
/// Returns `None` for negative amounts or values too large to represent.
pub fn to_base_units(amount: Decimal, decimals: u32) -> Option<u128> {
    if amount.is_sign_negative() {
        return None;
    }
    let scale = Decimal::from_u128(10u128.pow(decimals.min(28)))?;
    amount.checked_mul(scale)?.trunc().to_u128()
}

/// Parse a user-typed amount string. Returns `Some` only for a strictly
/// positive number; anything else (empty, junk, zero, negative) means the
/// opposite field should be cleared rather than quoted.
pub fn parse_positive_amount(value: &str) -> Option<Decimal> {
    let parsed = Decimal::from_str(value.trim()).ok()?;
    if parsed > Decimal::ZERO {
        Some(parsed)
    } else {
        None
    }
}

/// Format an engine-computed amount for the opposite input field, fixed to
/// `places` decimal places.
pub fn format_amount(value: Decimal, places: u32) -> String {
    format!("{:.prec$}", value.round_dp(places), prec = places as usize)
}
