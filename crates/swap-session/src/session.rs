//! The mutable session state record.
//!
//! Exclusively owned and mutated by the `SyncController`; components receive
//! values as arguments and return new computed values. Every multi-field
//! update here is a single atomic replacement of the affected fields.

use alloy_primitives::Address;

use crate::token_list::Token;
use crate::types::{PairPath, PairPrice, PairReserves, Side};

#[derive(Debug, Clone)]
pub struct Session {
    pub from_token: Token,
    pub to_token: Option<Token>,
    /// Verbatim user- or engine-set amount strings.
    pub from_amount: String,
    pub to_amount: String,
    pub pair_address: Option<Address>,
    pub reserves: Option<PairReserves>,
    /// Derived from reserves, never set directly.
    pub price: Option<PairPrice>,
    /// Defaults true; set false only after an allowance check finds zero
    /// remaining allowance.
    pub token_approved: bool,
    pub insufficient_funds: bool,
    pub loading_reserves: bool,
    pub loading_from_input: bool,
    pub loading_to_input: bool,
}

impl Session {
    pub fn new(from_token: Token) -> Self {
        Self {
            from_token,
            to_token: None,
            from_amount: String::new(),
            to_amount: String::new(),
            pair_address: None,
            reserves: None,
            price: None,
            token_approved: true,
            insufficient_funds: false,
            loading_reserves: false,
            loading_from_input: false,
            loading_to_input: false,
        }
    }

    pub fn amount(&self, side: Side) -> &str {
        match side {
            Side::From => &self.from_amount,
            Side::To => &self.to_amount,
        }
    }

    pub fn set_amount(&mut self, side: Side, value: String) {
        match side {
            Side::From => self.from_amount = value,
            Side::To => self.to_amount = value,
        }
    }

    /// The loading flag for a side refers to that side's input field being
    /// engine-filled.
    pub fn loading(&self, side: Side) -> bool {
        match side {
            Side::From => self.loading_from_input,
            Side::To => self.loading_to_input,
        }
    }

    pub fn set_loading(&mut self, side: Side, loading: bool) {
        match side {
            Side::From => self.loading_from_input = loading,
            Side::To => self.loading_to_input = loading,
        }
    }

    /// The quoting path, available once a destination token is selected.
    pub fn path(&self) -> Option<PairPath> {
        self.to_token.as_ref().map(|to| PairPath {
            from: self.from_token.clone(),
            to: to.clone(),
        })
    }

    /// Replace reserves and recompute the derived price in one step.
    /// Amount fields are never touched here.
    pub fn set_reserves(&mut self, reserves: PairReserves) {
        self.price = reserves.price();
        self.reserves = Some(reserves);
    }

    /// Drop everything keyed to the current pair identity.
    pub fn clear_pair_state(&mut self) {
        self.pair_address = None;
        self.reserves = None;
        self.price = None;
    }

    /// Atomically swap both token identities and both amount values. No
    /// intermediate state pairing one side's token with the other side's
    /// amount is ever observable. Returns false when no destination token is
    /// selected yet.
    pub fn flip(&mut self) -> bool {
        let Some(to_token) = self.to_token.take() else {
            return false;
        };
        let old_from = std::mem::replace(&mut self.from_token, to_token);
        self.to_token = Some(old_from);
        std::mem::swap(&mut self.from_amount, &mut self.to_amount);
        true
    }
}
