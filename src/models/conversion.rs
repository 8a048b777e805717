use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ETH_CURRENCY: &str = "ETH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericBase {
    Hex,
    #[default]
    Dec,
}

impl NumericBase {
    pub fn radix(&self) -> u32 {
        match self {
            NumericBase::Hex => 16,
            NumericBase::Dec => 10,
        }
    }
}

impl fmt::Display for NumericBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericBase::Hex => write!(f, "hex"),
            NumericBase::Dec => write!(f, "dec"),
        }
    }
}

/// Scale of an amount relative to one whole ETH. Fiat amounts are always
/// held in whole units, i.e. `Eth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Denomination {
    Wei,
    Gwei,
    Eth,
}

impl Denomination {
    /// Power of ten separating this denomination from ETH.
    pub fn decimals(&self) -> i64 {
        match self {
            Denomination::Wei => 18,
            Denomination::Gwei => 9,
            Denomination::Eth => 0,
        }
    }
}

/// An exact amount together with the base it is rendered in, its
/// denomination and its currency code.
#[derive(Debug, Clone, PartialEq)]
pub struct MonetaryValue {
    pub amount: BigDecimal,
    pub base: NumericBase,
    pub denomination: Denomination,
    pub currency: String,
}

impl MonetaryValue {
    pub fn new(amount: BigDecimal, base: NumericBase, denomination: Denomination) -> Self {
        Self {
            amount,
            base,
            denomination,
            currency: ETH_CURRENCY.to_string(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn in_base(mut self, base: NumericBase) -> Self {
        self.base = base;
        self
    }
}
