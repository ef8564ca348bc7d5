//! VND price representation and display formatting.
//!
//! Prices in the shop are Vietnamese đồng: whole amounts, no minor units.
//! Decimal arithmetic keeps line-item multiplication exact; the display
//! helpers reproduce the `vi-VN` grouping the pages always used
//! (`1.250.000₫`).

use std::fmt;
use std::ops::{Add, AddAssign, Mul};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price in Vietnamese đồng.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole đồng amount.
    #[must_use]
    pub fn from_vnd(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Format with the `₫` sign: `1.250.000₫`, `-50.000₫`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}₫", group_thousands(self.0))
    }

    /// Format with the short `đ` suffix used by cart line cells: `50.000đ`.
    #[must_use]
    pub fn display_short(&self) -> String {
        format!("{}đ", group_thousands(self.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<i64> for Price {
    type Output = Self;

    fn mul(self, qty: i64) -> Self {
        Self(self.0 * Decimal::from(qty))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Group an amount's whole part with `.` separators, `vi-VN` style.
fn group_thousands(amount: Decimal) -> String {
    let whole = amount.trunc().to_i128().unwrap_or(0);
    let negative = whole < 0;
    let digits = whole.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
