//! Extended integer costs: `ℤ ∪ {+∞, −∞}`.
//!
//! The reconciliation dynamic programs price impossible assignments at
//! `+∞` and take minima over mixed finite/infinite tables, so the cost
//! currency must carry infinities through ordinary arithmetic. Operations
//! whose result is mathematically undefined (`+∞ + −∞`, `0 · ∞`, `∞/∞`,
//! any division by zero) return a [`DomainError`] instead of a value;
//! reaching one is a programming bug, never a property of user input.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Undefined extended-arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// `+∞ + −∞` (in either order), or the subtraction equivalents.
    #[error("sum of opposite infinities is undefined")]
    OppositeInfinities,
    /// `0 · ±∞` or `±∞ · 0`.
    #[error("product of zero and infinity is undefined")]
    ZeroTimesInfinity,
    /// Division by zero, or `∞ / ∞`.
    #[error("undefined division ({0})")]
    UndefinedDivision(&'static str),
    /// A finite operation overflowed the underlying integer.
    #[error("finite cost arithmetic overflowed")]
    Overflow,
    /// Conversion of an infinite cost to a plain integer.
    #[error("infinite cost cannot be converted to an integer")]
    InfiniteConversion,
}

/// An integer extended with signed infinities.
///
/// The derived ordering is the intended total order because the variants
/// are declared in ascending rank: `−∞ <` every finite value `< +∞`, and
/// finite values compare by their payload.
///
/// # Examples
///
/// ```
/// use synrec_core::cost::Cost;
///
/// assert_eq!(Cost::PosInf.checked_add(Cost::Finite(-5)), Ok(Cost::PosInf));
/// assert!(Cost::PosInf > Cost::Finite(1_000_000_000));
/// assert!(Cost::PosInf.checked_add(Cost::NegInf).is_err());
/// assert!(i64::try_from(Cost::PosInf).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Cost {
    /// Negative infinity: below every finite value.
    NegInf,
    /// An ordinary signed integer.
    Finite(i64),
    /// Positive infinity: above every finite value.
    PosInf,
}

impl Cost {
    /// Zero, the additive identity.
    pub const ZERO: Self = Self::Finite(0);

    /// True for both infinities.
    #[must_use]
    pub const fn is_infinite(self) -> bool {
        matches!(self, Self::NegInf | Self::PosInf)
    }

    /// True for [`Cost::Finite`].
    #[must_use]
    pub const fn is_finite(self) -> bool {
        matches!(self, Self::Finite(_))
    }

    /// Sign of the value: `-1`, `0`, or `1`.
    #[must_use]
    pub const fn signum(self) -> i64 {
        match self {
            Self::NegInf => -1,
            Self::Finite(value) => value.signum(),
            Self::PosInf => 1,
        }
    }

    /// The finite payload, or a [`DomainError`] for infinities.
    ///
    /// # Errors
    ///
    /// [`DomainError::InfiniteConversion`] when `self` is `±∞`.
    pub const fn into_finite(self) -> Result<i64, DomainError> {
        match self {
            Self::Finite(value) => Ok(value),
            Self::NegInf | Self::PosInf => Err(DomainError::InfiniteConversion),
        }
    }

    /// Checked addition with sign-preserving infinities.
    ///
    /// # Errors
    ///
    /// [`DomainError::OppositeInfinities`] for `+∞ + −∞`;
    /// [`DomainError::Overflow`] on finite overflow.
    pub fn checked_add(self, rhs: Self) -> Result<Self, DomainError> {
        match (self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => {
                a.checked_add(b).map(Self::Finite).ok_or(DomainError::Overflow)
            }
            (Self::PosInf, Self::NegInf) | (Self::NegInf, Self::PosInf) => {
                Err(DomainError::OppositeInfinities)
            }
            (Self::PosInf, _) | (_, Self::PosInf) => Ok(Self::PosInf),
            (Self::NegInf, _) | (_, Self::NegInf) => Ok(Self::NegInf),
        }
    }

    /// Checked subtraction: `a − b = a + (−b)` with the matching
    /// restrictions on like-signed infinities.
    ///
    /// # Errors
    ///
    /// [`DomainError::OppositeInfinities`] for `+∞ − +∞` and `−∞ − −∞`;
    /// [`DomainError::Overflow`] on finite overflow.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, DomainError> {
        match (self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => {
                a.checked_sub(b).map(Self::Finite).ok_or(DomainError::Overflow)
            }
            (Self::PosInf, Self::PosInf) | (Self::NegInf, Self::NegInf) => {
                Err(DomainError::OppositeInfinities)
            }
            (Self::PosInf, _) | (_, Self::NegInf) => Ok(Self::PosInf),
            (Self::NegInf, _) | (_, Self::PosInf) => Ok(Self::NegInf),
        }
    }

    /// Checked multiplication with the usual sign rule for infinities.
    ///
    /// # Errors
    ///
    /// [`DomainError::ZeroTimesInfinity`] for `0 · ±∞` in either order;
    /// [`DomainError::Overflow`] on finite overflow.
    pub fn checked_mul(self, rhs: Self) -> Result<Self, DomainError> {
        match (self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => {
                a.checked_mul(b).map(Self::Finite).ok_or(DomainError::Overflow)
            }
            (lhs, rhs) => {
                // At least one side is infinite.
                if lhs.signum() == 0 || rhs.signum() == 0 {
                    return Err(DomainError::ZeroTimesInfinity);
                }
                if lhs.signum() * rhs.signum() > 0 {
                    Ok(Self::PosInf)
                } else {
                    Ok(Self::NegInf)
                }
            }
        }
    }

    /// Checked division.
    ///
    /// `finite / ∞ = 0`; `∞ / finite` keeps the sign product.
    ///
    /// # Errors
    ///
    /// [`DomainError::UndefinedDivision`] for any division by zero and for
    /// `∞ / ∞`.
    pub fn checked_div(self, rhs: Self) -> Result<Self, DomainError> {
        match (self, rhs) {
            (_, Self::Finite(0)) => Err(DomainError::UndefinedDivision("division by zero")),
            (Self::Finite(a), Self::Finite(b)) => Ok(Self::Finite(a / b)),
            (Self::Finite(_), Self::PosInf | Self::NegInf) => Ok(Self::ZERO),
            (Self::PosInf | Self::NegInf, Self::PosInf | Self::NegInf) => {
                Err(DomainError::UndefinedDivision("infinity over infinity"))
            }
            (lhs, rhs) => {
                if lhs.signum() * rhs.signum() > 0 {
                    Ok(Self::PosInf)
                } else {
                    Ok(Self::NegInf)
                }
            }
        }
    }

    /// The smaller of two costs under the extended total order.
    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        match self.cmp(&rhs) {
            Ordering::Greater => rhs,
            Ordering::Less | Ordering::Equal => self,
        }
    }
}

impl From<i64> for Cost {
    fn from(value: i64) -> Self {
        Self::Finite(value)
    }
}

impl From<usize> for Cost {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Self::PosInf, Self::Finite)
    }
}

impl TryFrom<Cost> for i64 {
    type Error = DomainError;

    fn try_from(value: Cost) -> Result<Self, Self::Error> {
        value.into_finite()
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegInf => write!(f, "-inf"),
            Self::Finite(value) => write!(f, "{value}"),
            Self::PosInf => write!(f, "inf"),
        }
    }
}
