//! [`Weight`]-related definitions.

use std::{fmt, iter, ops, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

use crate::define_kind;

/// Lifted weight.
///
/// Carries no unit: [`Unit`] is only a display preference of a user, so
/// weights of different users are never mixed.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Weight(Decimal);

impl Weight {
    /// Zero [`Weight`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Maximum [`Weight`] allowed to be logged.
    pub const MAX: Self = Self(Decimal::from_parts(10_000, 0, 0, false, 0));

    /// Creates a new [`Weight`] if the provided amount is not negative and
    /// doesn't exceed [`Weight::MAX`].
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        ((!amount.is_sign_negative() || amount.is_zero())
            && amount <= Self::MAX.0)
            .then_some(Self(amount))
    }

    /// Creates a new [`Weight`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided amount must not be negative nor exceed [`Weight::MAX`].
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the amount of this [`Weight`].
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Calculates the [`Volume`] of lifting this [`Weight`] the provided
    /// number of repetitions.
    ///
    /// Saturates instead of overflowing.
    #[must_use]
    pub fn volume(self, reps: i32) -> Volume {
        Volume(self.0.saturating_mul(Decimal::from(reps)))
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Weight {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| "invalid amount")?;
        if amount > Self::MAX.0 {
            return Err("weight is too large");
        }
        Self::new(amount).ok_or("negative weight")
    }
}

/// Training volume: sum of [`Weight`]s multiplied by repetitions.
///
/// Arithmetic on [`Volume`]s saturates at the bounds of [`Decimal`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Volume(Decimal);

impl Volume {
    /// Zero [`Volume`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Returns the amount of this [`Volume`].
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl ops::Add for Volume {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl ops::AddAssign for Volume {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl iter::Sum for Volume {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, ops::Add::add)
    }
}

define_kind! {
    #[doc = "Unit a user prefers [`Weight`]s to be displayed in."]
    enum Unit {
        #[doc = "Pounds."]
        Lbs = 1,

        #[doc = "Kilograms."]
        Kg = 2,
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Non-negative decimal weight, like `135` or `102.5`.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Weight = super::Weight;

    impl Weight {
        fn to_output<S: ScalarValue>(w: &Weight) -> Value<S> {
            Value::scalar(w.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Weight` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Weight` input scalar: {e}")
                    })
                })
        }
    }

    /// Decimal training volume (sum of weight multiplied by repetitions).
    #[graphql_scalar(with = Self, parse_token(String))]
    type Volume = super::Volume;

    impl Volume {
        fn to_output<S: ScalarValue>(v: &Volume) -> Value<S> {
            Value::scalar(v.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Volume` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    s.parse().map(super::Volume).map_err(|e| {
                        format!("Cannot parse `Volume` input scalar: {e}")
                    })
                })
        }
    }
}
