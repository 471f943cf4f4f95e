//! [`Exercise`] definitions.

use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Movement performed in a [`Set`], identified by its unique [`Name`].
///
/// [`Exercise`]s are created on first use and never changed afterwards.
///
/// [`Set`]: crate::domain::Set
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Exercise {
    /// ID of this [`Exercise`].
    pub id: Id,

    /// Unique [`Name`] of this [`Exercise`].
    pub name: Name,
}

/// ID of an [`Exercise`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Human-readable name of an [`Exercise`].
///
/// Compared exactly: `Bench Press` and `bench press` are different
/// [`Exercise`]s.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.chars().count() <= 128
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim()).ok_or("invalid `exercise::Name`")
    }
}

#[cfg(test)]
mod spec {
    use super::Name;

    #[test]
    fn name() {
        assert_eq!(
            "  Bench Press ".parse::<Name>().unwrap(),
            Name::new("Bench Press").unwrap(),
        );
        assert_ne!(
            Name::new("Bench Press").unwrap(),
            Name::new("bench press").unwrap(),
        );

        assert!(Name::new(" Squat").is_none());
        assert!(Name::new("").is_none());
        assert!("   ".parse::<Name>().is_err());
        assert!(Name::new("x".repeat(129)).is_none());
    }
}
