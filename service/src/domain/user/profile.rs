//! [`Profile`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{unit, weight, DateTimeOf};
use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user;

/// Public profile of a [`User`].
///
/// Shares the [`user::Id`] with the [`User`] it describes.
#[derive(Clone, Debug)]
pub struct Profile {
    /// ID of the [`User`] this [`Profile`] describes.
    pub id: user::Id,

    /// [`Username`] displayed instead of an email.
    pub username: Option<Username>,

    /// [`weight::Unit`] the [`User`] prefers weights to be displayed in.
    pub unit_preference: Option<weight::Unit>,

    /// [`DateTime`] when this [`Profile`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Profile`] was last updated.
    pub updated_at: Option<ModificationDateTime>,
}

impl Profile {
    /// Creates a new empty [`Profile`] of the [`User`] with the provided ID.
    #[must_use]
    pub fn empty(id: user::Id) -> Self {
        Self {
            id,
            username: None,
            unit_preference: None,
            created_at: CreationDateTime::now(),
            updated_at: None,
        }
    }
}

/// Name a [`User`] is displayed with.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Username(String);

impl Username {
    /// Creates a new [`Username`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Username`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name
            && !name.is_empty()
            && name.chars().count() <= 64
            && !name.chars().any(char::is_control)
    }
}

impl FromStr for Username {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim()).ok_or("invalid `Username`")
    }
}

/// [`DateTime`] when a [`Profile`] was created.
pub type CreationDateTime = DateTimeOf<(Profile, unit::Creation)>;

/// [`DateTime`] when a [`Profile`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Profile, unit::Modification)>;
