//! [`Set`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Volume, Weight};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::{Exercise, Workout};
use crate::domain::{exercise, workout};

pub use crate::domain::workout::Notes;

/// Series of repetitions of an [`Exercise`] performed within a [`Workout`].
///
/// Once logged, a [`Set`] is never changed.
#[derive(Clone, Debug)]
pub struct Set {
    /// ID of this [`Set`].
    pub id: Id,

    /// ID of the [`Workout`] this [`Set`] belongs to.
    pub workout_id: workout::Id,

    /// ID of the performed [`Exercise`].
    pub exercise_id: exercise::Id,

    /// Lifted [`Weight`].
    pub weight: Weight,

    /// Number of performed [`Reps`].
    pub reps: Reps,

    /// Free-form [`Notes`] of this [`Set`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`Set`] was logged.
    pub created_at: CreationDateTime,
}

impl Set {
    /// Returns the [`Volume`] of this [`Set`].
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.weight.volume(self.reps.into())
    }
}

/// ID of a [`Set`].
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

/// Number of repetitions in a [`Set`].
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Reps(i32);

impl Reps {
    /// Maximum number of [`Reps`] allowed to be logged.
    pub const MAX: Self = Self(10_000);

    /// Creates new [`Reps`] if the provided `count` is not negative and
    /// doesn't exceed [`Reps::MAX`].
    #[must_use]
    pub const fn new(count: i32) -> Option<Self> {
        if count < 0 || count > Self::MAX.0 {
            None
        } else {
            Some(Self(count))
        }
    }
}

impl FromStr for Reps {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Reps`")
    }
}

/// [`DateTime`] when a [`Set`] was logged.
pub type CreationDateTime = DateTimeOf<(Set, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{DateTime, Weight};

    use crate::domain::{exercise, workout};

    use super::{Id, Reps, Set};

    #[test]
    fn reps() {
        assert_eq!("8".parse::<Reps>().unwrap(), Reps::new(8).unwrap());
        assert_eq!(" 0 ".parse::<Reps>().unwrap(), Reps::new(0).unwrap());

        assert!("-1".parse::<Reps>().is_err());
        assert!("eight".parse::<Reps>().is_err());
        assert!(Reps::new(-3).is_none());

        assert_eq!(Reps::new(10_000), Some(Reps::MAX));
        assert!(Reps::new(10_001).is_none());
        assert!(Reps::new(i32::MAX).is_none());
    }

    #[test]
    fn volume() {
        let set = Set {
            id: Id::new(),
            workout_id: workout::Id::new(),
            exercise_id: exercise::Id::new(),
            weight: "102.5".parse::<Weight>().unwrap(),
            reps: Reps::new(4).unwrap(),
            notes: None,
            created_at: DateTime::now().coerce(),
        };

        assert_eq!(set.volume().to_string(), "410");
    }
}
