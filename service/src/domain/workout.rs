//! [`Workout`] definitions.

use std::time::Duration;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::{Set, User};

/// Training session of a [`User`], grouping the [`Set`]s performed in it.
#[derive(Clone, Debug)]
pub struct Workout {
    /// ID of this [`Workout`].
    pub id: Id,

    /// ID of the [`User`] owning this [`Workout`].
    pub user_id: user::Id,

    /// [`DateTime`] when this [`Workout`] was started.
    pub start_time: Option<StartDateTime>,

    /// [`DateTime`] when this [`Workout`] was completed.
    pub end_time: Option<EndDateTime>,

    /// Free-form [`Notes`] of this [`Workout`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`Workout`] was created.
    pub created_at: CreationDateTime,
}

impl Workout {
    /// Indicates whether this [`Workout`] has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Returns the [`Duration`] of this [`Workout`], if both of its ends are
    /// known and ordered.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        duration(self.start_time, self.end_time)
    }

    /// Returns the duration of this [`Workout`] in whole minutes, if both of
    /// its ends are known and ordered.
    ///
    /// Rounded to the nearest minute, but never below a single one.
    #[must_use]
    pub fn duration_minutes(&self) -> Option<u64> {
        duration_minutes(self.start_time, self.end_time)
    }
}

/// Calculates the [`Duration`] between the provided [`Workout`] ends.
pub(crate) fn duration(
    start: Option<StartDateTime>,
    end: Option<EndDateTime>,
) -> Option<Duration> {
    let (start, end) = (start?, end?.coerce());
    (end >= start).then(|| end - start)
}

/// Calculates the duration between the provided [`Workout`] ends in whole
/// minutes.
pub(crate) fn duration_minutes(
    start: Option<StartDateTime>,
    end: Option<EndDateTime>,
) -> Option<u64> {
    let minutes = (duration(start, end)?.as_millis() + 30_000) / 60_000;
    Some(u64::try_from(minutes).unwrap_or(u64::MAX).max(1))
}

/// ID of a [`Workout`].
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

/// Free-form notes attached to a [`Workout`] or a [`Set`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Notes(String);

impl Notes {
    /// Maximum length of [`Notes`] in characters.
    pub const MAX_LEN: usize = 2048;

    /// Creates new [`Notes`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` represents valid [`Notes`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        text.trim() == text
            && !text.is_empty()
            && text.chars().count() <= Self::MAX_LEN
    }
}

impl FromStr for Notes {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim()).ok_or("invalid `Notes`")
    }
}

/// [`DateTime`] when a [`Workout`] was created.
pub type CreationDateTime = DateTimeOf<(Workout, unit::Creation)>;

/// [`DateTime`] when a [`Workout`] was started.
pub type StartDateTime = DateTimeOf<(Workout, unit::Start)>;

/// [`DateTime`] when a [`Workout`] was completed.
pub type EndDateTime = DateTimeOf<(Workout, unit::End)>;
