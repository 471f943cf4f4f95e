//! [`Workout`] read model definitions.

use std::collections::HashSet;

use common::{DateTime, Volume, Weight};
use derive_more::{From, Into};

use crate::domain::{exercise, set, user, workout};
#[cfg(doc)]
use crate::domain::{Exercise, User};

/// Logged [`Workout`] as seen in a history of a [`User`].
///
/// [`Workout`]: crate::domain::Workout
#[derive(Clone, Debug)]
pub struct Workout {
    /// ID of this [`Workout`].
    pub id: workout::Id,

    /// ID of the [`User`] owning this [`Workout`].
    pub user_id: user::Id,

    /// [`DateTime`] when this [`Workout`] was created, if recorded.
    pub created_at: Option<workout::CreationDateTime>,

    /// [`DateTime`] when this [`Workout`] was started, if recorded.
    pub start_time: Option<workout::StartDateTime>,

    /// [`DateTime`] when this [`Workout`] was completed, if it was.
    pub end_time: Option<workout::EndDateTime>,

    /// Free-form notes of this [`Workout`].
    pub notes: Option<workout::Notes>,
}

impl Workout {
    /// Returns the [`DateTime`] this [`Workout`] is attributed to: its start,
    /// falling back to its creation.
    #[must_use]
    pub fn effective_date(&self) -> Option<DateTime> {
        self.start_time
            .map(|at| at.coerce())
            .or_else(|| self.created_at.map(|at| at.coerce()))
    }

    /// Returns the duration of this [`Workout`] in whole minutes.
    ///
    /// Known durations are rounded to the nearest minute, but never below a
    /// single one.
    #[must_use]
    pub fn duration_minutes(&self) -> Option<u64> {
        workout::duration_minutes(self.start_time, self.end_time)
    }
}

impl From<crate::domain::Workout> for Workout {
    fn from(w: crate::domain::Workout) -> Self {
        Self {
            id: w.id,
            user_id: w.user_id,
            created_at: Some(w.created_at),
            start_time: w.start_time,
            end_time: w.end_time,
            notes: w.notes,
        }
    }
}

/// [`Set`] as seen in a history of a [`User`].
///
/// Rows written by other clients may lack a weight or reps, so both are
/// optional here.
///
/// [`Set`]: crate::domain::Set
#[derive(Clone, Debug)]
pub struct Set {
    /// ID of this [`Set`].
    pub id: set::Id,

    /// ID of the [`Workout`] this [`Set`] belongs to.
    pub workout_id: workout::Id,

    /// ID of the performed [`Exercise`].
    pub exercise_id: exercise::Id,

    /// Lifted [`Weight`], if recorded.
    pub weight: Option<Weight>,

    /// Number of performed repetitions, if recorded.
    pub reps: Option<set::Reps>,

    /// Free-form notes of this [`Set`].
    pub notes: Option<set::Notes>,
}

impl Set {
    /// Returns the [`Volume`] of this [`Set`], counting missing values as zero.
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.weight
            .unwrap_or(Weight::ZERO)
            .volume(self.reps.map_or(0, Into::into))
    }
}

impl From<crate::domain::Set> for Set {
    fn from(s: crate::domain::Set) -> Self {
        Self {
            id: s.id,
            workout_id: s.workout_id,
            exercise_id: s.exercise_id,
            weight: Some(s.weight),
            reps: Some(s.reps),
            notes: s.notes,
        }
    }
}

/// [`Workout`] along with all of its [`Set`]s.
#[derive(Clone, Debug)]
pub struct WithSets {
    /// The [`Workout`] itself.
    pub workout: Workout,

    /// [`Set`]s of the [`Workout`], in no particular order.
    pub sets: Vec<Set>,
}

impl WithSets {
    /// Returns the duration of the [`Workout`] in whole minutes.
    ///
    /// See [`Workout::duration_minutes()`] for details.
    #[must_use]
    pub fn duration_minutes(&self) -> Option<u64> {
        self.workout.duration_minutes()
    }

    /// Returns the number of distinct [`Exercise`]s performed in the
    /// [`Workout`].
    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.sets
            .iter()
            .map(|s| s.exercise_id)
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Counters of [`Workout`]s logged by a [`User`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Stats {
    /// Total number of logged [`Workout`]s.
    pub total: Count,

    /// Number of [`Workout`]s logged since the start of the current week.
    pub this_week: Count,
}

/// Number of [`Workout`]s.
#[derive(Clone, Copy, Debug, Default, Eq, From, Hash, Into, PartialEq)]
pub struct Count(i32);

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{exercise, set, user, workout};

    use super::{Set, WithSets, Workout};

    fn workout(start: Option<&str>, end: Option<&str>) -> Workout {
        Workout {
            id: workout::Id::new(),
            user_id: user::Id::new(),
            created_at: Some(
                DateTime::from_rfc3339("2024-01-01T08:00:00Z")
                    .unwrap()
                    .coerce(),
            ),
            start_time: start
                .map(|s| DateTime::from_rfc3339(s).unwrap().coerce()),
            end_time: end.map(|s| DateTime::from_rfc3339(s).unwrap().coerce()),
            notes: None,
        }
    }

    fn set(workout_id: workout::Id, exercise_id: exercise::Id) -> Set {
        Set {
            id: set::Id::new(),
            workout_id,
            exercise_id,
            weight: None,
            reps: None,
            notes: None,
        }
    }

    #[test]
    fn effective_date_prefers_start() {
        let started = workout(Some("2024-01-02T10:00:00Z"), None);
        assert_eq!(
            started.effective_date().unwrap().to_rfc3339(),
            "2024-01-02T10:00:00Z",
        );

        let unstarted = workout(None, None);
        assert_eq!(
            unstarted.effective_date().unwrap().to_rfc3339(),
            "2024-01-01T08:00:00Z",
        );

        let undated = Workout {
            created_at: None,
            ..workout(None, None)
        };
        assert_eq!(undated.effective_date(), None);
    }

    #[test]
    fn duration_rounds_to_minutes() {
        let cases = [
            ("2024-01-02T10:00:00Z", "2024-01-02T10:45:29Z", Some(45)),
            ("2024-01-02T10:00:00Z", "2024-01-02T10:45:30Z", Some(46)),
            ("2024-01-02T10:00:00Z", "2024-01-02T10:00:10Z", Some(1)),
            ("2024-01-02T10:00:00Z", "2024-01-02T09:00:00Z", None),
        ];
        for (start, end, expected) in cases {
            let w = WithSets {
                workout: workout(Some(start), Some(end)),
                sets: vec![],
            };
            assert_eq!(w.duration_minutes(), expected, "{start} -> {end}");
        }

        let ongoing = WithSets {
            workout: workout(Some("2024-01-02T10:00:00Z"), None),
            sets: vec![],
        };
        assert_eq!(ongoing.duration_minutes(), None);
    }

    #[test]
    fn counts_distinct_exercises() {
        let w = workout(None, None);
        let (squat, bench) = (exercise::Id::new(), exercise::Id::new());
        let with_sets = WithSets {
            sets: vec![set(w.id, squat), set(w.id, bench), set(w.id, squat)],
            workout: w,
        };

        assert_eq!(with_sets.sets.len(), 3);
        assert_eq!(with_sets.exercise_count(), 2);
    }

    #[test]
    fn volume_of_incomplete_set_is_zero() {
        let mut s = set(workout::Id::new(), exercise::Id::new());
        assert_eq!(s.volume().to_string(), "0");

        s.weight = Some("100".parse().unwrap());
        assert_eq!(s.volume().to_string(), "0");

        s.reps = set::Reps::new(5);
        assert_eq!(s.volume().to_string(), "500");
    }
}
