//! Aggregated training history of a [`User`].
//!
//! [`User`]: crate::domain::User

use std::{collections::HashMap, fmt};

use common::{Volume, Weight};

use crate::{
    domain::exercise,
    read::workout::{self, WithSets},
};

/// Metrics derived from a collection of [`workout::WithSets`].
///
/// Never persisted: always recomputed from scratch, so the same collection
/// (in any order) yields the same [`Metrics`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Metrics {
    /// Sum of `weight × reps` over all the sets.
    pub total_volume: Volume,

    /// Maximum [`Weight`] lifted per [`exercise::Id`].
    pub exercise_max: HashMap<exercise::Id, Weight>,

    /// Number of workouts per [`WeekBucket`].
    pub frequency_by_week: HashMap<WeekBucket, u32>,
}

impl Metrics {
    /// Aggregates the provided workouts into [`Metrics`] in a single pass.
    ///
    /// Missing weights and reps count as zero, and workouts having neither a
    /// start nor a creation date are left out of [`Metrics::frequency_by_week`].
    #[must_use]
    pub fn aggregate<'w>(
        workouts: impl IntoIterator<Item = &'w WithSets>,
    ) -> Self {
        let mut metrics = Self::default();
        for WithSets { workout, sets } in workouts {
            metrics.count(workout);
            for set in sets {
                metrics.add(set);
            }
        }
        metrics
    }

    /// Counts the provided [`workout::Workout`] in its [`WeekBucket`].
    fn count(&mut self, workout: &workout::Workout) {
        if let Some(at) = workout.effective_date() {
            *self
                .frequency_by_week
                .entry(WeekBucket::of(at.date()))
                .or_default() += 1;
        }
    }

    /// Adds the provided [`workout::Set`] to the volume and maximums.
    fn add(&mut self, set: &workout::Set) {
        self.total_volume += set.volume();

        let weight = set.weight.unwrap_or(Weight::ZERO);
        _ = self
            .exercise_max
            .entry(set.exercise_id)
            .and_modify(|max| {
                if weight > *max {
                    *max = weight;
                }
            })
            .or_insert(weight);
    }
}

/// Calendar week a workout is attributed to.
///
/// Weeks are numbered within their year and start on Sunday, the first week
/// being the one containing January 1st (possibly partial). This is **not** an
/// [ISO 8601 week]: a week crossing a year boundary is split in two buckets.
///
/// [ISO 8601 week]: https://en.wikipedia.org/wiki/ISO_week_date
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct WeekBucket {
    /// Calendar year.
    pub year: i32,

    /// Week number within the [`WeekBucket::year`], starting from `1`.
    pub week: u16,
}

impl WeekBucket {
    /// Determines the [`WeekBucket`] of the provided UTC [`Date`].
    ///
    /// [`Date`]: time::Date
    #[must_use]
    pub fn of(date: time::Date) -> Self {
        // Whole days elapsed since January 1st.
        let day = date.ordinal() - 1;
        // Weekday of January 1st, Sunday being `0`.
        let jan1 = (u16::from(date.weekday().number_days_from_sunday()) + 7
            - day % 7)
            % 7;
        Self {
            year: date.year(),
            week: (day + jan1 + 1).div_ceil(7),
        }
    }
}

impl fmt::Display for WeekBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{}", self.year, self.week)
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Weight};
    use time::macros::date;

    use crate::{
        domain::{exercise, set, user, workout},
        read::workout::{Set, WithSets, Workout},
    };

    use super::{Metrics, WeekBucket};

    fn weight(w: &str) -> Weight {
        w.parse().unwrap()
    }

    fn workout_at(start: Option<&str>, created: Option<&str>) -> Workout {
        let at = |s: &str| DateTime::from_rfc3339(s).unwrap();
        Workout {
            id: workout::Id::new(),
            user_id: user::Id::new(),
            created_at: created.map(|s| at(s).coerce()),
            start_time: start.map(|s| at(s).coerce()),
            end_time: None,
            notes: None,
        }
    }

    fn set_of(
        workout: &Workout,
        exercise_id: exercise::Id,
        w: Option<&str>,
        reps: Option<i32>,
    ) -> Set {
        Set {
            id: set::Id::new(),
            workout_id: workout.id,
            exercise_id,
            weight: w.map(weight),
            reps: reps.and_then(set::Reps::new),
            notes: None,
        }
    }

    fn with_sets(
        workout: Workout,
        sets: impl FnOnce(&Workout) -> Vec<Set>,
    ) -> WithSets {
        WithSets {
            sets: sets(&workout),
            workout,
        }
    }

    #[test]
    fn empty_history_yields_nothing() {
        let metrics = Metrics::aggregate(&[]);

        assert_eq!(metrics.total_volume.to_string(), "0");
        assert!(metrics.exercise_max.is_empty());
        assert!(metrics.frequency_by_week.is_empty());
        assert_eq!(metrics, Metrics::default());
    }

    #[test]
    fn sums_volume_and_tracks_max() {
        let bench = exercise::Id::new();
        let history = [with_sets(
            workout_at(Some("2024-03-05T18:00:00Z"), None),
            |w| {
                vec![
                    set_of(w, bench, Some("135"), Some(8)),
                    set_of(w, bench, Some("145"), Some(6)),
                ]
            },
        )];

        let metrics = Metrics::aggregate(&history);

        assert_eq!(metrics.total_volume.to_string(), "1950");
        assert_eq!(metrics.exercise_max.len(), 1);
        assert_eq!(metrics.exercise_max[&bench], weight("145"));
    }

    #[test]
    fn max_is_seeded_by_first_occurrence() {
        let (squat, plank) = (exercise::Id::new(), exercise::Id::new());
        let history = [with_sets(
            workout_at(None, Some("2024-03-05T18:00:00Z")),
            |w| {
                vec![
                    set_of(w, plank, None, Some(3)),
                    set_of(w, squat, Some("100"), Some(5)),
                    set_of(w, squat, Some("90"), Some(5)),
                ]
            },
        )];

        let metrics = Metrics::aggregate(&history);

        assert_eq!(metrics.exercise_max[&plank], Weight::ZERO);
        assert_eq!(metrics.exercise_max[&squat], weight("100"));
        assert_eq!(metrics.total_volume.to_string(), "950");
    }

    #[test]
    fn missing_values_count_as_zero() {
        let deadlift = exercise::Id::new();
        let history = [with_sets(
            workout_at(Some("2024-03-05T18:00:00Z"), None),
            |w| {
                vec![
                    set_of(w, deadlift, None, Some(5)),
                    set_of(w, deadlift, Some("200"), None),
                ]
            },
        )];

        let metrics = Metrics::aggregate(&history);

        assert_eq!(metrics.total_volume.to_string(), "0");
        assert_eq!(metrics.exercise_max[&deadlift], weight("200"));
    }

    #[test]
    fn negative_weights_are_taken_as_is() {
        #[expect(unsafe_code, reason = "row written by another client")]
        let negative =
            unsafe { Weight::new_unchecked("-10".parse().unwrap()) };
        let dip = exercise::Id::new();
        let mut history = [with_sets(
            workout_at(Some("2024-03-05T18:00:00Z"), None),
            |w| vec![set_of(w, dip, None, Some(3))],
        )];
        history[0].sets[0].weight = Some(negative);

        let metrics = Metrics::aggregate(&history);

        assert_eq!(metrics.total_volume.to_string(), "-30");
        assert_eq!(metrics.exercise_max[&dip], negative);
    }

    #[test]
    fn extreme_values_saturate_volume() {
        #[expect(unsafe_code, reason = "row written by another client")]
        let huge = unsafe {
            Weight::new_unchecked(
                "70000000000000000000000000000".parse().unwrap(),
            )
        };
        let press = exercise::Id::new();
        let mut history = [
            with_sets(workout_at(Some("2024-03-05T18:00:00Z"), None), |w| {
                vec![set_of(w, press, None, Some(10_000))]
            }),
            with_sets(workout_at(Some("2024-03-06T18:00:00Z"), None), |w| {
                vec![
                    set_of(w, press, None, Some(1)),
                    set_of(w, press, Some("100"), Some(5)),
                ]
            }),
        ];
        history[0].sets[0].weight = Some(huge);
        history[1].sets[0].weight = Some(huge);

        let metrics = Metrics::aggregate(&history);

        assert_eq!(
            metrics.total_volume.to_string(),
            "79228162514264337593543950335",
        );
        assert_eq!(metrics.exercise_max[&press], huge);
        assert_eq!(metrics.frequency_by_week.values().sum::<u32>(), 2);
    }

    #[test]
    fn counts_workouts_per_week() {
        let history = [
            with_sets(workout_at(Some("2024-01-01T09:00:00Z"), None), |_| {
                vec![]
            }),
            with_sets(
                workout_at(
                    Some("2024-01-06T23:59:59Z"),
                    Some("2023-12-31T00:00:00Z"),
                ),
                |_| vec![],
            ),
            with_sets(workout_at(None, Some("2024-01-07T00:00:00Z")), |_| {
                vec![]
            }),
            with_sets(workout_at(None, None), |_| vec![]),
        ];

        let metrics = Metrics::aggregate(&history);

        let frequency = metrics
            .frequency_by_week
            .iter()
            .map(|(bucket, count)| (bucket.to_string(), *count))
            .collect::<std::collections::HashMap<_, _>>();
        assert_eq!(frequency.len(), 2);
        assert_eq!(frequency["2024-W1"], 2);
        assert_eq!(frequency["2024-W2"], 1);
        assert_eq!(metrics.total_volume.to_string(), "0");
    }

    #[test]
    fn week_buckets() {
        for (date, expected) in [
            (date!(2024 - 01 - 01), "2024-W1"),
            (date!(2024 - 01 - 06), "2024-W1"),
            (date!(2024 - 01 - 07), "2024-W2"),
            (date!(2024 - 12 - 31), "2024-W53"),
            (date!(2023 - 01 - 01), "2023-W1"),
            (date!(2023 - 01 - 07), "2023-W1"),
            (date!(2023 - 01 - 08), "2023-W2"),
            (date!(2022 - 01 - 01), "2022-W1"),
            (date!(2022 - 01 - 02), "2022-W2"),
            (date!(2021 - 12 - 31), "2021-W53"),
        ] {
            assert_eq!(WeekBucket::of(date).to_string(), expected, "{date}");
        }
    }

    #[test]
    fn order_does_not_matter() {
        let (squat, bench) = (exercise::Id::new(), exercise::Id::new());
        let history = vec![
            with_sets(workout_at(Some("2024-02-01T10:00:00Z"), None), |w| {
                vec![
                    set_of(w, squat, Some("100.5"), Some(5)),
                    set_of(w, bench, Some("60"), Some(10)),
                ]
            }),
            with_sets(workout_at(None, Some("2024-02-09T10:00:00Z")), |w| {
                vec![
                    set_of(w, squat, Some("110.25"), Some(3)),
                    set_of(w, bench, Some("0.1"), Some(3)),
                ]
            }),
            with_sets(workout_at(Some("2024-02-10T10:00:00Z"), None), |w| {
                vec![set_of(w, bench, Some("62.5"), Some(8))]
            }),
        ];

        let expected = Metrics::aggregate(&history);
        assert_eq!(expected.total_volume.to_string(), "1933.55");

        let mut reversed = history.clone();
        reversed.reverse();
        for s in &mut reversed {
            s.sets.reverse();
        }
        assert_eq!(Metrics::aggregate(&reversed), expected);

        let mut rotated = history;
        rotated.rotate_left(1);
        assert_eq!(Metrics::aggregate(&rotated), expected);
    }

    #[test]
    fn is_idempotent() {
        let squat = exercise::Id::new();
        let history = [with_sets(
            workout_at(Some("2024-02-01T10:00:00Z"), None),
            |w| vec![set_of(w, squat, Some("100"), Some(5))],
        )];

        assert_eq!(Metrics::aggregate(&history), Metrics::aggregate(&history));
    }
}
