//! Definitions of [`HistoryMetrics`] aggregated over a training history.

use common::{Volume, Weight};
use derive_more::From;
use juniper::{graphql_object, GraphQLObject};
use service::{query, read};

use crate::{api, Context};

/// Training history of a `User` along with its aggregated metrics.
#[derive(Clone, Debug, From)]
pub struct HistoryMetrics(query::history::Output);

/// Training history of a `User` along with its aggregated metrics.
#[graphql_object(context = Context)]
impl HistoryMetrics {
    /// Logged `Workout`s, most recently created first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "HistoryMetrics.workouts",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn workouts(&self) -> Vec<api::Workout> {
        self.0.workouts.iter().cloned().map(Into::into).collect()
    }

    /// Sum of weight multiplied by reps over all the logged `WorkoutSet`s.
    pub fn total_volume(&self) -> Volume {
        self.0.metrics.total_volume
    }

    /// Maximum `Weight` lifted per `Exercise`, in no particular order.
    pub fn exercise_max(&self) -> Vec<ExerciseMax> {
        self.0
            .metrics
            .exercise_max
            .iter()
            .map(|(id, weight)| ExerciseMax {
                exercise_id: (*id).into(),
                weight: *weight,
            })
            .collect()
    }

    /// Number of `Workout`s per calendar week, earliest week first.
    ///
    /// Weeks start on Sunday and are numbered within their year, so a week
    /// crossing a year boundary is split in two.
    pub fn frequency_by_week(&self) -> Vec<WeekFrequency> {
        let mut weeks = self
            .0
            .metrics
            .frequency_by_week
            .iter()
            .map(|(bucket, count)| (*bucket, *count))
            .collect::<Vec<_>>();
        weeks.sort_unstable_by_key(|(bucket, _)| *bucket);
        weeks
            .into_iter()
            .map(|(bucket, count)| WeekFrequency::new(bucket, count))
            .collect()
    }
}

/// Maximum `Weight` lifted in an `Exercise`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct ExerciseMax {
    /// ID of the `Exercise`.
    pub exercise_id: api::workout::ExerciseId,

    /// Maximum lifted `Weight`.
    pub weight: Weight,
}

/// Number of `Workout`s in a calendar week.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct WeekFrequency {
    /// Week key, like `2024-W1`.
    pub week: String,

    /// Calendar year of the week.
    pub year: i32,

    /// Number of the week within its year, starting from `1`.
    pub number: i32,

    /// Number of `Workout`s attributed to the week.
    pub count: i32,
}

impl WeekFrequency {
    /// Creates a new [`WeekFrequency`] of the provided
    /// [`read::history::WeekBucket`].
    fn new(bucket: read::history::WeekBucket, count: u32) -> Self {
        Self {
            week: bucket.to_string(),
            year: bucket.year,
            number: bucket.week.into(),
            count: i32::try_from(count).unwrap_or(i32::MAX),
        }
    }
}

/// Counters of `Workout`s logged by a `User`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct WorkoutStats {
    /// Total number of logged `Workout`s.
    pub total: i32,

    /// Number of `Workout`s logged since Monday 00:00 UTC.
    pub this_week: i32,
}

impl From<read::workout::Stats> for WorkoutStats {
    fn from(stats: read::workout::Stats) -> Self {
        Self {
            total: stats.total.into(),
            this_week: stats.this_week.into(),
        }
    }
}
