//! [`Workout`]-related definitions.

use common::{DateTime, Volume, Weight};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{command, domain, query, read, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// Logged [`Workout`] of a `User`.
#[derive(Clone, Debug)]
pub struct Workout {
    /// [`read::workout::Workout`] representing this [`Workout`].
    workout: read::workout::Workout,

    /// [`Set`]s of this [`Workout`], loaded lazily unless known upfront.
    sets: OnceCell<Vec<read::workout::Set>>,
}

impl From<read::workout::WithSets> for Workout {
    fn from(w: read::workout::WithSets) -> Self {
        Self {
            workout: w.workout,
            sets: OnceCell::new_with(Some(w.sets)),
        }
    }
}

impl From<domain::Workout> for Workout {
    fn from(w: domain::Workout) -> Self {
        Self {
            workout: w.into(),
            sets: OnceCell::new(),
        }
    }
}

impl Workout {
    /// Returns the [`Set`]s of this [`Workout`].
    async fn load_sets(
        &self,
        ctx: &Context,
    ) -> Result<&Vec<read::workout::Set>, Error> {
        self.sets
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::workout::Sets::by(vec![self.workout.id]))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
            })
            .await
    }

    /// Returns this [`Workout`] along with its [`Set`]s.
    async fn with_sets(
        &self,
        ctx: &Context,
    ) -> Result<read::workout::WithSets, Error> {
        Ok(read::workout::WithSets {
            workout: self.workout.clone(),
            sets: self.load_sets(ctx).await?.clone(),
        })
    }
}

/// Logged workout of a `User`.
#[graphql_object(context = Context)]
impl Workout {
    /// Unique identifier of this `Workout`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Workout.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.workout.id.into()
    }

    /// `DateTime` when this `Workout` was created, if recorded.
    pub fn created_at(&self) -> Option<DateTime> {
        self.workout.created_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `Workout` was started, if recorded.
    pub fn start_time(&self) -> Option<DateTime> {
        self.workout.start_time.map(|at| at.coerce())
    }

    /// `DateTime` when this `Workout` was completed, if it was.
    pub fn end_time(&self) -> Option<DateTime> {
        self.workout.end_time.map(|at| at.coerce())
    }

    /// Indicator whether this `Workout` is completed.
    pub fn is_completed(&self) -> bool {
        self.workout.end_time.is_some()
    }

    /// Free-form notes of this `Workout`.
    pub fn notes(&self) -> Option<Notes> {
        self.workout.notes.clone().map(Into::into)
    }

    /// Duration of this `Workout` in whole minutes, if known.
    ///
    /// Never less than a single minute.
    pub fn duration_minutes(&self) -> Option<i32> {
        self.workout
            .duration_minutes()
            .map(|m| i32::try_from(m).unwrap_or(i32::MAX))
    }

    /// `Set`s logged in this `Workout`, in no particular order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Workout.sets",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn sets(&self, ctx: &Context) -> Result<Vec<Set>, Error> {
        Ok(self.load_sets(ctx).await?.iter().cloned().map(Set).collect())
    }

    /// Number of distinct `Exercise`s performed in this `Workout`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Workout.exerciseCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn exercise_count(&self, ctx: &Context) -> Result<i32, Error> {
        let count = self.with_sets(ctx).await?.exercise_count();
        i32::try_from(count)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Total volume lifted in this `Workout`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Workout.volume",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn volume(&self, ctx: &Context) -> Result<Volume, Error> {
        Ok(self
            .load_sets(ctx)
            .await?
            .iter()
            .map(read::workout::Set::volume)
            .sum())
    }
}

/// [`Set`] logged in a [`Workout`].
#[derive(Clone, Debug, From, Into)]
pub struct Set(read::workout::Set);

/// Set of an exercise logged in a `Workout`.
#[graphql_object(name = "WorkoutSet", context = Context)]
impl Set {
    /// Unique identifier of this `WorkoutSet`.
    pub fn id(&self) -> SetId {
        self.0.id.into()
    }

    /// ID of the `Workout` this `WorkoutSet` belongs to.
    pub fn workout_id(&self) -> Id {
        self.0.workout_id.into()
    }

    /// `Exercise` performed in this `WorkoutSet`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "WorkoutSet.exercise",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn exercise(&self, ctx: &Context) -> Result<Exercise, Error> {
        ctx.service()
            .execute(query::exercise::ByIds::by(vec![self.0.exercise_id]))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .remove(&self.0.exercise_id)
            .map(Exercise)
            .ok_or_else(|| api::query::ExerciseError::NotExists.into())
            .map_err(ctx.error())
    }

    /// Lifted `Weight`, if recorded.
    pub fn weight(&self) -> Option<Weight> {
        self.0.weight
    }

    /// Number of performed repetitions, if recorded.
    pub fn reps(&self) -> Option<i32> {
        self.0.reps.map(Into::into)
    }

    /// Volume of this `WorkoutSet`, counting missing values as zero.
    pub fn volume(&self) -> Volume {
        self.0.volume()
    }

    /// Free-form notes of this `WorkoutSet`.
    pub fn notes(&self) -> Option<Notes> {
        self.0.notes.clone().map(Into::into)
    }
}

/// Exercise a [`Set`] is logged for.
#[derive(Clone, Debug, From, Into)]
pub struct Exercise(domain::Exercise);

/// Exercise a `WorkoutSet` is logged for.
#[graphql_object(context = Context)]
impl Exercise {
    /// Unique identifier of this `Exercise`.
    pub fn id(&self) -> ExerciseId {
        self.0.id.into()
    }

    /// Unique name of this `Exercise`.
    pub fn name(&self) -> ExerciseName {
        self.0.name.clone().into()
    }
}

/// Result of logging a [`Set`].
#[derive(Clone, Debug, From)]
pub struct AddSetResult(command::add_set::Output);

/// Result of logging a `WorkoutSet`.
#[graphql_object(context = Context)]
impl AddSetResult {
    /// ID of the `Workout` the `WorkoutSet` is logged in.
    ///
    /// Refers to a newly started `Workout` if none was provided.
    pub fn workout_id(&self) -> Id {
        self.0.workout_id.into()
    }

    /// `Exercise` the `WorkoutSet` is logged for.
    pub fn exercise(&self) -> Exercise {
        self.0.exercise.clone().into()
    }

    /// Logged `WorkoutSet`.
    pub fn set(&self) -> Set {
        Set(self.0.set.clone().into())
    }
}

/// Unique identifier of a `Workout`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::workout::Id)]
#[into(domain::workout::Id)]
#[graphql(name = "WorkoutId", transparent)]
pub struct Id(Uuid);

/// Unique identifier of a `WorkoutSet`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::set::Id)]
#[into(domain::set::Id)]
#[graphql(name = "WorkoutSetId", transparent)]
pub struct SetId(Uuid);

/// Unique identifier of an `Exercise`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::exercise::Id)]
#[into(domain::exercise::Id)]
#[graphql(name = "ExerciseId", transparent)]
pub struct ExerciseId(Uuid);

/// Unique name of an `Exercise`, like `Bench Press`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ExerciseName",
    with = scalar::Via::<domain::exercise::Name>,
)]
pub struct ExerciseName(domain::exercise::Name);

/// Free-form notes of a `Workout` or a `WorkoutSet`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "Notes",
    with = scalar::Via::<domain::workout::Notes>,
)]
pub struct Notes(domain::workout::Notes);
