//! [`Query`] collection related to a training history of a [`User`].

use std::collections::HashMap;

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{Set, User, Workout};
use crate::{
    domain::{user, workout},
    infra::{database, Database},
    read::{
        self,
        workout::{Set as LoggedSet, WithSets, Workout as LoggedWorkout},
    },
    Query, Service,
};

/// [`Query`] for all [`Workout`]s of a [`User`] along with their [`Set`]s,
/// most recently created first.
///
/// Failing to load the [`Set`]s doesn't fail the whole [`History`]: such
/// [`Workout`]s are returned without any [`Set`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct History {
    /// ID of the [`User`] whose [`History`] is queried.
    pub user_id: user::Id,
}

impl<Db> Query<History> for Service<Db>
where
    Db: Database<
            Select<By<Vec<LoggedWorkout>, user::Id>>,
            Ok = Vec<LoggedWorkout>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<LoggedSet>, Vec<workout::Id>>>,
            Ok = Vec<LoggedSet>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<WithSets>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        History { user_id }: History,
    ) -> Result<Self::Ok, Self::Err> {
        let workouts = self
            .database()
            .execute(Select(By::<Vec<LoggedWorkout>, _>::new(user_id)))
            .await
            .map_err(tracerr::wrap!())?;
        if workouts.is_empty() {
            return Ok(vec![]);
        }

        let ids = workouts.iter().map(|w| w.id).collect::<Vec<_>>();
        let sets = self
            .database()
            .execute(Select(By::<Vec<LoggedSet>, _>::new(ids)))
            .await
            .unwrap_or_else(|e| {
                log::warn!(
                    "failed to load sets of `User(id: {user_id})` workouts: {e}",
                );
                vec![]
            });

        let mut by_workout = HashMap::<_, Vec<_>>::new();
        for s in sets {
            by_workout.entry(s.workout_id).or_default().push(s);
        }

        Ok(workouts
            .into_iter()
            .map(|workout| WithSets {
                sets: by_workout.remove(&workout.id).unwrap_or_default(),
                workout,
            })
            .collect())
    }
}

/// [`Query`] for the [`History`] of a [`User`] along with its aggregated
/// [`read::Metrics`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HistoryMetrics {
    /// ID of the [`User`] whose [`History`] is aggregated.
    pub user_id: user::Id,
}

/// Output of the [`HistoryMetrics`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Workout`]s of the [`History`].
    pub workouts: Vec<WithSets>,

    /// [`read::Metrics`] aggregated over the [`Output::workouts`].
    pub metrics: read::Metrics,
}

impl<Db> Query<HistoryMetrics> for Service<Db>
where
    Self: Query<History, Ok = Vec<WithSets>, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        HistoryMetrics { user_id }: HistoryMetrics,
    ) -> Result<Self::Ok, Self::Err> {
        let workouts = self.execute(History { user_id }).await?;
        let metrics = read::Metrics::aggregate(&workouts);
        Ok(Output { workouts, metrics })
    }
}
