//! [`Command`] for logging a [`Set`] into a [`Workout`].

use common::{
    operations::{By, Insert, Select},
    Weight,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Exercise, User};
use crate::{
    domain::{exercise, set, user, workout, Set, Workout},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for logging a new [`Set`] into an active [`Workout`] of a
/// [`User`].
#[derive(Clone, Debug)]
pub struct InsertSet {
    /// ID of the [`User`] owning the [`Workout`].
    pub user_id: user::Id,

    /// ID of the [`Workout`] to log the [`Set`] into.
    pub workout_id: workout::Id,

    /// ID of the performed [`Exercise`].
    pub exercise_id: exercise::Id,

    /// Lifted [`Weight`].
    pub weight: Weight,

    /// Number of performed [`set::Reps`].
    pub reps: set::Reps,

    /// [`set::Notes`] of the [`Set`].
    pub notes: Option<set::Notes>,
}

impl<Db> Command<InsertSet> for Service<Db>
where
    Db: Database<
            Select<By<Option<Workout>, workout::Id>>,
            Ok = Option<Workout>,
            Err = Traced<database::Error>,
        > + Database<Insert<Set>, Err = Traced<database::Error>>,
{
    type Ok = Set;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: InsertSet) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let InsertSet {
            user_id,
            workout_id,
            exercise_id,
            weight,
            reps,
            notes,
        } = cmd;

        let workout = self
            .database()
            .execute(Select(By::new(workout_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|w| w.user_id == user_id)
            .ok_or(E::WorkoutNotExists(workout_id))
            .map_err(tracerr::wrap!())?;
        if workout.is_completed() {
            return Err(tracerr::new!(E::WorkoutCompleted(workout_id)));
        }

        let set = Set {
            id: set::Id::new(),
            workout_id,
            exercise_id,
            weight,
            reps,
            notes,
            created_at: set::CreationDateTime::now(),
        };
        self.database()
            .execute(Insert(set.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(set)
    }
}

/// Error of [`InsertSet`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Workout`] with the provided ID does not exist.
    #[display("`Workout(id: {_0})` does not exist")]
    #[from(ignore)]
    WorkoutNotExists(#[error(not(source))] workout::Id),

    /// [`Workout`] with the provided ID is completed already.
    #[display("`Workout(id: {_0})` is completed")]
    #[from(ignore)]
    WorkoutCompleted(#[error(not(source))] workout::Id),
}
