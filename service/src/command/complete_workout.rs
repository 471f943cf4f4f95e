//! [`Command`] for completing an active [`Workout`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Set, User};
use crate::{
    domain::{user, workout, Workout},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for completing an active [`Workout`] of a [`User`].
#[derive(Clone, Debug)]
pub struct CompleteWorkout {
    /// ID of the [`User`] completing the [`Workout`].
    pub user_id: user::Id,

    /// ID of the active [`Workout`], if any.
    pub workout_id: Option<workout::Id>,

    /// [`workout::Notes`] to complete the [`Workout`] with.
    ///
    /// If [`None`], the [`Workout`] is noted with its duration.
    pub notes: Option<workout::Notes>,
}

impl<Db> Command<CompleteWorkout> for Service<Db>
where
    Db: Database<
            Select<By<Option<Workout>, workout::Id>>,
            Ok = Option<Workout>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<read::workout::Set>, Vec<workout::Id>>>,
            Ok = Vec<read::workout::Set>,
            Err = Traced<database::Error>,
        > + Database<Update<Workout>, Err = Traced<database::Error>>,
{
    type Ok = Workout;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CompleteWorkout,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CompleteWorkout {
            user_id,
            workout_id,
            notes,
        } = cmd;

        let workout_id = workout_id
            .ok_or(E::NoActiveWorkout)
            .map_err(tracerr::wrap!())?;

        let mut workout = self
            .database()
            .execute(Select(By::<Option<Workout>, _>::new(workout_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|w| w.user_id == user_id)
            .ok_or(E::WorkoutNotExists(workout_id))
            .map_err(tracerr::wrap!())?;
        if workout.is_completed() {
            return Err(tracerr::new!(E::AlreadyCompleted(workout_id)));
        }

        let sets = self
            .database()
            .execute(Select(By::<Vec<read::workout::Set>, _>::new(vec![
                workout_id,
            ])))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if sets.is_empty() {
            return Err(tracerr::new!(E::NoSets(workout_id)));
        }

        workout.end_time = Some(workout::EndDateTime::now());
        workout.notes = notes.or_else(|| {
            let minutes = workout.duration_minutes().unwrap_or(1);
            workout::Notes::new(format!(
                "Workout completed in {minutes} minutes",
            ))
        });

        self.database()
            .execute(Update(workout.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(workout)
    }
}

/// Error of [`CompleteWorkout`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// No [`Workout`] is active.
    #[display("No active workout session, add a set first")]
    NoActiveWorkout,

    /// [`Workout`] with the provided ID does not exist.
    #[display("`Workout(id: {_0})` does not exist")]
    WorkoutNotExists(#[error(not(source))] workout::Id),

    /// [`Workout`] with the provided ID has been completed already.
    #[display("`Workout(id: {_0})` is already completed")]
    AlreadyCompleted(#[error(not(source))] workout::Id),

    /// [`Workout`] with the provided ID has no [`Set`]s logged.
    #[display("`Workout(id: {_0})` has no sets logged")]
    NoSets(#[error(not(source))] workout::Id),
}
