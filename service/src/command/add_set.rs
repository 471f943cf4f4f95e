//! [`Command`] for adding a [`Set`] from a set entry form.

use common::Weight;
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{exercise, set, user, workout, Exercise, Set, Workout},
    Service,
};

use super::{
    find_or_create_exercise, insert_set, start_workout, Command,
    FindOrCreateExercise, InsertSet, StartWorkout,
};

/// [`Command`] for adding a [`Set`] as entered by a [`User`].
///
/// Starts a new [`Workout`] if there is no active one, and creates the
/// [`Exercise`] on first use.
#[derive(Clone, Debug)]
pub struct AddSet {
    /// ID of the [`User`] adding the [`Set`].
    pub user_id: user::Id,

    /// ID of the active [`Workout`], if any.
    pub workout_id: Option<workout::Id>,

    /// Name of the performed [`Exercise`], as entered.
    pub exercise: Option<String>,

    /// Lifted [`Weight`].
    pub weight: Option<Weight>,

    /// Number of performed [`set::Reps`].
    pub reps: Option<set::Reps>,

    /// [`set::Notes`] of the [`Set`].
    pub notes: Option<set::Notes>,
}

/// Output of [`AddSet`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// ID of the [`Workout`] the [`Set`] has been added to.
    pub workout_id: workout::Id,

    /// Performed [`Exercise`].
    pub exercise: Exercise,

    /// Added [`Set`].
    pub set: Set,
}

impl<Db> Command<AddSet> for Service<Db>
where
    Self: Command<
            StartWorkout,
            Ok = Workout,
            Err = Traced<start_workout::ExecutionError>,
        > + Command<
            FindOrCreateExercise,
            Ok = Exercise,
            Err = Traced<find_or_create_exercise::ExecutionError>,
        > + Command<
            InsertSet,
            Ok = Set,
            Err = Traced<insert_set::ExecutionError>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AddSet) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddSet {
            user_id,
            workout_id,
            exercise,
            weight,
            reps,
            notes,
        } = cmd;

        let (Some(name), Some(weight), Some(reps)) = (
            exercise.filter(|n| !n.trim().is_empty()),
            weight,
            reps,
        ) else {
            return Err(tracerr::new!(E::Incomplete));
        };
        let name = name
            .parse::<exercise::Name>()
            .map_err(|_| tracerr::new!(E::InvalidExerciseName))?;

        let workout_id = match workout_id {
            Some(id) => id,
            None => {
                self.execute(StartWorkout {
                    user_id,
                    notes: None,
                })
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .id
            }
        };

        let exercise = self
            .execute(FindOrCreateExercise { name })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let set = self
            .execute(InsertSet {
                user_id,
                workout_id,
                exercise_id: exercise.id,
                weight,
                reps,
                notes,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(Output {
            workout_id,
            exercise,
            set,
        })
    }
}

/// Error of [`AddSet`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Exercise, weight or reps are missing.
    #[display("Please fill in exercise, weight, and reps")]
    Incomplete,

    /// Provided exercise name is not a valid [`exercise::Name`].
    #[display("Invalid exercise name")]
    InvalidExerciseName,

    /// Failed to start a new [`Workout`].
    #[display("Failed to start `Workout`: {_0}")]
    #[from]
    StartWorkout(start_workout::ExecutionError),

    /// Failed to resolve the [`Exercise`].
    #[display("Failed to resolve `Exercise`: {_0}")]
    #[from]
    Exercise(find_or_create_exercise::ExecutionError),

    /// Failed to log the [`Set`].
    #[display("Failed to log `Set`: {_0}")]
    #[from]
    InsertSet(insert_set::ExecutionError),
}
