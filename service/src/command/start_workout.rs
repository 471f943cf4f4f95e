//! [`Command`] for starting a new [`Workout`].

use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{user, workout, Workout},
    Service,
};

use super::{create_workout, Command, CreateWorkout};

pub use super::create_workout::ExecutionError;

/// [`Command`] for starting a new [`Workout`] of a [`User`] right now.
#[derive(Clone, Debug)]
pub struct StartWorkout {
    /// ID of the [`User`] starting the [`Workout`].
    pub user_id: user::Id,

    /// [`workout::Notes`] of the new [`Workout`].
    pub notes: Option<workout::Notes>,
}

impl<Db> Command<StartWorkout> for Service<Db>
where
    Self: Command<
        CreateWorkout,
        Ok = Workout,
        Err = Traced<create_workout::ExecutionError>,
    >,
{
    type Ok = Workout;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: StartWorkout) -> Result<Self::Ok, Self::Err> {
        let StartWorkout { user_id, notes } = cmd;

        self.execute(CreateWorkout {
            user_id,
            start_time: Some(workout::StartDateTime::now()),
            end_time: None,
            notes,
        })
        .await
    }
}

#[cfg(test)]
mod spec {
    use crate::{domain::user, infra::database::mock, Command as _};

    use super::StartWorkout;

    #[tokio::test]
    async fn starts_active_workout() {
        let svc = mock::service();
        let user_id = user::Id::new();

        let workout = svc
            .execute(StartWorkout {
                user_id,
                notes: None,
            })
            .await
            .unwrap();

        assert_eq!(workout.user_id, user_id);
        assert!(workout.start_time.is_some());
        assert!(!workout.is_completed());
        assert_eq!(svc.database().tables().workouts.len(), 1);
    }
}
