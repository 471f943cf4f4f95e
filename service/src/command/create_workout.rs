//! [`Command`] for creating a new [`Workout`].

use common::operations::{Commit, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{
        user::{self, Profile},
        workout, Workout,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Workout`] of a [`User`].
///
/// Makes sure the [`User`] has a [`Profile`] as well.
#[derive(Clone, Debug)]
pub struct CreateWorkout {
    /// ID of the [`User`] owning the new [`Workout`].
    pub user_id: user::Id,

    /// [`workout::StartDateTime`] of the new [`Workout`].
    pub start_time: Option<workout::StartDateTime>,

    /// [`workout::EndDateTime`] of the new [`Workout`], if it's already
    /// completed.
    pub end_time: Option<workout::EndDateTime>,

    /// [`workout::Notes`] of the new [`Workout`].
    pub notes: Option<workout::Notes>,
}

impl<Db> Command<CreateWorkout> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Profile>, Err = Traced<database::Error>>
        + Database<Insert<Workout>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Workout;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateWorkout) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateWorkout {
            user_id,
            start_time,
            end_time,
            notes,
        } = cmd;

        if let (Some(start), Some(end)) = (start_time, end_time) {
            if end.coerce() < start {
                return Err(tracerr::new!(E::EndsBeforeStart));
            }
        }

        let workout = Workout {
            id: workout::Id::new(),
            user_id,
            start_time,
            end_time,
            notes,
            created_at: workout::CreationDateTime::now(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(Profile::empty(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(workout.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(workout)
    }
}

/// Error of [`CreateWorkout`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Workout`] is completed before being started.
    #[display("`Workout` cannot end before it starts")]
    EndsBeforeStart,
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        domain::{user, user::Profile},
        infra::database::mock,
        Command as _,
    };

    use super::{CreateWorkout, ExecutionError};

    fn at(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    #[tokio::test]
    async fn creates_workout_and_profile() {
        let svc = mock::service();
        let user_id = user::Id::new();

        let workout = svc
            .execute(CreateWorkout {
                user_id,
                start_time: Some(at("2024-03-04T18:00:00Z").coerce()),
                end_time: Some(at("2024-03-04T19:00:00Z").coerce()),
                notes: Some("Leg day".parse().unwrap()),
            })
            .await
            .unwrap();

        assert!(workout.is_completed());
        let tables = svc.database().tables();
        assert_eq!(tables.workouts.len(), 1);
        assert_eq!(tables.workouts[0].id, workout.id);
        assert_eq!(tables.profiles.len(), 1);
        assert_eq!(tables.profiles[0].id, user_id);
        assert_eq!(
            tables.calls,
            ["transact", "insert profile", "insert workout", "commit"],
        );
    }

    #[tokio::test]
    async fn keeps_existing_profile() {
        let svc = mock::service();
        let user_id = user::Id::new();
        svc.database().tables().profiles.push(Profile {
            username: Some("ironman".parse().unwrap()),
            ..Profile::empty(user_id)
        });

        _ = svc
            .execute(CreateWorkout {
                user_id,
                start_time: None,
                end_time: None,
                notes: None,
            })
            .await
            .unwrap();

        let tables = svc.database().tables();
        assert_eq!(tables.profiles.len(), 1);
        assert_eq!(
            tables.profiles[0].username.as_ref().map(ToString::to_string),
            Some("ironman".to_owned()),
        );
    }

    #[tokio::test]
    async fn rejects_end_before_start() {
        let svc = mock::service();

        let err = svc
            .execute(CreateWorkout {
                user_id: user::Id::new(),
                start_time: Some(at("2024-03-04T18:00:00Z").coerce()),
                end_time: Some(at("2024-03-04T17:00:00Z").coerce()),
                notes: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::EndsBeforeStart));
        assert!(svc.database().tables().calls.is_empty());
    }
}
