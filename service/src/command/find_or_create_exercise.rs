//! [`Command`] for resolving an [`Exercise`] by its name.

use common::operations::{By, Insert, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{exercise, Exercise},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for resolving an [`Exercise`] by its [`exercise::Name`],
/// creating it on first use.
///
/// Concurrent creations of the same [`Exercise`] resolve into a single one.
#[derive(Clone, Debug, From)]
pub struct FindOrCreateExercise {
    /// [`exercise::Name`] of the [`Exercise`] to resolve.
    pub name: exercise::Name,
}

impl<Db> Command<FindOrCreateExercise> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<Exercise>, &'l exercise::Name>>,
            Ok = Option<Exercise>,
            Err = Traced<database::Error>,
        > + Database<Insert<Exercise>, Err = Traced<database::Error>>,
{
    type Ok = Exercise;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: FindOrCreateExercise,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let FindOrCreateExercise { name } = cmd;

        if let Some(e) = self
            .database()
            .execute(Select(By::new(&name)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Ok(e);
        }

        self.database()
            .execute(Insert(Exercise {
                id: exercise::Id::new(),
                name: name.clone(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // A concurrent insertion of the same name may have won.
        let exercise = self
            .database()
            .execute(Select(By::new(&name)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::NotCreated(name))
            .map_err(tracerr::wrap!())?;
        log::debug!("`Exercise(id: {})` created", exercise.id);

        Ok(exercise)
    }
}

/// Error of [`FindOrCreateExercise`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Exercise`] is missing right after being created.
    #[display("`Exercise(name: {_0})` has not been created")]
    #[from(ignore)]
    NotCreated(#[error(not(source))] exercise::Name),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{exercise, Exercise},
        infra::database::mock,
        Command as _,
    };

    use super::FindOrCreateExercise;

    #[tokio::test]
    async fn reuses_existing_exercise() {
        let svc = mock::service();
        let squat = Exercise {
            id: exercise::Id::new(),
            name: "Squat".parse().unwrap(),
        };
        svc.database().tables().exercises.push(squat.clone());

        let found = svc
            .execute(FindOrCreateExercise {
                name: "Squat".parse().unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(found, squat);
        assert!(!svc.database().tables().calls.contains(&"insert exercise"));
    }

    #[tokio::test]
    async fn creates_missing_exercise_once() {
        let svc = mock::service();

        let first = svc
            .execute(FindOrCreateExercise {
                name: "Deadlift".parse().unwrap(),
            })
            .await
            .unwrap();
        let second = svc
            .execute(FindOrCreateExercise {
                name: " Deadlift ".parse().unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(svc.database().tables().exercises.len(), 1);
    }

    #[tokio::test]
    async fn names_are_case_sensitive() {
        let svc = mock::service();

        let lower = svc
            .execute(FindOrCreateExercise {
                name: "bench press".parse().unwrap(),
            })
            .await
            .unwrap();
        let upper = svc
            .execute(FindOrCreateExercise {
                name: "Bench Press".parse().unwrap(),
            })
            .await
            .unwrap();

        assert_ne!(lower.id, upper.id);
    }
}
