//! [`WorkoutStats`] definition.

use common::{
    operations::{By, Select},
    DateTime,
};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{User, Workout};
use crate::{
    domain::{user, workout},
    infra::{database, Database},
    read::workout::{Count, Stats},
    Query, Service,
};

/// [`Query`] counting the [`Workout`]s logged by a [`User`].
///
/// The current week starts on Monday, 00:00 UTC.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WorkoutStats {
    /// ID of the [`User`] whose [`Workout`]s are counted.
    pub user_id: user::Id,
}

impl<Db> Query<WorkoutStats> for Service<Db>
where
    Db: Database<
            Select<By<Count, user::Id>>,
            Ok = Count,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Count, (user::Id, workout::CreationDateTime)>>,
            Ok = Count,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        WorkoutStats { user_id }: WorkoutStats,
    ) -> Result<Self::Ok, Self::Err> {
        let total = self
            .database()
            .execute(Select(By::<Count, _>::new(user_id)))
            .await
            .map_err(tracerr::wrap!())?;

        let week_start = DateTime::now().start_of_week().coerce();
        let this_week = self
            .database()
            .execute(Select(By::<Count, _>::new((user_id, week_start))))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Stats { total, this_week })
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use crate::{
        domain::{user, workout, Workout},
        infra::database::mock,
        Query as _,
    };

    use super::WorkoutStats;

    fn workout(user_id: user::Id, created_at: DateTime) -> Workout {
        Workout {
            id: workout::Id::new(),
            user_id,
            start_time: None,
            end_time: None,
            notes: None,
            created_at: created_at.coerce(),
        }
    }

    #[tokio::test]
    async fn counts_total_and_this_week() {
        let svc = mock::service();
        let user_id = user::Id::new();
        let week_start = DateTime::now().start_of_week();
        {
            let mut tables = svc.database().tables();
            tables.workouts.push(workout(user_id, week_start));
            tables.workouts.push(workout(user_id, DateTime::now()));
            tables.workouts.push(workout(
                user_id,
                week_start - Duration::from_secs(1),
            ));
            tables.workouts.push(workout(user::Id::new(), DateTime::now()));
        }

        let stats = svc.execute(WorkoutStats { user_id }).await.unwrap();

        assert_eq!(i32::from(stats.total), 3);
        assert_eq!(i32::from(stats.this_week), 2);
    }
}
