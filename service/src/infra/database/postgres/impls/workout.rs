//! [`Workout`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{user, workout, Workout},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<Workout>, workout::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Workout>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Workout>, workout::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, user_id, \
                   start_time, end_time, \
                   notes, \
                   COALESCE(created_at, start_time, NOW()) AS created_at \
            FROM workouts \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Workout {
                id: row.get("id"),
                user_id: row.get("user_id"),
                start_time: row.get("start_time"),
                end_time: row.get("end_time"),
                notes: row.get("notes"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Insert<Workout>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(workout): Insert<Workout>,
    ) -> Result<Self::Ok, Self::Err> {
        let Workout {
            id,
            user_id,
            start_time,
            end_time,
            notes,
            created_at,
        } = workout;

        const SQL: &str = "\
            INSERT INTO workouts (\
                id, user_id, \
                start_time, end_time, \
                notes, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, \
                $3::TIMESTAMPTZ, $4::TIMESTAMPTZ, \
                $5::VARCHAR, $6::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[&id, &user_id, &start_time, &end_time, &notes, &created_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Workout>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(workout): Update<Workout>,
    ) -> Result<Self::Ok, Self::Err> {
        let Workout {
            id,
            start_time,
            end_time,
            notes,
            ..
        } = workout;

        const SQL: &str = "\
            UPDATE workouts \
            SET start_time = $2::TIMESTAMPTZ, \
                end_time = $3::TIMESTAMPTZ, \
                notes = $4::VARCHAR \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id, &start_time, &end_time, &notes])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<read::workout::Workout>, user::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::workout::Workout>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::workout::Workout>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();

        const SQL: &str = "\
            SELECT id, user_id, \
                   start_time, end_time, \
                   notes, created_at \
            FROM workouts \
            WHERE user_id = $1::UUID \
            ORDER BY created_at DESC NULLS LAST, id";
        Ok(self
            .query(SQL, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| read::workout::Workout {
                id: row.get("id"),
                user_id: row.get("user_id"),
                created_at: row.get("created_at"),
                start_time: row.get("start_time"),
                end_time: row.get("end_time"),
                notes: row.get("notes"),
            })
            .collect())
    }
}

impl<C> Database<Select<By<read::workout::Count, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::workout::Count;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::workout::Count, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM workouts \
            WHERE user_id = $1::UUID";
        self.query_opt(SQL, &[&user_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

impl<C>
    Database<
        Select<
            By<read::workout::Count, (user::Id, workout::CreationDateTime)>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::workout::Count;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::workout::Count, (user::Id, workout::CreationDateTime)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (user_id, since) = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM workouts \
            WHERE user_id = $1::UUID \
              AND created_at >= $2::TIMESTAMPTZ";
        self.query_opt(SQL, &[&user_id, &since])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
