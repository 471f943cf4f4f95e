//! [`Set`]-related [`Database`] implementations.

use std::fmt;

use common::operations::{By, Insert, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{workout, Set},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Insert<Set>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(set): Insert<Set>,
    ) -> Result<Self::Ok, Self::Err> {
        let Set {
            id,
            workout_id,
            exercise_id,
            weight,
            reps,
            notes,
            created_at,
        } = set;

        const SQL: &str = "\
            INSERT INTO sets (\
                id, workout_id, exercise_id, \
                weight, reps, \
                notes, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::NUMERIC, $5::INT4, \
                $6::VARCHAR, $7::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &workout_id,
                &exercise_id,
                &weight,
                &reps,
                &notes,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<read::workout::Set>, Vec<workout::Id>>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::workout::Set>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::workout::Set>, Vec<workout::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        if ids.is_empty() {
            return Ok(vec![]);
        }

        const SQL: &str = "\
            SELECT id, workout_id, exercise_id, \
                   weight, reps, notes \
            FROM sets \
            WHERE workout_id = ANY($1::UUID[]) \
            ORDER BY created_at, id";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| read::workout::Set {
                id: row.get("id"),
                workout_id: row.get("workout_id"),
                exercise_id: row.get("exercise_id"),
                weight: or_absent(row.try_get("weight"), "weight"),
                reps: or_absent(row.try_get("reps"), "reps"),
                notes: row.get("notes"),
            })
            .collect())
    }
}

/// Unwraps the decoded value of the provided nullable `sets` column, treating
/// a malformed one as absent.
fn or_absent<T>(
    decoded: Result<Option<T>, impl fmt::Display>,
    column: &str,
) -> Option<T> {
    decoded.unwrap_or_else(|e| {
        log::warn!("malformed `sets.{column}` is treated as absent: {e}");
        None
    })
}
