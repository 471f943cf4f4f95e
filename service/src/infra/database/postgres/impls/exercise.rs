//! [`Exercise`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{exercise, Exercise},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<'l, C> Database<Select<By<Option<Exercise>, &'l exercise::Name>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Exercise>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Exercise>, &'l exercise::Name>>,
    ) -> Result<Self::Ok, Self::Err> {
        let name = by.into_inner();

        const SQL: &str = "\
            SELECT id, name \
            FROM exercises \
            WHERE name = $1::VARCHAR";
        Ok(self
            .query_opt(SQL, &[&name])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Exercise {
                id: row.get("id"),
                name: row.get("name"),
            }))
    }
}

impl<C> Database<Select<By<HashMap<exercise::Id, Exercise>, Vec<exercise::Id>>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = HashMap<exercise::Id, Exercise>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<exercise::Id, Exercise>, Vec<exercise::Id>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT id, name \
            FROM exercises \
            WHERE id = ANY($1::UUID[])";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Exercise {
                        id,
                        name: row.get("name"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Insert<Exercise>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(exercise): Insert<Exercise>,
    ) -> Result<Self::Ok, Self::Err> {
        let Exercise { id, name } = exercise;

        const SQL: &str = "\
            INSERT INTO exercises (id, name) \
            VALUES ($1::UUID, $2::VARCHAR) \
            ON CONFLICT (name) DO NOTHING";
        self.exec(SQL, &[&id, &name])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
