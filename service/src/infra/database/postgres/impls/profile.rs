//! [`Profile`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::user::{self, Profile},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Option<Profile>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Profile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Profile>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, username, unit_preference, \
                   created_at, updated_at \
            FROM profiles \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Profile {
                id: row.get("id"),
                username: row.get("username"),
                unit_preference: row.get("unit_preference"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            }))
    }
}

impl<C> Database<Insert<Profile>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(profile): Insert<Profile>,
    ) -> Result<Self::Ok, Self::Err> {
        let Profile {
            id,
            username,
            unit_preference,
            created_at,
            updated_at,
        } = profile;

        const SQL: &str = "\
            INSERT INTO profiles (\
                id, username, unit_preference, \
                created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::INT2, \
                $4::TIMESTAMPTZ, $5::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO NOTHING";
        self.exec(
            SQL,
            &[&id, &username, &unit_preference, &created_at, &updated_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Profile>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(profile): Update<Profile>,
    ) -> Result<Self::Ok, Self::Err> {
        let Profile {
            id,
            username,
            unit_preference,
            created_at,
            updated_at,
        } = profile;

        const SQL: &str = "\
            INSERT INTO profiles (\
                id, username, unit_preference, \
                created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::INT2, \
                $4::TIMESTAMPTZ, $5::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET username = EXCLUDED.username, \
                unit_preference = EXCLUDED.unit_preference, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[&id, &username, &unit_preference, &created_at, &updated_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
