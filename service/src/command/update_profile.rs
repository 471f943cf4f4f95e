//! [`Command`] for updating a [`Profile`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    weight,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::user::{self, profile, Profile},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Profile`] of a [`User`].
///
/// Only the provided fields are overwritten. A missing [`Profile`] is created.
#[derive(Clone, Debug)]
pub struct UpdateProfile {
    /// ID of the [`User`] whose [`Profile`] is updated.
    pub user_id: user::Id,

    /// New [`profile::Username`], if any.
    pub username: Option<profile::Username>,

    /// New [`weight::Unit`] preference, if any.
    pub unit_preference: Option<weight::Unit>,
}

impl<Db> Command<UpdateProfile> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Profile>, user::Id>>,
            Ok = Option<Profile>,
            Err = Traced<database::Error>,
        > + Database<Update<Profile>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Profile;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateProfile) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProfile {
            user_id,
            username,
            unit_preference,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut profile = tx
            .execute(Select(By::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .unwrap_or_else(|| Profile::empty(user_id));
        if let Some(name) = username {
            profile.username = Some(name);
        }
        if let Some(unit) = unit_preference {
            profile.unit_preference = Some(unit);
        }
        profile.updated_at = Some(profile::ModificationDateTime::now());

        tx.execute(Update(profile.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(profile)
    }
}

/// Error of [`UpdateProfile`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::weight;

    use crate::{
        domain::user::{self, Profile},
        infra::database::mock,
        Command as _,
    };

    use super::UpdateProfile;

    #[tokio::test]
    async fn creates_missing_profile() {
        let svc = mock::service();
        let user_id = user::Id::new();

        let profile = svc
            .execute(UpdateProfile {
                user_id,
                username: Some("ironman".parse().unwrap()),
                unit_preference: None,
            })
            .await
            .unwrap();

        assert_eq!(profile.id, user_id);
        assert!(profile.updated_at.is_some());
        assert_eq!(svc.database().tables().profiles.len(), 1);
    }

    #[tokio::test]
    async fn overwrites_only_provided_fields() {
        let svc = mock::service();
        let user_id = user::Id::new();
        svc.database().tables().profiles.push(Profile {
            username: Some("ironman".parse().unwrap()),
            ..Profile::empty(user_id)
        });

        let profile = svc
            .execute(UpdateProfile {
                user_id,
                username: None,
                unit_preference: Some(weight::Unit::Kg),
            })
            .await
            .unwrap();

        assert_eq!(
            profile.username.as_ref().map(ToString::to_string).as_deref(),
            Some("ironman"),
        );
        assert_eq!(profile.unit_preference, Some(weight::Unit::Kg));
        let tables = svc.database().tables();
        assert_eq!(tables.profiles.len(), 1);
        assert_eq!(tables.profiles[0].unit_preference, Some(weight::Unit::Kg));
    }
}
