//! [`Command`] for authorizing a [`User`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::Session;
use crate::{
    domain::{
        user::{self, session},
        User,
    },
    infra::{database, Database},
    session::Identity,
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`User`] by a [`Session`] token.
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db> Command<AuthorizeUserSession> for Service<Db>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Identity;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let session = self
            .decode_session(&token)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let user = self
            .database()
            .execute(Select(By::new(session.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::UserNotExists(session.user_id))
            .map_err(tracerr::wrap!())?;

        Ok(Identity {
            token,
            session,
            user,
        })
    }
}

impl<Db> Service<Db> {
    /// Decodes the [`Session`] carried by the provided [`session::Token`].
    ///
    /// Fails if the [`session::Token`] is malformed, forged or expired.
    pub(crate) fn decode_session(
        &self,
        token: &session::Token,
    ) -> Result<user::Session, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<user::Session>(
            token.as_ref(),
            &self.config.jwt_decoding_key,
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`User`] the [`Session`] belongs to does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

impl ExecutionError {
    /// Indicates whether this [`ExecutionError`] means the provided token
    /// doesn't authenticate anyone, as opposed to a failure to check it.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Db(_) => false,
            Self::JsonWebTokenDecodeError(_) | Self::UserNotExists(_) => true,
        }
    }
}
