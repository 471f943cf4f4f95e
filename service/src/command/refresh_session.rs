//! [`Command`] for refreshing a [`Session`].

use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{user::Session, User};
use crate::{
    domain::user::session,
    session::{Event, Identity},
    Service,
};

use super::{authorize_user_session, AuthorizeUserSession, Command};

/// [`Command`] for prolonging a [`Session`] by issuing a new [`session::Token`]
/// in place of a still valid one.
#[derive(Clone, Debug, From)]
pub struct RefreshSession {
    /// [`session::Token`] to be replaced.
    pub token: session::Token,
}

impl<Db> Command<RefreshSession> for Service<Db>
where
    Self: Command<
        AuthorizeUserSession,
        Ok = Identity,
        Err = Traced<authorize_user_session::ExecutionError>,
    >,
{
    type Ok = Identity;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RefreshSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RefreshSession { token } = cmd;

        let current = self
            .execute(AuthorizeUserSession {
                token: token.clone(),
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let identity = self
            .issue_session(current.user)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        self.events().emit(Event::Refreshed {
            previous: token,
            identity: identity.clone(),
        });

        Ok(identity)
    }
}

/// Error of [`RefreshSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// The [`session::Token`] doesn't authorize any [`User`].
    #[display("Failed to authorize `Session`: {_0}")]
    Unauthorized(authorize_user_session::ExecutionError),

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{AuthorizeUserSession, SignIn},
        infra::database::mock,
        session::Event,
        Command as _,
    };

    use super::{ExecutionError, RefreshSession};

    #[tokio::test]
    async fn replaces_token_and_announces_it() {
        let svc = mock::service();
        let user = mock::user("lifter@example.com");
        svc.database().tables().users.push(user.clone());
        let signed_in = svc.execute(SignIn::ByUserId(user.id)).await.unwrap();
        let mut events = svc.events().subscribe();

        let refreshed = svc
            .execute(RefreshSession {
                token: signed_in.token.clone(),
            })
            .await
            .unwrap();

        assert_eq!(refreshed.user.id, user.id);
        match events.try_recv().unwrap() {
            Event::Refreshed { previous, identity } => {
                assert_eq!(previous, signed_in.token);
                assert_eq!(identity.token, refreshed.token);
            }
            ev @ (Event::SignedIn(_) | Event::SignedOut { .. }) => {
                panic!("unexpected event: {ev:?}")
            }
        }
        assert!(svc
            .execute(AuthorizeUserSession {
                token: refreshed.token,
            })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn rejects_invalid_token() {
        let svc = mock::service();
        let mut events = svc.events().subscribe();

        let err = svc
            .execute(RefreshSession {
                token: "not.a.jwt".parse().unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Unauthorized(_)));
        assert!(events.try_recv().is_err());
    }
}
