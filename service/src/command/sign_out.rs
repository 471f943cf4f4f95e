//! [`Command`] for signing out of a [`Session`].

use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{user::Session, User};
use crate::{
    domain::user::session,
    session::{Event, Identity},
    Service,
};

use super::{authorize_user_session, AuthorizeUserSession, Command};

/// [`Command`] for terminating a [`Session`].
///
/// Tokens are stateless, so the [`session::Token`] itself stays decodable
/// until it expires. Signing out only notifies the followers of the
/// [`Session`].
#[derive(Clone, Debug, From)]
pub struct SignOut {
    /// [`session::Token`] of the [`Session`] to terminate.
    pub token: session::Token,
}

impl<Db> Command<SignOut> for Service<Db>
where
    Self: Command<
        AuthorizeUserSession,
        Ok = Identity,
        Err = Traced<authorize_user_session::ExecutionError>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SignOut) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SignOut { token } = cmd;

        let identity = self
            .execute(AuthorizeUserSession {
                token: token.clone(),
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::debug!("`User(id: {})` signed out", identity.user.id);
        self.events().emit(Event::SignedOut { token });

        Ok(())
    }
}

/// Error of [`SignOut`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// The [`session::Token`] doesn't authorize any [`User`].
    #[display("Failed to authorize `Session`: {_0}")]
    Unauthorized(authorize_user_session::ExecutionError),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::SignIn, infra::database::mock, session::Event, Command as _,
    };

    use super::SignOut;

    #[tokio::test]
    async fn announces_terminated_token() {
        let svc = mock::service();
        let user = mock::user("lifter@example.com");
        svc.database().tables().users.push(user.clone());
        let identity = svc.execute(SignIn::ByUserId(user.id)).await.unwrap();
        let mut events = svc.events().subscribe();

        svc.execute(SignOut {
            token: identity.token.clone(),
        })
        .await
        .unwrap();

        assert!(matches!(
            events.try_recv().unwrap(),
            Event::SignedOut { token } if token == identity.token,
        ));
    }

    #[tokio::test]
    async fn rejects_invalid_token() {
        let svc = mock::service();
        let mut events = svc.events().subscribe();

        assert!(svc
            .execute(SignOut {
                token: "not.a.jwt".parse().unwrap(),
            })
            .await
            .is_err());
        assert!(events.try_recv().is_err());
    }
}
