//! [`Command`] for signing in a [`User`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::user::{session::Token, Email, Password};
use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    session::{Event, Identity},
    Service,
};

use super::Command;

/// [`Command`] for signing in a [`User`] by issuing a new [`Session`].
#[derive(Clone, Debug, From)]
pub enum SignIn {
    /// Sign in by [`User`] credentials.
    ByCredentials {
        /// [`Email`] of a [`User`].
        email: user::Email,

        /// [`Password`] of a [`User`].
        password: SecretBox<user::Password>,
    },

    /// Sign in by [`User`] ID.
    ByUserId(user::Id),
}

impl<Db> Command<SignIn> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + for<'l> Database<
            Select<By<Option<User>, &'l user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Identity;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SignIn) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let user = match cmd {
            SignIn::ByCredentials { email, password } => {
                let user = self
                    .database()
                    .execute(Select(By::new(&email)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::WrongCredentials)
                    .map_err(tracerr::wrap!())?;

                if !user.password_hash.verify(password.expose_secret()) {
                    return Err(tracerr::new!(E::WrongCredentials));
                }

                user
            }
            SignIn::ByUserId(user_id) => self
                .database()
                .execute(Select(By::new(user_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::UserNotExists(user_id))
                .map_err(tracerr::wrap!())?,
        };

        let identity =
            self.issue_session(user).map_err(tracerr::from_and_wrap!(=> E))?;
        log::debug!("`User(id: {})` signed in", identity.user.id);
        self.events().emit(Event::SignedIn(identity.clone()));

        Ok(identity)
    }
}

impl<Db> Service<Db> {
    /// Issues a new [`Session`] of the provided [`User`].
    pub(crate) fn issue_session(
        &self,
        user: User,
    ) -> Result<Identity, jsonwebtoken::errors::Error> {
        let session = Session {
            user_id: user.id,
            expires_at: session::ExpirationDateTime::now()
                + self.config.session.ttl,
        };
        let token = jsonwebtoken::encode::<Session>(
            &jsonwebtoken::Header::default(),
            &session,
            &self.config.jwt_encoding_key,
        )?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(Identity {
            token,
            session,
            user,
        })
    }
}

/// Error of [`SignIn`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    #[from]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`SignIn::ByCredentials`] contains wrong credentials.
    #[display("Wrong `User` credentials")]
    WrongCredentials,
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        command::AuthorizeUserSession,
        domain::{user, User},
        infra::database::mock,
        session::Event,
        Command as _,
    };

    use super::{ExecutionError, SignIn};

    fn registered(svc: &crate::Service<mock::Mock>) -> User {
        let user = User {
            password_hash: user::PasswordHash::new(
                &"hunter22".parse().unwrap(),
            )
            .unwrap(),
            ..mock::user("lifter@example.com")
        };
        svc.database().tables().users.push(user.clone());
        user
    }

    fn credentials(password: &str) -> SignIn {
        SignIn::ByCredentials {
            email: "lifter@example.com".parse().unwrap(),
            password: SecretBox::new(Box::new(password.parse().unwrap())),
        }
    }

    #[tokio::test]
    async fn issues_authorizable_token() {
        let svc = mock::service();
        let user = registered(&svc);
        let mut events = svc.events().subscribe();

        let identity = svc.execute(credentials("hunter22")).await.unwrap();

        assert_eq!(identity.user.id, user.id);
        assert!(matches!(
            events.try_recv().unwrap(),
            Event::SignedIn(i) if i.token == identity.token,
        ));
        let authorized = svc
            .execute(AuthorizeUserSession {
                token: identity.token,
            })
            .await
            .unwrap();
        assert_eq!(authorized.user.id, user.id);
    }

    #[tokio::test]
    async fn rejects_wrong_credentials() {
        let svc = mock::service();
        _ = registered(&svc);
        let mut events = svc.events().subscribe();

        let err = svc.execute(credentials("hunter23")).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::WrongCredentials));

        let err = svc
            .execute(SignIn::ByCredentials {
                email: "nobody@example.com".parse().unwrap(),
                password: SecretBox::new(Box::new("hunter22".parse().unwrap())),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::WrongCredentials));

        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn signs_in_by_user_id() {
        let svc = mock::service();
        let user = registered(&svc);

        let identity = svc.execute(SignIn::ByUserId(user.id)).await.unwrap();
        assert_eq!(identity.session.user_id, user.id);

        let err = svc
            .execute(SignIn::ByUserId(user::Id::new()))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::UserNotExists(_)));
    }
}
