//! [`Command`] for signing up a new [`User`].

use common::operations::{By, Commit, Insert, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::user::{Email, Password};
use crate::{
    domain::{
        user::{self, Profile},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for signing up a new [`User`] along with its empty [`Profile`].
#[derive(Clone, Debug)]
pub struct SignUp {
    /// [`Email`] of a new [`User`].
    pub email: user::Email,

    /// [`Password`] of a new [`User`].
    pub password: SecretBox<user::Password>,
}

impl<Db> Command<SignUp> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<User>, &'l user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Insert<Profile>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SignUp) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SignUp { email, password } = cmd;

        let u = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if u.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let user = User {
            id: user::Id::new(),
            email,
            password_hash: user::PasswordHash::new(password.expose_secret())
                .map_err(tracerr::from_and_wrap!(=> E))?,
            created_at: user::CreationDateTime::now(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(Profile::empty(user.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!("`User(id: {})` signed up", user.id);

        Ok(user)
    }
}

/// Error of [`SignUp`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`user::Email`] is already occupied.
    #[display("`{_0}` email is occupied")]
    #[from(ignore)]
    EmailOccupied(#[error(not(source))] user::Email),

    /// Failed to hash the provided [`Password`].
    #[display("Failed to hash `Password`: {_0}")]
    PasswordHash(#[error(not(source))] argon2::password_hash::Error),
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{infra::database::mock, Command as _};

    use super::{ExecutionError, SignUp};

    fn sign_up(email: &str) -> SignUp {
        SignUp {
            email: email.parse().unwrap(),
            password: SecretBox::new(Box::new("hunter22".parse().unwrap())),
        }
    }

    #[tokio::test]
    async fn creates_user_with_profile() {
        let svc = mock::service();

        let user = svc.execute(sign_up("new@example.com")).await.unwrap();

        let tables = svc.database().tables();
        assert_eq!(tables.users.len(), 1);
        assert_eq!(tables.users[0].id, user.id);
        assert!(user
            .password_hash
            .verify(&"hunter22".parse().unwrap()));
        assert_eq!(tables.profiles.len(), 1);
        assert_eq!(tables.profiles[0].id, user.id);
        assert_eq!(tables.profiles[0].username, None);
        assert_eq!(tables.calls.last(), Some(&"commit"));
    }

    #[tokio::test]
    async fn rejects_occupied_email() {
        let svc = mock::service();
        svc.database()
            .tables()
            .users
            .push(mock::user("taken@example.com"));

        let err = svc.execute(sign_up("taken@example.com")).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::EmailOccupied(_)));
        assert!(!svc.database().tables().calls.contains(&"insert user"));
    }

    #[tokio::test]
    async fn propagates_database_failure() {
        let svc = mock::service();
        svc.database().fail("insert profile");

        let err = svc.execute(sign_up("new@example.com")).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Db(_)));
        assert!(!svc.database().tables().calls.contains(&"commit"));
    }
}
