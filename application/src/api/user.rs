//! [`User`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A [`User`] of the workout tracker.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`domain::User`] representing this [`User`].
    user: OnceCell<domain::User>,
}

impl From<domain::User> for User {
    fn from(user: domain::User) -> Self {
        Self {
            id: user.id.into(),
            user: OnceCell::new_with(Some(user)),
        }
    }
}

impl User {
    /// Creates a new [`User`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`User`] with the provided ID exists,
    /// otherwise accessing this [`User`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            user: OnceCell::new(),
        }
    }

    /// Returns the [`domain::User`] representing this [`User`].
    ///
    /// # Errors
    ///
    /// Error if the [`domain::User`] doesn't exist.
    async fn user(&self, ctx: &Context) -> Result<&domain::User, Error> {
        let id = self.id.into();
        self.user
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::user::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|u| {
                        future::ready(u.ok_or_else(|| {
                            api::query::UserError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A `User` of the workout tracker.
#[graphql_object(context = Context)]
impl User {
    /// Unique identifier of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Email this `User` signs in with.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(&self, ctx: &Context) -> Result<Email, Error> {
        Ok(self.user(ctx).await?.email.clone().into())
    }

    /// `UserProfile` of this `User`.
    ///
    /// Empty `UserProfile` is returned if this `User` never filled it in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.profile",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn profile(&self, ctx: &Context) -> Result<api::Profile, Error> {
        ctx.service()
            .execute(query::profile::ById::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|p| {
                p.unwrap_or_else(|| domain::user::Profile::empty(self.id.into()))
                    .into()
            })
    }

    /// `DateTime` when this `User` signed up.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.user(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `User`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::user::Id)]
#[into(domain::user::Id)]
#[graphql(name = "UserId", transparent)]
pub struct Id(Uuid);

/// Email of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "UserEmail",
    with = scalar::Via::<domain::user::Email>,
)]
pub struct Email(domain::user::Email);

/// Password of a `User`.
#[derive(AsRef, Clone, Debug, From, GraphQLScalar, Into)]
#[graphql(
    name = "UserPassword",
    with = scalar::Via::<domain::user::Password>,
)]
pub struct Password(domain::user::Password);

pub mod session {
    //! [`Session`]-related definitions.
    //!
    //! [`Session`]: crate::Session

    use common::DateTime;
    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLObject, GraphQLScalar};
    use service::{domain, session::Identity};

    use crate::{
        api::{self, scalar},
        Context,
    };

    /// `Session` access token.
    #[derive(AsRef, Clone, Debug, From, GraphQLScalar, Into)]
    #[graphql(
        name = "UserAuthToken",
        with = scalar::Via::<domain::user::session::Token>,
    )]
    pub struct Token(domain::user::session::Token);

    /// Result of signing a `User` in.
    #[derive(Clone, Debug, GraphQLObject)]
    #[graphql(context = Context, name = "SignInResult")]
    pub struct SignInResult {
        /// Access token of the issued `Session`.
        pub token: Token,

        /// `User` the issued `Session` belongs to.
        pub user: api::User,

        /// `DateTime` when the issued `Session` expires.
        pub expires_at: DateTime,
    }

    impl From<Identity> for SignInResult {
        fn from(identity: Identity) -> Self {
            let Identity {
                token,
                session,
                user,
            } = identity;
            Self {
                token: token.into(),
                user: user.into(),
                expires_at: session.expires_at.coerce(),
            }
        }
    }

    /// Authentication state of a connection.
    #[derive(Clone, Debug, From, Into)]
    pub struct State(service::session::State);

    /// Authentication state of a connection.
    #[graphql_object(name = "SessionState", context = Context)]
    impl State {
        /// Indicator whether the session is still being resolved.
        ///
        /// Once resolved, a `SessionState` never becomes loading again.
        pub fn is_loading(&self) -> bool {
            self.0.is_loading()
        }

        /// Indicator whether the session is resolved and present.
        pub fn is_authenticated(&self) -> bool {
            self.0.is_authenticated()
        }

        /// Authenticated `User`, if any.
        pub fn user(&self) -> Option<api::User> {
            self.0.user().cloned().map(Into::into)
        }

        /// Access token currently carrying the session, if any.
        ///
        /// Changes once the session is refreshed.
        pub fn token(&self) -> Option<Token> {
            self.0.session().map(|s| s.token.clone().into())
        }

        /// `DateTime` when the session expires, if any.
        pub fn expires_at(&self) -> Option<DateTime> {
            self.0.session().map(|s| s.session.expires_at.coerce())
        }
    }
}
