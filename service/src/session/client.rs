//! [`Auth`] collaborator backed by a [`Service`].

use std::{convert::Infallible, time::Duration};

use futures::{stream, stream::BoxStream, StreamExt as _};
use tokio::{sync::broadcast, time};
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{authorize_user_session, AuthorizeUserSession},
    domain::user::session::{ExpirationDateTime, Token},
    Command, Service,
};

use super::{Auth, Event, Fetch, Identity, Listen};

/// [`Auth`] collaborator following the session of a single [`Token`].
///
/// The current session is whatever the [`Token`] authorizes. Its changes are
/// the [`Event`]s of the [`Service`] concerning the [`Token`], along with its
/// expiration. Once refreshed, the new [`Token`] is followed instead.
#[derive(Clone, Debug)]
pub struct Client<Db> {
    /// [`Service`] issuing the sessions.
    service: Service<Db>,

    /// [`Token`] of the followed session.
    token: Token,
}

impl<Db> Client<Db> {
    /// Creates a new [`Client`] following the session of the provided
    /// [`Token`].
    #[must_use]
    pub fn new(service: Service<Db>, token: Token) -> Self {
        Self { service, token }
    }
}

impl<Db> Auth<Fetch> for Client<Db>
where
    Service<Db>: Command<
        AuthorizeUserSession,
        Ok = Identity,
        Err = Traced<authorize_user_session::ExecutionError>,
    >,
{
    type Ok = Option<Identity>;
    type Err = Traced<authorize_user_session::ExecutionError>;

    async fn execute(&self, _: Fetch) -> Result<Self::Ok, Self::Err> {
        match self
            .service
            .execute(AuthorizeUserSession {
                token: self.token.clone(),
            })
            .await
        {
            Ok(identity) => Ok(Some(identity)),
            Err(e) if e.as_ref().is_unauthorized() => {
                log::debug!("session is not authorized: {e}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl<Db> Auth<Listen> for Client<Db> {
    type Ok = BoxStream<'static, Option<Identity>>;
    type Err = Infallible;

    async fn execute(&self, _: Listen) -> Result<Self::Ok, Self::Err> {
        let following = Following {
            events: self.service.events().subscribe(),
            expires_at: self
                .service
                .decode_session(&self.token)
                .ok()
                .map(|s| s.expires_at),
            token: self.token.clone(),
        };
        Ok(stream::unfold(following, Following::next).boxed())
    }
}

/// Followed session of a [`Client`].
#[derive(Debug)]
struct Following {
    /// [`Event`]s of the [`Service`].
    events: broadcast::Receiver<Event>,

    /// [`Token`] currently carrying the session.
    token: Token,

    /// [`DateTime`] when the session expires, unless it's gone already.
    ///
    /// [`DateTime`]: common::DateTime
    expires_at: Option<ExpirationDateTime>,
}

impl Following {
    /// Waits for the next change of the followed session.
    ///
    /// Returns [`None`] once the [`Service`] is gone.
    async fn next(mut self) -> Option<(Option<Identity>, Self)> {
        loop {
            let left = self.expires_at.map_or(Duration::ZERO, |at| {
                let now = ExpirationDateTime::now();
                if at > now {
                    at - now
                } else {
                    Duration::ZERO
                }
            });
            let received = tokio::select! {
                ev = self.events.recv() => Some(ev),
                () = time::sleep(left), if self.expires_at.is_some() => None,
            };

            let event = match received {
                Some(Ok(ev)) => ev,
                Some(Err(broadcast::error::RecvError::Lagged(n))) => {
                    log::warn!("`session::Client` missed {n} `session::Event`s");
                    continue;
                }
                Some(Err(broadcast::error::RecvError::Closed)) => return None,
                None => {
                    log::debug!("session expired");
                    self.expires_at = None;
                    return Some((None, self));
                }
            };

            match event {
                Event::SignedOut { token } if token == self.token => {
                    self.expires_at = None;
                    return Some((None, self));
                }
                Event::Refreshed { previous, identity }
                    if previous == self.token =>
                {
                    self.token = identity.token.clone();
                    self.expires_at = Some(identity.session.expires_at);
                    return Some((Some(identity), self));
                }
                Event::SignedIn(_)
                | Event::SignedOut { .. }
                | Event::Refreshed { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::{By, Select};
    use futures::StreamExt as _;

    use crate::{
        command::{RefreshSession, SignIn, SignOut},
        domain::User,
        infra::database::mock,
        session::{Auth as _, Broadcaster, Listen},
        Command as _, Service,
    };

    use super::Client;

    fn signed_up(svc: &Service<mock::Mock>, email: &str) -> User {
        let user = mock::user(email);
        svc.database().tables().users.push(user.clone());
        user
    }

    #[tokio::test]
    async fn fetches_authorized_session() {
        let svc = mock::service();
        let user = signed_up(&svc, "lifter@example.com");
        let identity = svc.execute(SignIn::ByUserId(user.id)).await.unwrap();

        let client = Client::new(svc.clone(), identity.token);
        let current = client.execute(Select(By::new(()))).await.unwrap();

        assert_eq!(current.map(|i| i.user.id), Some(user.id));
    }

    #[tokio::test]
    async fn fetches_nothing_for_unauthorized_token() {
        let svc = mock::service();

        let client = Client::new(svc, "not.a.jwt".parse().unwrap());

        assert!(client.execute(Select(By::new(()))).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fails_fetch_on_database_failure() {
        let svc = mock::service();
        let user = signed_up(&svc, "lifter@example.com");
        let token = mock::token(user.id, Duration::from_secs(60));
        svc.database().fail("select user");

        let client = Client::new(svc, token);

        assert!(client.execute(Select(By::new(()))).await.is_err());
    }

    #[tokio::test]
    async fn follows_refreshes_until_sign_out() {
        let svc = mock::service();
        let user = signed_up(&svc, "lifter@example.com");
        let other = signed_up(&svc, "spotter@example.com");
        let mine = svc.execute(SignIn::ByUserId(user.id)).await.unwrap();
        let theirs = svc.execute(SignIn::ByUserId(other.id)).await.unwrap();

        let client = Client::new(svc.clone(), mine.token.clone());
        let mut changes = client.execute(Listen::new()).await.unwrap();

        svc.execute(SignOut {
            token: theirs.token,
        })
        .await
        .unwrap();
        let refreshed = svc
            .execute(RefreshSession { token: mine.token })
            .await
            .unwrap();
        svc.execute(SignOut {
            token: refreshed.token.clone(),
        })
        .await
        .unwrap();

        let first = changes.next().await.unwrap();
        assert_eq!(first.map(|i| i.token), Some(refreshed.token));
        assert!(changes.next().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn yields_nothing_on_expiration() {
        let svc = mock::service();
        let user = signed_up(&svc, "lifter@example.com");
        let token = mock::token(user.id, Duration::from_secs(5 * 60));

        let client = Client::new(svc, token);
        let mut changes = client.execute(Listen::new()).await.unwrap();

        assert!(changes.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn drives_broadcaster() {
        let svc = mock::service();
        let user = signed_up(&svc, "lifter@example.com");
        let identity = svc.execute(SignIn::ByUserId(user.id)).await.unwrap();

        let broadcaster =
            Broadcaster::new(Client::new(svc.clone(), identity.token.clone()));
        let mut handle = broadcaster.handle();
        let transitions = handle.clone().transitions();
        let running = tokio::spawn(broadcaster.run());

        assert!(handle.ready().await.is_authenticated());
        svc.execute(SignOut {
            token: identity.token,
        })
        .await
        .unwrap();

        let states = transitions.take(2).collect::<Vec<_>>().await;
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].user().map(|u| u.id), Some(user.id));
        assert!(!states[1].is_authenticated());
        assert!(!states[1].is_loading());

        running.abort();
    }
}
