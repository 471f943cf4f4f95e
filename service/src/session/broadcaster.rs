//! [`Broadcaster`] of the authentication [`State`].

use std::{fmt, pin::pin};

use common::operations::{By, Select};
use futures::{stream, Stream, StreamExt as _};
use tokio::sync::{broadcast, watch};
use tracing as log;

use super::{Auth, Fetch, Identity, Listen, State};

/// Default number of [`State`] transitions kept for lagging [`Handle`]s.
const DEFAULT_CAPACITY: usize = 16;

/// Single writer of the authentication [`State`] shared with [`Handle`]s.
///
/// Nothing happens until [`Broadcaster::run()`] is awaited, and dropping its
/// future stops the [`Broadcaster`] while keeping the last [`State`] visible to
/// the [`Handle`]s.
#[derive(Debug)]
pub struct Broadcaster<A> {
    /// [`Auth`] collaborator providing the sessions.
    auth: A,

    /// Latest [`State`].
    state: watch::Sender<State>,

    /// Ordered feed of every [`State`] transition.
    transitions: broadcast::Sender<State>,
}

impl<A> Broadcaster<A> {
    /// Creates a new [`Broadcaster`] following the sessions of the provided
    /// [`Auth`] collaborator.
    #[must_use]
    pub fn new(auth: A) -> Self {
        Self::with_capacity(auth, DEFAULT_CAPACITY)
    }

    /// Creates a new [`Broadcaster`] keeping up to `capacity` transitions for
    /// lagging [`Handle`]s.
    #[must_use]
    pub fn with_capacity(auth: A, capacity: usize) -> Self {
        let (state, _) = watch::channel(State::default());
        let (transitions, _) = broadcast::channel(capacity.max(1));
        Self {
            auth,
            state,
            transitions,
        }
    }

    /// Returns a new [`Handle`] observing this [`Broadcaster`].
    ///
    /// The [`Handle`] sees every transition happening after its creation.
    #[must_use]
    pub fn handle(&self) -> Handle {
        Handle {
            state: self.state.subscribe(),
            transitions: self.transitions.subscribe(),
        }
    }

    /// Publishes the provided session as the new [`State`].
    fn publish(&self, session: Option<Identity>) {
        let state = State::ready(session);
        _ = self.state.send_replace(state.clone());
        if self.transitions.send(state).is_err() {
            log::trace!("no `Handle`s to notify about `session::State` change");
        }
    }
}

impl<A> Broadcaster<A>
where
    A: Auth<Fetch, Ok = Option<Identity>, Err: fmt::Display>
        + Auth<Listen, Ok: Stream<Item = Option<Identity>>>,
{
    /// Runs this [`Broadcaster`] until the session changes stream of its
    /// [`Auth`] collaborator ends.
    ///
    /// Subscribes to the changes before fetching the current session, so no
    /// change is lost while the fetch is in flight: such changes are applied
    /// in order right after it. A failed fetch is treated as no session.
    ///
    /// # Errors
    ///
    /// If subscribing to the session changes fails.
    pub async fn run(self) -> Result<(), <A as Auth<Listen>>::Err> {
        let changes = self.auth.execute(Listen::new()).await?;

        let current = self
            .auth
            .execute(Select(By::<Option<Identity>, _>::new(())))
            .await
            .unwrap_or_else(|e| {
                log::warn!("failed to fetch the current session: {e}");
                None
            });
        self.publish(current);

        let mut changes = pin!(changes);
        while let Some(session) = changes.next().await {
            self.publish(session);
        }

        Ok(())
    }
}

/// Read-only view of the [`State`] shared by a [`Broadcaster`].
#[derive(Debug)]
pub struct Handle {
    /// Latest [`State`].
    state: watch::Receiver<State>,

    /// Ordered feed of [`State`] transitions.
    transitions: broadcast::Receiver<State>,
}

impl Clone for Handle {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            transitions: self.transitions.resubscribe(),
        }
    }
}

impl Handle {
    /// Returns a snapshot of the current [`State`].
    #[must_use]
    pub fn state(&self) -> State {
        self.state.borrow().clone()
    }

    /// Waits for the current session to be resolved and returns the resolved
    /// [`State`].
    ///
    /// Returns the last known [`State`] if the [`Broadcaster`] is gone.
    pub async fn ready(&mut self) -> State {
        if let Ok(state) = self.state.wait_for(|s| !s.is_loading()).await {
            return state.clone();
        }
        self.state()
    }

    /// Converts this [`Handle`] into a [`Stream`] of [`State`] transitions.
    ///
    /// Yields every transition in order, and ends once the [`Broadcaster`]
    /// stops. If the consumer falls behind, missed transitions are skipped.
    pub fn transitions(self) -> impl Stream<Item = State> {
        stream::unfold(self.transitions, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(state) => return Some((state, rx)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        log::warn!(
                            "`session::Handle` lagged behind, skipping {n} \
                             transitions",
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
    }
}

#[cfg(test)]
mod spec {
    use std::sync::Mutex;

    use common::DateTime;
    use futures::{channel::mpsc, future, FutureExt as _, StreamExt as _};

    use crate::{
        domain::{
            user::{self, session::Token, Session},
            User,
        },
        session::{Auth, Fetch, Identity, Listen},
    };

    use super::{Broadcaster, State};

    /// [`Auth`] collaborator with scripted responses.
    struct Scripted {
        current: Result<Option<Identity>, &'static str>,
        changes: Mutex<Option<mpsc::UnboundedReceiver<Option<Identity>>>>,
    }

    impl Scripted {
        fn new(
            current: Result<Option<Identity>, &'static str>,
        ) -> (Self, mpsc::UnboundedSender<Option<Identity>>) {
            let (tx, rx) = mpsc::unbounded();
            let auth = Self {
                current,
                changes: Mutex::new(Some(rx)),
            };
            (auth, tx)
        }
    }

    impl Auth<Fetch> for Scripted {
        type Ok = Option<Identity>;
        type Err = &'static str;

        async fn execute(&self, _: Fetch) -> Result<Self::Ok, Self::Err> {
            self.current.clone()
        }
    }

    impl Auth<Listen> for Scripted {
        type Ok = mpsc::UnboundedReceiver<Option<Identity>>;
        type Err = &'static str;

        async fn execute(&self, _: Listen) -> Result<Self::Ok, Self::Err> {
            self.changes.lock().unwrap().take().ok_or("already subscribed")
        }
    }

    fn identity(email: &str) -> Identity {
        let user_id = user::Id::new();
        #[expect(unsafe_code, reason = "test fixture")]
        let (token, password_hash) = unsafe {
            (
                Token::new_unchecked(format!("token-of-{email}")),
                user::PasswordHash::new_unchecked("$argon2id$fixture"),
            )
        };
        Identity {
            token,
            session: Session {
                user_id,
                expires_at: DateTime::now().coerce(),
            },
            user: User {
                id: user_id,
                email: user::Email::new(email).unwrap(),
                password_hash,
                created_at: DateTime::now().coerce(),
            },
        }
    }

    fn email_of(state: &State) -> Option<String> {
        state.user().map(|u| u.email.to_string())
    }

    #[tokio::test]
    async fn publishes_every_transition_in_order() {
        let (auth, changes) = Scripted::new(Ok(Some(identity("a@lift.io"))));
        let broadcaster = Broadcaster::new(auth);
        let handle = broadcaster.handle();
        let transitions = handle.clone().transitions();

        changes.unbounded_send(None).unwrap();
        changes.unbounded_send(Some(identity("b@lift.io"))).unwrap();
        drop(changes);
        broadcaster.run().await.unwrap();

        let seen = transitions.collect::<Vec<_>>().await;
        assert_eq!(
            seen.iter().map(email_of).collect::<Vec<_>>(),
            [
                Some("a@lift.io".to_owned()),
                None,
                Some("b@lift.io".to_owned()),
            ],
        );
        assert!(seen.iter().all(|s| !s.is_loading()));
        assert_eq!(
            seen.iter().map(State::is_authenticated).collect::<Vec<_>>(),
            [true, false, true],
        );
        assert_eq!(email_of(&handle.state()).as_deref(), Some("b@lift.io"));
    }

    #[tokio::test]
    async fn starts_loading_until_resolved() {
        let (auth, changes) = Scripted::new(Ok(None));
        let broadcaster = Broadcaster::new(auth);
        let mut handle = broadcaster.handle();
        let transitions = handle.clone().transitions();

        assert!(handle.state().is_loading());
        assert!(!handle.state().is_authenticated());

        for email in ["a@lift.io", "b@lift.io"] {
            changes.unbounded_send(Some(identity(email))).unwrap();
        }
        changes.unbounded_send(None).unwrap();
        drop(changes);
        broadcaster.run().await.unwrap();

        let seen = transitions.collect::<Vec<_>>().await;
        assert_eq!(
            seen.iter().map(email_of).collect::<Vec<_>>(),
            [
                None,
                Some("a@lift.io".to_owned()),
                Some("b@lift.io".to_owned()),
                None,
            ],
        );
        assert!(seen.iter().all(|s| !s.is_loading()));
        assert!(!handle.ready().await.is_loading());
    }

    #[tokio::test]
    async fn failed_fetch_means_unauthenticated() {
        let (auth, changes) = Scripted::new(Err("network is down"));
        let broadcaster = Broadcaster::new(auth);
        let handle = broadcaster.handle();
        let transitions = handle.clone().transitions();
        drop(changes);

        broadcaster.run().await.unwrap();

        let seen = transitions.collect::<Vec<_>>().await;
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].is_loading());
        assert!(seen[0].session().is_none());
        assert!(!handle.state().is_loading());
    }

    #[tokio::test]
    async fn fails_when_cannot_subscribe() {
        let (auth, _changes) = Scripted::new(Ok(None));
        drop(auth.changes.lock().unwrap().take());
        let broadcaster = Broadcaster::new(auth);
        let handle = broadcaster.handle();

        assert_eq!(broadcaster.run().await, Err("already subscribed"));
        assert!(handle.state().is_loading());
    }

    #[tokio::test]
    async fn teardown_keeps_last_state() {
        let (auth, changes) = Scripted::new(Ok(Some(identity("a@lift.io"))));
        let broadcaster = Broadcaster::new(auth);
        let handle = broadcaster.handle();

        // Polled once: the current session is resolved, then it waits for
        // changes and gets dropped.
        assert!(broadcaster.run().now_or_never().is_none());

        assert!(changes.unbounded_send(None).is_err(), "unsubscribed");
        assert!(!handle.state().is_loading());
        assert_eq!(email_of(&handle.state()).as_deref(), Some("a@lift.io"));

        let rest = handle.transitions().collect::<Vec<_>>().await;
        assert_eq!(rest.len(), 1, "only the initial resolution was emitted");
    }

    #[tokio::test]
    async fn lagging_handle_skips_to_recent_transitions() {
        let (auth, changes) = Scripted::new(Ok(None));
        let broadcaster = Broadcaster::with_capacity(auth, 2);
        let transitions = broadcaster.handle().transitions();

        for email in ["a@lift.io", "b@lift.io", "c@lift.io"] {
            changes.unbounded_send(Some(identity(email))).unwrap();
        }
        drop(changes);
        broadcaster.run().await.unwrap();

        let seen = transitions
            .map(|s| email_of(&s))
            .collect::<Vec<_>>()
            .await;
        assert_eq!(
            seen,
            [Some("b@lift.io".to_owned()), Some("c@lift.io".to_owned())],
        );
    }

    #[tokio::test]
    async fn many_handles_observe_the_same_transitions() {
        let (auth, changes) = Scripted::new(Ok(None));
        let broadcaster = Broadcaster::new(auth);
        let first = broadcaster.handle().transitions();
        let second = broadcaster.handle().transitions();

        changes.unbounded_send(Some(identity("a@lift.io"))).unwrap();
        drop(changes);
        broadcaster.run().await.unwrap();

        let (first, second) = future::join(
            first.map(|s| email_of(&s)).collect::<Vec<_>>(),
            second.map(|s| email_of(&s)).collect::<Vec<_>>(),
        )
        .await;
        assert_eq!(first, [None, Some("a@lift.io".to_owned())]);
        assert_eq!(first, second);
    }
}
