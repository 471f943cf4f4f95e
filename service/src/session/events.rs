//! [`Event`]s of [`Session`]s lifecycle.
//!
//! [`Session`]: crate::domain::user::Session

use tokio::sync::broadcast;
use tracing as log;

use crate::domain::user::session::Token;

use super::Identity;

/// Change of a [`Session`] authenticated by some [`Token`].
///
/// [`Session`]: crate::domain::user::Session
#[derive(Clone, Debug)]
pub enum Event {
    /// New [`Session`] has been issued.
    ///
    /// [`Session`]: crate::domain::user::Session
    SignedIn(Identity),

    /// [`Session`] of the [`Token`] has been terminated.
    ///
    /// [`Session`]: crate::domain::user::Session
    SignedOut {
        /// [`Token`] of the terminated session.
        token: Token,
    },

    /// [`Session`] has been prolonged with a new [`Token`].
    ///
    /// [`Session`]: crate::domain::user::Session
    Refreshed {
        /// [`Token`] the session was carried by before.
        previous: Token,

        /// [`Identity`] carried by the new [`Token`].
        identity: Identity,
    },
}

/// Hub delivering [`Event`]s to their subscribers in emission order.
#[derive(Clone, Debug)]
pub struct Events(broadcast::Sender<Event>);

impl Events {
    /// Creates a new [`Events`] hub keeping up to `capacity` [`Event`]s for
    /// slow subscribers.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self(tx)
    }

    /// Emits the provided [`Event`] to all the current subscribers.
    pub fn emit(&self, event: Event) {
        match self.0.send(event) {
            Ok(n) => log::trace!("`session::Event` delivered to {n} subscribers"),
            Err(_) => log::trace!("no subscribers for `session::Event`"),
        }
    }

    /// Subscribes to all the [`Event`]s emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.0.subscribe()
    }
}
