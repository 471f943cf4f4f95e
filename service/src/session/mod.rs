//! Propagation of the authentication [`State`] to its dependents.
//!
//! A [`Broadcaster`] asks an [`Auth`] collaborator once for the current
//! session, then follows its changes, sharing every resulting [`State`] with
//! any number of [`Handle`]s.

mod broadcaster;
pub mod client;
pub mod events;

use std::time::Duration;

use common::operations::{By, Select, Subscribe};
use smart_default::SmartDefault;

use crate::domain::{
    user::{session::Token, Session},
    User,
};

pub use self::{
    broadcaster::{Broadcaster, Handle},
    client::Client,
    events::{Event, Events},
};

/// Collaborator authenticating [`User`]s.
///
/// Must be able to execute [`Fetch`] and [`Listen`] operations to drive a
/// [`Broadcaster`].
pub use common::Handler as Auth;

/// Operation fetching the current [`Identity`], if any.
pub type Fetch = Select<By<Option<Identity>, ()>>;

/// Operation subscribing to changes of the current [`Identity`].
///
/// Resolves into a [`Stream`] yielding every new [`Identity`] (or its absence)
/// in the order the changes happened.
///
/// [`Stream`]: futures::Stream
pub type Listen = Subscribe<Option<Identity>>;

/// Configuration of [`Session`]s.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Time a [`Session`] stays valid for after being issued.
    #[default(Duration::from_secs(30 * 60))]
    pub ttl: Duration,

    /// Number of [`Event`]s kept for slow subscribers before they lag.
    #[default(64)]
    pub events_capacity: usize,
}

/// Authenticated [`User`] along with its [`Session`].
#[derive(Clone, Debug)]
pub struct Identity {
    /// Access [`Token`] the [`Session`] is carried by.
    pub token: Token,

    /// Claims of the [`Session`].
    pub session: Session,

    /// [`User`] the [`Session`] belongs to.
    pub user: User,
}

/// Authentication state shared by a [`Broadcaster`].
#[derive(Clone, Debug, SmartDefault)]
pub struct State {
    /// Current [`Identity`], if authenticated.
    session: Option<Identity>,

    /// Indicator whether the current session is still being resolved.
    #[default(true)]
    loading: bool,
}

impl State {
    /// Creates a resolved [`State`] with the provided [`Identity`].
    #[must_use]
    pub fn ready(session: Option<Identity>) -> Self {
        Self {
            session,
            loading: false,
        }
    }

    /// Indicates whether the current session hasn't been resolved yet.
    ///
    /// Once resolved, a [`State`] never becomes loading again.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the current [`Identity`], if authenticated.
    #[must_use]
    pub fn session(&self) -> Option<&Identity> {
        self.session.as_ref()
    }

    /// Returns the current [`User`], if authenticated.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Indicates whether the current session is resolved and present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.session.is_some()
    }
}
