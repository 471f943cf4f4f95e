//! GraphQL [`Subscription`]s definitions.

use futures::{
    future,
    stream::{self, BoxStream},
    StreamExt as _,
};
use juniper::graphql_subscription;
use service::session::{self, Broadcaster};
use tracing as log;

use crate::{api, context, Context, Error};

/// Root of all GraphQL subscription.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

#[graphql_subscription(context = Context)]
impl Subscription {
    /// Subscription following the session of the connection's access token.
    ///
    /// Yields a `SessionState` on every change: once the current session is
    /// resolved, and then whenever it's refreshed, signed out or expired. A
    /// token that doesn't authorize anyone resolves into an unauthenticated
    /// `SessionState`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - if no access token is provided.
    pub async fn session(
        &self,
        ctx: &Context,
    ) -> Result<BoxStream<'static, api::user::session::State>, Error> {
        let token = ctx
            .bearer_token()
            .await?
            .ok_or_else(|| context::AuthError::AuthorizationRequired.into())
            .map_err(ctx.error())?;

        let broadcaster = Broadcaster::new(session::Client::new(
            ctx.service().clone(),
            token,
        ));
        let transitions = broadcaster.handle().transitions();
        let running = stream::once(broadcaster.run()).filter_map(|_| {
            log::debug!("`session::Broadcaster` stopped");
            future::ready(None::<session::State>)
        });

        Ok(stream::select(transitions, running).map(Into::into).boxed())
    }
}
