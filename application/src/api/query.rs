//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{domain, query, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "me",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn me(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        #[expect(unsafe_code, reason = "authorized `User` exists")]
        let me = unsafe { api::User::new_unchecked(my_id) };
        Ok(me)
    }

    /// Returns the `UserProfile` of the currently authenticated `User`.
    ///
    /// Empty `UserProfile` is returned if it has never been filled in.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myProfile",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_profile(ctx: &Context) -> Result<api::Profile, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::profile::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|p| {
                p.unwrap_or_else(|| domain::user::Profile::empty(my_id.into()))
                    .into()
            })
    }

    /// Returns all the `Workout`s of the currently authenticated `User`, most
    /// recently created first.
    ///
    /// `Workout`s whose sets failed to load are returned without any.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "workoutHistory",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn workout_history(
        ctx: &Context,
    ) -> Result<Vec<api::Workout>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::History {
                user_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ws| ws.into_iter().map(Into::into).collect())
    }

    /// Returns the training history of the currently authenticated `User`
    /// along with its aggregated metrics.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "historyMetrics",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn history_metrics(
        ctx: &Context,
    ) -> Result<api::HistoryMetrics, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::HistoryMetrics {
                user_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Workout` counters of the currently authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "workoutStats",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn workout_stats(
        ctx: &Context,
    ) -> Result<api::metrics::WorkoutStats, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::WorkoutStats {
                user_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum ExerciseError {
        #[code = "EXERCISE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Exercise` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}
