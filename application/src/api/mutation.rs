//! GraphQL [`Mutation`]s definitions.

use common::Weight;
use juniper::graphql_object;
use service::{command, domain, Command as _};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Signs up a new `User` with the provided credentials and signs it in.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMAIL_OCCUPIED` - provided `UserEmail` is occupied by another
    ///                      `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "signUp",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn sign_up(
        email: api::user::Email,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::SignInResult, Error> {
        let user = ctx
            .service()
            .execute(command::SignUp {
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let identity = ctx
            .service()
            .execute(command::SignIn::ByUserId(user.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session::from(identity.clone())).await;

        Ok(identity.into())
    }

    /// Signs in a `User` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials does not match any `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "signIn",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn sign_in(
        email: api::user::Email,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::SignInResult, Error> {
        // TODO: Execute in constant time to avoid timing attacks.
        //       https://en.wikipedia.org/wiki/Timing_attack
        let identity = ctx
            .service()
            .execute(command::SignIn::ByCredentials {
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session::from(identity.clone())).await;

        Ok(identity.into())
    }

    /// Signs out the current session.
    ///
    /// Subscribers following the session see it ending. The access token
    /// itself stays decodable until it expires.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "signOut",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn sign_out(ctx: &Context) -> Result<bool, Error> {
        let token = ctx.current_session().await?.token;

        ctx.service()
            .execute(command::SignOut { token })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }

    /// Prolongs the current session by issuing a new access token.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "refreshSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn refresh_session(
        ctx: &Context,
    ) -> Result<api::user::session::SignInResult, Error> {
        let token = ctx.current_session().await?.token;

        ctx.service()
            .execute(command::RefreshSession { token })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Starts a new `Workout` right now.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "startWorkout",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn start_workout(
        notes: Option<api::workout::Notes>,
        ctx: &Context,
    ) -> Result<api::Workout, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::StartWorkout {
                user_id: my_id.into(),
                notes: notes.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Logs a new `WorkoutSet` of the named `Exercise`.
    ///
    /// Starts a new `Workout` if no `workoutId` is provided, and creates the
    /// `Exercise` if none has the provided name yet.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
    /// - `INCOMPLETE_SET` - any of `exercise`, `weight` or `reps` is missing;
    /// - `INVALID_EXERCISE_NAME` - provided `exercise` name is not valid;
    /// - `NEGATIVE_REPS` - provided `reps` is negative;
    /// - `TOO_MANY_REPS` - provided `reps` exceeds the allowed maximum;
    /// - `WORKOUT_NOT_EXISTS` - `Workout` with the provided ID does not exist;
    /// - `WORKOUT_COMPLETED` - `Workout` with the provided ID is completed.
    #[tracing::instrument(
        skip_all,
        fields(
            exercise = ?exercise,
            gql.name = "addSet",
            otel.name = Self::SPAN_NAME,
            reps = ?reps,
            weight = ?weight,
            workout_id = ?workout_id,
        ),
    )]
    pub async fn add_set(
        workout_id: Option<api::workout::Id>,
        exercise: Option<String>,
        weight: Option<Weight>,
        reps: Option<i32>,
        notes: Option<api::workout::Notes>,
        ctx: &Context,
    ) -> Result<api::workout::AddSetResult, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let reps = reps
            .map(|r| {
                domain::set::Reps::new(r)
                    .ok_or_else(|| {
                        Error::from(if r < 0 {
                            RepsError::Negative
                        } else {
                            RepsError::TooMany
                        })
                    })
            })
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::AddSet {
                user_id: my_id.into(),
                workout_id: workout_id.map(Into::into),
                exercise,
                weight,
                reps,
                notes: notes.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Completes the `Workout` at the current moment.
    ///
    /// Notes of the completed `Workout` default to its duration.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
    /// - `NO_ACTIVE_WORKOUT` - no `workoutId` is provided;
    /// - `WORKOUT_NOT_EXISTS` - `Workout` with the provided ID does not exist;
    /// - `WORKOUT_COMPLETED` - `Workout` is completed already;
    /// - `WORKOUT_HAS_NO_SETS` - no `WorkoutSet`s are logged in the `Workout`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "completeWorkout",
            otel.name = Self::SPAN_NAME,
            workout_id = ?workout_id,
        ),
    )]
    pub async fn complete_workout(
        workout_id: Option<api::workout::Id>,
        notes: Option<api::workout::Notes>,
        ctx: &Context,
    ) -> Result<api::Workout, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CompleteWorkout {
                user_id: my_id.into(),
                workout_id: workout_id.map(Into::into),
                notes: notes.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `UserProfile` of the current `User`.
    ///
    /// Omitted fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateProfile",
            otel.name = Self::SPAN_NAME,
            unit_preference = ?unit_preference,
            username = ?username,
        ),
    )]
    pub async fn update_profile(
        username: Option<api::profile::Username>,
        unit_preference: Option<api::profile::WeightUnit>,
        ctx: &Context,
    ) -> Result<api::Profile, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateProfile {
                user_id: my_id.into(),
                username: username.map(Into::into),
                unit_preference: unit_preference.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for command::sign_up::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMAIL_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`UserEmail` is occupied by another `User`"]
                EmailOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(Error::EmailOccupied.into()),
            Self::PasswordHash(_) => None,
        }
    }
}

impl AsError for command::sign_in::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = FORBIDDEN]
                #[message = "Provided credentials does not match any `User`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::UserNotExists(_) | Self::WrongCredentials => {
                Some(Error::WrongCredentials.into())
            }
        }
    }
}

impl AsError for command::refresh_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Unauthorized(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
        }
    }
}

impl AsError for command::sign_out::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Unauthorized(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_workout::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WORKOUT_ENDS_BEFORE_START"]
                #[status = BAD_REQUEST]
                #[message = "`Workout` cannot end before it starts"]
                EndsBeforeStart,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EndsBeforeStart => Some(Error::EndsBeforeStart.into()),
        }
    }
}

impl AsError for command::complete_workout::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NO_ACTIVE_WORKOUT"]
                #[status = BAD_REQUEST]
                #[message = "No active workout session, add a set first"]
                NoActiveWorkout,

                #[code = "WORKOUT_HAS_NO_SETS"]
                #[status = CONFLICT]
                #[message = "`Workout` has no `WorkoutSet`s logged"]
                NoSets,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NoActiveWorkout => Some(Error::NoActiveWorkout.into()),
            Self::WorkoutNotExists(_) => Some(WorkoutError::NotExists.into()),
            Self::AlreadyCompleted(_) => Some(WorkoutError::Completed.into()),
            Self::NoSets(_) => Some(Error::NoSets.into()),
        }
    }
}

impl AsError for command::find_or_create_exercise::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotCreated(_) => None,
        }
    }
}

impl AsError for command::insert_set::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::WorkoutNotExists(_) => Some(WorkoutError::NotExists.into()),
            Self::WorkoutCompleted(_) => Some(WorkoutError::Completed.into()),
        }
    }
}

impl AsError for command::add_set::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INCOMPLETE_SET"]
                #[status = BAD_REQUEST]
                #[message = "Please fill in exercise, weight, and reps"]
                Incomplete,

                #[code = "INVALID_EXERCISE_NAME"]
                #[status = BAD_REQUEST]
                #[message = "Invalid exercise name"]
                InvalidExerciseName,
            }
        }

        match self {
            Self::Incomplete => Some(Error::Incomplete.into()),
            Self::InvalidExerciseName => {
                Some(Error::InvalidExerciseName.into())
            }
            Self::StartWorkout(e) => e.try_as_error(),
            Self::Exercise(e) => e.try_as_error(),
            Self::InsertSet(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_profile::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

define_error! {
    enum WorkoutError {
        #[code = "WORKOUT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Workout` with the specified ID does not exist"]
        NotExists,

        #[code = "WORKOUT_COMPLETED"]
        #[status = CONFLICT]
        #[message = "`Workout` with the specified ID is completed already"]
        Completed,
    }
}

define_error! {
    enum RepsError {
        #[code = "NEGATIVE_REPS"]
        #[status = BAD_REQUEST]
        #[message = "Number of repetitions cannot be negative"]
        Negative,

        #[code = "TOO_MANY_REPS"]
        #[status = BAD_REQUEST]
        #[message = "Number of repetitions exceeds the allowed maximum"]
        TooMany,
    }
}
