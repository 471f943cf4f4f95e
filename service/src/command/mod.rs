//! [`Command`] definition.

pub mod add_set;
pub mod authorize_user_session;
pub mod complete_workout;
pub mod create_workout;
pub mod find_or_create_exercise;
pub mod insert_set;
pub mod refresh_session;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod start_workout;
pub mod update_profile;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_set::AddSet, authorize_user_session::AuthorizeUserSession,
    complete_workout::CompleteWorkout, create_workout::CreateWorkout,
    find_or_create_exercise::FindOrCreateExercise, insert_set::InsertSet,
    refresh_session::RefreshSession, sign_in::SignIn, sign_out::SignOut,
    sign_up::SignUp, start_workout::StartWorkout,
    update_profile::UpdateProfile,
};
