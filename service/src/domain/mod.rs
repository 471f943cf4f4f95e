//! Domain definitions.

pub mod exercise;
pub mod set;
pub mod user;
pub mod workout;

pub use self::{exercise::Exercise, set::Set, user::User, workout::Workout};
