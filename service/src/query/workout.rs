//! [`Query`] collection related to [`Workout`]s.

use common::operations::By;

use crate::{
    domain::{workout, Workout},
    read,
};
#[cfg(doc)]
use crate::{domain::Set, Query};

use super::DatabaseQuery;

/// Queries a [`Workout`] by its [`workout::Id`].
pub type ById = DatabaseQuery<By<Option<Workout>, workout::Id>>;

/// Queries all the logged [`Set`]s of the [`Workout`]s with the provided
/// [`workout::Id`]s.
pub type Sets = DatabaseQuery<By<Vec<read::workout::Set>, Vec<workout::Id>>>;
