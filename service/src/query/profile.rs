//! [`Query`] collection related to a [`Profile`].

use common::operations::By;

use crate::domain::user::{self, Profile};
#[cfg(doc)]
use crate::{domain::User, Query};

use super::DatabaseQuery;

/// Queries a [`Profile`] of a [`User`] by its [`user::Id`].
pub type ById = DatabaseQuery<By<Option<Profile>, user::Id>>;
