//! [`Query`] collection related to [`Exercise`]s.

use std::collections::HashMap;

use common::operations::By;

use crate::domain::{exercise, Exercise};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries [`Exercise`]s by their [`exercise::Id`]s.
///
/// Unknown [`exercise::Id`]s are omitted from the result.
pub type ByIds =
    DatabaseQuery<By<HashMap<exercise::Id, Exercise>, Vec<exercise::Id>>>;
