//! [`Profile`]-related definitions.

use common::{weight, DateTime};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;

use crate::{
    api::{self, scalar},
    Context,
};

/// Public profile of a `User`.
#[derive(Clone, Debug, From, Into)]
pub struct Profile(domain::user::Profile);

/// Public profile of a `User`.
#[graphql_object(name = "UserProfile", context = Context)]
impl Profile {
    /// ID of the `User` this `UserProfile` describes.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "UserProfile.userId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn user_id(&self) -> api::user::Id {
        self.0.id.into()
    }

    /// Name the `User` is displayed with, if chosen.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "UserProfile.username",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn username(&self) -> Option<Username> {
        self.0.username.clone().map(Into::into)
    }

    /// `WeightUnit` the `User` prefers weights to be displayed in, if chosen.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "UserProfile.unitPreference",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn unit_preference(&self) -> Option<WeightUnit> {
        self.0.unit_preference.map(Into::into)
    }

    /// `DateTime` when this `UserProfile` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `UserProfile` was last updated, if ever.
    pub fn updated_at(&self) -> Option<DateTime> {
        self.0.updated_at.map(|at| at.coerce())
    }
}

/// Name a `User` is displayed with.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "Username",
    with = scalar::Via::<domain::user::profile::Username>,
)]
pub struct Username(domain::user::profile::Username);

/// Unit weights are displayed in.
///
/// Weights are stored as entered, so this is a display preference only.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum WeightUnit {
    /// Pounds.
    Lbs,

    /// Kilograms.
    Kg,
}

impl From<weight::Unit> for WeightUnit {
    fn from(unit: weight::Unit) -> Self {
        match unit {
            weight::Unit::Lbs => Self::Lbs,
            weight::Unit::Kg => Self::Kg,
        }
    }
}

impl From<WeightUnit> for weight::Unit {
    fn from(unit: WeightUnit) -> Self {
        match unit {
            WeightUnit::Lbs => Self::Lbs,
            WeightUnit::Kg => Self::Kg,
        }
    }
}
