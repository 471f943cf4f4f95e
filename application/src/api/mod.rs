//! GraphQL API definitions.

pub mod metrics;
mod mutation;
pub mod profile;
mod query;
pub mod scalar;
mod subscription;
pub mod user;
pub mod workout;

pub use self::{
    metrics::HistoryMetrics, mutation::Mutation, profile::Profile,
    query::Query, subscription::Subscription, user::User, workout::Workout,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;
