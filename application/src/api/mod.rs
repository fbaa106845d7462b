//! GraphQL API definitions.

pub mod block;
pub mod deficiency;
mod mutation;
mod query;
pub mod scalar;
pub mod site;
pub mod structure;
mod subscription;

pub use self::{
    block::Block, deficiency::Deficiency, mutation::Mutation, query::Query,
    site::Site, subscription::Subscription,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;
