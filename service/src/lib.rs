//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use std::sync::Arc;

use smart_default::SmartDefault;
use tokio::sync::broadcast;

use crate::domain::structure;
#[cfg(doc)]
use crate::{domain::Block, infra::Database};

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Minimal number of digits of the per-floor sequence in newly derived
    /// apartment numbers (`A101` for `2`, `A1001` for `3`).
    #[default(2)]
    pub apartment_padding: usize,

    /// Capacity of the [`structure::Document`] saves channel.
    ///
    /// Subscribers lagging behind more than this number of saves miss the
    /// oldest ones.
    #[default(64)]
    pub events_capacity: usize,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// Sender of the saved [`structure::Document`]s.
    saved_structures: broadcast::Sender<Arc<structure::Document>>,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, database: Db) -> Self {
        let (saved_structures, _) =
            broadcast::channel(config.events_capacity.max(1));
        Self {
            config,
            database,
            saved_structures,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Subscribes to all the [`structure::Document`]s saved by this
    /// [`Service`] from now on.
    #[must_use]
    pub fn subscribe_saved_structures(
        &self,
    ) -> broadcast::Receiver<Arc<structure::Document>> {
        self.saved_structures.subscribe()
    }

    /// Notifies the subscribers about the provided saved
    /// [`structure::Document`].
    fn notify_structure_saved(&self, doc: structure::Document) {
        // No subscribers is not an error.
        _ = self.saved_structures.send(Arc::new(doc));
    }
}
