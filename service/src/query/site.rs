//! [`Query`] collection related to a single [`Site`].

use common::operations::By;

use crate::domain::{site, Site};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Site`] by its [`site::Id`].
pub type ById = DatabaseQuery<By<Option<Site>, site::Id>>;
