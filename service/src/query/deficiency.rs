//! [`Query`] collection related to a single [`Deficiency`].

use common::operations::By;

use crate::domain::{deficiency, Deficiency};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Deficiency`] by its [`deficiency::Id`].
pub type ById = DatabaseQuery<By<Option<Deficiency>, deficiency::Id>>;
