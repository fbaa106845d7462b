//! [`Query`] collection related to a single [`Block`].

use common::operations::By;

use crate::domain::{block, Block};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a not deleted [`Block`] by its [`block::Id`].
pub type ById = DatabaseQuery<By<Option<Block>, block::Id>>;
