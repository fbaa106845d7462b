//! [`Query`] collection related to the multiple [`Block`]s.

use common::operations::By;

use crate::{domain::Block, read};
#[cfg(doc)]
use crate::{domain::Site, Query};

use super::DatabaseQuery;

/// Queries all the not deleted [`Block`]s of a [`Site`].
pub type BySite = DatabaseQuery<By<Vec<Block>, read::block::list::Selector>>;
