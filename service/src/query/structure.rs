//! [`Query`] collection related to a [`Block`]'s [`Structure`].

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Structure;
use crate::{
    domain::{block, structure, Block},
    infra::{database, Database},
    Service,
};

use super::{DatabaseQuery, Query};

/// Queries the persisted [`structure::Document`] of a [`Block`].
///
/// Returns [`None`] if no [`Structure`] was saved for the [`Block`] yet.
pub type ByBlock = DatabaseQuery<By<Option<structure::Document>, block::Id>>;

/// [`Query`] opening a new [`structure::Draft`] of a [`Block`]'s persisted
/// [`Structure`].
///
/// Returns [`None`] if the [`Block`] doesn't exist.
#[derive(Clone, Copy, Debug)]
pub struct OpenDraft {
    /// ID of the [`Block`] to edit the [`Structure`] of.
    pub block_id: block::Id,
}

impl<Db> Query<OpenDraft> for Service<Db>
where
    Db: Database<
            Select<By<Option<Block>, block::Id>>,
            Ok = Option<Block>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<structure::Document>, block::Id>>,
            Ok = Option<structure::Document>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<structure::Draft>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        OpenDraft { block_id }: OpenDraft,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(block) = self
            .database()
            .execute(Select(By::<Option<Block>, _>::new(block_id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let document = self
            .database()
            .execute(Select(By::<Option<structure::Document>, _>::new(
                block_id,
            )))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Some(structure::Draft::new(
            &block,
            document,
            self.config().apartment_padding,
        )))
    }
}
