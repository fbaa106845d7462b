//! [`Command`] for deleting a [`Block`].

use common::{
    operations::{
        By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Deficiency, Structure};
use crate::{
    domain::{block, structure, Block},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Block`] along with its [`Structure`].
///
/// [`Deficiency`] records of the [`Block`] are kept.
#[derive(Clone, Copy, Debug)]
pub struct DeleteBlock {
    /// ID of the [`Block`] to delete.
    pub block_id: block::Id,
}

impl<Db> Command<DeleteBlock> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<structure::Document, block::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Block>, block::Id>>,
            Ok = Option<Block>,
            Err = Traced<database::Error>,
        > + Database<Update<Block>, Ok = (), Err = Traced<database::Error>>
        + Database<
            Delete<By<structure::Document, block::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Block;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteBlock) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteBlock { block_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent saves of the `Structure` being deleted.
        tx.execute(Lock(By::new(block_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut block = tx
            .execute(Select(By::<Option<Block>, _>::new(block_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BlockNotExists(block_id))
            .map_err(tracerr::wrap!())?;

        block.deleted_at = Some(DateTime::now().coerce());
        tx.execute(Update(block.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Delete(By::<structure::Document, _>::new(block.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(block)
    }
}

/// Error of [`DeleteBlock`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Block`] doesn't exist.
    #[display("`Block(id: {_0})` does not exist")]
    #[from(ignore)]
    BlockNotExists(#[error(not(source))] block::Id),
}
