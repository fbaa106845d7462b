//! [`Command`] for deleting a [`Deficiency`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{deficiency, Deficiency},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Deficiency`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteDeficiency {
    /// ID of the [`Deficiency`] to delete.
    pub deficiency_id: deficiency::Id,
}

impl<Db> Command<DeleteDeficiency> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Deficiency, deficiency::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Deficiency>, deficiency::Id>>,
            Ok = Option<Deficiency>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Deficiency, deficiency::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Deficiency;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteDeficiency,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteDeficiency { deficiency_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(deficiency_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let deficiency = tx
            .execute(Select(By::<Option<Deficiency>, _>::new(deficiency_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DeficiencyNotExists(deficiency_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Deficiency, _>::new(deficiency.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(deficiency)
    }
}

/// Error of [`DeleteDeficiency`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Deficiency`] doesn't exist.
    #[display("`Deficiency(id: {_0})` does not exist")]
    #[from(ignore)]
    DeficiencyNotExists(#[error(not(source))] deficiency::Id),
}
