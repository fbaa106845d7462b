//! [`Command`] for updating a [`Deficiency`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{deficiency, Deficiency},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Deficiency`].
///
/// Only the provided fields are changed.
#[derive(Clone, Debug, Default)]
pub struct UpdateDeficiency {
    /// ID of the [`Deficiency`] to update.
    pub deficiency_id: deficiency::Id,

    /// New [`deficiency::Description`].
    pub description: Option<deficiency::Description>,

    /// New [`deficiency::Status`].
    pub status: Option<deficiency::Status>,

    /// New [`deficiency::Priority`].
    pub priority: Option<deficiency::Priority>,

    /// New [`deficiency::Subcontractor`], or its removal.
    pub subcontractor: Option<Option<deficiency::Subcontractor>>,

    /// New [`deficiency::Category`], or its removal.
    pub category: Option<Option<deficiency::Category>>,

    /// New set of attached [`deficiency::Image`]s.
    pub images: Option<Vec<deficiency::Image>>,
}

impl<Db> Command<UpdateDeficiency> for Service<Db>
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
        > + Database<Update<Deficiency>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Deficiency;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateDeficiency,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateDeficiency {
            deficiency_id,
            description,
            status,
            priority,
            subcontractor,
            category,
            images,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Deficiency`.
        tx.execute(Lock(By::new(deficiency_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut deficiency = tx
            .execute(Select(By::<Option<Deficiency>, _>::new(deficiency_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DeficiencyNotExists(deficiency_id))
            .map_err(tracerr::wrap!())?;

        let before = deficiency.clone();
        if let Some(description) = description {
            deficiency.description = description;
        }
        if let Some(status) = status {
            deficiency.status = status;
        }
        if let Some(priority) = priority {
            deficiency.priority = priority;
        }
        if let Some(subcontractor) = subcontractor {
            deficiency.subcontractor = subcontractor;
        }
        if let Some(category) = category {
            deficiency.category = category;
        }
        if let Some(images) = images {
            deficiency.images = images;
        }
        if deficiency == before {
            return Ok(deficiency);
        }

        deficiency.updated_at = DateTime::now().coerce();
        tx.execute(Update(deficiency.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(deficiency)
    }
}

/// Error of [`UpdateDeficiency`] [`Command`] execution.
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
