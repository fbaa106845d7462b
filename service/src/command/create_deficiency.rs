//! [`Command`] for recording a new [`Deficiency`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{structure::Apartment, Block};
use crate::{
    domain::{block, deficiency, structure, Deficiency},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording a new [`Deficiency`] about an [`Apartment`].
#[derive(Clone, Debug)]
pub struct CreateDeficiency {
    /// ID of the [`Block`] the [`Apartment`] is in.
    pub block_id: block::Id,

    /// ID of the [`Apartment`] a new [`Deficiency`] is about.
    pub apartment_id: structure::apartment::Id,

    /// [`deficiency::Description`] of a new [`Deficiency`].
    pub description: deficiency::Description,

    /// [`deficiency::Priority`] of a new [`Deficiency`].
    pub priority: deficiency::Priority,

    /// [`deficiency::Subcontractor`] of a new [`Deficiency`], if any.
    pub subcontractor: Option<deficiency::Subcontractor>,

    /// [`deficiency::Category`] of a new [`Deficiency`], if any.
    pub category: Option<deficiency::Category>,

    /// [`deficiency::Image`]s attached to a new [`Deficiency`].
    pub images: Vec<deficiency::Image>,
}

impl<Db> Command<CreateDeficiency> for Service<Db>
where
    Db: Database<
            Select<By<Option<structure::Document>, block::Id>>,
            Ok = Option<structure::Document>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Deficiency>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Deficiency;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateDeficiency,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateDeficiency {
            block_id,
            apartment_id,
            description,
            priority,
            subcontractor,
            category,
            images,
        } = cmd;

        let document = self
            .database()
            .execute(Select(By::new(block_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let apartment_no = document
            .as_ref()
            .and_then(|d| d.structure.apartment(apartment_id))
            .map(|(_, a)| a.no.clone())
            .ok_or(E::ApartmentNotExists(apartment_id))
            .map_err(tracerr::wrap!())?;

        let now = DateTime::now();
        let deficiency = Deficiency {
            id: deficiency::Id::new(),
            block_id,
            apartment_id,
            apartment_no,
            description,
            status: deficiency::Status::New,
            priority,
            subcontractor,
            category,
            images,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(deficiency.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(deficiency)
    }
}

/// Error of [`CreateDeficiency`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Apartment`] doesn't exist in the persisted [`structure::Structure`]
    /// of the [`Block`].
    #[display("`Apartment(id: {_0})` does not exist")]
    #[from(ignore)]
    ApartmentNotExists(#[error(not(source))] structure::apartment::Id),
}
