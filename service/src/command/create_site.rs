//! [`Command`] for creating a new [`Site`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{site, Site},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Site`].
#[derive(Clone, Debug)]
pub struct CreateSite {
    /// [`site::Name`] of a new [`Site`].
    pub name: site::Name,
}

impl<Db> Command<CreateSite> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Site>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Site;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateSite) -> Result<Self::Ok, Self::Err> {
        let CreateSite { name } = cmd;

        let site = Site {
            id: site::Id::new(),
            name,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;
        tx.execute(Insert(site.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(site)
    }
}

/// Error of [`CreateSite`] [`Command`] execution.
pub type ExecutionError = database::Error;
