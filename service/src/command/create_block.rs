//! [`Command`] for creating a new [`Block`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{block, site, Block, Site},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for creating a new [`Block`] in a [`Site`].
#[derive(Clone, Debug)]
pub struct CreateBlock {
    /// ID of the [`Site`] to create a new [`Block`] in.
    pub site_id: site::Id,

    /// [`block::Name`] of a new [`Block`], unique in its [`Site`].
    pub name: block::Name,
}

impl<Db> Command<CreateBlock> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Site, site::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Site>, site::Id>>,
            Ok = Option<Site>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Block>, read::block::list::Selector>>,
            Ok = Vec<Block>,
            Err = Traced<database::Error>,
        > + Database<Insert<Block>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Block;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateBlock) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBlock { site_id, name } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent creation of `Block`s with the same name.
        tx.execute(Lock(By::<Site, _>::new(site_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let site = tx
            .execute(Select(By::<Option<Site>, _>::new(site_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SiteNotExists(site_id))
            .map_err(tracerr::wrap!())?;

        let occupied = tx
            .execute(Select(By::<Vec<Block>, _>::new(
                read::block::list::Selector { site_id: site.id },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .any(|b| b.name == name);
        if occupied {
            return Err(tracerr::new!(E::NameOccupied(name)));
        }

        let block = Block {
            id: block::Id::new(),
            site_id: site.id,
            name,
            status: block::Status::Active,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };
        tx.execute(Insert(block.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(block)
    }
}

/// Error of [`CreateBlock`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Site`] doesn't exist.
    #[display("`Site(id: {_0})` does not exist")]
    #[from(ignore)]
    SiteNotExists(#[error(not(source))] site::Id),

    /// [`Block`] with the same [`block::Name`] already exists in the [`Site`].
    #[display("`Block(name: {_0})` already exists")]
    #[from(ignore)]
    NameOccupied(#[error(not(source))] block::Name),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{CreateSite, DeleteBlock},
        domain::{block, site},
        infra::Memory,
        query, read, Command as _, Config, Query as _, Service,
    };

    use super::{CreateBlock, ExecutionError};

    fn name(n: &str) -> block::Name {
        block::Name::new(n).expect("valid block name")
    }

    async fn service_with_site() -> (Service<Memory>, site::Id) {
        let service = Service::new(Config::default(), Memory::default());
        let site = service
            .execute(CreateSite {
                name: site::Name::new("Merkez").expect("valid site name"),
            })
            .await
            .expect("site is created");
        (service, site.id)
    }

    #[tokio::test]
    async fn rejects_occupied_name() {
        let (service, site_id) = service_with_site().await;

        _ = service
            .execute(CreateBlock {
                site_id,
                name: name("A"),
            })
            .await
            .expect("first block is created");
        let err = service
            .execute(CreateBlock {
                site_id,
                name: name("A"),
            })
            .await
            .expect_err("name is occupied");
        assert!(matches!(err.as_ref(), ExecutionError::NameOccupied(_)));
    }

    #[tokio::test]
    async fn allows_name_of_deleted_block() {
        let (service, site_id) = service_with_site().await;

        let old = service
            .execute(CreateBlock {
                site_id,
                name: name("B"),
            })
            .await
            .expect("block is created");
        _ = service
            .execute(DeleteBlock { block_id: old.id })
            .await
            .expect("block is deleted");

        let new = service
            .execute(CreateBlock {
                site_id,
                name: name("B"),
            })
            .await
            .expect("name is free again");
        assert_ne!(new.id, old.id);

        let blocks = service
            .execute(query::blocks::BySite::by(read::block::list::Selector {
                site_id,
            }))
            .await
            .expect("query succeeds");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, new.id);
    }

    #[tokio::test]
    async fn rejects_unknown_site() {
        let (service, _) = service_with_site().await;

        let err = service
            .execute(CreateBlock {
                site_id: site::Id::new(),
                name: name("A"),
            })
            .await
            .expect_err("no such site");
        assert!(matches!(err.as_ref(), ExecutionError::SiteNotExists(_)));
    }
}
