//! [`Command`] for saving a [`Block`]'s [`Structure`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Structure;
use crate::{
    domain::{block, site, structure, Block},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for saving a [`Block`]'s [`Structure`] as a whole.
///
/// The save succeeds only if the persisted [`structure::Version`] is still
/// the [`expected`] one, so concurrent editors can't overwrite each other's
/// changes. The [`structure::Draft`] it was made from stays untouched on any
/// failure, so the save may be retried.
///
/// [`expected`]: SaveStructure::expected
#[derive(Clone, Debug)]
pub struct SaveStructure {
    /// ID of the [`Block`] to save the [`Structure`] of.
    pub block_id: block::Id,

    /// ID of the [`Site`] the [`Block`] belongs to.
    ///
    /// [`Site`]: crate::domain::Site
    pub site_id: site::Id,

    /// [`structure::Version`] the [`Structure`] was edited from.
    pub expected: structure::Version,

    /// [`Structure`] to persist.
    pub structure: structure::Structure,
}

impl From<&structure::Draft> for SaveStructure {
    fn from(draft: &structure::Draft) -> Self {
        Self {
            block_id: draft.block_id(),
            site_id: draft.site_id(),
            expected: draft.version(),
            structure: draft.structure().clone(),
        }
    }
}

impl<Db> Command<SaveStructure> for Service<Db>
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
        > + Database<
            Select<By<Option<structure::Document>, block::Id>>,
            Ok = Option<structure::Document>,
            Err = Traced<database::Error>,
        > + Database<
            Update<structure::Document>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = structure::Document;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SaveStructure,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SaveStructure {
            block_id,
            site_id,
            expected,
            mut structure,
        } = cmd;

        structure
            .validate()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        structure.sort();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent saves of the same `Structure`.
        tx.execute(Lock(By::new(block_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let block = tx
            .execute(Select(By::<Option<Block>, _>::new(block_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|b| b.site_id == site_id)
            .ok_or(E::BlockNotExists(block_id))
            .map_err(tracerr::wrap!())?;

        let actual = tx
            .execute(Select(By::<Option<structure::Document>, _>::new(
                block.id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .map_or(structure::Version::UNSAVED, |d| d.version);
        if actual != expected {
            return Err(tracerr::new!(E::VersionConflict { expected, actual }));
        }

        let document = structure::Document {
            block_id: block.id,
            site_id: block.site_id,
            structure,
            version: actual.next(),
            updated_at: DateTime::now().coerce(),
        };
        tx.execute(Update(document.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::info!(
            block.id = %document.block_id,
            version = %document.version,
            "`Structure` saved",
        );
        self.notify_structure_saved(document.clone());

        Ok(document)
    }
}

/// Error of [`SaveStructure`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Structure`] is invalid.
    #[display("`Structure` is invalid: {_0}")]
    Invalid(structure::ValidationError),

    /// [`Block`] doesn't exist.
    #[display("`Block(id: {_0})` does not exist")]
    #[from(ignore)]
    BlockNotExists(#[error(not(source))] block::Id),

    /// [`Structure`] was saved by someone else after it had been loaded.
    #[display(
        "`Structure` was concurrently modified: expected `Version({expected})`, \
         found `Version({actual})`"
    )]
    #[from(ignore)]
    VersionConflict {
        /// [`structure::Version`] the [`Structure`] was edited from.
        expected: structure::Version,

        /// Currently persisted [`structure::Version`].
        actual: structure::Version,
    },
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{CreateBlock, CreateSite},
        domain::{block, site, structure::floor, Block},
        infra::Memory,
        query, Command as _, Config, Query as _, Service,
    };

    use super::{ExecutionError, SaveStructure};

    async fn service_with_block() -> (Service<Memory>, Block) {
        let service = Service::new(Config::default(), Memory::default());
        let site = service
            .execute(CreateSite {
                name: site::Name::new("Merkez").expect("valid site name"),
            })
            .await
            .expect("site is created");
        let block = service
            .execute(CreateBlock {
                site_id: site.id,
                name: block::Name::new("A").expect("valid block name"),
            })
            .await
            .expect("block is created");
        (service, block)
    }

    async fn open(
        service: &Service<Memory>,
        block: &Block,
    ) -> crate::domain::structure::Draft {
        service
            .execute(query::structure::OpenDraft { block_id: block.id })
            .await
            .expect("query succeeds")
            .expect("block exists")
    }

    #[tokio::test]
    async fn saved_structure_is_loaded_back() {
        let (service, block) = service_with_block().await;

        let mut draft = open(&service, &block).await;
        assert!(draft.add_floor(floor::Kind::Ground));
        assert!(draft.add_floor(floor::Kind::Normal));
        assert!(draft.add_apartment(0).is_some());
        assert!(draft.add_apartment(1).is_some());

        let saved = service
            .execute(SaveStructure::from(&draft))
            .await
            .expect("structure is saved");
        assert_eq!(i64::from(saved.version), 1);

        let loaded = service
            .execute(query::structure::ByBlock::by(block.id))
            .await
            .expect("query succeeds")
            .expect("document exists");
        assert_eq!(loaded.version, saved.version);
        assert_eq!(loaded.structure, *draft.structure());

        let reopened = open(&service, &block).await;
        assert_eq!(reopened.version(), saved.version);
        assert_eq!(reopened.structure(), draft.structure());
    }

    #[tokio::test]
    async fn rejects_blank_apartment_number_keeping_previous_state() {
        let (service, block) = service_with_block().await;

        let mut draft = open(&service, &block).await;
        _ = draft.add_floor(floor::Kind::Normal);
        _ = draft.add_apartment(0);
        let first = service
            .execute(SaveStructure::from(&draft))
            .await
            .expect("structure is saved");
        draft.rebase(first.version);

        assert!(draft.rename_apartment(0, 0, "  ".into()));
        let err = service
            .execute(SaveStructure::from(&draft))
            .await
            .expect_err("blank number is rejected");
        assert!(matches!(err.as_ref(), ExecutionError::Invalid(_)));

        let stored = service
            .execute(query::structure::ByBlock::by(block.id))
            .await
            .expect("query succeeds")
            .expect("document exists");
        assert_eq!(stored.version, first.version);
        assert_eq!(stored.structure, first.structure);
    }

    #[tokio::test]
    async fn concurrent_save_conflicts_and_may_be_retried() {
        let (service, block) = service_with_block().await;

        let mut first = open(&service, &block).await;
        let mut second = open(&service, &block).await;

        _ = first.add_floor(floor::Kind::Ground);
        let saved = service
            .execute(SaveStructure::from(&first))
            .await
            .expect("first save succeeds");

        _ = second.add_floor(floor::Kind::Basement);
        let err = service
            .execute(SaveStructure::from(&second))
            .await
            .expect_err("second save conflicts");
        match err.as_ref() {
            ExecutionError::VersionConflict { expected, actual } => {
                assert_eq!(i64::from(*expected), 0);
                assert_eq!(*actual, saved.version);
            }
            e => panic!("unexpected error: {e}"),
        }
        assert_eq!(second.floors().len(), 1, "draft is kept");

        second.rebase(saved.version);
        let retried = service
            .execute(SaveStructure::from(&second))
            .await
            .expect("retried save succeeds");
        assert_eq!(i64::from(retried.version), 2);
    }

    #[tokio::test]
    async fn rejects_unknown_block() {
        let (service, block) = service_with_block().await;

        let mut cmd = SaveStructure::from(&open(&service, &block).await);
        cmd.block_id = block::Id::new();
        let err = service.execute(cmd).await.expect_err("no such block");
        assert!(matches!(err.as_ref(), ExecutionError::BlockNotExists(_)));
    }

    #[tokio::test]
    async fn notifies_subscribers() {
        let (service, block) = service_with_block().await;
        let mut saved = service.subscribe_saved_structures();

        let mut draft = open(&service, &block).await;
        _ = draft.add_floor(floor::Kind::Roof);
        _ = service
            .execute(SaveStructure::from(&draft))
            .await
            .expect("structure is saved");

        let doc = saved.recv().await.expect("save is broadcast");
        assert_eq!(doc.block_id, block.id);
        assert_eq!(doc.structure.floors.len(), 1);
    }
}
