//! In-memory [`Database`] implementation.

use std::{collections::HashMap, mem, sync::Arc};

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use tokio::sync::Mutex;
use tracerr::Traced;

use crate::{
    domain::{block, deficiency, site, structure, Block, Deficiency, Site},
    infra::{database, Database},
    read,
};

/// In-memory [`Database`].
///
/// A transaction works on a snapshot of the committed [`State`] and journals
/// its [`Write`]s, which are replayed onto the committed [`State`] on
/// [`Commit`]. So overlapping transactions only overwrite the entities both
/// of them have written. Dropping a transaction without committing discards
/// its changes. [`Lock`]s are no-ops.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Committed [`State`].
    committed: Arc<Mutex<State>>,

    /// [`Staged`] changes of the current transaction, if any.
    staged: Option<Arc<Mutex<Staged>>>,
}

/// Stored data of a [`Memory`] [`Database`].
#[derive(Clone, Debug, Default)]
struct State {
    /// Stored [`Site`]s.
    sites: HashMap<site::Id, Site>,

    /// Stored [`Block`]s, including deleted ones.
    blocks: HashMap<block::Id, Block>,

    /// Stored [`structure::Document`]s.
    structures: HashMap<block::Id, structure::Document>,

    /// Stored [`Deficiency`] records, in insertion order.
    deficiencies: Vec<Deficiency>,
}

impl State {
    /// Applies the provided [`Write`] to this [`State`].
    fn apply(&mut self, write: Write) {
        match write {
            Write::Site(site) => drop(self.sites.insert(site.id, site)),
            Write::Block(block) => drop(self.blocks.insert(block.id, block)),
            Write::Structure(doc) => {
                drop(self.structures.insert(doc.block_id, doc));
            }
            Write::RemoveStructure(id) => drop(self.structures.remove(&id)),
            Write::Deficiency(deficiency) => {
                if let Some(d) = self
                    .deficiencies
                    .iter_mut()
                    .find(|d| d.id == deficiency.id)
                {
                    *d = deficiency;
                } else {
                    self.deficiencies.push(deficiency);
                }
            }
            Write::RemoveDeficiency(id) => {
                self.deficiencies.retain(|d| d.id != id);
            }
        }
    }
}

/// Uncommitted changes of a [`Memory`] transaction.
#[derive(Debug)]
struct Staged {
    /// Snapshot of the committed [`State`] with the [`Write`]s applied.
    state: State,

    /// [`Write`]s in the order they were made.
    writes: Vec<Write>,
}

/// Single write of a [`Memory`] transaction.
#[derive(Clone, Debug)]
enum Write {
    /// Inserts or replaces a [`Site`].
    Site(Site),

    /// Inserts or replaces a [`Block`].
    Block(Block),

    /// Inserts or replaces a [`structure::Document`].
    Structure(structure::Document),

    /// Removes the [`structure::Document`] of a [`Block`].
    RemoveStructure(block::Id),

    /// Inserts or replaces a [`Deficiency`].
    Deficiency(Deficiency),

    /// Removes a [`Deficiency`].
    RemoveDeficiency(deficiency::Id),
}

impl Memory {
    /// Reads the [`State`] this [`Memory`] operates on.
    async fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        match &self.staged {
            Some(staged) => f(&staged.lock().await.state),
            None => f(&*self.committed.lock().await),
        }
    }

    /// Applies the provided [`Write`], journaling it if inside a transaction.
    async fn write(&self, write: Write) {
        match &self.staged {
            Some(staged) => {
                let mut staged = staged.lock().await;
                staged.state.apply(write.clone());
                staged.writes.push(write);
            }
            None => self.committed.lock().await.apply(write),
        }
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        if self.staged.is_some() {
            return Ok(self.clone());
        }
        let state = self.committed.lock().await.clone();
        Ok(Self {
            committed: Arc::clone(&self.committed),
            staged: Some(Arc::new(Mutex::new(Staged {
                state,
                writes: Vec::new(),
            }))),
        })
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        if let Some(staged) = &self.staged {
            let writes = mem::take(&mut staged.lock().await.writes);
            let mut committed = self.committed.lock().await;
            for write in writes {
                committed.apply(write);
            }
        }
        Ok(())
    }
}

impl<T> Database<Lock<T>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Lock<T>) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Insert<Site>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(site): Insert<Site>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Write::Site(site)).await;
        Ok(())
    }
}

impl Database<Select<By<Option<Site>, site::Id>>> for Memory {
    type Ok = Option<Site>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Site>, site::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.read(|s| s.sites.get(by.as_inner()).cloned()).await)
    }
}

impl Database<Insert<Block>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(block): Insert<Block>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(block)).await
    }
}

impl Database<Update<Block>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(block): Update<Block>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Write::Block(block)).await;
        Ok(())
    }
}

impl Database<Select<By<Option<Block>, block::Id>>> for Memory {
    type Ok = Option<Block>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Block>, block::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .read(|s| {
                s.blocks
                    .get(by.as_inner())
                    .filter(|b| b.deleted_at.is_none())
                    .cloned()
            })
            .await)
    }
}

impl Database<Select<By<Vec<Block>, read::block::list::Selector>>> for Memory {
    type Ok = Vec<Block>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Block>, read::block::list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::block::list::Selector { site_id } = by.into_inner();

        let mut blocks = self
            .read(|s| {
                s.blocks
                    .values()
                    .filter(|b| b.site_id == site_id && b.deleted_at.is_none())
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await;
        blocks.sort_by_key(|b| b.name.to_string());
        Ok(blocks)
    }
}

impl Database<Select<By<Option<structure::Document>, block::Id>>> for Memory {
    type Ok = Option<structure::Document>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<structure::Document>, block::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.read(|s| s.structures.get(by.as_inner()).cloned()).await)
    }
}

impl Database<Update<structure::Document>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(doc): Update<structure::Document>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Write::Structure(doc)).await;
        Ok(())
    }
}

impl Database<Delete<By<structure::Document, block::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<structure::Document, block::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Write::RemoveStructure(by.into_inner())).await;
        Ok(())
    }
}

impl Database<Insert<Deficiency>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(deficiency): Insert<Deficiency>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Write::Deficiency(deficiency)).await;
        Ok(())
    }
}

impl Database<Update<Deficiency>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(deficiency): Update<Deficiency>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Write::Deficiency(deficiency)).await;
        Ok(())
    }
}

impl Database<Select<By<Option<Deficiency>, deficiency::Id>>> for Memory {
    type Ok = Option<Deficiency>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Deficiency>, deficiency::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .read(|s| s.deficiencies.iter().find(|d| d.id == id).cloned())
            .await)
    }
}

impl Database<Select<By<Vec<Deficiency>, read::deficiency::list::Selector>>>
    for Memory
{
    type Ok = Vec<Deficiency>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Deficiency>, read::deficiency::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::deficiency::list::Selector { block_id, filter } =
            by.into_inner();

        Ok(self
            .read(|s| {
                s.deficiencies
                    .iter()
                    .rev()
                    .filter(|d| d.block_id == block_id && filter.matches(d))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await)
    }
}

impl Database<Delete<By<Deficiency, deficiency::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Deficiency, deficiency::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(Write::RemoveDeficiency(id)).await;
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Commit, Insert, Select, Transact},
        DateTime,
    };

    use crate::{
        domain::{site, Site},
        infra::Database as _,
    };

    use super::Memory;

    fn site(name: &str) -> Site {
        Site {
            id: site::Id::new(),
            name: site::Name::new(name).expect("valid site name"),
            created_at: DateTime::now().coerce(),
        }
    }

    async fn select(db: &Memory, id: site::Id) -> Option<Site> {
        db.execute(Select(By::<Option<Site>, _>::new(id)))
            .await
            .expect("select succeeds")
    }

    #[tokio::test]
    async fn overlapping_transactions_keep_both_commits() {
        let db = Memory::default();
        let (a, b) = (site("A"), site("B"));

        let first = db.execute(Transact).await.expect("transaction starts");
        let second = db.execute(Transact).await.expect("transaction starts");
        first.execute(Insert(a.clone())).await.expect("insert succeeds");
        second.execute(Insert(b.clone())).await.expect("insert succeeds");
        first.execute(Commit).await.expect("commit succeeds");
        second.execute(Commit).await.expect("commit succeeds");

        assert_eq!(select(&db, a.id).await.map(|s| s.name), Some(a.name));
        assert_eq!(select(&db, b.id).await.map(|s| s.name), Some(b.name));
    }

    #[tokio::test]
    async fn uncommitted_transaction_is_discarded() {
        let db = Memory::default();
        let a = site("A");

        let tx = db.execute(Transact).await.expect("transaction starts");
        tx.execute(Insert(a.clone())).await.expect("insert succeeds");
        assert!(select(&tx, a.id).await.is_some());
        assert!(select(&db, a.id).await.is_none());
        drop(tx);

        assert!(select(&db, a.id).await.is_none());
    }
}
