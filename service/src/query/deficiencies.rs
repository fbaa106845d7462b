//! [`Query`] collection related to the multiple [`Deficiency`] records.

use std::collections::HashSet;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{block, deficiency, structure, Deficiency},
    infra::{database, Database},
    read,
    Service,
};
#[cfg(doc)]
use crate::domain::{structure::Apartment, Block};

use super::{DatabaseQuery, Query};

/// Queries the [`Deficiency`] records of a [`Block`], optionally filtered.
pub type List =
    DatabaseQuery<By<Vec<Deficiency>, read::deficiency::list::Selector>>;

/// [`Query`] counting [`deficiency::Stats`] of a [`Block`].
#[derive(Clone, Copy, Debug)]
pub struct Stats {
    /// ID of the [`Block`] to count [`Deficiency`] records of.
    pub block_id: block::Id,
}

impl<Db> Query<Stats> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Deficiency>, read::deficiency::list::Selector>>,
        Ok = Vec<Deficiency>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = deficiency::Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Stats { block_id }: Stats,
    ) -> Result<Self::Ok, Self::Err> {
        let all = self
            .database()
            .execute(Select(By::<Vec<Deficiency>, _>::new(
                read::deficiency::list::Selector {
                    block_id,
                    filter: read::deficiency::list::Filter::default(),
                },
            )))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(all.iter().collect())
    }
}

/// [`Query`] listing the [`Deficiency`] records of a [`Block`] whose
/// [`Apartment`] is no longer present in its persisted [`structure`].
#[derive(Clone, Copy, Debug)]
pub struct Orphaned {
    /// ID of the [`Block`] to check [`Deficiency`] records of.
    pub block_id: block::Id,
}

impl<Db> Query<Orphaned> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Deficiency>, read::deficiency::list::Selector>>,
            Ok = Vec<Deficiency>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<structure::Document>, block::Id>>,
            Ok = Option<structure::Document>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<Deficiency>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Orphaned { block_id }: Orphaned,
    ) -> Result<Self::Ok, Self::Err> {
        let document = self
            .database()
            .execute(Select(By::<Option<structure::Document>, _>::new(
                block_id,
            )))
            .await
            .map_err(tracerr::wrap!())?;
        let existing = document
            .iter()
            .flat_map(|d| d.structure.apartments())
            .map(|a| a.id)
            .collect::<HashSet<_>>();

        let all = self
            .database()
            .execute(Select(By::<Vec<Deficiency>, _>::new(
                read::deficiency::list::Selector {
                    block_id,
                    filter: read::deficiency::list::Filter::default(),
                },
            )))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(all
            .into_iter()
            .filter(|d| !existing.contains(&d.apartment_id))
            .collect())
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{
            CreateBlock, CreateDeficiency, CreateSite, SaveStructure,
            UpdateDeficiency,
        },
        domain::{
            block, deficiency, site,
            structure::{apartment, floor},
            Block,
        },
        infra::Memory,
        query, read, Command as _, Config, Query as _, Service,
    };

    use super::{Orphaned, Stats};

    /// Creates a [`Block`] with a single floor of two apartments.
    async fn setup() -> (Service<Memory>, Block, [apartment::Id; 2]) {
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
                name: block::Name::new("C").expect("valid block name"),
            })
            .await
            .expect("block is created");

        let mut draft = service
            .execute(query::structure::OpenDraft { block_id: block.id })
            .await
            .expect("query succeeds")
            .expect("block exists");
        _ = draft.add_floor(floor::Kind::Normal);
        let first = draft.add_apartment(0).expect("apartment is added");
        let second = draft.add_apartment(0).expect("apartment is added");
        _ = service
            .execute(SaveStructure::from(&draft))
            .await
            .expect("structure is saved");

        (service, block, [first, second])
    }

    async fn record(
        service: &Service<Memory>,
        block: &Block,
        apartment_id: apartment::Id,
        priority: deficiency::Priority,
    ) -> deficiency::Id {
        service
            .execute(CreateDeficiency {
                block_id: block.id,
                apartment_id,
                description: deficiency::Description::new("Kapı kolu kırık")
                    .expect("valid description"),
                priority,
                subcontractor: None,
                category: None,
                images: vec![],
            })
            .await
            .expect("deficiency is recorded")
            .id
    }

    #[tokio::test]
    async fn counts_stats() {
        use deficiency::{Priority as P, Status as S};

        let (service, block, [a, b]) = setup().await;

        let first = record(&service, &block, a, P::Critical).await;
        let second = record(&service, &block, a, P::Normal).await;
        _ = record(&service, &block, b, P::Critical).await;

        for (id, status) in [(first, S::Done), (second, S::InProgress)] {
            _ = service
                .execute(UpdateDeficiency {
                    deficiency_id: id,
                    status: Some(status),
                    ..UpdateDeficiency::default()
                })
                .await
                .expect("deficiency is updated");
        }

        let stats = service
            .execute(Stats { block_id: block.id })
            .await
            .expect("query succeeds");
        assert_eq!(
            stats,
            deficiency::Stats {
                total: 3,
                new: 1,
                in_progress: 1,
                done: 1,
                critical: 2,
            },
        );
    }

    #[tokio::test]
    async fn filters_list() {
        let (service, block, [a, b]) = setup().await;

        _ = record(&service, &block, a, deficiency::Priority::Low).await;
        let expected =
            record(&service, &block, b, deficiency::Priority::High).await;

        let found = service
            .execute(query::deficiencies::List::by(
                read::deficiency::list::Selector {
                    block_id: block.id,
                    filter: read::deficiency::list::Filter {
                        apartment_id: Some(b),
                        ..read::deficiency::list::Filter::default()
                    },
                },
            ))
            .await
            .expect("query succeeds");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, expected);
    }

    #[tokio::test]
    async fn reports_orphaned_after_apartment_removal() {
        let (service, block, [a, b]) = setup().await;

        let kept = record(&service, &block, a, deficiency::Priority::Low).await;
        let orphaned =
            record(&service, &block, b, deficiency::Priority::Low).await;

        let mut draft = service
            .execute(query::structure::OpenDraft { block_id: block.id })
            .await
            .expect("query succeeds")
            .expect("block exists");
        assert!(draft.remove_apartment(0, 1).is_some());
        _ = service
            .execute(SaveStructure::from(&draft))
            .await
            .expect("structure is saved");

        let found = service
            .execute(Orphaned { block_id: block.id })
            .await
            .expect("query succeeds");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, orphaned);
        assert_ne!(found[0].id, kept);
        assert_eq!(found[0].apartment_no, "C102");
    }
}
