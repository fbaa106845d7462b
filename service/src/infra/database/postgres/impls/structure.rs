//! [`Structure`]-related [`Database`] implementations.

use common::operations::{By, Delete, Lock, Select, Update};
use postgres_types::Json;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Block, Structure};
use crate::{
    domain::{block, structure},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Option<structure::Document>, block::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<structure::Document>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<structure::Document>, block::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let block_id: block::Id = by.into_inner();

        const SQL: &str = "\
            SELECT block_id, site_id, structure, version, updated_at \
            FROM block_structures \
            WHERE block_id = $1::UUID";
        let Some(row) = self
            .query_opt(SQL, &[&block_id])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let structure = row
            .try_get::<_, Json<structure::Structure>>("structure")
            .map_err(tracerr::from_and_wrap!(=> database::postgres::Error))
            .map_err(tracerr::map_from)?
            .0;
        Ok(Some(structure::Document {
            block_id: row.get("block_id"),
            site_id: row.get("site_id"),
            structure,
            version: row.get("version"),
            updated_at: row.get("updated_at"),
        }))
    }
}

impl<C> Database<Update<structure::Document>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(doc): Update<structure::Document>,
    ) -> Result<Self::Ok, Self::Err> {
        let structure::Document {
            block_id,
            site_id,
            structure,
            version,
            updated_at,
        } = doc;

        const SQL: &str = "\
            INSERT INTO block_structures (\
                block_id, site_id, structure, version, updated_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::JSONB, $4::INT8, $5::TIMESTAMPTZ\
            ) \
            ON CONFLICT (block_id) DO UPDATE \
            SET structure = EXCLUDED.structure, \
                version = EXCLUDED.version, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[&block_id, &site_id, &Json(&structure), &version, &updated_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<structure::Document, block::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<structure::Document, block::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let block_id: block::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM block_structures \
            WHERE block_id = $1::UUID";
        self.exec(SQL, &[&block_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

/// Serializes concurrent saves of the same [`Block`]'s [`Structure`] until the
/// end of the current transaction.
impl<C> Database<Lock<By<structure::Document, block::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<structure::Document, block::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let block_id: block::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO block_structures_lock (block_id) \
            VALUES ($1::UUID) \
            ON CONFLICT (block_id) DO UPDATE SET block_id = EXCLUDED.block_id";
        self.exec(SQL, &[&block_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
