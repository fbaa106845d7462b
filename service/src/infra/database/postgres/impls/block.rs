//! [`Block`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{block, Block},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `blocks` table read into a [`Block`].
const COLUMNS: &str = "id, site_id, name, status, created_at, deleted_at";

/// Builds a [`Block`] out of the provided [`Row`] selected with [`COLUMNS`].
fn from_row(row: &Row) -> Block {
    Block {
        id: row.get("id"),
        site_id: row.get("site_id"),
        name: row.get("name"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        deleted_at: row.get("deleted_at"),
    }
}

impl<C> Database<Select<By<Option<Block>, block::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Block>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Block>, block::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: block::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM blocks \
             WHERE id = $1::UUID \
               AND deleted_at IS NULL",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Block>, read::block::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Block>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Block>, read::block::list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::block::list::Selector { site_id } = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM blocks \
             WHERE site_id = $1::UUID \
               AND deleted_at IS NULL \
             ORDER BY name ASC",
        );
        Ok(self
            .query(&sql, &[&site_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Block>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Block>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(block): Insert<Block>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(block)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Block>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(block): Update<Block>,
    ) -> Result<Self::Ok, Self::Err> {
        let Block {
            id,
            site_id,
            name,
            status,
            created_at,
            deleted_at,
        } = block;

        const SQL: &str = "\
            INSERT INTO blocks (\
                id, site_id, name, status, created_at, deleted_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, \
                $5::TIMESTAMPTZ, $6::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                status = EXCLUDED.status, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[&id, &site_id, &name, &status, &created_at, &deleted_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
