//! [`Deficiency`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{deficiency, Deficiency},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `deficiencies` table read into a [`Deficiency`].
const COLUMNS: &str = "\
    id, block_id, apartment_id, apartment_no, \
    description, status, priority, subcontractor, category, images, \
    created_at, updated_at";

/// Builds a [`Deficiency`] out of the provided [`Row`] selected with
/// [`COLUMNS`].
fn from_row(row: &Row) -> Deficiency {
    Deficiency {
        id: row.get("id"),
        block_id: row.get("block_id"),
        apartment_id: row.get("apartment_id"),
        apartment_no: row.get("apartment_no"),
        description: row.get("description"),
        status: row.get("status"),
        priority: row.get("priority"),
        subcontractor: row.get("subcontractor"),
        category: row.get("category"),
        images: row.get("images"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Select<By<Option<Deficiency>, deficiency::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Deficiency>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Deficiency>, deficiency::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: deficiency::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM deficiencies \
             WHERE id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C>
    Database<Select<By<Vec<Deficiency>, read::deficiency::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Deficiency>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Deficiency>, read::deficiency::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::deficiency::list::Selector {
            block_id,
            filter:
                read::deficiency::list::Filter {
                    apartment_id,
                    status,
                    priority,
                },
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&block_id];
        let apartment_idx = apartment_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let priority_idx = priority.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM deficiencies \
             WHERE block_id = $1::UUID \
                   {apartment} \
                   {status} \
                   {priority} \
             ORDER BY created_at DESC, id ASC",
            apartment = apartment_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND apartment_id = ${idx}::UUID"))
            }),
            status = status_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND status = ${idx}::VARCHAR"))
            }),
            priority = priority_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND priority = ${idx}::VARCHAR"))
            }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Deficiency>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Deficiency>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(deficiency): Insert<Deficiency>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(deficiency))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Deficiency>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(deficiency): Update<Deficiency>,
    ) -> Result<Self::Ok, Self::Err> {
        let Deficiency {
            id,
            block_id,
            apartment_id,
            apartment_no,
            description,
            status,
            priority,
            subcontractor,
            category,
            images,
            created_at,
            updated_at,
        } = deficiency;

        const SQL: &str = "\
            INSERT INTO deficiencies (\
                id, block_id, apartment_id, apartment_no, \
                description, status, priority, subcontractor, category, \
                images, \
                created_at, updated_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::TEXT, \
                $5::TEXT, $6::VARCHAR, $7::VARCHAR, $8::VARCHAR, $9::VARCHAR, \
                $10::TEXT[], \
                $11::TIMESTAMPTZ, $12::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET description = EXCLUDED.description, \
                status = EXCLUDED.status, \
                priority = EXCLUDED.priority, \
                subcontractor = EXCLUDED.subcontractor, \
                category = EXCLUDED.category, \
                images = EXCLUDED.images, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &block_id,
                &apartment_id,
                &apartment_no,
                &description,
                &status,
                &priority,
                &subcontractor,
                &category,
                &images,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Deficiency, deficiency::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Deficiency, deficiency::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: deficiency::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM deficiencies \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Deficiency, deficiency::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Deficiency, deficiency::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: deficiency::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO deficiencies_lock (id) \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
