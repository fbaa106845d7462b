//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Site` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SITE_NOT_EXISTS` - the `Site` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "site",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn site(
        id: api::site::Id,
        ctx: &Context,
    ) -> Result<api::Site, Error> {
        ctx.service()
            .execute(query::site::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| Error::from(SiteError::NotExists))
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Block` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BLOCK_NOT_EXISTS` - the `Block` with the specified ID does not exist
    ///                        or is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "block",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn block(
        id: api::block::Id,
        ctx: &Context,
    ) -> Result<api::Block, Error> {
        ctx.service()
            .execute(query::block::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| Error::from(BlockError::NotExists))
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Block`s of the specified `Site`, ordered by their names.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "blocks",
            otel.name = Self::SPAN_NAME,
            site_id = %site_id,
        ),
    )]
    pub async fn blocks(
        site_id: api::site::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Block>, Error> {
        ctx.service()
            .execute(query::blocks::BySite::by(read::block::list::Selector {
                site_id: site_id.into(),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|blocks| blocks.into_iter().map(Into::into).collect())
    }

    /// Returns the persisted structure of the specified `Block`.
    ///
    /// `null` if no structure was saved for the `Block` yet.
    #[tracing::instrument(
        skip_all,
        fields(
            block_id = %block_id,
            gql.name = "blockStructure",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn block_structure(
        block_id: api::block::Id,
        ctx: &Context,
    ) -> Result<Option<api::structure::Document>, Error> {
        ctx.service()
            .execute(query::structure::ByBlock::by(block_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|doc| doc.map(Into::into))
    }

    /// Returns the `Deficiency` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEFICIENCY_NOT_EXISTS` - the `Deficiency` with the specified ID
    ///                             does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deficiency",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn deficiency(
        id: api::deficiency::Id,
        ctx: &Context,
    ) -> Result<api::Deficiency, Error> {
        ctx.service()
            .execute(query::deficiency::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| Error::from(DeficiencyError::NotExists))
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Deficiency` records of the specified `Block`, from the
    /// newest to the oldest.
    #[tracing::instrument(
        skip_all,
        fields(
            block_id = %block_id,
            filter = ?filter,
            gql.name = "deficiencies",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn deficiencies(
        block_id: api::block::Id,
        filter: Option<api::deficiency::Filter>,
        ctx: &Context,
    ) -> Result<Vec<api::Deficiency>, Error> {
        ctx.service()
            .execute(query::deficiencies::List::by(
                read::deficiency::list::Selector {
                    block_id: block_id.into(),
                    filter: filter.unwrap_or_default().into(),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }

    /// Counts the `Deficiency` records of the specified `Block`.
    #[tracing::instrument(
        skip_all,
        fields(
            block_id = %block_id,
            gql.name = "deficiencyStats",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn deficiency_stats(
        block_id: api::block::Id,
        ctx: &Context,
    ) -> Result<api::deficiency::Stats, Error> {
        ctx.service()
            .execute(query::deficiencies::Stats {
                block_id: block_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Deficiency` records of the specified `Block` whose
    /// `Apartment` is no longer present in its persisted structure.
    #[tracing::instrument(
        skip_all,
        fields(
            block_id = %block_id,
            gql.name = "orphanedDeficiencies",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn orphaned_deficiencies(
        block_id: api::block::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Deficiency>, Error> {
        ctx.service()
            .execute(query::deficiencies::Orphaned {
                block_id: block_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }
}

define_error! {
    enum SiteError {
        #[code = "SITE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Site` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum BlockError {
        #[code = "BLOCK_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Block` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum DeficiencyError {
        #[code = "DEFICIENCY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Deficiency` with the specified ID does not exist"]
        NotExists,
    }
}
