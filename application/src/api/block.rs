//! [`Block`]-related definitions.

use std::future;

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A building (or a building wing) of a construction site.
#[derive(Clone, Debug)]
pub struct Block {
    /// ID of this [`Block`].
    id: Id,

    /// Underlying [`domain::Block`].
    block: OnceCell<domain::Block>,
}

impl From<domain::Block> for Block {
    fn from(block: domain::Block) -> Self {
        Self {
            id: block.id.into(),
            block: OnceCell::new_with(Some(block)),
        }
    }
}

impl Block {
    /// Creates a new [`Block`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Block`] with the provided ID exists,
    /// otherwise accessing this [`Block`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            block: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Block`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Block`] doesn't exist.
    async fn block(&self, ctx: &Context) -> Result<&domain::Block, Error> {
        let id = self.id.into();
        self.block
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::block::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|b| {
                        future::ready(b.ok_or_else(|| {
                            api::query::BlockError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A building (or a building wing) of a construction site.
#[graphql_object(context = Context)]
impl Block {
    /// Unique identifier of this `Block`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Block.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Site` this `Block` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Block.site",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn site(&self, ctx: &Context) -> Result<api::Site, Error> {
        let site_id = self.block(ctx).await?.site_id;

        #[expect(unsafe_code, reason = "`Block` always belongs to a `Site`")]
        let site = unsafe { api::Site::new_unchecked(site_id) };
        Ok(site)
    }

    /// Name of this `Block`, prefixing the numbers of its apartments.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Block.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.block(ctx).await?.name.clone().into())
    }

    /// Status of this `Block`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Block.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.block(ctx).await?.status.into())
    }

    /// Persisted structure of this `Block`.
    ///
    /// `null` if no structure was saved for this `Block` yet.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Block.structure",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn structure(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::structure::Document>, Error> {
        ctx.service()
            .execute(query::structure::ByBlock::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|doc| doc.map(Into::into))
    }

    /// `Deficiency` records of this `Block`, from the newest to the oldest.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Block.deficiencies",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn deficiencies(
        &self,
        filter: Option<api::deficiency::Filter>,
        ctx: &Context,
    ) -> Result<Vec<api::Deficiency>, Error> {
        api::Query::deficiencies(self.id, filter, ctx).await
    }

    /// `DateTime` when this `Block` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Block.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.block(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Block`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::block::Id)]
#[into(domain::block::Id)]
#[graphql(name = "BlockId", transparent)]
pub struct Id(Uuid);

/// Name of a `Block`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "BlockName", with = scalar::Via::<domain::block::Name>)]
pub struct Name(domain::block::Name);

/// Status of a `Block`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "BlockStatus")]
pub enum Status {
    /// Under construction or inspection.
    Active,

    /// Archived.
    Passive,
}

impl From<domain::block::Status> for Status {
    fn from(status: domain::block::Status) -> Self {
        use domain::block::Status as S;
        match status {
            S::Active => Self::Active,
            S::Passive => Self::Passive,
        }
    }
}
