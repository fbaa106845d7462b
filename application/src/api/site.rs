//! [`Site`]-related definitions.

use std::future;

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A construction site.
#[derive(Clone, Debug)]
pub struct Site {
    /// ID of this [`Site`].
    id: Id,

    /// Underlying [`domain::Site`].
    site: OnceCell<domain::Site>,
}

impl From<domain::Site> for Site {
    fn from(site: domain::Site) -> Self {
        Self {
            id: site.id.into(),
            site: OnceCell::new_with(Some(site)),
        }
    }
}

impl Site {
    /// Creates a new [`Site`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Site`] with the provided ID exists,
    /// otherwise accessing this [`Site`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            site: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Site`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Site`] doesn't exist.
    async fn site(&self, ctx: &Context) -> Result<&domain::Site, Error> {
        let id = self.id.into();
        self.site
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::site::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|s| {
                        future::ready(s.ok_or_else(|| {
                            api::query::SiteError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A construction site.
#[graphql_object(context = Context)]
impl Site {
    /// Unique identifier of this `Site`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Site.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Site`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Site.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.site(ctx).await?.name.clone().into())
    }

    /// `Block`s of this `Site`, ordered by their names.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Site.blocks",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn blocks(&self, ctx: &Context) -> Result<Vec<api::Block>, Error> {
        ctx.service()
            .execute(query::blocks::BySite::by(read::block::list::Selector {
                site_id: self.id.into(),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|blocks| blocks.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when this `Site` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Site.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.site(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Site`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::site::Id)]
#[into(domain::site::Id)]
#[graphql(name = "SiteId", transparent)]
pub struct Id(Uuid);

/// Name of a `Site`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "SiteName", with = scalar::Via::<domain::site::Name>)]
pub struct Name(domain::site::Name);
