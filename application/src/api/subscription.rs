//! GraphQL [`Subscription`]s definitions.

use futures::stream::{self, BoxStream, StreamExt as _};
use juniper::graphql_subscription;
use service::domain::block;
use tokio::sync::broadcast::error::RecvError;

use crate::{api, Context, Error};

/// Root of all GraphQL subscriptions.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

#[graphql_subscription(context = Context)]
impl Subscription {
    /// Subscription to the saves of the specified `Block`'s structure.
    ///
    /// Emits every `BlockStructure` saved after subscribing. A slow
    /// subscriber may miss intermediate versions, but always receives the
    /// latest one saved after them.
    pub async fn block_structure_saved(
        &self,
        block_id: api::block::Id,
        ctx: &Context,
    ) -> Result<
        BoxStream<'static, Result<api::structure::Document, Error>>,
        Error,
    > {
        let block_id: block::Id = block_id.into();
        let rx = ctx.service().subscribe_saved_structures();

        Ok(stream::unfold(rx, move |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(doc) if doc.block_id == block_id => {
                        return Some((Ok(doc.into()), rx));
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(missed)) => {
                        tracing::debug!(
                            block.id = %block_id,
                            missed,
                            "`BlockStructure` subscriber lagged",
                        );
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
        .boxed())
    }
}
