//! GraphQL [`Mutation`]s definitions.

use juniper::{graphql_object, Nullable};
use service::{command, domain::deficiency, query, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new construction `Site`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createSite",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_site(
        name: api::site::Name,
        ctx: &Context,
    ) -> Result<api::Site, Error> {
        ctx.service()
            .execute(command::CreateSite { name: name.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Block` on the specified `Site`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SITE_NOT_EXISTS` - the `Site` with the specified ID does not exist;
    /// - `BLOCK_NAME_OCCUPIED` - the `Site` has another `Block` with the
    ///                           provided `BlockName`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createBlock",
            name = %name,
            otel.name = Self::SPAN_NAME,
            site_id = %site_id,
        ),
    )]
    pub async fn create_block(
        site_id: api::site::Id,
        name: api::block::Name,
        ctx: &Context,
    ) -> Result<api::Block, Error> {
        ctx.service()
            .execute(command::CreateBlock {
                site_id: site_id.into(),
                name: name.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the specified `Block` along with its structure.
    ///
    /// `Deficiency` records of the `Block` are kept.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BLOCK_NOT_EXISTS` - the `Block` with the specified ID does not exist
    ///                        or is deleted already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteBlock",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_block(
        id: api::block::Id,
        ctx: &Context,
    ) -> Result<api::Block, Error> {
        ctx.service()
            .execute(command::DeleteBlock { block_id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Applies the provided `BlockStructureEdit`s to the structure of the
    /// specified `Block` and saves the result.
    ///
    /// Edits are applied in the provided order, on top of the structure of
    /// the `expectedVersion` (`0` for a `Block` without a saved structure).
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BLOCK_NOT_EXISTS` - the `Block` with the specified ID does not
    ///                        exist;
    /// - `INVALID_STRUCTURE_EDIT` - a `BlockStructureEdit` misses the
    ///                              arguments of its `op`;
    /// - `STRUCTURE_VERSION_CONFLICT` - the structure was saved by someone
    ///                                  else since the `expectedVersion`;
    /// - `EMPTY_APARTMENT_NUMBER` - an `Apartment` is left without a number.
    #[tracing::instrument(
        skip_all,
        fields(
            block_id = %block_id,
            edits = edits.len(),
            expected_version = %expected_version,
            gql.name = "editBlockStructure",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn edit_block_structure(
        block_id: api::block::Id,
        expected_version: api::structure::Version,
        edits: Vec<api::structure::Edit>,
        ctx: &Context,
    ) -> Result<api::structure::EditResult, Error> {
        let edits = edits
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, api::structure::EditError>>()
            .map_err(Error::from)
            .map_err(ctx.error())?;

        let mut draft = ctx
            .service()
            .execute(query::structure::OpenDraft {
                block_id: block_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| Error::from(api::query::BlockError::NotExists))
            .map_err(ctx.error())?;
        draft.rebase(expected_version.into());

        let applied = edits.into_iter().map(|e| draft.apply(e)).collect();

        ctx.service()
            .execute(command::SaveStructure::from(&draft))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|doc| api::structure::EditResult {
                structure: doc.into(),
                applied,
            })
    }

    /// Records a new `Deficiency` about the specified `Apartment`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `APARTMENT_NOT_EXISTS` - the `Apartment` is not present in the saved
    ///                            structure of the `Block`.
    #[tracing::instrument(
        skip_all,
        fields(
            apartment_id = %apartment_id,
            block_id = %block_id,
            gql.name = "createDeficiency",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_deficiency(
        block_id: api::block::Id,
        apartment_id: api::structure::ApartmentId,
        description: api::deficiency::Description,
        priority: Option<api::deficiency::Priority>,
        subcontractor: Option<api::deficiency::Subcontractor>,
        category: Option<api::deficiency::Category>,
        images: Option<Vec<api::deficiency::Image>>,
        ctx: &Context,
    ) -> Result<api::Deficiency, Error> {
        ctx.service()
            .execute(command::CreateDeficiency {
                block_id: block_id.into(),
                apartment_id: apartment_id.into(),
                description: description.into(),
                priority: priority
                    .map_or(deficiency::Priority::Normal, Into::into),
                subcontractor: subcontractor.map(Into::into),
                category: category.map(Into::into),
                images: images
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the specified `Deficiency`.
    ///
    /// Omitted arguments are left unchanged, while an explicit `null` removes
    /// the optional values.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEFICIENCY_NOT_EXISTS` - the `Deficiency` with the specified ID does
    ///                             not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateDeficiency",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_deficiency(
        id: api::deficiency::Id,
        description: Option<api::deficiency::Description>,
        status: Option<api::deficiency::Status>,
        priority: Option<api::deficiency::Priority>,
        subcontractor: Nullable<api::deficiency::Subcontractor>,
        category: Nullable<api::deficiency::Category>,
        images: Option<Vec<api::deficiency::Image>>,
        ctx: &Context,
    ) -> Result<api::Deficiency, Error> {
        ctx.service()
            .execute(command::UpdateDeficiency {
                deficiency_id: id.into(),
                description: description.map(Into::into),
                status: status.map(Into::into),
                priority: priority.map(Into::into),
                subcontractor: subcontractor
                    .explicit()
                    .map(|s| s.map(Into::into)),
                category: category.explicit().map(|c| c.map(Into::into)),
                images: images
                    .map(|imgs| imgs.into_iter().map(Into::into).collect()),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the specified `Deficiency`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEFICIENCY_NOT_EXISTS` - the `Deficiency` with the specified ID does
    ///                             not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteDeficiency",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_deficiency(
        id: api::deficiency::Id,
        ctx: &Context,
    ) -> Result<api::Deficiency, Error> {
        ctx.service()
            .execute(command::DeleteDeficiency {
                deficiency_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for command::create_block::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BLOCK_NAME_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`BlockName` is occupied by another `Block` of \
                             the `Site`"]
                NameOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SiteNotExists(_) => {
                Some(api::query::SiteError::NotExists.into())
            }
            Self::NameOccupied(_) => Some(Error::NameOccupied.into()),
        }
    }
}

impl AsError for command::delete_block::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::BlockNotExists(_) => {
                Some(api::query::BlockError::NotExists.into())
            }
        }
    }
}

impl AsError for command::save_structure::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "STRUCTURE_VERSION_CONFLICT"]
                #[status = CONFLICT]
                #[message = "`BlockStructure` was saved by someone else, \
                             reload it and retry"]
                VersionConflict,

                #[code = "EMPTY_APARTMENT_NUMBER"]
                #[status = BAD_REQUEST]
                #[message = "Every `Apartment` must have a number"]
                EmptyApartmentNumber,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::BlockNotExists(_) => {
                Some(api::query::BlockError::NotExists.into())
            }
            Self::VersionConflict { .. } => {
                Some(Error::VersionConflict.into())
            }
            Self::Invalid(e) => Some(
                crate::Error::from(Error::EmptyApartmentNumber)
                    .with_message(e.to_string()),
            ),
        }
    }
}

impl AsError for command::create_deficiency::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "APARTMENT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Apartment` is not present in the saved \
                             `BlockStructure`"]
                ApartmentNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ApartmentNotExists(_) => {
                Some(Error::ApartmentNotExists.into())
            }
        }
    }
}

impl AsError for command::update_deficiency::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DeficiencyNotExists(_) => {
                Some(api::query::DeficiencyError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_deficiency::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DeficiencyNotExists(_) => {
                Some(api::query::DeficiencyError::NotExists.into())
            }
        }
    }
}
