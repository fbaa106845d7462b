//! [`Document`]-related definitions.

use std::sync::Arc;

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::domain::{self, structure::Edit as DomainEdit};
use uuid::Uuid;

use crate::{api, api::scalar, define_error, Context};

/// Persisted structure of a `Block`.
#[derive(Clone, Debug, From)]
pub struct Document(Arc<domain::structure::Document>);

impl From<domain::structure::Document> for Document {
    fn from(doc: domain::structure::Document) -> Self {
        Self(Arc::new(doc))
    }
}

/// Persisted structure of a `Block`: its floors and their apartments.
#[graphql_object(name = "BlockStructure", context = Context)]
impl Document {
    /// `Block` this structure belongs to.
    #[must_use]
    pub fn block(&self) -> api::Block {
        #[expect(unsafe_code, reason = "`Document` is deleted with its `Block`")]
        let block = unsafe { api::Block::new_unchecked(self.0.block_id) };
        block
    }

    /// Version of this structure, to be passed back when editing it.
    #[must_use]
    pub fn version(&self) -> Version {
        self.0.version.into()
    }

    /// Floors of this structure, from the top to the bottom.
    ///
    /// Floor indices in `BlockStructureEdit`s refer to this order.
    #[must_use]
    pub fn floors(&self) -> Vec<Floor> {
        self.0
            .structure
            .floors
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, floor)| Floor { index: i, floor })
            .collect()
    }

    /// `DateTime` when this structure was saved.
    #[must_use]
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// Floor of a `Block`.
#[derive(Clone, Debug)]
pub struct Floor {
    /// Position of this [`Floor`] in its structure.
    index: usize,

    /// Underlying [`domain::structure::Floor`].
    floor: domain::structure::Floor,
}

/// Floor of a `Block`.
#[graphql_object(name = "Floor", context = Context)]
impl Floor {
    /// Position of this `Floor` in its `BlockStructure`, from the top.
    #[must_use]
    pub fn index(&self) -> i32 {
        i32::try_from(self.index).unwrap_or(i32::MAX)
    }

    /// Number of this `Floor`, like `3`, `0`, `B1` or `ARA1`.
    #[must_use]
    pub fn no(&self) -> String {
        self.floor.no.to_string()
    }

    /// Kind of this `Floor`.
    #[must_use]
    pub fn kind(&self) -> FloorKind {
        self.floor.kind.into()
    }

    /// Display name of this `Floor`, like `3. Kat`.
    #[must_use]
    pub fn name(&self) -> Option<FloorName> {
        self.floor.name.clone().map(Into::into)
    }

    /// Apartments on this `Floor`, in display order.
    #[must_use]
    pub fn apartments(&self) -> Vec<Apartment> {
        self.floor
            .apartments
            .iter()
            .cloned()
            .map(Apartment)
            .collect()
    }
}

/// Apartment (or another unit) on a `Floor`.
#[derive(Clone, Debug, From)]
pub struct Apartment(domain::structure::Apartment);

/// Apartment (or another unit) on a `Floor`.
#[graphql_object(name = "Apartment", context = Context)]
impl Apartment {
    /// Unique identifier of this `Apartment`, stable across renumbering.
    #[must_use]
    pub fn id(&self) -> ApartmentId {
        self.0.id.into()
    }

    /// Number of this `Apartment`, like `A101`.
    #[must_use]
    pub fn no(&self) -> String {
        self.0.no.to_string()
    }

    /// Kind of this `Apartment`.
    #[must_use]
    pub fn kind(&self) -> ApartmentKind {
        self.0.kind.into()
    }

    /// Optional display name of this `Apartment`.
    #[must_use]
    pub fn name(&self) -> Option<ApartmentName> {
        self.0.name.clone().map(Into::into)
    }
}

/// Version of a `BlockStructure`.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "BlockStructureVersion", with = scalar::Via::<i64>)]
pub struct Version(i64);

impl From<domain::structure::Version> for Version {
    fn from(v: domain::structure::Version) -> Self {
        Self(v.into())
    }
}

impl From<Version> for domain::structure::Version {
    fn from(v: Version) -> Self {
        v.0.into()
    }
}

/// Unique identifier of an `Apartment`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::structure::apartment::Id)]
#[into(domain::structure::apartment::Id)]
#[graphql(name = "ApartmentId", transparent)]
pub struct ApartmentId(Uuid);

/// Display name of a `Floor`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "FloorName",
    with = scalar::Via::<domain::structure::floor::Name>,
)]
pub struct FloorName(domain::structure::floor::Name);

/// Display name of an `Apartment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ApartmentName",
    with = scalar::Via::<domain::structure::apartment::Name>,
)]
pub struct ApartmentName(domain::structure::apartment::Name);

/// Kind of a `Floor`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum FloorKind {
    /// Regular floor above the ground floor.
    Normal,

    /// Ground floor. At most one per `Block`.
    Ground,

    /// Basement floor.
    Basement,

    /// Roof floor. At most one per `Block`.
    Roof,

    /// Mezzanine floor.
    Mezzanine,
}

impl From<domain::structure::floor::Kind> for FloorKind {
    fn from(kind: domain::structure::floor::Kind) -> Self {
        use domain::structure::floor::Kind as K;
        match kind {
            K::Normal => Self::Normal,
            K::Ground => Self::Ground,
            K::Basement => Self::Basement,
            K::Roof => Self::Roof,
            K::Mezzanine => Self::Mezzanine,
        }
    }
}

impl From<FloorKind> for domain::structure::floor::Kind {
    fn from(kind: FloorKind) -> Self {
        match kind {
            FloorKind::Normal => Self::Normal,
            FloorKind::Ground => Self::Ground,
            FloorKind::Basement => Self::Basement,
            FloorKind::Roof => Self::Roof,
            FloorKind::Mezzanine => Self::Mezzanine,
        }
    }
}

/// Kind of an `Apartment`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum ApartmentKind {
    /// Regular dwelling.
    Dwelling,

    /// Dwelling spanning two floors.
    Duplex,

    /// Dwelling with a terrace.
    Terrace,

    /// Ground dwelling with a garden.
    Garden,

    /// Common area (stairwell, shelter, technical room, etc.).
    CommonArea,
}

impl From<domain::structure::apartment::Kind> for ApartmentKind {
    fn from(kind: domain::structure::apartment::Kind) -> Self {
        use domain::structure::apartment::Kind as K;
        match kind {
            K::Dwelling => Self::Dwelling,
            K::Duplex => Self::Duplex,
            K::Terrace => Self::Terrace,
            K::Garden => Self::Garden,
            K::CommonArea => Self::CommonArea,
        }
    }
}

impl From<ApartmentKind> for domain::structure::apartment::Kind {
    fn from(kind: ApartmentKind) -> Self {
        match kind {
            ApartmentKind::Dwelling => Self::Dwelling,
            ApartmentKind::Duplex => Self::Duplex,
            ApartmentKind::Terrace => Self::Terrace,
            ApartmentKind::Garden => Self::Garden,
            ApartmentKind::CommonArea => Self::CommonArea,
        }
    }
}

/// Operation of a `BlockStructureEdit`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "BlockStructureEditOp")]
pub enum EditOp {
    /// Adds a new floor of `floorKind`, numbered after the existing ones.
    AddFloor,

    /// Removes the `floor` with all its apartments.
    RemoveFloor,

    /// Changes the kind of the `floor` to `floorKind`, renumbering it.
    ChangeFloorKind,

    /// Overrides the number of the `floor` with `floorNo`.
    ChangeFloorNumber,

    /// Overrides the name of the `floor` with `floorName`, or removes it.
    ChangeFloorName,

    /// Adds a new apartment to the `floor`.
    AddApartment,

    /// Removes the `apartment` from the `floor`.
    RemoveApartment,

    /// Overrides the number of the `apartment` with `apartmentNo`.
    RenameApartment,

    /// Sets the kind of the `apartment` to `apartmentKind`.
    SetApartmentKind,

    /// Sets the name of the `apartment` to `apartmentName`, or removes it.
    SetApartmentName,
}

/// Single edit of a `BlockStructure`.
///
/// Only the arguments of the `op` are read, the rest are ignored.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "BlockStructureEdit")]
pub struct Edit {
    /// Operation to perform.
    pub op: EditOp,

    /// Index of the floor, from the top.
    pub floor: Option<i32>,

    /// Position of the apartment on the floor.
    pub apartment: Option<i32>,

    /// Kind of the floor.
    pub floor_kind: Option<FloorKind>,

    /// Number of the floor.
    pub floor_no: Option<String>,

    /// Name of the floor.
    pub floor_name: Option<FloorName>,

    /// Number of the apartment.
    pub apartment_no: Option<String>,

    /// Kind of the apartment.
    pub apartment_kind: Option<ApartmentKind>,

    /// Name of the apartment.
    pub apartment_name: Option<ApartmentName>,
}

impl TryFrom<Edit> for DomainEdit {
    type Error = EditError;

    fn try_from(edit: Edit) -> Result<Self, Self::Error> {
        use domain::structure::floor;

        fn index(i: Option<i32>) -> Result<usize, EditError> {
            i.and_then(|i| usize::try_from(i).ok())
                .ok_or(EditError::InvalidArguments)
        }

        let Edit {
            op,
            floor,
            apartment,
            floor_kind,
            floor_no,
            floor_name,
            apartment_no,
            apartment_kind,
            apartment_name,
        } = edit;

        Ok(match op {
            EditOp::AddFloor => Self::AddFloor(
                floor_kind.ok_or(EditError::InvalidArguments)?.into(),
            ),
            EditOp::RemoveFloor => Self::RemoveFloor {
                floor: index(floor)?,
            },
            EditOp::ChangeFloorKind => Self::ChangeFloor {
                floor: index(floor)?,
                change: floor::Change::Kind(
                    floor_kind.ok_or(EditError::InvalidArguments)?.into(),
                ),
            },
            EditOp::ChangeFloorNumber => Self::ChangeFloor {
                floor: index(floor)?,
                change: floor::Change::Number(
                    floor_no
                        .as_deref()
                        .ok_or(EditError::InvalidArguments)?
                        .into(),
                ),
            },
            EditOp::ChangeFloorName => Self::ChangeFloor {
                floor: index(floor)?,
                change: floor::Change::Name(floor_name.map(Into::into)),
            },
            EditOp::AddApartment => Self::AddApartment {
                floor: index(floor)?,
            },
            EditOp::RemoveApartment => Self::RemoveApartment {
                floor: index(floor)?,
                apartment: index(apartment)?,
            },
            EditOp::RenameApartment => Self::RenameApartment {
                floor: index(floor)?,
                apartment: index(apartment)?,
                no: apartment_no
                    .as_deref()
                    .ok_or(EditError::InvalidArguments)?
                    .into(),
            },
            EditOp::SetApartmentKind => Self::SetApartmentKind {
                floor: index(floor)?,
                apartment: index(apartment)?,
                kind: apartment_kind
                    .ok_or(EditError::InvalidArguments)?
                    .into(),
            },
            EditOp::SetApartmentName => Self::SetApartmentName {
                floor: index(floor)?,
                apartment: index(apartment)?,
                name: apartment_name.map(Into::into),
            },
        })
    }
}

/// Result of a `BlockStructure` editing.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "BlockStructureEditResult", context = Context)]
pub struct EditResult {
    /// Saved `BlockStructure`.
    pub structure: Document,

    /// Whether each of the provided `BlockStructureEdit`s changed anything,
    /// in the same order.
    ///
    /// Rejected edits (like a second ground floor or an out-of-range index)
    /// are skipped.
    pub applied: Vec<bool>,
}

define_error! {
    enum EditError {
        #[code = "INVALID_STRUCTURE_EDIT"]
        #[status = BAD_REQUEST]
        #[message = "`BlockStructureEdit` misses the arguments of its `op`"]
        InvalidArguments,
    }
}
