//! [`Deficiency`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::{domain, read};
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// Construction defect ("eksik") recorded against an apartment.
#[derive(Clone, Debug, From)]
pub struct Deficiency(domain::Deficiency);

/// Construction defect recorded against an `Apartment`.
#[graphql_object(context = Context)]
impl Deficiency {
    /// Unique identifier of this `Deficiency`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Block` this `Deficiency` was recorded in.
    ///
    /// Resolving its fields fails with `BLOCK_NOT_EXISTS` once the `Block` is
    /// deleted.
    #[must_use]
    pub fn block(&self) -> api::Block {
        #[expect(unsafe_code, reason = "`Block`s are deleted softly")]
        let block = unsafe { api::Block::new_unchecked(self.0.block_id) };
        block
    }

    /// ID of the `Apartment` this `Deficiency` is about.
    ///
    /// The `Apartment` may be already removed from the `BlockStructure`.
    #[must_use]
    pub fn apartment_id(&self) -> api::structure::ApartmentId {
        self.0.apartment_id.into()
    }

    /// Number of the `Apartment` at the moment this `Deficiency` was recorded.
    #[must_use]
    pub fn apartment_no(&self) -> String {
        self.0.apartment_no.to_string()
    }

    /// Description of this `Deficiency`.
    #[must_use]
    pub fn description(&self) -> Description {
        self.0.description.clone().into()
    }

    /// Status of this `Deficiency`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Priority of this `Deficiency`.
    #[must_use]
    pub fn priority(&self) -> Priority {
        self.0.priority.into()
    }

    /// Subcontractor responsible for fixing this `Deficiency`.
    #[must_use]
    pub fn subcontractor(&self) -> Option<Subcontractor> {
        self.0.subcontractor.clone().map(Into::into)
    }

    /// Category of this `Deficiency`.
    #[must_use]
    pub fn category(&self) -> Option<Category> {
        self.0.category.clone().map(Into::into)
    }

    /// Images attached to this `Deficiency`.
    #[must_use]
    pub fn images(&self) -> Vec<Image> {
        self.0.images.iter().cloned().map(Into::into).collect()
    }

    /// `DateTime` when this `Deficiency` was recorded.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Deficiency` was last modified.
    #[must_use]
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// Unique identifier of a `Deficiency`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::deficiency::Id)]
#[into(domain::deficiency::Id)]
#[graphql(name = "DeficiencyId", transparent)]
pub struct Id(Uuid);

/// Description of a `Deficiency`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DeficiencyDescription",
    with = scalar::Via::<domain::deficiency::Description>,
)]
pub struct Description(domain::deficiency::Description);

/// Subcontractor responsible for a `Deficiency`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DeficiencySubcontractor",
    with = scalar::Via::<domain::deficiency::Subcontractor>,
)]
pub struct Subcontractor(domain::deficiency::Subcontractor);

/// Category of a `Deficiency`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DeficiencyCategory",
    with = scalar::Via::<domain::deficiency::Category>,
)]
pub struct Category(domain::deficiency::Category);

/// Image attached to a `Deficiency`, as a `data:image/*;base64,` URL.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DeficiencyImage",
    with = scalar::Via::<domain::deficiency::Image>,
)]
pub struct Image(domain::deficiency::Image);

/// Status of a `Deficiency`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "DeficiencyStatus")]
pub enum Status {
    /// Recorded, but not started yet.
    New,

    /// Being fixed.
    InProgress,

    /// Fixed.
    Done,

    /// Put on hold.
    OnHold,

    /// Cancelled.
    Cancelled,
}

impl From<domain::deficiency::Status> for Status {
    fn from(status: domain::deficiency::Status) -> Self {
        use domain::deficiency::Status as S;
        match status {
            S::New => Self::New,
            S::InProgress => Self::InProgress,
            S::Done => Self::Done,
            S::OnHold => Self::OnHold,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::deficiency::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::New => Self::New,
            Status::InProgress => Self::InProgress,
            Status::Done => Self::Done,
            Status::OnHold => Self::OnHold,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

/// Priority of a `Deficiency`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "DeficiencyPriority")]
pub enum Priority {
    /// Low priority.
    Low,

    /// Normal priority.
    Normal,

    /// High priority.
    High,

    /// Critical, blocking the handover.
    Critical,
}

impl From<domain::deficiency::Priority> for Priority {
    fn from(priority: domain::deficiency::Priority) -> Self {
        use domain::deficiency::Priority as P;
        match priority {
            P::Low => Self::Low,
            P::Normal => Self::Normal,
            P::High => Self::High,
            P::Critical => Self::Critical,
        }
    }
}

impl From<Priority> for domain::deficiency::Priority {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Low => Self::Low,
            Priority::Normal => Self::Normal,
            Priority::High => Self::High,
            Priority::Critical => Self::Critical,
        }
    }
}

/// Filter of the `Deficiency` list.
#[derive(Clone, Copy, Debug, Default, GraphQLInputObject)]
#[graphql(name = "DeficiencyFilter")]
pub struct Filter {
    /// Only `Deficiency` records about this `Apartment`.
    pub apartment_id: Option<api::structure::ApartmentId>,

    /// Only `Deficiency` records with this status.
    pub status: Option<Status>,

    /// Only `Deficiency` records with this priority.
    pub priority: Option<Priority>,
}

impl From<Filter> for read::deficiency::list::Filter {
    fn from(filter: Filter) -> Self {
        let Filter {
            apartment_id,
            status,
            priority,
        } = filter;
        Self {
            apartment_id: apartment_id.map(Into::into),
            status: status.map(Into::into),
            priority: priority.map(Into::into),
        }
    }
}

/// Counts of the `Deficiency` records of a `Block`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "DeficiencyStats")]
pub struct Stats {
    /// Total number of the `Deficiency` records.
    pub total: i32,

    /// Number of the `NEW` `Deficiency` records.
    pub new: i32,

    /// Number of the `IN_PROGRESS` `Deficiency` records.
    pub in_progress: i32,

    /// Number of the `DONE` `Deficiency` records.
    pub done: i32,

    /// Number of the `CRITICAL` `Deficiency` records, in any status.
    pub critical: i32,
}

impl From<domain::deficiency::Stats> for Stats {
    fn from(stats: domain::deficiency::Stats) -> Self {
        let domain::deficiency::Stats {
            total,
            new,
            in_progress,
            done,
            critical,
        } = stats;
        let count = |n: usize| i32::try_from(n).unwrap_or(i32::MAX);
        Self {
            total: count(total),
            new: count(new),
            in_progress: count(in_progress),
            done: count(done),
            critical: count(critical),
        }
    }
}
