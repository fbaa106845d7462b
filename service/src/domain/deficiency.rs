//! [`Deficiency`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{block, structure::apartment};
#[cfg(doc)]
use crate::domain::{structure::Apartment, Block};

/// Punch-list record ("eksiklik") about an [`Apartment`] of a [`Block`].
///
/// Stored separately from the [`Block`]'s structure, so removing the
/// [`Apartment`] from it leaves the [`Deficiency`] orphaned rather than
/// deleted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deficiency {
    /// ID of this [`Deficiency`].
    pub id: Id,

    /// ID of the [`Block`] this [`Deficiency`] belongs to.
    pub block_id: block::Id,

    /// ID of the [`Apartment`] this [`Deficiency`] is about.
    pub apartment_id: apartment::Id,

    /// [`apartment::Number`] of the [`Apartment`] at the moment this
    /// [`Deficiency`] was recorded.
    pub apartment_no: apartment::Number,

    /// [`Description`] of this [`Deficiency`].
    pub description: Description,

    /// [`Status`] of this [`Deficiency`].
    pub status: Status,

    /// [`Priority`] of this [`Deficiency`].
    pub priority: Priority,

    /// [`Subcontractor`] responsible for fixing this [`Deficiency`], if any.
    pub subcontractor: Option<Subcontractor>,

    /// [`Category`] of this [`Deficiency`], if any.
    pub category: Option<Category>,

    /// Attached [`Image`]s.
    pub images: Vec<Image>,

    /// [`DateTime`] when this [`Deficiency`] was recorded.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Deficiency`] was last updated.
    pub updated_at: ModificationDateTime,
}

/// ID of a [`Deficiency`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Description of a [`Deficiency`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Maximum length of a [`Description`].
    pub const MAX_LEN: usize = 4096;

    /// Creates a new [`Description`] if the given `desc` is valid.
    #[must_use]
    pub fn new(desc: impl Into<String>) -> Option<Self> {
        let desc = desc.into();
        Self::check(&desc).then_some(Self(desc))
    }

    /// Checks whether the given `desc` is a valid [`Description`].
    fn check(desc: impl AsRef<str>) -> bool {
        let desc = desc.as_ref();
        !desc.trim().is_empty() && desc.len() <= Self::MAX_LEN
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Name of a subcontractor ("taşeron") responsible for a [`Deficiency`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Subcontractor(String);

impl Subcontractor {
    /// Creates a new [`Subcontractor`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Subcontractor`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Subcontractor {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Subcontractor`")
    }
}

/// Category (trade) of a [`Deficiency`], like `Elektrik` or `Boya`.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Category(String);

impl Category {
    /// Creates a new [`Category`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Category`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 64
    }
}

impl FromStr for Category {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Category`")
    }
}

/// Image attached to a [`Deficiency`], as a `data:image/...;base64,...`
/// [data URL].
///
/// Images are expected to be compressed by the client already.
///
/// [data URL]: https://datatracker.ietf.org/doc/html/rfc2397
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Image(String);

impl Image {
    /// Maximum size of an [`Image`] data URL, in bytes.
    pub const MAX_LEN: usize = 2 * 1024 * 1024;

    /// Creates a new [`Image`] if the given data `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Returns the media type of this [`Image`], like `image/jpeg`.
    #[must_use]
    pub fn media_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|s| s.split_once(";base64,"))
            .map_or("", |(ty, _)| ty)
    }

    /// Checks whether the given `url` is a valid [`Image`].
    fn check(url: impl AsRef<str>) -> bool {
        let url = url.as_ref();
        url.len() <= Self::MAX_LEN
            && url
                .strip_prefix("data:image/")
                .and_then(|s| s.split_once(";base64,"))
                .is_some_and(|(ty, data)| !ty.is_empty() && !data.is_empty())
    }
}

impl FromStr for Image {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Image`")
    }
}

define_kind! {
    #[doc = "Status of a [`Deficiency`]."]
    enum Status {
        #[doc = "Recorded, but not started yet."]
        #[code = "YENI"]
        New,

        #[doc = "Being fixed."]
        #[code = "DEVAM_EDIYOR"]
        InProgress,

        #[doc = "Fixed."]
        #[code = "TAMAMLANDI"]
        Done,

        #[doc = "Put on hold."]
        #[code = "BEKLEMEDE"]
        OnHold,

        #[doc = "Cancelled."]
        #[code = "IPTAL"]
        Cancelled,
    }
}

define_kind! {
    #[doc = "Priority of a [`Deficiency`]."]
    enum Priority {
        #[doc = "Low priority."]
        #[code = "DUSUK"]
        Low,

        #[doc = "Normal priority."]
        #[code = "NORMAL"]
        Normal,

        #[doc = "High priority."]
        #[code = "YUKSEK"]
        High,

        #[doc = "Critical, blocking the handover."]
        #[code = "KRITIK"]
        Critical,
    }
}

/// Counts of [`Deficiency`] records of a [`Block`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Total number of [`Deficiency`] records.
    pub total: usize,

    /// Number of [`Status::New`] ones.
    pub new: usize,

    /// Number of [`Status::InProgress`] ones.
    pub in_progress: usize,

    /// Number of [`Status::Done`] ones.
    pub done: usize,

    /// Number of [`Priority::Critical`] ones.
    pub critical: usize,
}

impl<'d> FromIterator<&'d Deficiency> for Stats {
    fn from_iter<I: IntoIterator<Item = &'d Deficiency>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut stats, d| {
            stats.total += 1;
            match d.status {
                Status::New => stats.new += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Done => stats.done += 1,
                Status::OnHold | Status::Cancelled => {}
            }
            if d.priority == Priority::Critical {
                stats.critical += 1;
            }
            stats
        })
    }
}

/// [`DateTime`] when a [`Deficiency`] was recorded.
pub type CreationDateTime = DateTimeOf<(Deficiency, unit::Creation)>;

/// [`DateTime`] when a [`Deficiency`] was modified.
pub type ModificationDateTime = DateTimeOf<(Deficiency, unit::Modification)>;

#[cfg(test)]
mod spec {
    use crate::domain::{block, structure::apartment};

    use super::{
        CreationDateTime, Deficiency, Description, Id, Image, Priority,
        Stats, Status,
    };

    fn deficiency(status: Status, priority: Priority) -> Deficiency {
        let now = CreationDateTime::now();
        Deficiency {
            id: Id::new(),
            block_id: block::Id::new(),
            apartment_id: apartment::Id::new(),
            apartment_no: "A101".into(),
            description: Description::new("Kapı kolu kırık")
                .expect("valid description"),
            status,
            priority,
            subcontractor: None,
            category: None,
            images: vec![],
            created_at: now,
            updated_at: now.coerce(),
        }
    }

    #[test]
    fn validates_images() {
        let jpeg = Image::new("data:image/jpeg;base64,/9j/4AAQ")
            .expect("valid image");
        assert_eq!(jpeg.media_type(), "image/jpeg");

        assert!(Image::new("data:image/png;base64,").is_none());
        assert!(Image::new("data:text/plain;base64,aGk=").is_none());
        assert!(Image::new("https://example.com/a.png").is_none());
    }

    #[test]
    fn validates_descriptions() {
        assert!(Description::new("Sıva çatlağı").is_some());
        assert!(Description::new("  ").is_none());
        assert!(Description::new("x".repeat(Description::MAX_LEN + 1))
            .is_none());
    }

    #[test]
    fn counts_stats() {
        let all = [
            deficiency(Status::New, Priority::Critical),
            deficiency(Status::New, Priority::Normal),
            deficiency(Status::InProgress, Priority::High),
            deficiency(Status::Done, Priority::Critical),
            deficiency(Status::OnHold, Priority::Critical),
            deficiency(Status::Cancelled, Priority::Low),
        ];

        let stats = all.iter().collect::<Stats>();

        assert_eq!(
            stats,
            Stats {
                total: 6,
                new: 2,
                in_progress: 1,
                done: 1,
                critical: 3,
            },
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(Status::InProgress.to_string(), "DEVAM_EDIYOR");
        assert_eq!("KRITIK".parse::<Priority>(), Ok(Priority::Critical));
        assert!("UNKNOWN".parse::<Status>().is_err());
    }
}
