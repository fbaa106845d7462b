//! [`Block`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::site;
#[cfg(doc)]
use crate::domain::{structure::Structure, Site};

/// Building or building wing ("blok") of a [`Site`].
///
/// Floors and apartments of a [`Block`] live in its [`Structure`] document.
#[derive(Clone, Debug)]
pub struct Block {
    /// ID of this [`Block`].
    pub id: Id,

    /// ID of the [`Site`] this [`Block`] belongs to.
    pub site_id: site::Id,

    /// [`Name`] of this [`Block`].
    pub name: Name,

    /// [`Status`] of this [`Block`].
    pub status: Status,

    /// [`DateTime`] when this [`Block`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Block`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

/// ID of a [`Block`].
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

/// Name of a [`Block`].
///
/// Prefixes the numbers of the apartments in the [`Block`], so it may not
/// contain whitespace.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        !name.is_empty()
            && name.chars().count() <= 32
            && !name.chars().any(char::is_whitespace)
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

define_kind! {
    #[doc = "Status of a [`Block`]."]
    enum Status {
        #[doc = "Construction of the [`Block`] is in progress."]
        #[code = "ACTIVE"]
        Active,

        #[doc = "Construction of the [`Block`] is suspended or finished."]
        #[code = "PASSIVE"]
        Passive,
    }
}

/// [`DateTime`] when a [`Block`] was created.
pub type CreationDateTime = DateTimeOf<(Block, unit::Creation)>;

/// [`DateTime`] when a [`Block`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Block, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use super::{Name, Status};

    #[test]
    fn name_rejects_whitespace_and_empty() {
        assert!(Name::new("A").is_some());
        assert!(Name::new("B-2").is_some());
        assert!(Name::new("").is_none());
        assert!(Name::new(" A").is_none());
        assert!(Name::new("A B").is_none());
    }

    #[test]
    fn status_codes() {
        assert_eq!(Status::Active.to_string(), "ACTIVE");
        assert_eq!("PASSIVE".parse::<Status>(), Ok(Status::Passive));
    }
}
