//! [`Apartment`] definitions.

use std::fmt;

use common::define_kind;
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{block, structure::floor};
#[cfg(doc)]
use crate::domain::{structure::Floor, Block, Deficiency};

/// Unit ("daire") on a [`Floor`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Apartment {
    /// Stable ID of this [`Apartment`].
    ///
    /// Unlike the [`Number`], never changes, so [`Deficiency`] records
    /// reference it.
    pub id: Id,

    /// [`Number`] of this [`Apartment`].
    pub no: Number,

    /// [`Kind`] of this [`Apartment`].
    #[serde(rename = "tip")]
    pub kind: Kind,

    /// Optional display [`Name`] of this [`Apartment`].
    #[serde(default, rename = "isim", skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
}

/// ID of an [`Apartment`].
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

/// Number of an [`Apartment`], like `A101`.
///
/// Derived once on creation as `{block}{floor}{sequence}`, but may be
/// overridden afterwards with any free text, including an empty one. Emptiness
/// is only rejected when the structure is saved.
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(transparent)]
pub struct Number(String);

impl Number {
    /// Creates a new [`Number`] out of the given free text.
    #[must_use]
    pub fn new(no: impl Into<String>) -> Self {
        Self(no.into())
    }

    /// Derives a new [`Number`] for the `seq`uence position on the given
    /// [`floor::Number`] of the given [`Block`].
    ///
    /// The `seq`uence is zero-padded to at least `width` digits.
    #[must_use]
    pub fn derive(
        block: &block::Name,
        floor: &floor::Number,
        seq: usize,
        width: usize,
    ) -> Self {
        Self(format!("{block}{floor}{seq:0width$}"))
    }

    /// Indicates whether this [`Number`] is empty or consists of whitespace
    /// only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for Number {
    fn from(no: &str) -> Self {
        Self::new(no)
    }
}

impl PartialEq<str> for Number {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Number {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Display name of an [`Apartment`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

define_kind! {
    #[doc = "Kind of an [`Apartment`]."]
    enum Kind {
        #[doc = "Regular dwelling."]
        #[code = "DAIRE"]
        Dwelling,

        #[doc = "Dwelling spanning two floors."]
        #[code = "DUBLEKS"]
        Duplex,

        #[doc = "Dwelling with a terrace."]
        #[code = "TERAS"]
        Terrace,

        #[doc = "Ground dwelling with a garden."]
        #[code = "BAHCE"]
        Garden,

        #[doc = "Common area (stairwell, shelter, technical room, etc.)."]
        #[code = "ORTAK_ALAN"]
        CommonArea,
    }
}

/// New [`Apartment`]s are regular dwellings until their [`Kind`] is changed.
impl Default for Kind {
    fn default() -> Self {
        Self::Dwelling
    }
}

impl fmt::Display for Apartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({name})", self.no),
            None => write!(f, "{}", self.no),
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::{block, structure::floor};

    use super::{Kind, Number};

    fn block(name: &str) -> block::Name {
        block::Name::new(name).expect("valid block name")
    }

    #[test]
    fn derives_number_from_block_floor_and_sequence() {
        let a = block("A");

        assert_eq!(
            Number::derive(&a, &floor::Number::new("1"), 1, 2),
            "A101",
        );
        assert_eq!(
            Number::derive(&a, &floor::Number::new("12"), 7, 2),
            "A1207",
        );
        assert_eq!(
            Number::derive(&a, &floor::Number::new("B1"), 3, 2),
            "AB103",
        );
        assert_eq!(Number::derive(&a, &floor::Number::new("0"), 1, 3), "A0001");
    }

    #[test]
    fn padding_is_minimal_width() {
        assert_eq!(
            Number::derive(&block("C"), &floor::Number::new("2"), 123, 2),
            "C2123",
        );
    }

    #[test]
    fn blank_numbers() {
        assert!(Number::new("").is_blank());
        assert!(Number::new("  ").is_blank());
        assert!(!Number::new("A101").is_blank());
    }

    #[test]
    fn kind_codes_roundtrip() {
        for kind in Kind::ALL {
            assert_eq!(kind.code().parse::<Kind>(), Ok(*kind));
        }
        assert_eq!(Kind::CommonArea.to_string(), "ORTAK_ALAN");
    }

    #[test]
    fn defaults_to_dwelling() {
        assert_eq!(Kind::default(), Kind::Dwelling);
        assert_eq!(Kind::default().code(), "DAIRE");
    }
}
