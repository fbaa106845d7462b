//! [`Floor`] definitions.

use std::{cmp::Ordering, str::FromStr};

use common::define_kind;
use derive_more::{AsRef, Display};
use serde::{Deserialize, Serialize};

use super::Apartment;
#[cfg(doc)]
use crate::domain::Block;

/// Level ("kat") of a [`Block`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Floor {
    /// [`Number`] of this [`Floor`].
    pub no: Number,

    /// [`Kind`] of this [`Floor`].
    #[serde(rename = "tip")]
    pub kind: Kind,

    /// Display [`Name`] of this [`Floor`].
    #[serde(default, rename = "ad", skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,

    /// [`Apartment`]s on this [`Floor`], in display order.
    #[serde(default, rename = "daireler")]
    pub apartments: Vec<Apartment>,
}

impl Floor {
    /// Creates a new empty [`Floor`] of the given [`Kind`] and [`Number`],
    /// named by default.
    #[must_use]
    pub fn new(kind: Kind, no: Number) -> Self {
        Self {
            name: Some(Name::default_for(kind, &no)),
            no,
            kind,
            apartments: Vec::new(),
        }
    }

    /// Returns the elevation [`Rank`] of this [`Floor`].
    #[must_use]
    pub fn rank(&self) -> Rank {
        let value = match self.kind {
            Kind::Normal => self.no.as_normal().map(i64::from),
            Kind::Mezzanine => self.no.as_mezzanine().map(i64::from),
            Kind::Basement => self.no.as_basement().map(|n| -i64::from(n)),
            Kind::Ground | Kind::Roof => None,
        };
        Rank {
            class: self.kind.class(),
            value: value.unwrap_or_default(),
        }
    }
}

define_kind! {
    #[doc = "Kind of a [`Floor`]."]
    enum Kind {
        #[doc = "Regular floor above the ground floor."]
        #[code = "NORMAL"]
        Normal,

        #[doc = "Ground floor."]
        #[code = "ZEMIN"]
        Ground,

        #[doc = "Basement floor."]
        #[code = "BODRUM"]
        Basement,

        #[doc = "Roof floor."]
        #[code = "CATI"]
        Roof,

        #[doc = "Mezzanine floor."]
        #[code = "ARA"]
        Mezzanine,
    }
}

impl Kind {
    /// Indicates whether a [`Block`] may have at most one [`Floor`] of this
    /// [`Kind`].
    #[must_use]
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Ground | Self::Roof)
    }

    /// Returns the elevation class of this [`Kind`], the higher the upper.
    const fn class(self) -> u8 {
        match self {
            Self::Basement => 0,
            Self::Ground => 1,
            Self::Normal => 2,
            Self::Mezzanine => 3,
            Self::Roof => 4,
        }
    }
}

/// Number of a [`Floor`]: `1`, `2`, … for [`Kind::Normal`] floors, `0` for the
/// [`Kind::Ground`] floor, `B1`, `B2`, … for [`Kind::Basement`] floors, `ARA1`,
/// `ARA2`, … for [`Kind::Mezzanine`] floors and `CATI` for the [`Kind::Roof`].
///
/// May be overridden with any free text.
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[serde(transparent)]
pub struct Number(String);

impl Number {
    /// [`Number`] of the [`Kind::Ground`] floor.
    pub const GROUND: &'static str = "0";

    /// [`Number`] of the [`Kind::Roof`] floor.
    pub const ROOF: &'static str = "CATI";

    /// Prefix of [`Kind::Basement`] floor numbers.
    const BASEMENT_PREFIX: &'static str = "B";

    /// Prefix of [`Kind::Mezzanine`] floor numbers.
    const MEZZANINE_PREFIX: &'static str = "ARA";

    /// Creates a new [`Number`] out of the given free text.
    #[must_use]
    pub fn new(no: impl Into<String>) -> Self {
        Self(no.into())
    }

    /// Calculates the [`Number`] a new [`Floor`] of the given [`Kind`] gets
    /// next to the `existing` ones.
    ///
    /// Normal floors continue from the highest existing normal floor without
    /// filling gaps, while basements and mezzanines are counted. Normal floor
    /// numbers with no successor in `u32` are skipped.
    pub fn next<'f>(
        kind: Kind,
        existing: impl IntoIterator<Item = &'f Floor>,
    ) -> Self {
        let existing = existing.into_iter().filter(|f| f.kind == kind);
        match kind {
            Kind::Normal => {
                let next = existing
                    .filter_map(|f| f.no.as_normal()?.checked_add(1))
                    .max();
                Self(next.unwrap_or(1).to_string())
            }
            Kind::Ground => Self(Self::GROUND.to_owned()),
            Kind::Roof => Self(Self::ROOF.to_owned()),
            Kind::Basement => Self(format!(
                "{}{}",
                Self::BASEMENT_PREFIX,
                existing.count() + 1,
            )),
            Kind::Mezzanine => Self(format!(
                "{}{}",
                Self::MEZZANINE_PREFIX,
                existing.count() + 1,
            )),
        }
    }

    /// Parses this [`Number`] as a [`Kind::Normal`] floor number.
    #[must_use]
    pub fn as_normal(&self) -> Option<u32> {
        self.0.parse().ok()
    }

    /// Parses this [`Number`] as a [`Kind::Basement`] floor number, returning
    /// its depth.
    #[must_use]
    pub fn as_basement(&self) -> Option<u32> {
        self.0.strip_prefix(Self::BASEMENT_PREFIX)?.parse().ok()
    }

    /// Parses this [`Number`] as a [`Kind::Mezzanine`] floor number.
    #[must_use]
    pub fn as_mezzanine(&self) -> Option<u32> {
        self.0.strip_prefix(Self::MEZZANINE_PREFIX)?.parse().ok()
    }
}

impl From<&str> for Number {
    fn from(no: &str) -> Self {
        Self::new(no)
    }
}

impl PartialEq<&str> for Number {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Display name of a [`Floor`], like `3. Kat`.
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

    /// Returns the default [`Name`] of a [`Floor`] with the given [`Kind`] and
    /// [`Number`].
    #[must_use]
    pub fn default_for(kind: Kind, no: &Number) -> Self {
        Self(match kind {
            Kind::Normal => format!("{no}. Kat"),
            Kind::Ground => "Zemin Kat".to_owned(),
            Kind::Roof => "Çatı Katı".to_owned(),
            Kind::Basement => no.as_basement().map_or_else(
                || format!("{no} Bodrum Kat"),
                |n| format!("{n}. Bodrum Kat"),
            ),
            Kind::Mezzanine => no.as_mezzanine().map_or_else(
                || format!("{no} Ara Kat"),
                |n| format!("{n}. Ara Kat"),
            ),
        })
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

/// Change of a single [`Floor`] attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Change {
    /// Changes the [`Kind`], renumbering the [`Floor`] as a new one of that
    /// [`Kind`] and resetting its [`Name`].
    Kind(Kind),

    /// Overrides the [`Number`] and resets the [`Name`] accordingly.
    Number(Number),

    /// Overrides the [`Name`], or removes it.
    Name(Option<Name>),
}

/// Elevation rank of a [`Floor`], ordering floors from the bottom to the top.
///
/// Roof is above mezzanines, which are above normal floors (by their number),
/// which are above the ground floor, which is above basements (`B1` above
/// `B2`). Floors with unparseable numbers rank at the bottom of their class.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Rank {
    /// Elevation class of the [`Kind`].
    class: u8,

    /// Position within the class.
    value: i64,
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.class
            .cmp(&other.class)
            .then_with(|| self.value.cmp(&other.value))
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod spec {
    use super::{Floor, Kind, Name, Number};

    fn floor(kind: Kind, no: &str) -> Floor {
        Floor::new(kind, Number::new(no))
    }

    #[test]
    fn normal_numbering_continues_from_max() {
        assert_eq!(Number::next(Kind::Normal, None), "1");

        let floors = [
            floor(Kind::Normal, "1"),
            floor(Kind::Normal, "4"),
            floor(Kind::Ground, "0"),
        ];
        assert_eq!(Number::next(Kind::Normal, &floors), "5");
    }

    #[test]
    fn normal_numbering_ignores_free_text() {
        let floors = [floor(Kind::Normal, "2"), floor(Kind::Normal, "Asma")];

        assert_eq!(Number::next(Kind::Normal, &floors), "3");
    }

    #[test]
    fn normal_numbering_skips_maximal_number() {
        let max = u32::MAX.to_string();

        let floors = [floor(Kind::Normal, &max)];
        assert_eq!(Number::next(Kind::Normal, &floors), "1");

        let floors = [floor(Kind::Normal, "3"), floor(Kind::Normal, &max)];
        assert_eq!(Number::next(Kind::Normal, &floors), "4");
    }

    #[test]
    fn basement_numbering_counts() {
        let floors = [
            floor(Kind::Basement, "B1"),
            floor(Kind::Normal, "1"),
            floor(Kind::Basement, "B2"),
        ];

        assert_eq!(Number::next(Kind::Basement, &floors), "B3");
        assert_eq!(Number::next(Kind::Mezzanine, &floors), "ARA1");
    }

    #[test]
    fn fixed_numbers() {
        assert_eq!(Number::next(Kind::Ground, None), "0");
        assert_eq!(Number::next(Kind::Roof, None), "CATI");
    }

    #[test]
    fn parses_numbers() {
        assert_eq!(Number::new("12").as_normal(), Some(12));
        assert_eq!(Number::new("B3").as_basement(), Some(3));
        assert_eq!(Number::new("ARA2").as_mezzanine(), Some(2));
        assert_eq!(Number::new("B").as_basement(), None);
        assert_eq!(Number::new("x").as_normal(), None);
    }

    #[test]
    fn ranks_by_elevation() {
        let mut floors = vec![
            floor(Kind::Basement, "B2"),
            floor(Kind::Normal, "1"),
            floor(Kind::Roof, "CATI"),
            floor(Kind::Ground, "0"),
            floor(Kind::Basement, "B1"),
            floor(Kind::Mezzanine, "ARA1"),
            floor(Kind::Normal, "10"),
            floor(Kind::Normal, "2"),
        ];
        floors.sort_by_key(|f| std::cmp::Reverse(f.rank()));

        let order = floors.iter().map(|f| f.no.to_string()).collect::<Vec<_>>();
        assert_eq!(
            order,
            ["CATI", "ARA1", "10", "2", "1", "0", "B1", "B2"],
        );
    }

    #[test]
    fn default_names() {
        let name = |kind, no: &str| {
            Name::default_for(kind, &Number::new(no)).to_string()
        };

        assert_eq!(name(Kind::Normal, "3"), "3. Kat");
        assert_eq!(name(Kind::Ground, "0"), "Zemin Kat");
        assert_eq!(name(Kind::Basement, "B2"), "2. Bodrum Kat");
        assert_eq!(name(Kind::Basement, "Otopark"), "Otopark Bodrum Kat");
        assert_eq!(name(Kind::Roof, "CATI"), "Çatı Katı");
        assert_eq!(name(Kind::Mezzanine, "ARA1"), "1. Ara Kat");
    }
}
