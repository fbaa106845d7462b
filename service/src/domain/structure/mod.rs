//! [`Structure`] definitions.
//!
//! The building structure of a [`Block`] is a single document: an ordered list
//! of [`Floor`]s each holding an ordered list of [`Apartment`]s. It is edited
//! through a [`Draft`] and always persisted as a whole.

pub mod apartment;
mod draft;
pub mod floor;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, Error, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

use crate::domain::{block, site};
#[cfg(doc)]
use crate::domain::Block;

pub use self::{
    apartment::Apartment,
    draft::{Draft, Edit},
    floor::Floor,
};

/// Building structure of a [`Block`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Structure {
    /// [`Floor`]s of the [`Block`], from the top to the bottom.
    pub floors: Vec<Floor>,
}

impl Structure {
    /// Sorts the [`Floor`]s of this [`Structure`] from the top to the bottom
    /// by their [`floor::Rank`].
    ///
    /// Floors of an equal rank keep their relative order.
    pub fn sort(&mut self) {
        self.floors
            .sort_by(|a, b| b.rank().cmp(&a.rank()));
    }

    /// Iterates over all the [`Apartment`]s of this [`Structure`], from the
    /// top [`Floor`] to the bottom one.
    pub fn apartments(&self) -> impl Iterator<Item = &Apartment> {
        self.floors.iter().flat_map(|f| f.apartments.iter())
    }

    /// Looks up the [`Apartment`] with the provided [`apartment::Id`] along
    /// with the [`Floor`] it's on.
    #[must_use]
    pub fn apartment(
        &self,
        id: apartment::Id,
    ) -> Option<(&Floor, &Apartment)> {
        self.floors.iter().find_map(|f| {
            f.apartments.iter().find(|a| a.id == id).map(|a| (f, a))
        })
    }

    /// Validates this [`Structure`] before it's persisted.
    ///
    /// # Errors
    ///
    /// With a [`ValidationError::EmptyApartmentNumber`] if any [`Apartment`]
    /// has a blank [`apartment::Number`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        for floor in &self.floors {
            if let Some(pos) =
                floor.apartments.iter().position(|a| a.no.is_blank())
            {
                return Err(ValidationError::EmptyApartmentNumber {
                    floor: floor.no.clone(),
                    position: pos,
                });
            }
        }
        Ok(())
    }
}

/// Error of a [`Structure`] validation.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum ValidationError {
    /// [`Apartment`] has a blank [`apartment::Number`].
    #[display("`Apartment` #{} on `Floor({floor})` has empty number", position + 1)]
    EmptyApartmentNumber {
        /// [`floor::Number`] of the [`Floor`] the [`Apartment`] is on.
        floor: floor::Number,

        /// Zero-based position of the [`Apartment`] on the [`Floor`].
        position: usize,
    },
}

/// Version of a persisted [`Structure`] [`Document`].
///
/// Incremented on every save and compared on the next one, so concurrent
/// editors can't silently overwrite each other.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Version(i64);

impl Version {
    /// [`Version`] of a [`Structure`] that was never saved.
    pub const UNSAVED: Self = Self(0);

    /// Returns the [`Version`] following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Persisted [`Structure`] of a [`Block`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Document {
    /// ID of the [`Block`] this [`Document`] describes.
    pub block_id: block::Id,

    /// ID of the [`Site`] the [`Block`] belongs to.
    ///
    /// [`Site`]: crate::domain::Site
    pub site_id: site::Id,

    /// Persisted [`Structure`].
    pub structure: Structure,

    /// [`Version`] of this [`Document`].
    pub version: Version,

    /// [`DateTime`] when this [`Document`] was saved.
    pub updated_at: ModificationDateTime,
}

/// [`DateTime`] when a [`Structure`] was modified.
pub type ModificationDateTime = DateTimeOf<(Structure, unit::Modification)>;

#[cfg(test)]
mod spec {
    use super::{
        apartment, floor, Apartment, Floor, Structure, ValidationError,
    };

    fn apartment(no: &str) -> Apartment {
        Apartment {
            id: apartment::Id::new(),
            no: apartment::Number::new(no),
            kind: apartment::Kind::Dwelling,
            name: None,
        }
    }

    #[test]
    fn validation_rejects_blank_apartment_numbers() {
        let mut one = Floor::new(floor::Kind::Normal, "1".into());
        one.apartments = vec![apartment("A101"), apartment(" ")];
        let structure = Structure { floors: vec![one] };

        assert_eq!(
            structure.validate(),
            Err(ValidationError::EmptyApartmentNumber {
                floor: "1".into(),
                position: 1,
            }),
        );
    }

    #[test]
    fn validation_accepts_free_text_numbers() {
        let mut one = Floor::new(floor::Kind::Normal, "1".into());
        one.apartments = vec![apartment("Dükkan"), apartment("A101")];
        let structure = Structure { floors: vec![one] };

        assert_eq!(structure.validate(), Ok(()));
    }

    #[test]
    fn finds_apartments_by_id() {
        let target = apartment("A201");
        let id = target.id;
        let mut two = Floor::new(floor::Kind::Normal, "2".into());
        two.apartments = vec![apartment("A202"), target];
        let structure = Structure {
            floors: vec![two, Floor::new(floor::Kind::Ground, "0".into())],
        };

        let (floor, found) = structure.apartment(id).expect("exists");
        assert_eq!(floor.no, "2");
        assert_eq!(found.no, "A201");
        assert!(structure.apartment(apartment::Id::new()).is_none());
        assert_eq!(structure.apartments().count(), 2);
    }

    #[test]
    fn serializes_to_document_shape() {
        let mut one = Floor::new(floor::Kind::Normal, "1".into());
        let a101 = apartment("A101");
        let id = a101.id;
        one.apartments = vec![a101];
        let structure = Structure { floors: vec![one] };

        let json = serde_json::to_value(&structure).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({
                "floors": [{
                    "no": "1",
                    "tip": "NORMAL",
                    "ad": "1. Kat",
                    "daireler": [{
                        "id": id.to_string(),
                        "no": "A101",
                        "tip": "DAIRE",
                    }],
                }],
            }),
        );
        assert_eq!(
            serde_json::from_value::<Structure>(json).expect("deserializable"),
            structure,
        );
    }
}
