//! [`Draft`] definitions.

use super::{apartment, floor, Apartment, Document, Floor, Structure, Version};
use crate::domain::{block, site, Block};

/// Edit session of a [`Block`]'s [`Structure`].
///
/// Holds the [`Structure`] being edited along with the [`Version`] it was
/// loaded at. All the edits are synchronous and purely in-memory, and report
/// whether they changed anything: a rejected edit (like a second ground floor
/// or an out-of-range index) is a no-op returning `false`.
///
/// [`Floor`]s are kept sorted from the top to the bottom after every edit, so
/// floor indices always refer to the current sorted order.
#[derive(Clone, Debug)]
pub struct Draft {
    /// ID of the edited [`Block`].
    block_id: block::Id,

    /// ID of the [`Site`] the edited [`Block`] belongs to.
    ///
    /// [`Site`]: crate::domain::Site
    site_id: site::Id,

    /// Name of the edited [`Block`], prefixing new [`apartment::Number`]s.
    block_name: block::Name,

    /// Minimal number of digits of the sequence in new
    /// [`apartment::Number`]s.
    padding: usize,

    /// [`Version`] of the persisted [`Structure`] this [`Draft`] is based on.
    base: Version,

    /// [`Structure`] being edited.
    structure: Structure,
}

impl Draft {
    /// Starts editing the provided `document` of the given [`Block`], or an
    /// empty [`Structure`] if the [`Block`] has none persisted yet.
    #[must_use]
    pub fn new(
        block: &Block,
        document: Option<Document>,
        padding: usize,
    ) -> Self {
        let (mut structure, base) = document
            .map_or_else(Default::default, |d| (d.structure, d.version));
        structure.sort();
        Self {
            block_id: block.id,
            site_id: block.site_id,
            block_name: block.name.clone(),
            padding,
            base,
            structure,
        }
    }

    /// Returns ID of the edited [`Block`].
    #[must_use]
    pub const fn block_id(&self) -> block::Id {
        self.block_id
    }

    /// Returns ID of the [`Site`] the edited [`Block`] belongs to.
    ///
    /// [`Site`]: crate::domain::Site
    #[must_use]
    pub const fn site_id(&self) -> site::Id {
        self.site_id
    }

    /// Returns the [`Version`] this [`Draft`] is based on.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.base
    }

    /// Returns the [`Structure`] being edited.
    #[must_use]
    pub const fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Returns the [`Floor`]s being edited, from the top to the bottom.
    #[must_use]
    pub fn floors(&self) -> &[Floor] {
        &self.structure.floors
    }

    /// Rebases this [`Draft`] onto the provided persisted [`Version`], so it
    /// may be saved again.
    pub fn rebase(&mut self, version: Version) {
        self.base = version;
    }

    /// Applies the provided [`Edit`].
    pub fn apply(&mut self, edit: Edit) -> bool {
        match edit {
            Edit::AddFloor(kind) => self.add_floor(kind),
            Edit::RemoveFloor { floor } => self.remove_floor(floor).is_some(),
            Edit::ChangeFloor { floor, change } => {
                self.change_floor(floor, change)
            }
            Edit::AddApartment { floor } => self.add_apartment(floor).is_some(),
            Edit::RemoveApartment { floor, apartment } => {
                self.remove_apartment(floor, apartment).is_some()
            }
            Edit::RenameApartment {
                floor,
                apartment,
                no,
            } => self.rename_apartment(floor, apartment, no),
            Edit::SetApartmentKind {
                floor,
                apartment,
                kind,
            } => self.set_apartment_kind(floor, apartment, kind),
            Edit::SetApartmentName {
                floor,
                apartment,
                name,
            } => self.set_apartment_name(floor, apartment, name),
        }
    }

    /// Adds a new [`Floor`] of the provided [`floor::Kind`].
    ///
    /// No-op if the [`floor::Kind`] is a singleton one already present.
    pub fn add_floor(&mut self, kind: floor::Kind) -> bool {
        if kind.is_singleton() && self.has_floor_of(kind, None) {
            return false;
        }
        let no = floor::Number::next(kind, &self.structure.floors);
        self.structure.floors.push(Floor::new(kind, no));
        self.structure.sort();
        true
    }

    /// Removes the [`Floor`] at the provided index along with all its
    /// [`Apartment`]s.
    ///
    /// [`Deficiency`] records of the removed [`Apartment`]s are not touched.
    ///
    /// [`Deficiency`]: crate::domain::Deficiency
    pub fn remove_floor(&mut self, index: usize) -> Option<Floor> {
        (index < self.structure.floors.len())
            .then(|| self.structure.floors.remove(index))
    }

    /// Changes an attribute of the [`Floor`] at the provided index.
    ///
    /// A [`floor::Change::Kind`] renumbers the [`Floor`] as if it was added
    /// anew next to the other ones. It's a no-op if the [`floor::Kind`] stays
    /// the same, or is a singleton one held by another [`Floor`].
    pub fn change_floor(
        &mut self,
        index: usize,
        change: floor::Change,
    ) -> bool {
        let Some(current) = self.structure.floors.get(index) else {
            return false;
        };
        let (kind, no, name) = match change {
            floor::Change::Kind(kind) => {
                if kind == current.kind
                    || (kind.is_singleton()
                        && self.has_floor_of(kind, Some(index)))
                {
                    return false;
                }
                let others = self
                    .structure
                    .floors
                    .iter()
                    .enumerate()
                    .filter_map(|(i, f)| (i != index).then_some(f));
                let no = floor::Number::next(kind, others);
                let name = floor::Name::default_for(kind, &no);
                (kind, no, Some(name))
            }
            floor::Change::Number(no) => {
                let name = floor::Name::default_for(current.kind, &no);
                (current.kind, no, Some(name))
            }
            floor::Change::Name(name) => {
                (current.kind, current.no.clone(), name)
            }
        };

        let floor = &mut self.structure.floors[index];
        floor.kind = kind;
        floor.no = no;
        floor.name = name;
        self.structure.sort();
        true
    }

    /// Adds a new [`Apartment`] to the [`Floor`] at the provided index,
    /// returning its [`apartment::Id`].
    ///
    /// The new [`apartment::Number`] continues the count of the existing
    /// [`Apartment`]s on the [`Floor`], so numbers freed by removals are
    /// never reused in between.
    pub fn add_apartment(&mut self, floor: usize) -> Option<apartment::Id> {
        let floor = self.structure.floors.get_mut(floor)?;
        let apartment = Apartment {
            id: apartment::Id::new(),
            no: apartment::Number::derive(
                &self.block_name,
                &floor.no,
                floor.apartments.len() + 1,
                self.padding,
            ),
            kind: apartment::Kind::default(),
            name: None,
        };
        let id = apartment.id;
        floor.apartments.push(apartment);
        Some(id)
    }

    /// Removes the [`Apartment`] at the provided position of the [`Floor`] at
    /// the provided index.
    ///
    /// The remaining [`Apartment`]s keep their [`apartment::Number`]s.
    pub fn remove_apartment(
        &mut self,
        floor: usize,
        apartment: usize,
    ) -> Option<Apartment> {
        let apartments = &mut self.structure.floors.get_mut(floor)?.apartments;
        (apartment < apartments.len()).then(|| apartments.remove(apartment))
    }

    /// Overrides the [`apartment::Number`] of the [`Apartment`] at the
    /// provided position with any free text.
    pub fn rename_apartment(
        &mut self,
        floor: usize,
        apartment: usize,
        no: apartment::Number,
    ) -> bool {
        self.apartment_mut(floor, apartment)
            .map(|a| a.no = no)
            .is_some()
    }

    /// Sets the [`apartment::Kind`] of the [`Apartment`] at the provided
    /// position.
    pub fn set_apartment_kind(
        &mut self,
        floor: usize,
        apartment: usize,
        kind: apartment::Kind,
    ) -> bool {
        self.apartment_mut(floor, apartment)
            .map(|a| a.kind = kind)
            .is_some()
    }

    /// Sets or removes the [`apartment::Name`] of the [`Apartment`] at the
    /// provided position.
    pub fn set_apartment_name(
        &mut self,
        floor: usize,
        apartment: usize,
        name: Option<apartment::Name>,
    ) -> bool {
        self.apartment_mut(floor, apartment)
            .map(|a| a.name = name)
            .is_some()
    }

    /// Indicates whether a [`Floor`] of the provided [`floor::Kind`] exists,
    /// skipping the one at the `except` index.
    fn has_floor_of(&self, kind: floor::Kind, except: Option<usize>) -> bool {
        self.structure
            .floors
            .iter()
            .enumerate()
            .any(|(i, f)| f.kind == kind && Some(i) != except)
    }

    /// Returns the [`Apartment`] at the provided position for mutation.
    fn apartment_mut(
        &mut self,
        floor: usize,
        apartment: usize,
    ) -> Option<&mut Apartment> {
        self.structure
            .floors
            .get_mut(floor)?
            .apartments
            .get_mut(apartment)
    }
}

/// Single edit of a [`Draft`].
///
/// Indices refer to the [`Floor`]s order at the moment the [`Edit`] is
/// applied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Edit {
    /// Adds a new [`Floor`] of the provided [`floor::Kind`].
    AddFloor(floor::Kind),

    /// Removes a [`Floor`] with all its [`Apartment`]s.
    RemoveFloor {
        /// Index of the [`Floor`].
        floor: usize,
    },

    /// Changes an attribute of a [`Floor`].
    ChangeFloor {
        /// Index of the [`Floor`].
        floor: usize,

        /// [`floor::Change`] to apply.
        change: floor::Change,
    },

    /// Adds a new [`Apartment`] to a [`Floor`].
    AddApartment {
        /// Index of the [`Floor`].
        floor: usize,
    },

    /// Removes an [`Apartment`] from a [`Floor`].
    RemoveApartment {
        /// Index of the [`Floor`].
        floor: usize,

        /// Position of the [`Apartment`] on the [`Floor`].
        apartment: usize,
    },

    /// Overrides the [`apartment::Number`] of an [`Apartment`].
    RenameApartment {
        /// Index of the [`Floor`].
        floor: usize,

        /// Position of the [`Apartment`] on the [`Floor`].
        apartment: usize,

        /// New [`apartment::Number`].
        no: apartment::Number,
    },

    /// Sets the [`apartment::Kind`] of an [`Apartment`].
    SetApartmentKind {
        /// Index of the [`Floor`].
        floor: usize,

        /// Position of the [`Apartment`] on the [`Floor`].
        apartment: usize,

        /// New [`apartment::Kind`].
        kind: apartment::Kind,
    },

    /// Sets or removes the [`apartment::Name`] of an [`Apartment`].
    SetApartmentName {
        /// Index of the [`Floor`].
        floor: usize,

        /// Position of the [`Apartment`] on the [`Floor`].
        apartment: usize,

        /// New [`apartment::Name`], if any.
        name: Option<apartment::Name>,
    },
}

#[cfg(test)]
mod spec {
    use crate::domain::{
        block::{self, Block},
        site,
        structure::{apartment, floor, Document, Structure, Version},
    };

    use super::{Draft, Edit};

    fn block(name: &str) -> Block {
        Block {
            id: block::Id::new(),
            site_id: site::Id::new(),
            name: block::Name::new(name).expect("valid block name"),
            status: block::Status::Active,
            created_at: block::CreationDateTime::now(),
            deleted_at: None,
        }
    }

    fn draft(name: &str) -> Draft {
        Draft::new(&block(name), None, 2)
    }

    fn floor_numbers(draft: &Draft) -> Vec<String> {
        draft.floors().iter().map(|f| f.no.to_string()).collect()
    }

    fn apartment_numbers(draft: &Draft, floor: usize) -> Vec<String> {
        draft.floors()[floor]
            .apartments
            .iter()
            .map(|a| a.no.to_string())
            .collect()
    }

    fn floor_index(draft: &Draft, no: &str) -> usize {
        draft
            .floors()
            .iter()
            .position(|f| f.no == no)
            .expect("floor exists")
    }

    #[test]
    fn starts_empty_and_unsaved() {
        let draft = draft("A");

        assert!(draft.floors().is_empty());
        assert_eq!(draft.version(), Version::UNSAVED);
    }

    #[test]
    fn sorts_loaded_document() {
        let block = block("A");
        let document = Document {
            block_id: block.id,
            site_id: block.site_id,
            structure: Structure {
                floors: vec![
                    floor::Floor::new(floor::Kind::Ground, "0".into()),
                    floor::Floor::new(floor::Kind::Normal, "1".into()),
                ],
            },
            version: Version::UNSAVED.next(),
            updated_at: crate::domain::structure::ModificationDateTime::now(),
        };

        let draft = Draft::new(&block, Some(document), 2);

        assert_eq!(floor_numbers(&draft), ["1", "0"]);
        assert_eq!(draft.version(), Version::UNSAVED.next());
    }

    #[test]
    fn adds_normal_and_ground_floors_in_elevation_order() {
        let mut draft = draft("A");

        assert!(draft.add_floor(floor::Kind::Normal));
        assert_eq!(floor_numbers(&draft), ["1"]);
        assert!(draft.add_floor(floor::Kind::Normal));
        assert!(draft.add_floor(floor::Kind::Ground));

        assert_eq!(floor_numbers(&draft), ["2", "1", "0"]);
        assert_eq!(draft.floors()[2].kind, floor::Kind::Ground);
    }

    #[test]
    fn adds_normal_floor_after_maximal_number() {
        let mut draft = draft("A");
        assert!(draft.add_floor(floor::Kind::Normal));
        assert!(draft.change_floor(
            0,
            floor::Change::Number(floor::Number::new(u32::MAX.to_string())),
        ));

        assert!(draft.add_floor(floor::Kind::Normal));

        assert_eq!(floor_numbers(&draft), [u32::MAX.to_string(), "1".into()]);
    }

    #[test]
    fn adds_single_ground_floor() {
        let mut draft = draft("A");

        assert!(draft.add_floor(floor::Kind::Ground));
        assert!(!draft.add_floor(floor::Kind::Ground));

        let grounds = draft
            .floors()
            .iter()
            .filter(|f| f.kind == floor::Kind::Ground)
            .collect::<Vec<_>>();
        assert_eq!(grounds.len(), 1);
        assert_eq!(grounds[0].no, "0");
    }

    #[test]
    fn adds_single_roof() {
        let mut draft = draft("A");

        assert!(draft.add_floor(floor::Kind::Roof));
        assert!(!draft.add_floor(floor::Kind::Roof));
        assert_eq!(floor_numbers(&draft), ["CATI"]);
    }

    #[test]
    fn numbers_basements_in_creation_order() {
        let mut draft = draft("A");

        draft.add_floor(floor::Kind::Basement);
        draft.add_floor(floor::Kind::Normal);
        draft.add_floor(floor::Kind::Basement);
        draft.add_floor(floor::Kind::Ground);
        draft.add_floor(floor::Kind::Normal);
        draft.add_floor(floor::Kind::Basement);

        assert_eq!(floor_numbers(&draft), ["2", "1", "0", "B1", "B2", "B3"]);
    }

    #[test]
    fn next_basement_after_existing_one() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Basement);

        draft.add_floor(floor::Kind::Basement);

        assert_eq!(floor_numbers(&draft), ["B1", "B2"]);
    }

    #[test]
    fn normal_floors_do_not_fill_gaps() {
        let mut draft = draft("A");
        for _ in 0..3 {
            draft.add_floor(floor::Kind::Normal);
        }

        let two = floor_index(&draft, "2");
        assert!(draft.remove_floor(two).is_some());
        draft.add_floor(floor::Kind::Normal);

        assert_eq!(floor_numbers(&draft), ["4", "3", "1"]);
    }

    #[test]
    fn keeps_elevation_order_after_any_edits() {
        let mut draft = draft("A");
        let kinds = [
            floor::Kind::Normal,
            floor::Kind::Basement,
            floor::Kind::Roof,
            floor::Kind::Normal,
            floor::Kind::Ground,
            floor::Kind::Mezzanine,
            floor::Kind::Basement,
            floor::Kind::Normal,
        ];
        for kind in kinds {
            draft.add_floor(kind);
        }
        let one = floor_index(&draft, "1");
        draft.remove_floor(one);
        draft.add_floor(floor::Kind::Normal);

        assert_eq!(
            floor_numbers(&draft),
            ["CATI", "ARA1", "4", "3", "2", "0", "B1", "B2"],
        );
    }

    #[test]
    fn removing_floor_out_of_range_is_noop() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Normal);

        assert!(draft.remove_floor(1).is_none());
        assert!(!draft.apply(Edit::RemoveFloor { floor: 5 }));
        assert_eq!(floor_numbers(&draft), ["1"]);
    }

    #[test]
    fn removing_floor_drops_its_apartments() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Normal);
        draft.add_apartment(0);
        draft.add_apartment(0);

        let removed = draft.remove_floor(0).expect("floor exists");

        assert_eq!(removed.apartments.len(), 2);
        assert_eq!(draft.structure().apartments().count(), 0);
    }

    #[test]
    fn changing_kind_renumbers_over_other_floors() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Normal);
        draft.add_floor(floor::Kind::Normal);
        draft.add_floor(floor::Kind::Basement);

        let b1 = floor_index(&draft, "B1");
        assert!(draft.change_floor(b1, floor::Change::Kind(floor::Kind::Normal)));
        assert_eq!(floor_numbers(&draft), ["3", "2", "1"]);

        let three = floor_index(&draft, "3");
        assert!(
            draft.change_floor(three, floor::Change::Kind(floor::Kind::Basement)),
        );
        assert_eq!(floor_numbers(&draft), ["2", "1", "B1"]);
        assert_eq!(
            draft.floors()[2].name.as_ref().map(ToString::to_string),
            Some("1. Bodrum Kat".to_owned()),
        );
    }

    #[test]
    fn changing_to_same_kind_is_noop() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Normal);
        draft.add_floor(floor::Kind::Normal);

        let one = floor_index(&draft, "1");
        assert!(!draft.change_floor(one, floor::Change::Kind(floor::Kind::Normal)));
        assert_eq!(floor_numbers(&draft), ["2", "1"]);
    }

    #[test]
    fn changing_to_taken_singleton_kind_is_noop() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Ground);
        draft.add_floor(floor::Kind::Normal);

        let one = floor_index(&draft, "1");
        assert!(!draft.change_floor(one, floor::Change::Kind(floor::Kind::Ground)));
        assert!(draft.change_floor(one, floor::Change::Kind(floor::Kind::Roof)));
        assert_eq!(floor_numbers(&draft), ["CATI", "0"]);
    }

    #[test]
    fn changing_number_renames_and_resorts() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Normal);
        draft.add_floor(floor::Kind::Normal);

        let one = floor_index(&draft, "1");
        assert!(draft.change_floor(one, floor::Change::Number("5".into())));

        assert_eq!(floor_numbers(&draft), ["5", "2"]);
        assert_eq!(
            draft.floors()[0].name.as_ref().map(ToString::to_string),
            Some("5. Kat".to_owned()),
        );
    }

    #[test]
    fn changing_number_allows_duplicates() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Normal);
        draft.add_floor(floor::Kind::Normal);

        assert!(draft.change_floor(0, floor::Change::Number("1".into())));

        assert_eq!(floor_numbers(&draft), ["1", "1"]);
    }

    #[test]
    fn changing_name_overrides_default() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Ground);
        let name = floor::Name::new("Lobi").expect("valid name");

        assert!(draft.change_floor(0, floor::Change::Name(Some(name.clone()))));
        assert_eq!(draft.floors()[0].name, Some(name));

        assert!(draft.change_floor(0, floor::Change::Name(None)));
        assert_eq!(draft.floors()[0].name, None);
        assert!(!draft.change_floor(3, floor::Change::Name(None)));
    }

    #[test]
    fn adds_padded_apartment_numbers() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Normal);

        for _ in 0..3 {
            assert!(draft.add_apartment(0).is_some());
        }

        assert_eq!(apartment_numbers(&draft, 0), ["A101", "A102", "A103"]);
        assert!(draft
            .structure()
            .apartments()
            .all(|a| a.kind == apartment::Kind::Dwelling));
    }

    #[test]
    fn apartment_number_ends_with_next_sequence() {
        let mut draft = draft("C");
        draft.add_floor(floor::Kind::Basement);
        for _ in 0..11 {
            draft.add_apartment(0);
        }

        let last = draft.floors()[0].apartments.last().expect("added");
        assert_eq!(last.no, "CB111");
    }

    #[test]
    fn apartment_padding_is_configurable() {
        let mut draft = Draft::new(&block("A"), None, 3);
        draft.add_floor(floor::Kind::Ground);

        draft.add_apartment(0);

        assert_eq!(apartment_numbers(&draft, 0), ["A0001"]);
    }

    #[test]
    fn removing_apartment_does_not_renumber() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Normal);
        for _ in 0..3 {
            draft.add_apartment(0);
        }

        let removed = draft.remove_apartment(0, 1).expect("apartment exists");

        assert_eq!(removed.no, "A102");
        assert_eq!(apartment_numbers(&draft, 0), ["A101", "A103"]);
        assert!(draft.remove_apartment(0, 2).is_none());
        assert!(draft.remove_apartment(1, 0).is_none());
    }

    #[test]
    fn sequence_counts_remaining_apartments() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Normal);
        for _ in 0..3 {
            draft.add_apartment(0);
        }
        draft.remove_apartment(0, 0);

        draft.add_apartment(0);

        assert_eq!(apartment_numbers(&draft, 0), ["A102", "A103", "A103"]);
    }

    #[test]
    fn edits_apartments_in_place() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Ground);
        let id = draft.add_apartment(0).expect("floor exists");
        let name = apartment::Name::new("Kapıcı Dairesi").expect("valid name");

        assert!(draft.apply(Edit::RenameApartment {
            floor: 0,
            apartment: 0,
            no: "Dükkan 1".into(),
        }));
        assert!(draft.apply(Edit::SetApartmentKind {
            floor: 0,
            apartment: 0,
            kind: apartment::Kind::CommonArea,
        }));
        assert!(draft.apply(Edit::SetApartmentName {
            floor: 0,
            apartment: 0,
            name: Some(name.clone()),
        }));
        assert!(!draft.apply(Edit::RenameApartment {
            floor: 0,
            apartment: 1,
            no: "X".into(),
        }));

        let (_, found) =
            draft.structure().apartment(id).expect("apartment exists");
        assert_eq!(found.no, "Dükkan 1");
        assert_eq!(found.kind, apartment::Kind::CommonArea);
        assert_eq!(found.name, Some(name));
    }

    #[test]
    fn renaming_apartment_keeps_its_id() {
        let mut draft = draft("A");
        draft.add_floor(floor::Kind::Normal);
        let id = draft.add_apartment(0).expect("floor exists");

        draft.rename_apartment(0, 0, "".into());

        let (_, found) =
            draft.structure().apartment(id).expect("apartment exists");
        assert!(found.no.is_blank());
        assert!(draft.structure().validate().is_err());
    }

    #[test]
    fn applies_edits_sequentially() {
        let mut draft = draft("B");
        let edits = [
            Edit::AddFloor(floor::Kind::Normal),
            Edit::AddFloor(floor::Kind::Ground),
            Edit::AddFloor(floor::Kind::Ground),
            Edit::AddApartment { floor: 1 },
            Edit::AddApartment { floor: 0 },
            Edit::AddApartment { floor: 7 },
        ];

        let applied = edits
            .into_iter()
            .map(|e| draft.apply(e))
            .collect::<Vec<_>>();

        assert_eq!(applied, [true, true, false, true, true, false]);
        assert_eq!(apartment_numbers(&draft, 0), ["B101"]);
        assert_eq!(apartment_numbers(&draft, 1), ["B001"]);
    }

    #[test]
    fn rebases_onto_saved_version() {
        let mut draft = draft("A");
        let saved = Version::UNSAVED.next();

        draft.rebase(saved);

        assert_eq!(draft.version(), saved);
    }
}
