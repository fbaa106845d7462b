//! [`Deficiency`] read model definition.
//!
//! [`Deficiency`]: crate::domain::Deficiency

pub mod list {
    //! [`Deficiency`] list definitions.

    use crate::domain::{
        block,
        deficiency::{Priority, Status},
        structure::apartment,
        Deficiency,
    };
    #[cfg(doc)]
    use crate::domain::{structure::Apartment, Block};

    /// Selector of the [`Deficiency`] records of a [`Block`], from the newest
    /// to the oldest.
    #[derive(Clone, Copy, Debug)]
    pub struct Selector {
        /// ID of the [`Block`] to list [`Deficiency`] records of.
        pub block_id: block::Id,

        /// [`Filter`] to apply.
        pub filter: Filter,
    }

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// Only [`Deficiency`] records about this [`Apartment`].
        pub apartment_id: Option<apartment::Id>,

        /// Only [`Deficiency`] records with this [`Status`].
        pub status: Option<Status>,

        /// Only [`Deficiency`] records with this [`Priority`].
        pub priority: Option<Priority>,
    }

    impl Filter {
        /// Checks whether the provided [`Deficiency`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, d: &Deficiency) -> bool {
            self.apartment_id.map_or(true, |id| d.apartment_id == id)
                && self.status.map_or(true, |s| d.status == s)
                && self.priority.map_or(true, |p| d.priority == p)
        }
    }
}
