//! [`Block`] read model definition.
//!
//! [`Block`]: crate::domain::Block

pub mod list {
    //! [`Block`]s list definitions.

    use crate::domain::site;
    #[cfg(doc)]
    use crate::domain::{block, Block, Site};

    /// Selector of the not deleted [`Block`]s of a [`Site`], ordered by their
    /// [`block::Name`]s.
    #[derive(Clone, Copy, Debug)]
    pub struct Selector {
        /// ID of the [`Site`] to list [`Block`]s of.
        pub site_id: site::Id,
    }
}
