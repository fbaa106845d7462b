//! [`Command`] definition.

pub mod create_block;
pub mod create_deficiency;
pub mod create_site;
pub mod delete_block;
pub mod delete_deficiency;
pub mod save_structure;
pub mod update_deficiency;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_block::CreateBlock, create_deficiency::CreateDeficiency,
    create_site::CreateSite, delete_block::DeleteBlock,
    delete_deficiency::DeleteDeficiency, save_structure::SaveStructure,
    update_deficiency::UpdateDeficiency,
};
