//! Domain definitions.

pub mod block;
pub mod deficiency;
pub mod site;
pub mod structure;

pub use self::{
    block::Block, deficiency::Deficiency, site::Site, structure::Structure,
};
