//! Read entities definitions.

pub mod block;
pub mod deficiency;
