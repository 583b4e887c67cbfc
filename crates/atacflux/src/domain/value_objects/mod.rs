//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod gene_role;
mod mark_type;

pub use gene_role::*;
pub use mark_type::*;
