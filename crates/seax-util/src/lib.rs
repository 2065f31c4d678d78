//! seax-util - Foundation types for the seax analyzer
//!
//! Small utilities shared by every other crate in the workspace: typed id
//! spaces for contexts and value options, and random identifier generation
//! for compiler-introduced names.

pub mod id;
pub mod ident;

pub use id::{ContextId, OptionId};
pub use ident::random_ident;
