//! seax-exec - Symbolic Execution Kernel
//!
//! The stateful half of the analyzer. A stack of lexical contexts rooted
//! at a global scope tracks, per variable, the set of conditional values
//! accumulated along every feasible path; the engine is the facade the
//! driver calls while walking a function body. The optionalizer flattens
//! the resulting symbolic trees into the feasible `(condition, value)`
//! alternatives, consulting the solver to discard unsatisfiable paths.

pub mod context;
pub mod engine;
pub mod optionalize;


pub use context::{BranchSide, Context, ContextData, ContextKind};
pub use engine::{Engine, FnSig};
pub use optionalize::{enumerate, feasible, flatten_condition, optionalize};
