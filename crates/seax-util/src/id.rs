//! Typed id spaces.
//!
//! Contexts and value options both need process-unique identities that
//! survive cloning. Typed newtypes prevent mixing the two id spaces.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(0);
static NEXT_OPTION_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a symbolic context.
///
/// Two variables with the same source name declared in different contexts
/// compare unequal because their `ContextId`s differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    /// Returns a fresh, process-unique context id.
    pub fn fresh() -> Self {
        ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx{}", self.0)
    }
}

/// Identity of a value option.
///
/// Options are compared by identity, not by content, so that two options
/// with identical condition and value can still be told apart inside a
/// mutable option list. Cloning an option keeps its id; only
/// [`OptionId::fresh`] mints a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(u64);

impl OptionId {
    /// Returns a fresh, process-unique option id.
    pub fn fresh() -> Self {
        OptionId(NEXT_OPTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "opt{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_ids_are_unique() {
        let a = ContextId::fresh();
        let b = ContextId::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn option_ids_survive_copy() {
        let a = OptionId::fresh();
        let b = a;
        assert_eq!(a, b);
    }
}
