//! Error taxonomy for the tree crate.
//!
//! All mutation APIs return booleans, lookups return `Option` — nothing in
//! this crate returns `Result<_, TreeError>`. `TreeError` exists to name
//! the two failure modes spec §7 calls out; only the second has a real
//! caller, inside a `debug_assert!` message rather than an `Err`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A dynamically-erased key type was used without supplying a
    /// comparator. No constructor in this crate can actually hit this:
    /// every one requires `K: Ord`, so the dynamic check this variant
    /// names is unreachable by construction.
    #[error("comparator required for non-Ord key type")]
    ComparatorRequired,

    /// A node's family position came out `MalNode` after a structural
    /// mutation (its parent doesn't claim it as a child, or vice versa).
    /// Indicates a bug in the tree implementation itself, never caller
    /// misuse. Constructed only by `TreeCore::debug_assert_well_formed`'s
    /// assertion message, compiled out of release builds.
    #[error("invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type Result<T> = std::result::Result<T, TreeError>;
