//! Errors raised by the two fallible [`crate::Stamp`] operations.

/// Domain errors for Interval Tree Clock operations.
///
/// Both variants are signaled synchronously at the call that violates them
/// and leave the caller's existing values untouched — there is no partial
/// state to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ItcError {
    /// Attempted to [`fork`](crate::Stamp::fork) a stamp whose id owns no
    /// share of the interval (`Id::zero()`). An empty share has nothing to
    /// split.
    #[error("cannot fork a stamp with an empty id")]
    EmptyFork,

    /// Attempted to record an [`event`](crate::Stamp::event) on an anonymous
    /// stamp (one whose id is `Id::zero()`). A participant with no owned
    /// share cannot emit new causality.
    #[error("cannot record an event on an anonymous (empty-id) stamp")]
    AnonymousEvent,
}
