//! State revision numbers.
//!
//! A [`Version`] counts how many changes have been applied to a piece of
//! state. Presentation layers compare versions to decide whether a re-render
//! is due, and the runtime store uses [`Versioned`] to tell a reduced action
//! that changed state from one that did not.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Revision number of a piece of state.
///
/// Starts at [`Version::INITIAL`] and moves forward by one per applied change.
///
/// # Examples
///
/// ```
/// use listkeeper_core::version::Version;
///
/// let v0 = Version::INITIAL;
/// let v1 = v0.next();
/// assert_eq!(v1, Version::new(1));
/// assert!(v1 > v0);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(u64);

impl Version {
    /// Revision of state no event has touched yet.
    pub const INITIAL: Self = Self(0);

    /// Create a `Version` with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the revision number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The following revision.
    ///
    /// Saturates at `u64::MAX` rather than wrapping back to an older value.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Advance an optional revision slot, treating `None` as [`Version::INITIAL`].
    ///
    /// Returns the new revision.
    ///
    /// ```
    /// use listkeeper_core::version::Version;
    ///
    /// let mut slot = None;
    /// assert_eq!(Version::advance(&mut slot), Version::new(1));
    /// assert_eq!(Version::advance(&mut slot), Version::new(2));
    /// assert_eq!(slot, Some(Version::new(2)));
    /// ```
    pub fn advance(slot: &mut Option<Self>) -> Self {
        let next = slot.unwrap_or(Self::INITIAL).next();
        *slot = Some(next);
        next
    }

    /// Check if this is the initial revision.
    #[must_use]
    pub const fn is_initial(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// State that carries a [`Version`]
///
/// Implementations must advance the version on every change a reader could
/// observe and leave it alone otherwise. `#[derive(State)]` implements this
/// for structs with a `#[version]` field.
pub trait Versioned {
    /// Current version, `None` until the first change
    fn version(&self) -> Option<Version>;
}

impl From<u64> for Version {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        version.0
    }
}
