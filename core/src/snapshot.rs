//! Versioned, immutable state snapshots.
//!
//! A store never hands out mutable access to its state. Every accepted action
//! produces a brand new [`Snapshot`] carrying the next [`Version`]; consumers
//! compare versions (or allocations) to decide whether anything changed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Monotonic version number of a published snapshot.
///
/// The initial state of a store is published at [`Version::INITIAL`]. Each
/// accepted action bumps the version by exactly one; rejected actions leave it
/// untouched.
///
/// # Examples
///
/// ```
/// use snapstore_core::snapshot::Version;
///
/// let v0 = Version::INITIAL;
/// assert_eq!(v0.next(), Version::new(1));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(u64);

impl Version {
    /// The version of the state a store was created with.
    pub const INITIAL: Self = Self(0);

    /// Create a new `Version` with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the version number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Get the next version (current + 1).
    ///
    /// Saturates at `u64::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Check if this is the initial version (0).
    #[must_use]
    pub const fn is_initial(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
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

/// An immutable state value published at a given [`Version`].
///
/// Cloning a snapshot is cheap: the state lives behind an [`Arc`] and is
/// shared between every clone.
///
/// # Examples
///
/// ```
/// use snapstore_core::snapshot::{Snapshot, Version};
///
/// let first = Snapshot::initial(vec!["a"]);
/// let second = first.succeed(vec!["a", "b"]);
///
/// assert_eq!(second.version(), Version::new(1));
/// assert!(second.is_newer_than(&first));
/// assert_eq!(first.state(), &vec!["a"]);
/// ```
pub struct Snapshot<S> {
    version: Version,
    state: Arc<S>,
}

impl<S> Snapshot<S> {
    /// Wrap the initial state of a store.
    #[must_use]
    pub fn initial(state: S) -> Self {
        Self::new(Version::INITIAL, state)
    }

    /// Wrap `state` at an explicit version.
    #[must_use]
    pub fn new(version: Version, state: S) -> Self {
        Self {
            version,
            state: Arc::new(state),
        }
    }

    /// Build the snapshot that follows this one.
    #[must_use]
    pub fn succeed(&self, state: S) -> Self {
        Self::new(self.version.next(), state)
    }

    /// Version this snapshot was published at.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Borrow the state.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Shared handle to the state.
    #[must_use]
    pub fn share(&self) -> Arc<S> {
        Arc::clone(&self.state)
    }

    /// True when both snapshots point at the very same state allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.version == other.version && Arc::ptr_eq(&self.state, &other.state)
    }

    /// True when this snapshot was published after `other`.
    #[must_use]
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self.version > other.version
    }
}

impl<S> Clone for Snapshot<S> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Snapshot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("version", &self.version)
            .field("state", &self.state)
            .finish()
    }
}

impl<S> std::ops::Deref for Snapshot<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_next_and_initial() {
        assert!(Version::INITIAL.is_initial());
        assert_eq!(Version::new(4).next(), Version::new(5));
        assert_eq!(Version::new(u64::MAX).next(), Version::new(u64::MAX));
        assert_eq!(u64::from(Version::from(7)), 7);
    }

    #[test]
    fn version_display() {
        assert_eq!(Version::new(3).to_string(), "v3");
    }

    #[test]
    fn clones_share_state() {
        let snapshot = Snapshot::initial(String::from("hello"));
        let clone = snapshot.clone();

        assert!(snapshot.ptr_eq(&clone));
        assert!(Arc::ptr_eq(&snapshot.share(), &clone.share()));
    }

    #[test]
    fn succeed_leaves_previous_untouched() {
        let first = Snapshot::initial(1_u32);
        let second = first.succeed(2);

        assert_eq!(*first.state(), 1);
        assert_eq!(*second, 2);
        assert_eq!(second.version(), Version::new(1));
        assert!(second.is_newer_than(&first));
        assert!(!first.ptr_eq(&second));
    }

    #[test]
    fn equal_values_are_not_the_same_snapshot() {
        let a = Snapshot::initial(5_u8);
        let b = Snapshot::initial(5_u8);

        assert!(!a.ptr_eq(&b));
    }
}
