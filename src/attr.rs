//! Capability objects for node and edge attributes.
//!
//! A [`Graph`](crate::Graph) treats its attributes as opaque. The two hooks a
//! caller may install decide everything the graph ever does with them:
//!
//! - [`AttrComparator`] answers whether two attributes are compatible during
//!   matching. When no comparator is installed, every pair is compatible and
//!   matching is purely structural.
//! - [`AttrDestroyer`] is invoked exactly once per owned attribute when the
//!   graph is torn down. When absent, attributes are simply dropped, which is
//!   the right thing for plain owned data; a destroyer matters when the
//!   attribute is a handle into storage the graph does not own.
//!
//! Hooks installed on a graph replace (and drop) any previously installed
//! hook. Comparators must be re-entrant when a graph is shared across search
//! workers, which the `Send + Sync` bounds enforce.

/// Compatibility test between an attribute of the first graph and an
/// attribute of the second.
pub trait AttrComparator<T>: Send + Sync {
    fn compatible(&self, a: &T, b: &T) -> bool;
}

/// Teardown hook, called once per attribute the graph owns.
pub trait AttrDestroyer<T>: Send + Sync {
    fn destroy(&self, attr: T);
}

/// Adapter turning a plain function into an [`AttrComparator`].
pub struct FnComparator<T>(pub fn(&T, &T) -> bool);

impl<T> AttrComparator<T> for FnComparator<T> {
    fn compatible(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

/// Adapter turning a plain function into an [`AttrDestroyer`].
pub struct FnDestroyer<T>(pub fn(T));

impl<T> AttrDestroyer<T> for FnDestroyer<T> {
    fn destroy(&self, attr: T) {
        (self.0)(attr)
    }
}
