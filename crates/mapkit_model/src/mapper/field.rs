use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::model::Inherits;

// -----------------------------------------------------------------------------
// Field

/// Identity of the field of type `T` in the record `M`.
///
/// Generated by `#[derive(Model)]` and reached through
/// `<M as Model>::FIELDS`. Overrides registered on a [`Mapper`] are keyed by
/// this identity, not by the field name, so they follow the field through
/// renames and moves of the record.
///
/// [`Mapper`]: crate::Mapper
pub struct Field<M, T> {
    index: usize,
    name: &'static str,
    _marker: PhantomData<fn(&M) -> &T>,
}

impl<M, T> Field<M, T> {
    #[inline]
    pub const fn new(index: usize, name: &'static str) -> Self {
        Self {
            index,
            name,
            _marker: PhantomData,
        }
    }

    /// Position of the field among all fields of `M`.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The same field seen from a record embedding `M` as its base.
    ///
    /// Base fields are described first, so the index is unchanged.
    #[inline]
    pub const fn inherit<D: Inherits<M>>(self) -> Field<D, T> {
        Field::new(self.index, self.name)
    }
}

impl<M, T> Clone for Field<M, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, T> Copy for Field<M, T> {}

impl<M, T> PartialEq for Field<M, T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<M, T> Eq for Field<M, T> {}

impl<M, T> Hash for Field<M, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<M, T> fmt::Debug for Field<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("index", &self.index)
            .field("name", &self.name)
            .finish()
    }
}
