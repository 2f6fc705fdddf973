//! Static storage for type descriptors.
//!
//! A non-generic type stores its info in a `static` inside its `Typed` impl,
//! backed by a [`OnceLock`]. In a generic impl that `static` is shared by
//! every instantiation, so [`GenericTypeCell`] keys the infos by [`TypeId`]
//! and leaks each one to get a `'static` reference.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use mapkit_utils::TypeIdMap;

use crate::info::{ModelInfo, TypeInfo};

mod sealed {
    use crate::info::{ModelInfo, TypeInfo};

    pub trait TypedProperty: Send + Sync + 'static {}

    impl TypedProperty for TypeInfo {}
    impl TypedProperty for ModelInfo {}
}

use sealed::TypedProperty;

// -----------------------------------------------------------------------------
// NonGenericTypeCell

/// Storage of the info of one non-generic type.
pub struct NonGenericTypeCell<T: TypedProperty>(OnceLock<T>);

/// Storage of the [`TypeInfo`] of one non-generic type.
///
/// See [`Typed`](crate::info::Typed) for an example.
pub type NonGenericTypeInfoCell = NonGenericTypeCell<TypeInfo>;

/// Storage of the [`ModelInfo`] of one non-generic record.
pub type NonGenericModelInfoCell = NonGenericTypeCell<ModelInfo>;

impl<T: TypedProperty> NonGenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, creating it with `f` on first access.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeCell

/// Storage of the infos of every instantiation of a generic type.
pub struct GenericTypeCell<T: TypedProperty>(RwLock<TypeIdMap<&'static T>>);

/// Storage of the [`TypeInfo`]s of a generic type.
///
/// ```
/// use mapkit_model::info::{GenericTypeInfoCell, OpaqueInfo, TypeInfo, Typed};
///
/// struct Tagged<T>(T);
///
/// impl<T: 'static> Typed for Tagged<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::Custom(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert!(<Tagged<u8>>::type_info().ty().is::<Tagged<u8>>());
/// assert!(<Tagged<i64>>::type_info().ty().is::<Tagged<i64>>());
/// ```
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

/// Storage of the [`ModelInfo`]s of a generic record.
pub type GenericModelInfoCell = GenericTypeCell<ModelInfo>;

impl<T: TypedProperty> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info stored for `G`, creating it with `f` on first access.
    ///
    /// `f` runs without holding the lock, so it may describe other types
    /// sharing this cell.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &'static T {
        let type_id = TypeId::of::<G>();
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &'static T {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}
