use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::info::{Type, TypeInfo, Typed};
use crate::transformable::DynTransformable;

// -----------------------------------------------------------------------------
// Projection

/// A step from a record to one of its embedded base records.
#[derive(Clone, Copy)]
pub struct Projection {
    get: for<'a> fn(&'a dyn Any) -> Option<&'a dyn Any>,
    get_mut: for<'a> fn(&'a mut dyn Any) -> Option<&'a mut dyn Any>,
}

impl Projection {
    pub const fn new(
        get: for<'a> fn(&'a dyn Any) -> Option<&'a dyn Any>,
        get_mut: for<'a> fn(&'a mut dyn Any) -> Option<&'a mut dyn Any>,
    ) -> Self {
        Self { get, get_mut }
    }

    #[inline]
    pub fn get<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.get)(record)
    }

    #[inline]
    pub fn get_mut<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        (self.get_mut)(record)
    }
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Projection")
    }
}

// -----------------------------------------------------------------------------
// FieldAccessor

/// Reads and writes one field of a type-erased record.
///
/// Fields inherited from a base record are reached through one
/// [`Projection`] per level of inheritance, so callers never care where a
/// field is stored.
#[derive(Clone)]
pub struct FieldAccessor {
    through: Vec<Projection>,
    get: for<'a> fn(&'a dyn Any) -> Option<&'a dyn DynTransformable>,
    get_mut: for<'a> fn(&'a mut dyn Any) -> Option<&'a mut dyn DynTransformable>,
}

impl FieldAccessor {
    pub const fn new(
        get: for<'a> fn(&'a dyn Any) -> Option<&'a dyn DynTransformable>,
        get_mut: for<'a> fn(&'a mut dyn Any) -> Option<&'a mut dyn DynTransformable>,
    ) -> Self {
        Self {
            through: Vec::new(),
            get,
            get_mut,
        }
    }

    /// Returns the field of `record`, or `None` if `record` is not of the
    /// type this accessor was made for.
    pub fn get<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn DynTransformable> {
        let mut record = record;
        for projection in &self.through {
            record = projection.get(record)?;
        }
        (self.get)(record)
    }

    /// Mutable version of [`get`](Self::get).
    pub fn get_mut<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn DynTransformable> {
        let mut record = record;
        for projection in &self.through {
            record = projection.get_mut(record)?;
        }
        (self.get_mut)(record)
    }

    pub(crate) fn behind(&self, projection: Projection) -> Self {
        let mut through = Vec::with_capacity(self.through.len() + 1);
        through.push(projection);
        through.extend_from_slice(&self.through);
        Self {
            through,
            get: self.get,
            get_mut: self.get_mut,
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.through.len()
    }
}

impl fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// FieldInfo

/// Descriptor of one record field.
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: &'static str,
    key: &'static str,
    index: usize,
    ty: Type,
    // `TypeInfo` is created on first access; using a function pointer delays it.
    type_info: fn() -> &'static TypeInfo,
    accessor: FieldAccessor,
}

impl FieldInfo {
    /// Describe a field of type `T` called `name`.
    ///
    /// The index is assigned when the field is added to a
    /// [`ModelInfoBuilder`](crate::info::ModelInfoBuilder).
    pub fn new<T: Typed>(name: &'static str, accessor: FieldAccessor) -> Self {
        Self {
            name,
            key: name,
            index: 0,
            ty: Type::of::<T>(),
            type_info: T::type_info,
            accessor,
        }
    }

    /// Use `key` instead of the field name in documents.
    pub fn with_key(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    /// The field identifier in source.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The document key of the field when no path is registered.
    #[inline]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Position among all fields of the record, base record fields first.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub const fn accessor(&self) -> &FieldAccessor {
        &self.accessor
    }

    pub(crate) fn at(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub(crate) fn behind(&self, projection: Projection) -> Self {
        Self {
            accessor: self.accessor.behind(projection),
            ..self.clone()
        }
    }
}
