use core::any::{TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

use thiserror::Error;

use crate::info::{ModelInfo, Typed};

// -----------------------------------------------------------------------------
// Type

/// The identity of a type: its [`TypeId`] and its path for diagnostics.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
}

impl Type {
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: type_name::<T>(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The full path, as given by [`core::any::type_name`].
    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

// -----------------------------------------------------------------------------
// TransformKind

/// Conversion strategy of a type.
///
/// The order of the variants is the order in which strategies are tried when
/// a type could qualify for more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransformKind {
    /// A user type with its own conversion.
    Custom,
    /// A type that already is a document value.
    Bridged,
    /// Numbers, booleans, strings.
    Scalar,
    /// `Option<T>`.
    Optional,
    /// Ordered collections.
    List,
    /// Unordered collections of unique items.
    Set,
    /// String keyed collections.
    Map,
    /// Enums backed by a raw scalar.
    RawEnum,
    /// Records with a field descriptor.
    Model,
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Returned by the `as_*` casts of [`TypeInfo`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("transform kind mismatch: expected {expected}, received {received}")]
pub struct KindError {
    pub expected: TransformKind,
    pub received: TransformKind,
}

// -----------------------------------------------------------------------------
// Leaf infos

/// Info of a type converted as a whole.
#[derive(Debug, Clone)]
pub struct OpaqueInfo {
    ty: Type,
}

impl OpaqueInfo {
    #[inline]
    pub fn new<T: ?Sized + 'static>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}

/// Info of `Option<T>`.
#[derive(Debug, Clone)]
pub struct OptionInfo {
    ty: Type,
    // Delayed, `T` may be the type being described.
    inner: fn() -> &'static TypeInfo,
}

impl OptionInfo {
    #[inline]
    pub fn new<O: 'static, T: Typed>() -> Self {
        Self {
            ty: Type::of::<O>(),
            inner: T::type_info,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn inner(&self) -> &'static TypeInfo {
        (self.inner)()
    }
}

/// Info of lists and sets.
#[derive(Debug, Clone)]
pub struct ListInfo {
    ty: Type,
    item: fn() -> &'static TypeInfo,
}

impl ListInfo {
    #[inline]
    pub fn new<L: 'static, T: Typed>() -> Self {
        Self {
            ty: Type::of::<L>(),
            item: T::type_info,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn item(&self) -> &'static TypeInfo {
        (self.item)()
    }
}

/// Info of keyed collections.
#[derive(Debug, Clone)]
pub struct MapInfo {
    ty: Type,
    key: Type,
    value: fn() -> &'static TypeInfo,
}

impl MapInfo {
    #[inline]
    pub fn new<M: 'static, K: 'static, V: Typed>() -> Self {
        Self {
            ty: Type::of::<M>(),
            key: Type::of::<K>(),
            value: V::type_info,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn key(&self) -> &Type {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &'static TypeInfo {
        (self.value)()
    }
}

/// Info of an enum converted through its raw value.
#[derive(Debug, Clone)]
pub struct EnumInfo {
    ty: Type,
    raw: fn() -> &'static TypeInfo,
    variants: &'static [&'static str],
}

impl EnumInfo {
    #[inline]
    pub fn new<E: 'static, R: Typed>(variants: &'static [&'static str]) -> Self {
        Self {
            ty: Type::of::<E>(),
            raw: R::type_info,
            variants,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn raw(&self) -> &'static TypeInfo {
        (self.raw)()
    }

    #[inline]
    pub const fn variant_names(&self) -> &'static [&'static str] {
        self.variants
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time info of a transformable type, one variant per strategy.
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Custom(OpaqueInfo),
    Bridged(OpaqueInfo),
    Scalar(OpaqueInfo),
    Optional(OptionInfo),
    List(ListInfo),
    Set(ListInfo),
    Map(MapInfo),
    Enum(EnumInfo),
    Model(&'static ModelInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $variant:ident($info:ty)) => {
        pub const fn $name(&self) -> Result<&$info, KindError> {
            match self {
                Self::$variant(info) => Ok(info),
                _ => Err(KindError {
                    expected: TransformKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_optional: Optional => Optional(OptionInfo));
    impl_cast_method!(as_map: Map => Map(MapInfo));
    impl_cast_method!(as_enum: RawEnum => Enum(EnumInfo));

    /// Returns the list info of both lists and sets.
    pub const fn as_list(&self) -> Result<&ListInfo, KindError> {
        match self {
            Self::List(info) | Self::Set(info) => Ok(info),
            _ => Err(KindError {
                expected: TransformKind::List,
                received: self.kind(),
            }),
        }
    }

    pub const fn as_model(&self) -> Result<&'static ModelInfo, KindError> {
        match self {
            Self::Model(info) => Ok(*info),
            _ => Err(KindError {
                expected: TransformKind::Model,
                received: self.kind(),
            }),
        }
    }

    pub const fn kind(&self) -> TransformKind {
        match self {
            Self::Custom(_) => TransformKind::Custom,
            Self::Bridged(_) => TransformKind::Bridged,
            Self::Scalar(_) => TransformKind::Scalar,
            Self::Optional(_) => TransformKind::Optional,
            Self::List(_) => TransformKind::List,
            Self::Set(_) => TransformKind::Set,
            Self::Map(_) => TransformKind::Map,
            Self::Enum(_) => TransformKind::RawEnum,
            Self::Model(_) => TransformKind::Model,
        }
    }

    pub const fn ty(&self) -> &Type {
        match self {
            Self::Custom(info) | Self::Bridged(info) | Self::Scalar(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::List(info) | Self::Set(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::Model(info) => info.ty(),
        }
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty().path()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{TransformKind, TypeInfo};
    use crate::info::Typed;

    #[test]
    fn kind_priority_order() {
        use TransformKind::*;
        let order = [Custom, Bridged, Scalar, Optional, List, Set, Map, RawEnum, Model];
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn cast_methods() {
        let info = <Option<i32>>::type_info();
        assert_eq!(info.kind(), TransformKind::Optional);
        assert!(info.as_optional().unwrap().inner().ty().is::<i32>());

        let err = info.as_model().unwrap_err();
        assert_eq!(err.expected, TransformKind::Model);
        assert_eq!(err.received, TransformKind::Optional);

        let set = <std::collections::BTreeSet<u8>>::type_info();
        assert!(matches!(set, TypeInfo::Set(_)));
        assert!(set.as_list().unwrap().item().ty().is::<u8>());
    }
}
