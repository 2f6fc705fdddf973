//! Conversion between document values and typed values.
//!
//! [`Transformable`] is implemented for every supported field type. Its
//! [`KIND`](Transformable::KIND) classifies the type into one of the
//! conversion strategies of [`TransformKind`](crate::info::TransformKind):
//!
//! - user types implement it by hand and keep the default `Custom` kind,
//! - `serde_json` values pass through (`Bridged`),
//! - numbers, booleans, strings and `char` coerce between each other (`Scalar`),
//! - `Option<T>`, lists, sets and string keyed maps recurse into their items,
//! - enums with a raw value go through [`RawEnum`],
//! - records deriving `Model` recurse through the decoder and encoder.
//!
//! Conversions never fail hard: a value that does not fit yields `None`.

use alloc::boxed::Box;
use core::any::Any;

use serde_json::Value;

use crate::Context;
use crate::info::{TransformKind, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// Modules

mod bridged;
mod collections;
mod keyed;
mod raw_enum;
mod scalar;
mod wrapper;

pub mod dispatch;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use collections::kind_of;
pub use keyed::MapKey;
pub use raw_enum::{RawEnum, raw_enum_from, raw_enum_to};

// -----------------------------------------------------------------------------
// Transformable

/// A type that converts from and to a document value.
///
/// # Custom types
///
/// ```
/// use mapkit_model::info::{NonGenericTypeInfoCell, OpaqueInfo, TypeInfo, Typed};
/// use mapkit_model::{Context, Transformable};
/// use serde_json::Value;
///
/// #[derive(Debug, PartialEq)]
/// struct Version(u32, u32);
///
/// impl Typed for Version {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Custom(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// impl Transformable for Version {
///     fn transform_from(value: &Value, _: &mut Context<'_>) -> Option<Self> {
///         let (major, minor) = value.as_str()?.split_once('.')?;
///         Some(Version(major.parse().ok()?, minor.parse().ok()?))
///     }
///
///     fn plain_value(&self, _: &mut Context<'_>) -> Option<Value> {
///         Some(Value::String(format!("{}.{}", self.0, self.1)))
///     }
/// }
///
/// let config = mapkit_model::MappingConfig::new();
/// let mut ctx = Context::new(&config);
/// let v = Version::transform_from(&"1.4".into(), &mut ctx);
/// assert_eq!(v, Some(Version(1, 4)));
/// ```
pub trait Transformable: Typed + Sized {
    /// Conversion strategy of the type.
    const KIND: TransformKind = TransformKind::Custom;

    /// Convert a document value, `None` if it does not fit.
    fn transform_from(value: &Value, ctx: &mut Context<'_>) -> Option<Self>;

    /// Convert to a document value, `None` if there is no representation.
    fn plain_value(&self, ctx: &mut Context<'_>) -> Option<Value>;
}

// -----------------------------------------------------------------------------
// DynTransformable

/// Object safe view of a [`Transformable`] value, used to read and write
/// record fields without knowing their type.
pub trait DynTransformable: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn type_info_dyn(&self) -> &'static TypeInfo;

    /// Convert `value` and store it. Returns `false` and keeps the current
    /// value if the conversion fails.
    fn assign_from(&mut self, value: &Value, ctx: &mut Context<'_>) -> bool;

    /// Store an already converted value. Returns `false` and keeps the
    /// current value if `value` is of another type.
    fn assign_boxed(&mut self, value: Box<dyn Any>) -> bool;

    fn plain_value_dyn(&self, ctx: &mut Context<'_>) -> Option<Value>;
}

impl<T: Transformable> DynTransformable for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn type_info_dyn(&self) -> &'static TypeInfo {
        T::type_info()
    }

    fn assign_from(&mut self, value: &Value, ctx: &mut Context<'_>) -> bool {
        match T::transform_from(value, ctx) {
            Some(v) => {
                *self = v;
                true
            }
            None => false,
        }
    }

    fn assign_boxed(&mut self, value: Box<dyn Any>) -> bool {
        match value.downcast::<T>() {
            Ok(v) => {
                *self = *v;
                true
            }
            Err(_) => false,
        }
    }

    #[inline]
    fn plain_value_dyn(&self, ctx: &mut Context<'_>) -> Option<Value> {
        self.plain_value(ctx)
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Implement [`Typed`] for non-generic types with a leaf [`TypeInfo`] variant.
#[doc(hidden)]
#[macro_export]
macro_rules! __impl_leaf_typed {
    ($variant:ident: $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::info::Typed for $ty {
                fn type_info() -> &'static $crate::info::TypeInfo {
                    static CELL: $crate::info::NonGenericTypeInfoCell =
                        $crate::info::NonGenericTypeInfoCell::new();
                    CELL.get_or_init(|| {
                        $crate::info::TypeInfo::$variant($crate::info::OpaqueInfo::new::<Self>())
                    })
                }
            }
        )+
    };
}

/// Implement [`Typed`] for a user type converted by hand.
///
/// ```
/// use mapkit_model::{Context, Transformable, impl_custom_typed};
/// use serde_json::Value;
///
/// struct Flag(bool);
///
/// impl_custom_typed!(Flag);
///
/// impl Transformable for Flag {
///     fn transform_from(value: &Value, _: &mut Context<'_>) -> Option<Self> {
///         Some(Flag(value.as_str()? == "on"))
///     }
///     fn plain_value(&self, _: &mut Context<'_>) -> Option<Value> {
///         Some(if self.0 { "on" } else { "off" }.into())
///     }
/// }
/// ```
#[macro_export]
macro_rules! impl_custom_typed {
    ($($ty:ty),+ $(,)?) => {
        $crate::__impl_leaf_typed!(Custom: $($ty),+);
    };
}
