use core::any::type_name;

use serde_json::Value;

use crate::Context;
use crate::transformable::Transformable;

// -----------------------------------------------------------------------------
// RawEnum

/// An enum whose cases are identified by a raw scalar value.
///
/// Decoding converts the document value to [`Raw`](RawEnum::Raw) first, then
/// looks the case up. An unknown raw value yields no value.
///
/// Usually derived:
///
/// ```
/// use mapkit_model::derive::RawEnum;
/// use mapkit_model::RawEnum;
///
/// #[derive(RawEnum, Debug, PartialEq)]
/// #[raw_enum(repr = "i32")]
/// enum Level {
///     Low = 1,
///     High,
/// }
///
/// #[derive(RawEnum, Debug, PartialEq)]
/// #[raw_enum(rename_all = "lowercase")]
/// enum Channel {
///     Stable,
///     #[raw_enum(rename = "nightly-build")]
///     Nightly,
/// }
///
/// assert_eq!(Level::from_raw(&2), Some(Level::High));
/// assert_eq!(Channel::Nightly.to_raw(), "nightly-build");
/// assert_eq!(Channel::from_raw(&"stable".to_owned()), Some(Channel::Stable));
/// ```
///
/// Manual implementations add the conversion with
/// [`impl_raw_enum!`](crate::impl_raw_enum).
pub trait RawEnum: Sized + 'static {
    /// The raw value type.
    type Raw: Transformable;

    /// The case for `raw`, if any.
    fn from_raw(raw: &Self::Raw) -> Option<Self>;

    fn to_raw(&self) -> Self::Raw;

    /// Case names, for diagnostics.
    fn variant_names() -> &'static [&'static str] {
        &[]
    }
}

/// Decode a [`RawEnum`] through its raw value.
pub fn raw_enum_from<E: RawEnum>(value: &Value, ctx: &mut Context<'_>) -> Option<E> {
    let raw = E::Raw::transform_from(value, ctx)?;
    let case = E::from_raw(&raw);
    if case.is_none() {
        log::trace!(
            "{value} is not a case of `{}`{}",
            type_name::<E>(),
            ctx.trail,
        );
    }
    case
}

/// Encode a [`RawEnum`] as its raw value.
#[inline]
pub fn raw_enum_to<E: RawEnum>(case: &E, ctx: &mut Context<'_>) -> Option<Value> {
    case.to_raw().plain_value(ctx)
}

/// Implement `Typed` and `Transformable` for a type implementing
/// [`RawEnum`] by hand.
///
/// ```
/// use mapkit_model::{RawEnum, impl_raw_enum};
///
/// #[derive(Debug, PartialEq)]
/// enum Side { Left, Right }
///
/// impl RawEnum for Side {
///     type Raw = char;
///     fn from_raw(raw: &char) -> Option<Self> {
///         match raw {
///             'L' => Some(Side::Left),
///             'R' => Some(Side::Right),
///             _ => None,
///         }
///     }
///     fn to_raw(&self) -> char {
///         match self { Side::Left => 'L', Side::Right => 'R' }
///     }
/// }
///
/// impl_raw_enum!(Side);
/// ```
#[macro_export]
macro_rules! impl_raw_enum {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::info::Typed for $ty {
                fn type_info() -> &'static $crate::info::TypeInfo {
                    static CELL: $crate::info::NonGenericTypeInfoCell =
                        $crate::info::NonGenericTypeInfoCell::new();
                    CELL.get_or_init(|| {
                        $crate::info::TypeInfo::Enum($crate::info::EnumInfo::new::<
                            Self,
                            <Self as $crate::RawEnum>::Raw,
                        >(
                            <Self as $crate::RawEnum>::variant_names()
                        ))
                    })
                }
            }

            impl $crate::Transformable for $ty {
                const KIND: $crate::info::TransformKind = $crate::info::TransformKind::RawEnum;

                #[inline]
                fn transform_from(
                    value: &$crate::__macro_exports::Value,
                    ctx: &mut $crate::Context<'_>,
                ) -> Option<Self> {
                    $crate::transformable::raw_enum_from(value, ctx)
                }

                #[inline]
                fn plain_value(
                    &self,
                    ctx: &mut $crate::Context<'_>,
                ) -> Option<$crate::__macro_exports::Value> {
                    $crate::transformable::raw_enum_to(self, ctx)
                }
            }
        )+
    };
}

// -----------------------------------------------------------------------------
// Tests
