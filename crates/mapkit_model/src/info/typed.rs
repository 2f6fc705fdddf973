use core::any::type_name;

use crate::MappingError;
use crate::info::{ModelInfo, TypeInfo};

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to compile-time type information.
///
/// Implemented for every supported field type, and by `#[derive(Model)]` and
/// `#[derive(RawEnum)]`. Manual implementations cache the info in one of the
/// cells of this module.
///
/// # Examples
///
/// ```
/// use mapkit_model::info::{NonGenericTypeInfoCell, OpaqueInfo, TypeInfo, Typed};
///
/// struct Celsius(f64);
///
/// impl Typed for Celsius {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Custom(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert!(Celsius::type_info().ty().is::<Celsius>());
/// ```
pub trait Typed: 'static {
    /// Returns the compile-time info for the underlying type.
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// describe

/// Returns the field descriptors of the record `T`.
///
/// Fails with [`MappingError::NotIntrospectable`] if `T` is not a record.
///
/// ```
/// use mapkit_model::derive::Model;
/// use mapkit_model::describe;
///
/// #[derive(Model, Default)]
/// struct Point { x: i32, y: i32 }
///
/// let info = describe::<Point>().unwrap();
/// let names: Vec<_> = info.iter().map(|f| f.name()).collect();
/// assert_eq!(names, ["x", "y"]);
///
/// assert!(describe::<i32>().is_err());
/// ```
pub fn describe<T: Typed>() -> Result<&'static ModelInfo, MappingError> {
    let info = describe_info(T::type_info())?;
    // `Box<M>` shares the info of `M`, but its fields are not reachable
    // through it.
    if info.ty().is::<T>() {
        Ok(info)
    } else {
        Err(MappingError::NotIntrospectable {
            type_path: type_name::<T>(),
        })
    }
}

/// Returns the field descriptors behind a [`TypeInfo`], if it is a record.
pub fn describe_info(info: &'static TypeInfo) -> Result<&'static ModelInfo, MappingError> {
    info.as_model()
        .map_err(|_| MappingError::NotIntrospectable {
            type_path: info.type_path(),
        })
}
