//! Type descriptors.
//!
//! Every [`Transformable`](crate::Transformable) type exposes a [`TypeInfo`]
//! through [`Typed`], created once and cached in a static cell. Records get a
//! [`ModelInfo`] listing their fields in declaration order, base record
//! fields first.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod field_info;
mod model_info;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericModelInfoCell, GenericTypeInfoCell};
pub use cell::{NonGenericModelInfoCell, NonGenericTypeInfoCell};
pub use field_info::{FieldAccessor, FieldInfo, Projection};
pub use model_info::{BaseLink, ModelHooks, ModelInfo, ModelInfoBuilder};
pub use type_info::{EnumInfo, ListInfo, MapInfo, OpaqueInfo, OptionInfo};
pub use type_info::{KindError, TransformKind, Type, TypeInfo};
pub use typed::{Typed, describe, describe_info};
