//! Reusable field transforms, registered with
//! [`Mapper::transform`](crate::Mapper::transform).

use core::fmt;
use core::marker::PhantomData;

use serde_json::Value;

use crate::{Context, MappingConfig, RawEnum, Transformable};

// -----------------------------------------------------------------------------
// Modules

#[cfg(feature = "time")]
mod date;

#[cfg(feature = "base64")]
mod data;

#[cfg(feature = "decimal")]
mod decimal;

mod hex_color;

// -----------------------------------------------------------------------------
// Exports

#[cfg(feature = "time")]
pub use date::{DateFormatTransform, DateTransform};

#[cfg(feature = "base64")]
pub use data::DataTransform;

#[cfg(feature = "decimal")]
pub use decimal::DecimalTransform;

pub use hex_color::{HexColorTransform, Rgba};

// -----------------------------------------------------------------------------
// Transform

/// A two-way conversion between a document value and a field value.
///
/// Either direction may have no result, which leaves the field untouched
/// when decoding and omits it when encoding.
pub trait Transform {
    type Object: 'static;

    fn from_document(&self, value: &Value) -> Option<Self::Object>;

    fn to_document(&self, object: &Self::Object) -> Option<Value>;
}

// -----------------------------------------------------------------------------
// TransformOf

/// A [`Transform`] made of two closures.
///
/// ```
/// use mapkit_model::transform::{Transform, TransformOf};
/// use serde_json::{Value, json};
///
/// let cents = TransformOf::new(
///     |v: &Value| v.as_f64().map(|f| (f * 100.0).round() as i64),
///     |c: &i64| Some(json!(*c as f64 / 100.0)),
/// );
///
/// assert_eq!(cents.from_document(&json!(12.5)), Some(1250));
/// assert_eq!(cents.to_document(&1250), Some(json!(12.5)));
/// ```
pub struct TransformOf<O, D, E> {
    from: D,
    to: E,
    _marker: PhantomData<fn() -> O>,
}

impl<O, D, E> TransformOf<O, D, E>
where
    D: Fn(&Value) -> Option<O>,
    E: Fn(&O) -> Option<Value>,
{
    pub fn new(from: D, to: E) -> Self {
        Self {
            from,
            to,
            _marker: PhantomData,
        }
    }
}

impl<O, D, E> Transform for TransformOf<O, D, E>
where
    O: 'static,
    D: Fn(&Value) -> Option<O>,
    E: Fn(&O) -> Option<Value>,
{
    type Object = O;

    #[inline]
    fn from_document(&self, value: &Value) -> Option<O> {
        (self.from)(value)
    }

    #[inline]
    fn to_document(&self, object: &O) -> Option<Value> {
        (self.to)(object)
    }
}

impl<O, D, E> fmt::Debug for TransformOf<O, D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TransformOf")
    }
}

// -----------------------------------------------------------------------------
// EnumTransform

/// Converts a [`RawEnum`] through its raw value.
///
/// Useful for enums used as `T` in a field whose own conversion differs, or
/// together with a path override. The raw value is converted under the
/// config the transform was built with, not the one of the running decode:
/// pass [`Mapper::options`](crate::Mapper::options) to
/// [`with_config`](Self::with_config) to follow it.
pub struct EnumTransform<E> {
    config: MappingConfig,
    _marker: PhantomData<fn() -> E>,
}

impl<E> EnumTransform<E> {
    /// A transform converting raw values under [`MappingConfig::new`].
    pub const fn new() -> Self {
        Self::with_config(MappingConfig::new())
    }

    pub const fn with_config(config: MappingConfig) -> Self {
        Self {
            config,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn config(&self) -> &MappingConfig {
        &self.config
    }
}

impl<E> Default for EnumTransform<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EnumTransform<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumTransform")
            .field("config", &self.config)
            .finish()
    }
}

impl<E: RawEnum> Transform for EnumTransform<E> {
    type Object = E;

    fn from_document(&self, value: &Value) -> Option<E> {
        let raw = E::Raw::transform_from(value, &mut Context::new(&self.config))?;
        E::from_raw(&raw)
    }

    fn to_document(&self, object: &E) -> Option<Value> {
        object.to_raw().plain_value(&mut Context::new(&self.config))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{EnumTransform, Transform};
    use crate::derive::Model;
    use crate::{Decoder, DeserializeOptions, Mapper, MappingConfig, MappingHooks, Model, RawEnum};

    #[derive(Debug, PartialEq)]
    enum Size {
        Small,
        Large,
    }

    impl RawEnum for Size {
        type Raw = String;

        fn from_raw(raw: &String) -> Option<Self> {
            match raw.as_str() {
                "S" => Some(Self::Small),
                "L" => Some(Self::Large),
                _ => None,
            }
        }

        fn to_raw(&self) -> String {
            match self {
                Self::Small => "S".into(),
                Self::Large => "L".into(),
            }
        }
    }

    crate::impl_raw_enum!(Size);

    #[test]
    fn enum_transform() {
        let t = EnumTransform::<Size>::new();
        assert_eq!(t.from_document(&json!("L")), Some(Size::Large));
        assert_eq!(t.from_document(&json!("M")), None);
        assert_eq!(t.to_document(&Size::Small), Some(json!("S")));
    }

    #[test]
    fn enum_transform_follows_the_mapper_options() {
        #[derive(Model, Default)]
        #[model(MappingHooks = false)]
        struct Shirt {
            size: Option<Size>,
        }

        impl MappingHooks for Shirt {
            fn mapping(&self, mapper: &mut Mapper<'_, Self>) {
                let config = MappingConfig::new().with_deserialize_options(mapper.options());
                mapper
                    .path(Self::FIELDS.size, "detail.size")
                    .transform_optional(Self::FIELDS.size, EnumTransform::with_config(config));
            }
        }

        let config = MappingConfig::new().with_deserialize_options(DeserializeOptions::all());
        let doc = json!({ "Detail": { "size": "L" } });
        let shirt: Shirt = Decoder::new(&config)
            .decode(doc.as_object().unwrap())
            .unwrap();
        assert_eq!(shirt.size, Some(Size::Large));
        assert_eq!(
            EnumTransform::<Size>::with_config(config).config(),
            &config
        );
    }
}
