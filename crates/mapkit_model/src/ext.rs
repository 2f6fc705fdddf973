use alloc::string::String;
use alloc::vec::Vec;

use serde_json::{Map, Value};

use crate::ser::extract;
use crate::{Context, Decoder, Encoder, MappingConfig, Model, Result};

/// Shorthands on records using the process-wide [`MappingConfig`].
///
/// ```
/// use mapkit_model::derive::Model;
/// use mapkit_model::ModelExt;
///
/// #[derive(Model, Default)]
/// struct Tag {
///     label: String,
///     weight: f32,
/// }
///
/// let tag = Tag::from_json(r#"{ "label": "rust", "weight": 0.5 }"#).unwrap();
/// assert_eq!(tag.to_json().unwrap(), r#"{"label":"rust","weight":0.5}"#);
///
/// let tags = Tag::array_from_json(r#"[{ "label": "a" }, 1]"#, None).unwrap();
/// assert!(tags[1].is_none());
/// ```
pub trait ModelExt: Model {
    fn from_document(map: &Map<String, Value>) -> Result<Self> {
        Decoder::new(MappingConfig::global()).decode(map)
    }

    fn from_document_at(value: &Value, designated_path: &str) -> Result<Self> {
        Decoder::new(MappingConfig::global()).decode_at(value, designated_path)
    }

    fn from_json(text: &str) -> Result<Self> {
        Decoder::new(MappingConfig::global()).decode_str(text, None)
    }

    fn from_json_at(text: &str, designated_path: &str) -> Result<Self> {
        Decoder::new(MappingConfig::global()).decode_str(text, Some(designated_path))
    }

    fn update_from_document(&mut self, map: &Map<String, Value>) -> Result<()> {
        Decoder::new(MappingConfig::global()).update(self, map)
    }

    fn update_from_json(&mut self, text: &str) -> Result<()> {
        Decoder::new(MappingConfig::global()).update_str(self, text, None)
    }

    fn to_document(&self) -> Map<String, Value> {
        extract(
            Self::model_info(),
            self,
            &mut Context::new(MappingConfig::global()),
        )
    }

    fn to_json(&self) -> Result<String> {
        Encoder::new(MappingConfig::global()).encode_string(self, false)
    }

    fn to_json_pretty(&self) -> Result<String> {
        Encoder::new(MappingConfig::global()).encode_string(self, true)
    }

    fn array_from_document(items: &[Value]) -> Result<Vec<Option<Self>>> {
        Decoder::new(MappingConfig::global()).decode_array(items)
    }

    fn array_from_json(text: &str, designated_path: Option<&str>) -> Result<Vec<Option<Self>>> {
        Decoder::new(MappingConfig::global()).decode_array_str(text, designated_path)
    }
}

impl<T: Model> ModelExt for T {}
