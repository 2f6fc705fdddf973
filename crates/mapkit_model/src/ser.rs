use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use serde_json::{Map, Value};

use crate::info::{ModelInfo, TransformKind, Typed, describe};
use crate::mapper::{MappingHandler, MappingTable};
use crate::{Context, MappingConfig, MappingError, MappingPath, Result, Transformable};

// -----------------------------------------------------------------------------
// Encoder

/// Builds documents from records.
///
/// Fields without a document representation are left out and reported
/// with a warning. Key order is not preserved.
///
/// ```
/// use mapkit_model::derive::Model;
/// use mapkit_model::{Encoder, MappingConfig};
/// use serde_json::json;
///
/// #[derive(Model, Default)]
/// struct Point {
///     x: i32,
///     #[model(rename = "Y")]
///     y: i32,
///     label: Option<String>,
/// }
///
/// let config = MappingConfig::new();
/// let map = Encoder::new(&config).encode(&Point { x: 1, y: 2, label: None }).unwrap();
/// assert_eq!(serde_json::Value::Object(map), json!({ "x": 1, "Y": 2 }));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    config: &'a MappingConfig,
}

impl<'a> Encoder<'a> {
    #[inline]
    pub const fn new(config: &'a MappingConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub const fn config(&self) -> &'a MappingConfig {
        self.config
    }

    /// Build the document map of `record`.
    pub fn encode<T: Typed>(&self, record: &T) -> Result<Map<String, Value>> {
        let info = describe::<T>()?;
        Ok(extract(info, record, &mut Context::new(self.config)))
    }

    /// Convert any transformable value, record or not.
    pub fn encode_value<T: Transformable>(&self, value: &T) -> Option<Value> {
        value.plain_value(&mut Context::new(self.config))
    }

    /// Build the document of `record` as JSON text.
    pub fn encode_string<T: Typed>(&self, record: &T, pretty: bool) -> Result<String> {
        write(&Value::Object(self.encode(record)?), pretty)
    }

    /// Convert every item. Items without a representation become `null`
    /// so that positions are kept.
    pub fn encode_array<T: Transformable>(&self, items: &[T]) -> Vec<Value> {
        let mut ctx = Context::new(self.config);
        items
            .iter()
            .map(|item| {
                item.plain_value(&mut ctx).unwrap_or_else(|| {
                    log::warn!(
                        "`{}` has no document representation, null written",
                        T::type_info().type_path()
                    );
                    Value::Null
                })
            })
            .collect()
    }

    pub fn encode_array_string<T: Transformable>(&self, items: &[T], pretty: bool) -> Result<String> {
        write(&Value::Array(self.encode_array(items)), pretty)
    }
}

fn write(value: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.map_err(|err| {
        log::error!("failed to write JSON text: {err}");
        MappingError::Serialize(err)
    })
}

// -----------------------------------------------------------------------------
// Extract

/// Read every field of `record` into a document map.
pub(crate) fn extract(
    info: &'static ModelInfo,
    record: &dyn Any,
    ctx: &mut Context<'_>,
) -> Map<String, Value> {
    let mut table = MappingTable::new(ctx.options());
    info.run_mapping(record, &mut table);

    let mut map = Map::new();
    for field in info.iter() {
        let index = field.index();
        if table.is_excluded(index) {
            log::trace!("field `{}` excluded from encoding{}", field.name(), ctx.trail);
            continue;
        }
        let Some(slot) = field.accessor().get(record) else {
            continue;
        };

        let handler = table.lookup(index);
        let key = handler
            .and_then(MappingHandler::paths)
            .and_then(<[MappingPath]>::first)
            .map_or(field.key(), MappingPath::last_segment);

        let (value, overridden) = match handler.and_then(MappingHandler::encoder) {
            Some(encode) => (encode(slot.as_any()), true),
            None => {
                ctx.trail.push(field.name());
                let value = slot.plain_value_dyn(ctx);
                ctx.trail.pop();
                (value, false)
            }
        };

        match value {
            Some(value) => {
                map.insert(String::from(key), value);
            }
            None if overridden || field.type_info().kind() == TransformKind::Optional => {
                log::trace!("field `{}` has no value, omitted{}", field.name(), ctx.trail);
            }
            None => {
                let err = MappingError::UnrepresentableValue {
                    field: field.name(),
                    type_path: field.ty().path(),
                };
                log::warn!("{err}{}", ctx.trail);
            }
        }
    }
    map
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use serde_json::{Value, json};

    use crate::derive::{Model, RawEnum};
    use crate::{Encoder, Mapper, MappingConfig, MappingError, MappingHooks, Model};

    #[derive(RawEnum, Debug, Default, Clone, Copy, PartialEq)]
    #[raw_enum(rename_all = "lowercase")]
    enum Role {
        #[default]
        Guest,
        Admin,
    }

    #[derive(Model, Default)]
    struct Base {
        id: u32,
    }

    #[derive(Model, Default)]
    #[model(MappingHooks = false)]
    struct Member {
        #[model(base)]
        base: Base,
        name: String,
        role: Role,
        scores: BTreeMap<String, f64>,
        ratio: f64,
        secret: String,
        nick: Option<String>,
    }

    impl MappingHooks for Member {
        fn mapping(&self, mapper: &mut Mapper<'_, Self>) {
            mapper
                .path(Self::FIELDS.name, "profile.full_name")
                .path(Base::FIELDS.id.inherit(), "member_id")
                .exclude(Self::FIELDS.secret);
        }
    }

    fn member() -> Member {
        Member {
            base: Base { id: 4 },
            name: "Dana".into(),
            role: Role::Admin,
            scores: BTreeMap::from([("math".into(), 9.5)]),
            ratio: 0.25,
            secret: "hunter2".into(),
            nick: None,
        }
    }

    #[test]
    fn encode_fields() {
        let config = MappingConfig::new();
        let map = Encoder::new(&config).encode(&member()).unwrap();

        assert_eq!(
            Value::Object(map),
            json!({
                "member_id": 4,
                "full_name": "Dana",
                "role": "admin",
                "scores": { "math": 9.5 },
                "ratio": 0.25,
            })
        );
    }

    #[test]
    fn unrepresentable_fields_are_omitted() {
        let config = MappingConfig::new();
        let mut member = member();
        member.ratio = f64::NAN;
        member.nick = Some("dd".into());

        let map = Encoder::new(&config).encode(&member).unwrap();
        assert!(!map.contains_key("ratio"));
        assert_eq!(map["nick"], "dd");
    }

    #[test]
    fn encoder_override() {
        #[derive(Model, Default)]
        #[model(MappingHooks = false)]
        struct Flags {
            on: bool,
            hidden: bool,
        }

        impl MappingHooks for Flags {
            fn mapping(&self, mapper: &mut Mapper<'_, Self>) {
                mapper
                    .encode_with(Self::FIELDS.on, |on: &bool| Some(json!(if *on { "yes" } else { "no" })))
                    .encode_with(Self::FIELDS.hidden, |_: &bool| None);
            }
        }

        let config = MappingConfig::new();
        let map = Encoder::new(&config)
            .encode(&Flags { on: true, hidden: true })
            .unwrap();
        assert_eq!(Value::Object(map), json!({ "on": "yes" }));
    }

    #[test]
    fn text_output() {
        let config = MappingConfig::new();
        let encoder = Encoder::new(&config);

        let compact = encoder.encode_string(&Base { id: 1 }, false).unwrap();
        assert_eq!(compact, r#"{"id":1}"#);

        let pretty = encoder.encode_string(&Base { id: 1 }, true).unwrap();
        assert_eq!(pretty, "{\n  \"id\": 1\n}");

        let err = encoder.encode_string(&5_u8, false).unwrap_err();
        assert!(matches!(err, MappingError::NotIntrospectable { .. }));
    }

    #[test]
    fn arrays_keep_positions() {
        let config = MappingConfig::new();
        let encoder = Encoder::new(&config);

        let values = encoder.encode_array(&[1.0, f64::INFINITY, 2.5]);
        assert_eq!(values, vec![json!(1.0), Value::Null, json!(2.5)]);

        let bases: Vec<Base> = vec![Base { id: 1 }, Base { id: 2 }];
        let text = encoder.encode_array_string(&bases, false).unwrap();
        assert_eq!(text, r#"[{"id":1},{"id":2}]"#);

        assert_eq!(encoder.encode_value(&Role::Guest), Some(json!("guest")));
    }

    #[test]
    fn nested_records() {
        #[derive(Model, Default)]
        struct Group {
            owner: Base,
            members: Vec<Base>,
        }

        let config = MappingConfig::new();
        let group = Group {
            owner: Base { id: 9 },
            members: vec![Base { id: 1 }],
        };
        let map = Encoder::new(&config).encode(&group).unwrap();
        assert_eq!(
            Value::Object(map),
            json!({ "owner": { "id": 9 }, "members": [{ "id": 1 }] })
        );
    }
}
