use alloc::vec::Vec;
use core::any::Any;

use serde_json::{Map, Value};

use crate::document::{designate_list, designate_map, normalize_keys};
use crate::info::{ModelInfo, Typed, describe};
use crate::mapper::{MappingHandler, MappingTable};
use crate::{Context, MappingConfig, MappingError, Result};

// -----------------------------------------------------------------------------
// Decoder

/// Builds records from documents.
///
/// Decoding is lenient: a document value that does not convert to its
/// field's type leaves the field at its current value. Only the document as
/// a whole can fail, when the text does not parse, when a designated path
/// does not lead to a map, or when the target is not a record.
///
/// ```
/// use mapkit_model::derive::Model;
/// use mapkit_model::{Decoder, MappingConfig};
///
/// #[derive(Model, Default)]
/// struct Page {
///     title: String,
///     views: u64,
/// }
///
/// let config = MappingConfig::new();
/// let decoder = Decoder::new(&config);
///
/// let text = r#"{ "data": { "page": { "title": "Home", "views": "12" } } }"#;
/// let page: Page = decoder.decode_str(text, Some("data.page")).unwrap();
/// assert_eq!(page.title, "Home");
/// assert_eq!(page.views, 12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    config: &'a MappingConfig,
}

impl<'a> Decoder<'a> {
    #[inline]
    pub const fn new(config: &'a MappingConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub const fn config(&self) -> &'a MappingConfig {
        self.config
    }

    /// Build a fresh `T` from `map`.
    pub fn decode<T: Typed + Default>(&self, map: &Map<String, Value>) -> Result<T> {
        let info = describe::<T>()?;
        let mut record = T::default();
        populate(info, &mut record, map, &mut Context::new(self.config));
        Ok(record)
    }

    /// Build a fresh `T` from the map found at `designated_path`.
    ///
    /// An empty path designates `value` itself.
    pub fn decode_at<T: Typed + Default>(&self, value: &Value, designated_path: &str) -> Result<T> {
        self.decode(designate_map(value, designated_path)?)
    }

    /// Parse `text` and build a fresh `T` from it.
    pub fn decode_str<T: Typed + Default>(
        &self,
        text: &str,
        designated_path: Option<&str>,
    ) -> Result<T> {
        self.decode_at(&parse(text)?, designated_path.unwrap_or_default())
    }

    /// Overwrite the fields of `record` found in `map`.
    ///
    /// Mapping hooks see the live record, and the finish hook runs once the
    /// fields are written.
    pub fn update<T: Typed>(&self, record: &mut T, map: &Map<String, Value>) -> Result<()> {
        let info = describe::<T>()?;
        populate(info, record, map, &mut Context::new(self.config));
        Ok(())
    }

    pub fn update_str<T: Typed>(
        &self,
        record: &mut T,
        text: &str,
        designated_path: Option<&str>,
    ) -> Result<()> {
        let value = parse(text)?;
        self.update(record, designate_map(&value, designated_path.unwrap_or_default())?)
    }

    /// Build one `T` per element. Elements that are not maps yield `None`.
    pub fn decode_array<T: Typed + Default>(&self, items: &[Value]) -> Result<Vec<Option<T>>> {
        let info = describe::<T>()?;
        let mut ctx = Context::new(self.config);
        let records = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let Some(map) = item.as_object() else {
                    log::trace!("array element {i} is not a map, `{}` skipped", info.ty().path());
                    return None;
                };
                let mut record = T::default();
                populate(info, &mut record, map, &mut ctx);
                Some(record)
            })
            .collect();
        Ok(records)
    }

    /// Parse `text` and build one `T` per element of the list found at
    /// `designated_path`.
    pub fn decode_array_str<T: Typed + Default>(
        &self,
        text: &str,
        designated_path: Option<&str>,
    ) -> Result<Vec<Option<T>>> {
        let value = parse(text)?;
        self.decode_array(designate_list(&value, designated_path.unwrap_or_default())?)
    }
}

fn parse(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|err| {
        log::error!("failed to parse JSON text: {err}");
        MappingError::ParseFailure(err)
    })
}

// -----------------------------------------------------------------------------
// Populate

/// Write every field of `record` found in `map`.
pub(crate) fn populate(
    info: &'static ModelInfo,
    record: &mut dyn Any,
    map: &Map<String, Value>,
    ctx: &mut Context<'_>,
) {
    let options = ctx.options();
    let map = normalize_keys(map, options);

    let mut table = MappingTable::new(options);
    info.run_mapping(&*record, &mut table);

    for field in info.iter() {
        let index = field.index();
        if table.is_excluded(index) {
            log::trace!("field `{}` excluded from decoding{}", field.name(), ctx.trail);
            continue;
        }

        let handler = table.lookup(index);
        // The first path present in the document wins, even when it holds null.
        let value = match handler.and_then(MappingHandler::paths) {
            Some(paths) => paths.iter().find_map(|path| path.find(&map, options)),
            None => map.get(&*options.normalize(field.key())),
        };
        let Some(value) = value else {
            continue;
        };
        let Some(slot) = field.accessor().get_mut(record) else {
            continue;
        };

        let assigned = match handler.and_then(MappingHandler::decoder) {
            Some(decode) => decode(value).is_some_and(|object| slot.assign_boxed(object)),
            None => {
                ctx.trail.push(field.name());
                let assigned = slot.assign_from(value, ctx);
                ctx.trail.pop();
                assigned
            }
        };

        if !assigned {
            let err = MappingError::ConversionSkipped {
                field: field.name(),
                type_path: field.ty().path(),
            };
            log::trace!("{err}{}", ctx.trail);
        }
    }

    info.run_finish(record);
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use serde_json::{Value, json};

    use alloc::collections::BTreeMap;

    use crate::derive::{Model, RawEnum};
    use crate::info::Typed;
    use crate::transform::TransformOf;
    use crate::{
        Decoder, DeserializeOptions, Encoder, Mapper, MappingConfig, MappingError, MappingHooks,
        Model,
    };

    #[derive(Model, Default, Debug, PartialEq)]
    #[model(MappingHooks = false)]
    struct Account {
        id: u64,
        #[model(rename = "display_name")]
        name: String,
        email: Option<String>,
        tags: Vec<String>,
        #[model(skip)]
        cache: Vec<u8>,
        finished: bool,
    }

    impl MappingHooks for Account {
        fn mapping(&self, mapper: &mut Mapper<'_, Self>) {
            mapper.paths(Self::FIELDS.email, ["contact.email", "email"]);
        }

        fn did_finish_mapping(&mut self) {
            self.finished = true;
        }
    }

    #[derive(Model, Default, Debug)]
    struct Person {
        name: String,
        age: i32,
    }

    #[derive(Model, Default, Debug)]
    #[model(MappingHooks = false)]
    struct Employee {
        #[model(base)]
        person: Person,
        salary: f64,
    }

    impl MappingHooks for Employee {
        fn mapping(&self, mapper: &mut Mapper<'_, Self>) {
            mapper.path(Person::FIELDS.name.inherit(), "info.full_name");
        }
    }

    fn config() -> MappingConfig {
        MappingConfig::new()
    }

    fn map(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn decode_fields() {
        let config = config();
        let doc = map(json!({
            "id": 7,
            "display_name": "Ann",
            "contact": { "email": "ann@example.com" },
            "tags": ["a", 1, null, "b"],
            "cache": [1, 2, 3],
        }));

        let account: Account = Decoder::new(&config).decode(&doc).unwrap();
        assert_eq!(account.id, 7);
        assert_eq!(account.name, "Ann");
        assert_eq!(account.email.as_deref(), Some("ann@example.com"));
        assert_eq!(account.tags, ["a", "1", "b"]);
        assert!(account.cache.is_empty());
        assert!(account.finished);
    }

    #[test]
    fn missing_and_mismatched_values_keep_defaults() {
        let config = config();
        let doc = map(json!({ "id": "seven", "display_name": {}, "email": 3 }));

        let account: Account = Decoder::new(&config).decode(&doc).unwrap();
        assert_eq!(account.id, 0);
        assert_eq!(account.name, "{}");
        assert_eq!(account.email.as_deref(), Some("3"));
        assert!(account.tags.is_empty());
    }

    #[test]
    fn present_null_ends_path_search() {
        let config = config();
        let doc = map(json!({ "contact": { "email": null }, "email": "fallback@example.com" }));

        let account: Account = Decoder::new(&config).decode(&doc).unwrap();
        assert_eq!(account.email, None);

        let doc = map(json!({ "contact": {}, "email": "fallback@example.com" }));
        let account: Account = Decoder::new(&config).decode(&doc).unwrap();
        assert_eq!(account.email.as_deref(), Some("fallback@example.com"));
    }

    #[test]
    fn inherited_fields_come_first() {
        let info = Employee::model_info();
        let names: Vec<_> = info.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["name", "age", "salary"]);
        assert_eq!(Employee::FIELDS.salary.index(), 2);
        assert_eq!(Person::FIELDS.age.inherit::<Employee>().index(), 1);

        let config = config();
        let doc = map(json!({ "info": { "full_name": "Bo" }, "age": 41, "salary": "1200.5" }));
        let employee: Employee = Decoder::new(&config).decode(&doc).unwrap();
        assert_eq!(employee.person.name, "Bo");
        assert_eq!(employee.person.age, 41);
        assert_eq!(employee.salary, 1200.5);
    }

    #[test]
    fn transform_of_another_type_is_no_value() {
        #[derive(Model, Default)]
        #[model(MappingHooks = false)]
        struct Reading {
            level: i64,
        }

        impl MappingHooks for Reading {
            fn mapping(&self, mapper: &mut Mapper<'_, Self>) {
                mapper.register(
                    Self::FIELDS.level.index(),
                    crate::mapper::MappingHandler::new()
                        .with_decoder(|_: &Value| Some(alloc::boxed::Box::new(1.5_f64) as _)),
                );
            }
        }

        let config = config();
        let mut reading = Reading { level: 9 };
        Decoder::new(&config)
            .update(&mut reading, &map(json!({ "level": 3 })))
            .unwrap();
        assert_eq!(reading.level, 9);
    }

    #[test]
    fn transform_result_is_written() {
        #[derive(Model, Default)]
        #[model(MappingHooks = false)]
        struct Price {
            cents: i64,
        }

        impl MappingHooks for Price {
            fn mapping(&self, mapper: &mut Mapper<'_, Self>) {
                mapper.transform(
                    Self::FIELDS.cents,
                    TransformOf::new(
                        |v: &Value| v.as_f64().map(|f| (f * 100.0).round() as i64),
                        |c: &i64| Some(json!(*c as f64 / 100.0)),
                    ),
                );
            }
        }

        let config = config();
        let price: Price = Decoder::new(&config)
            .decode(&map(json!({ "cents": 2.5 })))
            .unwrap();
        assert_eq!(price.cents, 250);
    }

    #[test]
    fn designated_path() {
        let config = config();
        let decoder = Decoder::new(&config);
        let doc = json!({ "data": { "user": { "name": "Cy", "age": 5 } }, "list": [1] });

        let person: Person = decoder.decode_at(&doc, "data.user").unwrap();
        assert_eq!(person.name, "Cy");

        let err = decoder.decode_at::<Person>(&doc, "data.nobody").unwrap_err();
        assert!(matches!(err, MappingError::PathNotFound { path } if path == "data.nobody"));

        let err = decoder.decode_at::<Person>(&doc, "list").unwrap_err();
        assert!(matches!(err, MappingError::PathNotFound { .. }));
    }

    #[test]
    fn text_input() {
        let config = config();
        let decoder = Decoder::new(&config);

        let err = decoder.decode_str::<Person>("{ \"name\": ", None).unwrap_err();
        assert!(matches!(err, MappingError::ParseFailure(_)));

        let err = decoder.decode_str::<Person>("[1, 2]", None).unwrap_err();
        assert!(matches!(err, MappingError::PathNotFound { path } if path.is_empty()));

        let err = decoder.decode_str::<i32>("{}", None).unwrap_err();
        assert!(matches!(err, MappingError::NotIntrospectable { .. }));
    }

    #[test]
    fn arrays() {
        let config = config();
        let decoder = Decoder::new(&config);

        let people: Vec<Option<Person>> = decoder
            .decode_array(&[json!({ "name": "A" }), json!(3), json!({ "age": 2 })])
            .unwrap();
        assert_eq!(people.len(), 3);
        assert_eq!(people[0].as_ref().unwrap().name, "A");
        assert!(people[1].is_none());
        assert_eq!(people[2].as_ref().unwrap().age, 2);

        let text = r#"{ "result": [{ "name": "B" }] }"#;
        let people: Vec<Option<Person>> = decoder.decode_array_str(text, Some("result")).unwrap();
        assert_eq!(people.len(), 1);

        let err = decoder
            .decode_array_str::<Person>(text, Some("result.0"))
            .unwrap_err();
        assert!(matches!(err, MappingError::PathNotFound { .. }));
    }

    #[test]
    fn update_keeps_absent_fields() {
        let config = config();
        let mut account = Account {
            id: 1,
            name: "Old".into(),
            tags: vec!["x".into()],
            ..Account::default()
        };
        Decoder::new(&config)
            .update_str(&mut account, r#"{ "display_name": "New" }"#, None)
            .unwrap();

        assert_eq!(account.id, 1);
        assert_eq!(account.name, "New");
        assert_eq!(account.tags, ["x"]);
        assert!(account.finished);
    }

    #[test]
    fn normalized_keys() {
        #[derive(Model, Default)]
        struct Profile {
            user_name: String,
            home_page: String,
        }

        let config = MappingConfig::new().with_deserialize_options(DeserializeOptions::all());
        let doc = map(json!({ "UserName": "dee", "HOME_PAGE": "x.org" }));
        let profile: Profile = Decoder::new(&config).decode(&doc).unwrap();
        assert_eq!(profile.user_name, "dee");
        assert_eq!(profile.home_page, "x.org");

        let strict = MappingConfig::new();
        let profile: Profile = Decoder::new(&strict).decode(&doc).unwrap();
        assert!(profile.user_name.is_empty());
    }

    #[test]
    fn nested_records() {
        #[derive(Model, Default)]
        struct Team {
            lead: Person,
            members: Vec<Person>,
            backup: Option<Box<Person>>,
        }

        let config = config();
        let doc = map(json!({
            "lead": { "name": "L", "age": 30 },
            "members": [{ "name": "M" }, "skip"],
            "backup": { "name": "Z" },
        }));
        let team: Team = Decoder::new(&config).decode(&doc).unwrap();
        assert_eq!(team.lead.age, 30);
        assert_eq!(team.members.len(), 1);
        assert_eq!(team.backup.unwrap().name, "Z");
    }

    #[test]
    fn derived_type_info_is_the_model_info() {
        let info = Account::type_info().as_model().unwrap();
        assert!(core::ptr::eq(info, Account::model_info()));
        assert!(info.ty().is::<Account>());
        assert_eq!(Account::FIELD_COUNT, 5);
    }

    #[derive(RawEnum, Debug, Default, Clone, Copy, PartialEq)]
    #[raw_enum(repr = "i32")]
    enum Level {
        #[default]
        Low = 1,
        High = 2,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    struct Gauge {
        level: Level,
    }

    #[test]
    fn integer_enum_fields() {
        let config = config();
        let decoder = Decoder::new(&config);

        let gauge: Gauge = decoder.decode(&map(json!({ "level": 2 }))).unwrap();
        assert_eq!(gauge.level, Level::High);

        let encoded = Encoder::new(&config).encode(&gauge).unwrap();
        assert_eq!(Value::Object(encoded), json!({ "level": 2 }));

        let gauge: Gauge = decoder.decode(&map(json!({ "level": 3 }))).unwrap();
        assert_eq!(gauge.level, Level::Low);
    }

    #[test]
    fn encoded_records_decode_to_equal_values() {
        #[derive(Model, Default, Debug, PartialEq)]
        struct Inner {
            a: i32,
            b: Option<String>,
        }

        #[derive(Model, Default, Debug, PartialEq)]
        struct Snapshot {
            b: bool,
            count: i64,
            ratio: f64,
            label: String,
            note: Option<String>,
            list: Vec<u8>,
            map: BTreeMap<String, i32>,
            level: Level,
            inner: Inner,
            boxed: Option<Box<Inner>>,
        }

        let value = Snapshot {
            b: true,
            count: -12,
            ratio: 0.75,
            label: "gauge".into(),
            note: Some("n".into()),
            list: vec![1, 2],
            map: BTreeMap::from([("k".into(), 7)]),
            level: Level::High,
            inner: Inner { a: 3, b: Some("x".into()) },
            boxed: Some(Box::new(Inner { a: 9, b: None })),
        };

        let config = config();
        let encoded = Encoder::new(&config).encode(&value).unwrap();
        assert_eq!(encoded["level"], json!(2));
        assert!(!encoded["boxed"].as_object().unwrap().contains_key("b"));

        let decoded: Snapshot = Decoder::new(&config).decode(&encoded).unwrap();
        assert_eq!(decoded, value);

        let text = Encoder::new(&config).encode_string(&value, true).unwrap();
        let decoded: Snapshot = Decoder::new(&config).decode_str(&text, None).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn registered_paths_are_tried_in_order() {
        #[derive(Model, Default)]
        #[model(MappingHooks = false)]
        struct Slot {
            value: i32,
        }

        impl MappingHooks for Slot {
            fn mapping(&self, mapper: &mut Mapper<'_, Self>) {
                mapper.paths(Self::FIELDS.value, ["a.b", "c"]);
            }
        }

        let config = config();
        let decoder = Decoder::new(&config);

        let slot: Slot = decoder.decode(&map(json!({ "c": 5, "a": { "b": 1 } }))).unwrap();
        assert_eq!(slot.value, 1);

        let slot: Slot = decoder.decode(&map(json!({ "c": 5 }))).unwrap();
        assert_eq!(slot.value, 5);

        let slot: Slot = decoder.decode(&map(json!({ "value": 8 }))).unwrap();
        assert_eq!(slot.value, 0);
    }

    #[test]
    fn escaped_dot_matches_the_literal_key() {
        #[derive(Model, Default)]
        #[model(MappingHooks = false)]
        struct Dotted {
            value: i32,
        }

        impl MappingHooks for Dotted {
            fn mapping(&self, mapper: &mut Mapper<'_, Self>) {
                mapper.path(Self::FIELDS.value, r"a\.b");
            }
        }

        let config = config();
        let decoder = Decoder::new(&config);

        let doc = map(json!({ "a.b": 1, "a": { "b": 2 } }));
        let dotted: Dotted = decoder.decode(&doc).unwrap();
        assert_eq!(dotted.value, 1);

        let doc = map(json!({ "a": { "b": 2 } }));
        let dotted: Dotted = decoder.decode(&doc).unwrap();
        assert_eq!(dotted.value, 0);
    }
}
