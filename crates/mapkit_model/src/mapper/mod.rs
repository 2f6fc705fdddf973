//! Per-field overrides.
//!
//! A record declares overrides in [`MappingHooks::mapping`] against a
//! [`Mapper`]. The mapper fills a [`MappingTable`] that lives for one decode
//! or encode of that record only.
//!
//! [`MappingHooks::mapping`]: crate::MappingHooks::mapping

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;
use core::marker::PhantomData;

use serde_json::Value;

use crate::transform::Transform;
use crate::{DeserializeOptions, MappingPath};

// -----------------------------------------------------------------------------
// Modules

mod field;
mod handler;

// -----------------------------------------------------------------------------
// Exports

pub use field::Field;
pub use handler::{DecodeFn, EncodeFn, MappingHandler, MappingTable};

// -----------------------------------------------------------------------------
// Mapper

/// Builder of the overrides of the record `M`.
///
/// Every method takes the [`Field`] identity of the field it overrides.
/// Calls on the same field merge: a path and a transform registered
/// separately both apply. [`register`](Self::register) replaces the whole
/// entry instead.
///
/// ```
/// use mapkit_model::derive::Model;
/// use mapkit_model::transform::TransformOf;
/// use mapkit_model::{Mapper, MappingHooks, Model, ModelExt};
/// use serde_json::{Value, json};
///
/// #[derive(Model, Default)]
/// #[model(MappingHooks = false)]
/// struct Sample {
///     id: String,
///     ratio: f64,
///     secret: String,
/// }
///
/// impl MappingHooks for Sample {
///     fn mapping(&self, mapper: &mut Mapper<'_, Self>) {
///         let fields = Self::FIELDS;
///         mapper
///             .paths(fields.id, ["sample_id", "meta.id"])
///             .transform(
///                 fields.ratio,
///                 TransformOf::new(
///                     |v: &Value| Some(v.as_f64()? / 100.0),
///                     |r: &f64| Some(json!(r * 100.0)),
///                 ),
///             )
///             .exclude(fields.secret);
///     }
/// }
///
/// let doc = json!({ "meta": { "id": "s-1" }, "ratio": 50, "secret": "x" });
/// let sample = Sample::from_document(doc.as_object().unwrap()).unwrap();
/// assert_eq!(sample.id, "s-1");
/// assert_eq!(sample.ratio, 0.5);
/// assert_eq!(sample.secret, "");
///
/// let out = sample.to_document();
/// assert_eq!(out["sample_id"], "s-1");
/// assert_eq!(out["ratio"], 50.0);
/// assert!(!out.contains_key("secret"));
/// ```
pub struct Mapper<'a, M> {
    table: &'a mut MappingTable,
    _marker: PhantomData<fn(&M)>,
}

impl<'a, M: 'static> Mapper<'a, M> {
    pub(crate) fn new(table: &'a mut MappingTable) -> Self {
        Self {
            table,
            _marker: PhantomData,
        }
    }

    /// Options of the current decode. Registered paths are normalized with
    /// them already.
    #[inline]
    pub fn options(&self) -> DeserializeOptions {
        self.table.options()
    }

    /// Look `field` up at `path` instead of its key.
    #[inline]
    pub fn path<T>(&mut self, field: Field<M, T>, path: &str) -> &mut Self {
        self.paths(field, [path])
    }

    /// Look `field` up at the first of `paths` present in the document.
    ///
    /// When encoding, the field is written under the last segment of the
    /// first path.
    pub fn paths<T, I>(&mut self, field: Field<M, T>, paths: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let options = self.table.options();
        let parsed: Vec<MappingPath> = paths
            .into_iter()
            .filter_map(|raw| MappingPath::parse(&options.normalize(raw.as_ref())))
            .collect();
        if parsed.is_empty() {
            log::trace!("no usable path for field `{}`, ignored", field.name());
        } else {
            self.table.entry(field.index()).set_paths(parsed);
        }
        self
    }

    /// Convert `field` with `transform` in both directions.
    pub fn transform<T, X>(&mut self, field: Field<M, T>, transform: X) -> &mut Self
    where
        T: 'static,
        X: Transform<Object = T> + 'static,
    {
        let transform = Rc::new(transform);
        let decoder = Rc::clone(&transform);
        let entry = self.table.entry(field.index());
        entry.set_decoder(Box::new(move |value: &Value| {
            decoder
                .from_document(value)
                .map(|object| Box::new(object) as Box<dyn Any>)
        }));
        entry.set_encoder(Box::new(move |object: &dyn Any| {
            transform.to_document(object.downcast_ref::<T>()?)
        }));
        self
    }

    /// Convert an optional `field` with a `transform` of its content.
    ///
    /// A `None` field is omitted when encoding.
    pub fn transform_optional<T, X>(&mut self, field: Field<M, Option<T>>, transform: X) -> &mut Self
    where
        T: 'static,
        X: Transform<Object = T> + 'static,
    {
        let transform = Rc::new(transform);
        let decoder = Rc::clone(&transform);
        let entry = self.table.entry(field.index());
        entry.set_decoder(Box::new(move |value: &Value| {
            decoder
                .from_document(value)
                .map(|object| Box::new(Some(object)) as Box<dyn Any>)
        }));
        entry.set_encoder(Box::new(move |object: &dyn Any| {
            transform.to_document(object.downcast_ref::<Option<T>>()?.as_ref()?)
        }));
        self
    }

    /// [`paths`](Self::paths) and [`transform`](Self::transform) at once.
    pub fn path_transform<T, I, X>(&mut self, field: Field<M, T>, paths: I, transform: X) -> &mut Self
    where
        T: 'static,
        I: IntoIterator,
        I::Item: AsRef<str>,
        X: Transform<Object = T> + 'static,
    {
        self.paths(field, paths).transform(field, transform)
    }

    /// Decode `field` with `decode` only; encoding is unchanged.
    pub fn decode_with<T, F>(&mut self, field: Field<M, T>, decode: F) -> &mut Self
    where
        T: 'static,
        F: Fn(&Value) -> Option<T> + 'static,
    {
        self.table
            .entry(field.index())
            .set_decoder(Box::new(move |value: &Value| {
                decode(value).map(|object| Box::new(object) as Box<dyn Any>)
            }));
        self
    }

    /// Encode `field` with `encode` only; decoding is unchanged.
    pub fn encode_with<T, F>(&mut self, field: Field<M, T>, encode: F) -> &mut Self
    where
        T: 'static,
        F: Fn(&T) -> Option<Value> + 'static,
    {
        self.table
            .entry(field.index())
            .set_encoder(Box::new(move |object: &dyn Any| {
                encode(object.downcast_ref::<T>()?)
            }));
        self
    }

    /// Skip `field` in both directions.
    pub fn exclude<T>(&mut self, field: Field<M, T>) -> &mut Self {
        self.table.exclude(field.index());
        self
    }

    /// Replace the entry of the field at `index`.
    ///
    /// Nothing checks the types handled by `handler`; a decoded value of
    /// another type than the field's is dropped.
    pub fn register(&mut self, index: usize, handler: MappingHandler) -> &mut Self {
        self.table.register(index, handler);
        self
    }

    #[inline]
    pub fn lookup(&self, index: usize) -> Option<&MappingHandler> {
        self.table.lookup(index)
    }

    #[inline]
    pub fn is_excluded(&self, index: usize) -> bool {
        self.table.is_excluded(index)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use serde_json::{Value, json};

    use super::{Field, Mapper, MappingHandler, MappingTable};
    use crate::transform::TransformOf;
    use crate::{DeserializeOptions, MappingPath};

    struct Probe;

    const NAME: Field<Probe, String> = Field::new(0, "name");
    const AGE: Field<Probe, Option<u32>> = Field::new(1, "age");

    fn segments(table: &MappingTable, index: usize) -> Vec<Vec<String>> {
        table
            .lookup(index)
            .and_then(MappingHandler::paths)
            .unwrap_or_default()
            .iter()
            .map(|p| p.segments().to_vec())
            .collect()
    }

    #[test]
    fn paths_are_normalized_and_filtered() {
        let mut table = MappingTable::new(DeserializeOptions::all());
        Mapper::new(&mut table).paths(NAME, ["User_Info.Full_Name", " . ", ""]);
        assert_eq!(segments(&table, 0), [["userinfo", "fullname"]]);

        let mut table = MappingTable::new(DeserializeOptions::empty());
        Mapper::new(&mut table).paths(NAME, ["", "..."]);
        assert!(table.lookup(0).is_none());
    }

    #[test]
    fn builder_calls_merge() {
        let mut table = MappingTable::new(DeserializeOptions::empty());
        let mut mapper = Mapper::new(&mut table);
        mapper
            .path(NAME, "a.b")
            .decode_with(NAME, |v: &Value| v.as_str().map(str::to_uppercase))
            .exclude(AGE);

        assert!(mapper.is_excluded(AGE.index()));
        assert!(!mapper.is_excluded(NAME.index()));

        let handler = mapper.lookup(NAME.index()).unwrap();
        assert_eq!(handler.paths().unwrap().len(), 1);
        assert!(handler.encoder().is_none());
        let decoded = (handler.decoder().unwrap())(&json!("x")).unwrap();
        assert_eq!(decoded.downcast_ref::<String>().unwrap(), "X");
    }

    #[test]
    fn register_replaces() {
        let mut table = MappingTable::new(DeserializeOptions::empty());
        let mut mapper = Mapper::new(&mut table);
        mapper.path(NAME, "a").register(
            NAME.index(),
            MappingHandler::new().with_paths(MappingPath::parse("b").into_iter().collect()),
        );
        let handler = mapper.lookup(NAME.index()).unwrap();
        assert_eq!(handler.paths().unwrap()[0].segments(), ["b"]);
    }

    #[test]
    fn optional_transform() {
        let mut table = MappingTable::new(DeserializeOptions::empty());
        Mapper::new(&mut table).transform_optional(
            AGE,
            TransformOf::new(
                |v: &Value| v.as_str()?.parse::<u32>().ok(),
                |n: &u32| Some(Value::String(n.to_string())),
            ),
        );
        let handler = table.lookup(AGE.index()).unwrap();

        let decoded = (handler.decoder().unwrap())(&json!("7")).unwrap();
        assert_eq!(decoded.downcast_ref::<Option<u32>>(), Some(&Some(7)));

        let encode = handler.encoder().unwrap();
        assert_eq!(encode(&Some(7_u32)), Some(json!("7")));
        assert_eq!(encode(&None::<u32>), None);
    }
}
