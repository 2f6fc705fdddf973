use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::any::type_name;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap as StdHashMap;

use mapkit_utils::hash::hashbrown::HashMap;
use serde_json::{Map, Value};

use crate::Context;
use crate::info::{GenericTypeInfoCell, MapInfo, TransformKind, TypeInfo, Typed};
use crate::transformable::Transformable;
use crate::transformable::collections::kind_of;

// -----------------------------------------------------------------------------
// MapKey

/// A key type of a keyed collection. Document map keys are always strings.
pub trait MapKey: Sized + 'static {
    /// Parse a document key, `None` drops the entry.
    fn from_key(key: &str) -> Option<Self>;

    fn to_key(&self) -> String;
}

impl MapKey for String {
    #[inline]
    fn from_key(key: &str) -> Option<Self> {
        Some(key.to_owned())
    }

    #[inline]
    fn to_key(&self) -> String {
        self.clone()
    }
}

macro_rules! impl_parsed_key {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl MapKey for $ty {
                #[inline]
                fn from_key(key: &str) -> Option<Self> {
                    key.parse().ok()
                }

                #[inline]
                fn to_key(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

impl_parsed_key!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// -----------------------------------------------------------------------------
// Helpers

fn collect_entries<K, V, C>(value: &Value, ctx: &mut Context<'_>) -> Option<C>
where
    K: MapKey,
    V: Transformable,
    C: FromIterator<(K, V)>,
{
    let Value::Object(entries) = value else {
        log::warn!(
            "expected a map for `{}`, found {}{}",
            type_name::<C>(),
            kind_of(value),
            ctx.trail,
        );
        return None;
    };
    let collected = entries
        .iter()
        .filter_map(|(key, item)| {
            let Some(k) = K::from_key(key) else {
                log::trace!("dropped entry `{key}`: not a `{}` key{}", type_name::<K>(), ctx.trail);
                return None;
            };
            let Some(v) = V::transform_from(item, ctx) else {
                log::trace!(
                    "dropped entry `{key}`: not convertible to `{}`{}",
                    type_name::<V>(),
                    ctx.trail,
                );
                return None;
            };
            Some((k, v))
        })
        .collect();
    Some(collected)
}

fn plain_entries<'a, K, V>(
    entries: impl Iterator<Item = (&'a K, &'a V)>,
    ctx: &mut Context<'_>,
) -> Value
where
    K: MapKey,
    V: Transformable,
{
    let map: Map<String, Value> = entries
        .filter_map(|(key, item)| {
            let Some(plain) = item.plain_value(ctx) else {
                log::error!(
                    "dropped entry `{}`: `{}` has no document representation{}",
                    key.to_key(),
                    type_name::<V>(),
                    ctx.trail,
                );
                return None;
            };
            Some((key.to_key(), plain))
        })
        .collect();
    Value::Object(map)
}

// -----------------------------------------------------------------------------
// Impls

macro_rules! impl_keyed {
    ($ty:ident<K, V $(, $s:ident)?>, [$($bound:tt)*]) => {
        impl<K, V $(, $s)?> Typed for $ty<K, V $(, $s)?>
        where
            K: MapKey $($bound)*,
            V: Transformable,
            $($s: BuildHasher + Default + 'static,)?
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, K, V>()))
            }
        }

        impl<K, V $(, $s)?> Transformable for $ty<K, V $(, $s)?>
        where
            K: MapKey $($bound)*,
            V: Transformable,
            $($s: BuildHasher + Default + 'static,)?
        {
            const KIND: TransformKind = TransformKind::Map;

            #[inline]
            fn transform_from(value: &Value, ctx: &mut Context<'_>) -> Option<Self> {
                collect_entries::<K, V, Self>(value, ctx)
            }

            #[inline]
            fn plain_value(&self, ctx: &mut Context<'_>) -> Option<Value> {
                Some(plain_entries(self.iter(), ctx))
            }
        }
    };
}

impl_keyed!(BTreeMap<K, V>, [+ Ord]);
impl_keyed!(StdHashMap<K, V, S>, [+ Eq + Hash]);
impl_keyed!(HashMap<K, V, S>, [+ Eq + Hash]);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;

    use mapkit_utils::hash::HashMap;
    use serde_json::{Value, json};

    use crate::transformable::{MapKey, Transformable};
    use crate::{Context, MappingConfig};

    fn from<T: Transformable>(value: Value) -> Option<T> {
        let config = MappingConfig::new();
        T::transform_from(&value, &mut Context::new(&config))
    }

    #[test]
    fn string_keys() {
        let map = from::<BTreeMap<String, i32>>(json!({ "a": 1, "b": "2", "c": "x" })).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["b"], 2);
        assert_eq!(from::<BTreeMap<String, i32>>(json!([1])), None);
    }

    #[test]
    fn parsed_keys() {
        let map = from::<HashMap<u32, bool>>(json!({ "1": true, "two": true, "3": 0 })).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&3), Some(&false));

        assert_eq!(bool::from_key("true"), Some(true));
        assert_eq!(7_i64.to_key(), "7");
    }

    #[test]
    fn encode_keys() {
        let config = MappingConfig::new();
        let mut ctx = Context::new(&config);

        let map = BTreeMap::from([(1_u8, "a".to_owned()), (2, "b".to_owned())]);
        assert_eq!(map.plain_value(&mut ctx), Some(json!({ "1": "a", "2": "b" })));

        let map = std::collections::HashMap::from([("k".to_owned(), f64::NAN)]);
        assert_eq!(map.plain_value(&mut ctx), Some(json!({})));
    }
}
