use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::any::type_name;
use core::hash::{BuildHasher, Hash};
use std::collections::HashSet as StdHashSet;

use mapkit_utils::hash::hashbrown::HashSet;
use serde_json::Value;

use crate::Context;
use crate::info::{GenericTypeInfoCell, ListInfo, TransformKind, TypeInfo, Typed};
use crate::transformable::Transformable;

// -----------------------------------------------------------------------------
// Helpers

/// Convert every item of a document list, dropping the ones that do not fit.
pub(super) fn collect_items<T, C>(value: &Value, ctx: &mut Context<'_>) -> Option<C>
where
    T: Transformable,
    C: FromIterator<T>,
{
    let Value::Array(items) = value else {
        log::warn!(
            "expected a list for `{}`, found {}{}",
            type_name::<C>(),
            kind_of(value),
            ctx.trail,
        );
        return None;
    };
    let collected = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let converted = T::transform_from(item, ctx);
            if converted.is_none() {
                log::trace!(
                    "dropped item {index}: not convertible to `{}`{}",
                    type_name::<T>(),
                    ctx.trail,
                );
            }
            converted
        })
        .collect();
    Some(collected)
}

/// Plainify every item, dropping the ones without a representation.
pub(super) fn plain_items<'a, T>(
    items: impl Iterator<Item = &'a T>,
    ctx: &mut Context<'_>,
) -> Value
where
    T: Transformable,
{
    items
        .filter_map(|item| {
            let plain = item.plain_value(ctx);
            if plain.is_none() {
                log::error!(
                    "dropped a `{}` item: no document representation{}",
                    type_name::<T>(),
                    ctx.trail,
                );
            }
            plain
        })
        .collect()
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}

// -----------------------------------------------------------------------------
// Impls

macro_rules! impl_collection {
    ($variant:ident, $ty:ident<T $(, $s:ident)?>, [$($bound:tt)*]) => {
        impl<T $(, $s)?> Typed for $ty<T $(, $s)?>
        where
            T: Transformable $($bound)*,
            $($s: BuildHasher + Default + 'static,)?
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::$variant(ListInfo::new::<Self, T>()))
            }
        }

        impl<T $(, $s)?> Transformable for $ty<T $(, $s)?>
        where
            T: Transformable $($bound)*,
            $($s: BuildHasher + Default + 'static,)?
        {
            const KIND: TransformKind = TransformKind::$variant;

            #[inline]
            fn transform_from(value: &Value, ctx: &mut Context<'_>) -> Option<Self> {
                collect_items::<T, Self>(value, ctx)
            }

            #[inline]
            fn plain_value(&self, ctx: &mut Context<'_>) -> Option<Value> {
                Some(plain_items(self.iter(), ctx))
            }
        }
    };
}

impl_collection!(List, Vec<T>, []);
impl_collection!(List, VecDeque<T>, []);
impl_collection!(Set, BTreeSet<T>, [+ Ord]);
impl_collection!(Set, StdHashSet<T, S>, [+ Eq + Hash]);
impl_collection!(Set, HashSet<T, S>, [+ Eq + Hash]);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::{BTreeSet, VecDeque};
    use alloc::vec::Vec;

    use mapkit_utils::hash::FixedHashState;
    use mapkit_utils::hash::hashbrown::HashSet;
    use serde_json::{Value, json};

    use crate::info::{TransformKind, Typed};
    use crate::transformable::Transformable;
    use crate::{Context, MappingConfig};

    fn from<T: Transformable>(value: Value) -> Option<T> {
        let config = MappingConfig::new();
        T::transform_from(&value, &mut Context::new(&config))
    }

    #[test]
    fn lists_drop_bad_items() {
        assert_eq!(
            from::<Vec<i32>>(json!([1, "2", "x", null, 4.7])),
            Some(vec![1, 2, 4])
        );
        assert_eq!(
            from::<VecDeque<String>>(json!(["a", 1])),
            Some(VecDeque::from(["a".to_owned(), "1".to_owned()]))
        );
        assert_eq!(from::<Vec<i32>>(json!({ "0": 1 })), None);
        assert_eq!(from::<Vec<i32>>(json!([])), Some(Vec::new()));
    }

    #[test]
    fn sets() {
        let set = from::<BTreeSet<u8>>(json!([3, 1, 3, 300])).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), [1, 3]);

        let set = from::<HashSet<String, FixedHashState>>(json!(["a", "b", "a"])).unwrap();
        assert_eq!(set.len(), 2);

        let set = from::<std::collections::HashSet<i64>>(json!([1, 2])).unwrap();
        assert!(set.contains(&2));

        assert_eq!(<BTreeSet<u8>>::KIND, TransformKind::Set);
        assert_eq!(<Vec<u8>>::type_info().kind(), TransformKind::List);
    }

    #[test]
    fn encode_drops_unrepresentable() {
        let config = MappingConfig::new();
        let mut ctx = Context::new(&config);
        let plain = vec![1.0, f64::NAN, 2.5].plain_value(&mut ctx);
        assert_eq!(plain, Some(json!([1.0, 2.5])));
    }
}
