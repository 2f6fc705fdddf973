use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde_json::{Map, Value};

use crate::{DeserializeOptions, MappingError};

// -----------------------------------------------------------------------------
// MappingPath

/// A dotted path into nested document maps, such as `user.address.city`.
///
/// Segments are split on `.`; `\.` is a literal dot inside a segment.
/// Segments that are blank are dropped.
///
/// ```
/// use mapkit_model::MappingPath;
///
/// let path = MappingPath::parse(r"meta.file\.name..").unwrap();
/// assert_eq!(path.segments(), ["meta", "file.name"]);
///
/// assert!(MappingPath::parse(" . ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingPath {
    segments: Box<[String]>,
}

impl MappingPath {
    /// Parse `raw`, `None` if it has no segment left.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'.') => {
                    current.push('.');
                    chars.next();
                }
                '.' => segments.push(core::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        segments.push(current);
        segments.retain(|s| !s.trim().is_empty());

        if segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: segments.into_boxed_slice(),
            })
        }
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The key a value at this path is written under when encoding.
    #[inline]
    pub fn last_segment(&self) -> &str {
        // Never empty, see `parse`.
        self.segments.last().map_or("", String::as_str)
    }

    /// Find the value at this path.
    ///
    /// Every intermediate value must be a map. With `options` set, keys of
    /// nested maps that differ only by normalization also match.
    pub fn find<'v>(
        &self,
        map: &'v Map<String, Value>,
        options: DeserializeOptions,
    ) -> Option<&'v Value> {
        let (last, parents) = self.segments.split_last()?;
        let mut current = map;
        for segment in parents {
            current = lookup(current, segment, options)?.as_object()?;
        }
        lookup(current, last, options)
    }
}

impl fmt::Display for MappingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.replace('.', "\\."))?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Lookup helpers

fn lookup<'v>(
    map: &'v Map<String, Value>,
    key: &str,
    options: DeserializeOptions,
) -> Option<&'v Value> {
    map.get(key).or_else(|| {
        if options.is_empty() {
            return None;
        }
        map.iter()
            .find(|(k, _)| options.normalize(k) == key)
            .map(|(_, v)| v)
    })
}

/// Rewrite every top-level key of `map` with `options`.
pub(crate) fn normalize_keys(
    map: &Map<String, Value>,
    options: DeserializeOptions,
) -> Cow<'_, Map<String, Value>> {
    if options.is_empty() {
        return Cow::Borrowed(map);
    }
    Cow::Owned(
        map.iter()
            .map(|(k, v)| (options.normalize(k).into_owned(), v.clone()))
            .collect(),
    )
}

/// Follow `designated_path` from the document root.
///
/// A blank path designates the root itself.
pub(crate) fn designate<'v>(value: &'v Value, designated_path: &str) -> Option<&'v Value> {
    let Some(path) = MappingPath::parse(designated_path) else {
        return Some(value);
    };
    path.segments()
        .iter()
        .try_fold(value, |current, segment| current.as_object()?.get(segment))
}

/// Follow `designated_path` and require a map there.
pub(crate) fn designate_map<'v>(
    value: &'v Value,
    designated_path: &str,
) -> Result<&'v Map<String, Value>, MappingError> {
    designate(value, designated_path)
        .and_then(Value::as_object)
        .ok_or_else(|| not_found(designated_path))
}

/// Follow `designated_path` and require a list there.
pub(crate) fn designate_list<'v>(
    value: &'v Value,
    designated_path: &str,
) -> Result<&'v [Value], MappingError> {
    designate(value, designated_path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| not_found(designated_path))
}

fn not_found(designated_path: &str) -> MappingError {
    let err = MappingError::PathNotFound {
        path: designated_path.into(),
    };
    log::warn!("{err}");
    err
}

// -----------------------------------------------------------------------------
// Tests
