use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use mapkit_utils::hash::{IndexHashMap, IndexHashSet};
use serde_json::Value;

use crate::{DeserializeOptions, MappingPath};

/// Decode half of a field override. The boxed value must have the field's
/// type, anything else is discarded.
pub type DecodeFn = Box<dyn Fn(&Value) -> Option<Box<dyn Any>>>;

/// Encode half of a field override. Receives the field value, `None` omits
/// the field.
pub type EncodeFn = Box<dyn Fn(&dyn Any) -> Option<Value>>;

// -----------------------------------------------------------------------------
// MappingHandler

/// Override entry of one field.
#[derive(Default)]
pub struct MappingHandler {
    paths: Option<Vec<MappingPath>>,
    decode: Option<DecodeFn>,
    encode: Option<EncodeFn>,
}

impl MappingHandler {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look the field up at `paths`, in order. An empty list is no override.
    pub fn with_paths(mut self, paths: Vec<MappingPath>) -> Self {
        self.set_paths(paths);
        self
    }

    pub fn with_decoder(mut self, decode: impl Fn(&Value) -> Option<Box<dyn Any>> + 'static) -> Self {
        self.decode = Some(Box::new(decode));
        self
    }

    pub fn with_encoder(mut self, encode: impl Fn(&dyn Any) -> Option<Value> + 'static) -> Self {
        self.encode = Some(Box::new(encode));
        self
    }

    #[inline]
    pub fn paths(&self) -> Option<&[MappingPath]> {
        self.paths.as_deref()
    }

    #[inline]
    pub fn decoder(&self) -> Option<&DecodeFn> {
        self.decode.as_ref()
    }

    #[inline]
    pub fn encoder(&self) -> Option<&EncodeFn> {
        self.encode.as_ref()
    }

    pub(crate) fn set_paths(&mut self, paths: Vec<MappingPath>) {
        self.paths = (!paths.is_empty()).then_some(paths);
    }

    pub(crate) fn set_decoder(&mut self, decode: DecodeFn) {
        self.decode = Some(decode);
    }

    pub(crate) fn set_encoder(&mut self, encode: EncodeFn) {
        self.encode = Some(encode);
    }
}

impl fmt::Debug for MappingHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingHandler")
            .field("paths", &self.paths)
            .field("decode", &self.decode.is_some())
            .field("encode", &self.encode.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MappingTable

/// Overrides of one record, built fresh for every decode or encode of it.
#[derive(Debug, Default)]
pub struct MappingTable {
    handlers: IndexHashMap<usize, MappingHandler>,
    excluded: IndexHashSet<usize>,
    options: DeserializeOptions,
}

impl MappingTable {
    pub(crate) fn new(options: DeserializeOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    #[inline]
    pub fn options(&self) -> DeserializeOptions {
        self.options
    }

    #[inline]
    pub fn lookup(&self, index: usize) -> Option<&MappingHandler> {
        self.handlers.get(&index)
    }

    #[inline]
    pub fn is_excluded(&self, index: usize) -> bool {
        self.excluded.contains(&index)
    }

    pub(crate) fn entry(&mut self, index: usize) -> &mut MappingHandler {
        self.handlers.entry(index).or_default()
    }

    pub(crate) fn register(&mut self, index: usize, handler: MappingHandler) {
        self.handlers.insert(index, handler);
    }

    pub(crate) fn exclude(&mut self, index: usize) {
        self.excluded.insert(index);
    }
}
