use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use mapkit_utils::hash::HashMap;

use crate::info::{FieldInfo, Projection, Type};
use crate::mapper::{Mapper, MappingTable};
use crate::model::{MappingHooks, Model};

// -----------------------------------------------------------------------------
// ModelHooks

/// Type-erased entry points to a record's [`MappingHooks`].
#[derive(Clone, Copy)]
pub struct ModelHooks {
    mapping: fn(&dyn Any, &mut MappingTable),
    finish: fn(&mut dyn Any),
}

impl ModelHooks {
    pub fn of<M: Model>() -> Self {
        Self {
            mapping: |record, table| {
                if let Some(record) = record.downcast_ref::<M>() {
                    MappingHooks::mapping(record, &mut Mapper::new(table));
                }
            },
            finish: |record| {
                if let Some(record) = record.downcast_mut::<M>() {
                    MappingHooks::did_finish_mapping(record);
                }
            },
        }
    }
}

impl fmt::Debug for ModelHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ModelHooks")
    }
}

// -----------------------------------------------------------------------------
// BaseLink

/// How a record reaches its embedded base record.
#[derive(Clone, Copy, Debug)]
pub struct BaseLink {
    info: &'static ModelInfo,
    projection: Projection,
}

impl BaseLink {
    #[inline]
    pub const fn info(&self) -> &'static ModelInfo {
        self.info
    }

    #[inline]
    pub const fn projection(&self) -> &Projection {
        &self.projection
    }
}

// -----------------------------------------------------------------------------
// ModelInfo

/// Field descriptors of a record.
///
/// Fields are listed in declaration order. Fields of the base record, if
/// any, come first in the base's own order.
#[derive(Clone, Debug)]
pub struct ModelInfo {
    ty: Type,
    base: Option<BaseLink>,
    fields: Box<[FieldInfo]>,
    names: HashMap<&'static str, usize>,
    hooks: ModelHooks,
}

impl ModelInfo {
    /// Start describing the record `M`.
    pub fn builder<M: Model>() -> ModelInfoBuilder {
        ModelInfoBuilder {
            ty: Type::of::<M>(),
            base: None,
            fields: Vec::new(),
            hooks: ModelHooks::of::<M>(),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn base(&self) -> Option<&BaseLink> {
        self.base.as_ref()
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(*self.names.get(name)?)
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldInfo> {
        self.fields.iter()
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Run the mapping hooks of the base chain, then of this record.
    pub(crate) fn run_mapping(&self, record: &dyn Any, table: &mut MappingTable) {
        if let Some(base) = &self.base
            && let Some(inner) = base.projection.get(record)
        {
            base.info.run_mapping(inner, table);
        }
        (self.hooks.mapping)(record, table);
    }

    /// Run the finish hooks of the base chain, then of this record.
    pub(crate) fn run_finish(&self, record: &mut dyn Any) {
        if let Some(base) = &self.base
            && let Some(inner) = base.projection.get_mut(record)
        {
            base.info.run_finish(inner);
        }
        (self.hooks.finish)(record);
    }
}

// -----------------------------------------------------------------------------
// ModelInfoBuilder

/// Builder of [`ModelInfo`], used by `#[derive(Model)]`.
#[derive(Debug)]
pub struct ModelInfoBuilder {
    ty: Type,
    base: Option<BaseLink>,
    fields: Vec<FieldInfo>,
    hooks: ModelHooks,
}

impl ModelInfoBuilder {
    /// Embed the base record `B`, reached through `projection`.
    ///
    /// Must be called before any [`field`](Self::field), so that inherited
    /// fields keep the indices they have in `B`.
    pub fn base<B: Model>(mut self, projection: Projection) -> Self {
        let info = B::model_info();
        self.fields
            .extend(info.iter().map(|field| field.behind(projection)));
        self.base = Some(BaseLink { info, projection });
        self
    }

    /// Append a field, indexed after every field added so far.
    pub fn field(mut self, field: FieldInfo) -> Self {
        let index = self.fields.len();
        self.fields.push(field.at(index));
        self
    }

    pub fn build(self) -> ModelInfo {
        let names = self
            .fields
            .iter()
            .map(|field| (field.name(), field.index()))
            .collect();
        ModelInfo {
            ty: self.ty,
            base: self.base,
            fields: self.fields.into_boxed_slice(),
            names,
            hooks: self.hooks,
        }
    }
}
