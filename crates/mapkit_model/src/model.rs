use crate::Transformable;
use crate::info::ModelInfo;
use crate::mapper::Mapper;

// -----------------------------------------------------------------------------
// MappingHooks

/// Customization points of a record, both optional.
///
/// `#[derive(Model)]` implements this trait with the defaults unless the
/// record opts out with `#[model(MappingHooks = false)]`.
pub trait MappingHooks: Sized {
    /// Declare field overrides.
    ///
    /// Called on the instance being mapped: a fresh default for a decode, the
    /// live record for an update or an encode.
    fn mapping(&self, _mapper: &mut Mapper<'_, Self>) {}

    /// Called after every field of a decode or an update has been written.
    fn did_finish_mapping(&mut self) {}
}

// -----------------------------------------------------------------------------
// Model

/// A record with a field descriptor, implemented by `#[derive(Model)]`.
pub trait Model: Transformable + Default + MappingHooks {
    /// The struct holding one [`Field`](crate::Field) per described field.
    type Fields: 'static;

    /// Field identities of the record, for use in [`MappingHooks::mapping`].
    const FIELDS: Self::Fields;

    /// Number of described fields, base record fields included.
    const FIELD_COUNT: usize;

    fn model_info() -> &'static ModelInfo;
}

/// Marks `Self` as embedding the record `B` as its base.
///
/// Lets base field identities be used on the derived record with
/// [`Field::inherit`](crate::Field::inherit).
pub trait Inherits<B>: Model {}
