//! Reflective mapping between records and JSON documents.
//!
//! A record derives [`Model`](derive::Model) and gains a type descriptor that
//! lists its fields, their types and how to reach them. The [`Decoder`] walks
//! that descriptor to fill a record from a [`serde_json::Value`], the
//! [`Encoder`] walks it to produce one. Per-field overrides (alternate paths,
//! transforms, exclusion) are declared in [`MappingHooks::mapping`].
//!
//! ```
//! use mapkit_model::derive::Model;
//! use mapkit_model::{Mapper, MappingHooks, Model, ModelExt};
//!
//! #[derive(Model, Default, Debug)]
//! #[model(MappingHooks = false)]
//! struct User {
//!     name: String,
//!     age: i32,
//!     token: Option<String>,
//! }
//!
//! impl MappingHooks for User {
//!     fn mapping(&self, mapper: &mut Mapper<'_, Self>) {
//!         mapper
//!             .path(Self::FIELDS.name, "profile.display_name")
//!             .exclude(Self::FIELDS.token);
//!     }
//! }
//!
//! let user = User::from_json(
//!     r#"{ "profile": { "display_name": "Ann" }, "age": "32", "token": "x" }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(user.name, "Ann");
//! assert_eq!(user.age, 32);
//! assert_eq!(user.token, None);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate through `Manifest`, which resolves to
// `::mapkit_model` inside its own doctests and tests as well.
extern crate self as mapkit_model;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod de;
mod document;
mod error;
mod ext;
mod model;
mod options;
mod ser;
mod trace;

pub mod info;
pub mod mapper;
pub mod transform;
pub mod transformable;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use mapkit_model_derive as derive;

pub use de::Decoder;
pub use document::MappingPath;
pub use error::{MappingError, Result};
pub use ext::ModelExt;
pub use info::{Typed, describe, describe_info};
pub use mapper::{Field, Mapper};
pub use model::{Inherits, MappingHooks, Model};
pub use options::{Context, DeserializeOptions, MappingConfig};
pub use ser::Encoder;
pub use transformable::{DynTransformable, MapKey, RawEnum, Transformable};
