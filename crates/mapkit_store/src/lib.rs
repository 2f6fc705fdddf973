//! Secure string storage for mapped records.
//!
//! A [`SecureStore`] keeps opaque strings by key. A [`Keychain`] sits on
//! top of one and stores records as JSON text through typed
//! [`KeychainKey`]s. Every keychain carries a [`DeviceId`], created the
//! first time a store is used.
//!
//! ```
//! use mapkit_store::{Keychain, KeychainKey, MemoryStore};
//! use mapkit_model::derive::Model;
//!
//! #[derive(Model, Default, Debug, PartialEq)]
//! struct Session {
//!     token: String,
//!     expires: i64,
//! }
//!
//! const SESSION: KeychainKey<Session> = KeychainKey::new("session");
//!
//! let keychain = Keychain::new(MemoryStore::new("app")).unwrap();
//! let session = Session { token: "t0k".into(), expires: 1_700_000_000 };
//!
//! keychain.set(&SESSION, Some(&session)).unwrap();
//! assert_eq!(keychain.get(&SESSION).unwrap(), Some(session));
//! assert!(keychain.device_id().unwrap().is_some());
//! ```
#![allow(clippy::std_instead_of_core, reason = "std crate")]
#![allow(clippy::std_instead_of_alloc, reason = "std crate")]

// -----------------------------------------------------------------------------
// Modules

mod device;
mod error;
mod keychain;
mod store;

// -----------------------------------------------------------------------------
// Exports

pub use device::DeviceId;
pub use error::StoreError;
pub use keychain::{Keychain, KeychainKey};
pub use store::{MemoryStore, SecureStore};
