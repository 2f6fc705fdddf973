use core::fmt;
use core::marker::PhantomData;

use mapkit_model::{Decoder, Encoder, MappingConfig, Model};

use crate::{DeviceId, SecureStore, StoreError};

// -----------------------------------------------------------------------------
// KeychainKey

/// The key of a record of type `T` in a [`Keychain`].
pub struct KeychainKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> KeychainKey<T> {
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for KeychainKey<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for KeychainKey<T> {}

impl<T> fmt::Debug for KeychainKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeychainKey").field(&self.name).finish()
    }
}

// -----------------------------------------------------------------------------
// Keychain

/// Records stored as JSON text in a [`SecureStore`].
#[derive(Debug)]
pub struct Keychain<S> {
    store: S,
    config: MappingConfig,
}

impl<S: SecureStore> Keychain<S> {
    /// Key of the [`DeviceId`] of every keychain.
    pub const DEVICE_ID: KeychainKey<DeviceId> = KeychainKey::new("mapkit.keychain.device_id");

    /// A primary keychain over `store`.
    ///
    /// Generates and saves a [`DeviceId`] if the store has none yet.
    pub fn new(store: S) -> Result<Self, StoreError> {
        let keychain = Self::with_config(store, *MappingConfig::global());
        if keychain.device_id()?.is_none() {
            let id = DeviceId::generate();
            log::trace!("new device id `{}` for service `{}`", id.uuid, keychain.store.service());
            keychain.set(&Self::DEVICE_ID, Some(&id))?;
        }
        Ok(keychain)
    }

    /// A keychain over `store` sharing the [`DeviceId`] of `primary`.
    pub fn with_shared<P: SecureStore>(store: S, primary: &Keychain<P>) -> Result<Self, StoreError> {
        let keychain = Self::with_config(store, primary.config);
        let id = primary.device_id()?;
        keychain.set(&Self::DEVICE_ID, id.as_ref())?;
        Ok(keychain)
    }

    /// A keychain mapping records with `config`. No device id is created.
    pub fn with_config(store: S, config: MappingConfig) -> Self {
        Self { store, config }
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the record stored under `key`.
    pub fn get<T: Model>(&self, key: &KeychainKey<T>) -> Result<Option<T>, StoreError> {
        let Some(text) = self.store.get(key.name())? else {
            return Ok(None);
        };
        let record = Decoder::new(&self.config).decode_str(&text, None)?;
        Ok(Some(record))
    }

    /// Store `value` under `key`, or remove the entry when `value` is `None`.
    pub fn set<T: Model>(&self, key: &KeychainKey<T>, value: Option<&T>) -> Result<(), StoreError> {
        let text = value
            .map(|value| Encoder::new(&self.config).encode_string(value, false))
            .transpose()?;
        self.store.set(key.name(), text.as_deref())
    }

    pub fn device_id(&self) -> Result<Option<DeviceId>, StoreError> {
        self.get(&Self::DEVICE_ID)
    }

    /// Remove every entry but the device id.
    ///
    /// Entries that fail to be removed are logged and skipped.
    pub fn destroy(&self) -> Result<(), StoreError> {
        let device_id = Self::DEVICE_ID.name();
        for key in self.store.keys()? {
            if key == device_id {
                continue;
            }
            if let Err(err) = self.store.set(&key, None) {
                log::error!("failed to remove `{key}` from `{}`: {err}", self.store.service());
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
