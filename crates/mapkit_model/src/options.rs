use alloc::borrow::Cow;
use alloc::string::String;
use std::sync::OnceLock;

use bitflags::bitflags;

use crate::MappingError;
use crate::trace::FieldTrail;

// -----------------------------------------------------------------------------
// DeserializeOptions

bitflags! {
    /// Key normalization applied while decoding.
    ///
    /// With a flag set, every top-level key of a document map, every field
    /// key and every registered path are normalized the same way before they
    /// are compared.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeserializeOptions: u8 {
        /// Keys are compared lowercased.
        const CASE_INSENSITIVE = 1 << 0;
        /// Keys are compared with underscores removed.
        const CASE_UNDERSCORE  = 1 << 1;
    }
}

impl DeserializeOptions {
    /// Normalize `key` according to the set flags.
    ///
    /// ```
    /// use mapkit_model::DeserializeOptions;
    ///
    /// let all = DeserializeOptions::all();
    /// assert_eq!(all.normalize("User_Name"), "username");
    /// assert_eq!(DeserializeOptions::empty().normalize("User_Name"), "User_Name");
    /// ```
    pub fn normalize<'a>(&self, key: &'a str) -> Cow<'a, str> {
        let mut key = Cow::Borrowed(key);
        if self.contains(Self::CASE_INSENSITIVE) && key.chars().any(char::is_uppercase) {
            key = Cow::Owned(key.to_lowercase());
        }
        if self.contains(Self::CASE_UNDERSCORE) && key.contains('_') {
            key = Cow::Owned(key.chars().filter(|c| *c != '_').collect::<String>());
        }
        key
    }
}

// -----------------------------------------------------------------------------
// MappingConfig

/// Settings shared by a [`Decoder`](crate::Decoder) or [`Encoder`](crate::Encoder).
///
/// Pass one explicitly, or install one process-wide with [`install`] before
/// the first mapping. The global value never changes once installed.
///
/// [`install`]: MappingConfig::install
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingConfig {
    deserialize_options: DeserializeOptions,
}

static GLOBAL_CONFIG: OnceLock<MappingConfig> = OnceLock::new();

static DEFAULT_CONFIG: MappingConfig = MappingConfig::new();

impl MappingConfig {
    /// A config with every option cleared.
    pub const fn new() -> Self {
        Self {
            deserialize_options: DeserializeOptions::empty(),
        }
    }

    /// Set the key normalization used while decoding.
    pub const fn with_deserialize_options(mut self, options: DeserializeOptions) -> Self {
        self.deserialize_options = options;
        self
    }

    #[inline]
    pub const fn deserialize_options(&self) -> DeserializeOptions {
        self.deserialize_options
    }

    /// Install `self` as the process-wide config.
    ///
    /// Fails with [`MappingError::ConfigAlreadyInstalled`] on any call after
    /// the first successful one.
    pub fn install(self) -> Result<(), MappingError> {
        GLOBAL_CONFIG
            .set(self)
            .map_err(|_| MappingError::ConfigAlreadyInstalled)
    }

    /// The installed config, or the default one.
    pub fn global() -> &'static MappingConfig {
        GLOBAL_CONFIG.get().unwrap_or(&DEFAULT_CONFIG)
    }
}

// -----------------------------------------------------------------------------
// Context

/// State carried through one decode or encode call.
///
/// Handed to every [`Transformable`](crate::Transformable) conversion so that
/// nested records see the same options.
pub struct Context<'a> {
    config: &'a MappingConfig,
    pub(crate) trail: FieldTrail,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a MappingConfig) -> Self {
        Self {
            config,
            trail: FieldTrail::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &'a MappingConfig {
        self.config
    }

    #[inline]
    pub fn options(&self) -> DeserializeOptions {
        self.config.deserialize_options
    }
}

// -----------------------------------------------------------------------------
// Tests
