// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Key-value configuration sources read by the argument resolver.
//!
//! A source answers `get(key)` with `None` when the key is unset and `Some`
//! (possibly empty) when it has a value. Three sources are provided:
//! - [`Settings`]: an in-memory store with explicit values and registered defaults
//! - [`EnvSource`]: process environment variables (`container-id` → `SHIM_LOGGER_CONTAINER_ID`)
//! - [`Layered`]: an ordered stack of sources where the first answer wins

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::sync::Arc;

use crate::error::ArgsError;
use crate::keys::{
    CLEANUP_TIME_KEY, DEFAULT_CLEANUP_TIME, GID_KEY, MODE_KEY, UID_KEY, UNSET_OWNER_ID,
};
use crate::mode::Mode;

/// Read-only access to string-keyed, string-valued configuration.
pub trait ConfigSource {
    /// Returns the value of `key`, or `None` when the key is unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Like [`ConfigSource::get`], but reports a value that is set and
    /// unreadable instead of treating it as unset.
    fn try_get(&self, key: &str) -> Result<Option<String>, ArgsError> {
        Ok(self.get(key))
    }

    /// Returns the value of `key` with empty strings folded into `None`.
    fn get_non_empty(&self, key: &str) -> Result<Option<String>, ArgsError> {
        Ok(self.try_get(key)?.filter(|value| !value.is_empty()))
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn try_get(&self, key: &str) -> Result<Option<String>, ArgsError> {
        (**self).try_get(key)
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn try_get(&self, key: &str) -> Result<Option<String>, ArgsError> {
        (**self).try_get(key)
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn try_get(&self, key: &str) -> Result<Option<String>, ArgsError> {
        (**self).try_get(key)
    }
}

/// In-memory settings store.
///
/// Explicit values shadow registered defaults, and [`Settings::reset`] clears
/// both so every key reads as unset again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: HashMap<String, String>,
    defaults: HashMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the command line defaults registered.
    pub fn with_defaults() -> Self {
        let mut settings = Self::new();
        settings.set_default(MODE_KEY, Mode::Blocking.as_str());
        settings.set_default(CLEANUP_TIME_KEY, DEFAULT_CLEANUP_TIME);
        settings.set_default(UID_KEY, UNSET_OWNER_ID);
        settings.set_default(GID_KEY, UNSET_OWNER_ID);
        settings
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut settings = Self::new();
        for (key, value) in pairs {
            settings.set(key, value);
        }
        settings
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.defaults.insert(key.into(), value.into());
    }

    /// Removes the explicit value of `key`; a registered default becomes visible again.
    pub fn unset(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Whether `key` has an explicit value, ignoring defaults.
    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.defaults.clear();
    }
}

impl ConfigSource for Settings {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .or_else(|| self.defaults.get(key))
            .cloned()
    }
}

pub const DEFAULT_ENV_PREFIX: &str = "SHIM_LOGGER";

/// Reads configuration from process environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSource {
    prefix: String,
}

impl Default for EnvSource {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }
}

impl EnvSource {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Environment variable name for `key`, e.g. `SHIM_LOGGER_MAX_BUFFER_SIZE`.
    pub fn var_name(&self, key: &str) -> String {
        let suffix = key.to_uppercase().replace('-', "_");
        if self.prefix.is_empty() {
            suffix
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl ConfigSource for EnvSource {
    /// Non-unicode values read as unset here; use `try_get` to surface them.
    fn get(&self, key: &str) -> Option<String> {
        self.try_get(key).ok().flatten()
    }

    fn try_get(&self, key: &str) -> Result<Option<String>, ArgsError> {
        let name = self.var_name(key);
        match env::var(&name) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => {
                tracing::warn!("Rejecting {name}: value is not valid unicode");
                Err(ArgsError::InvalidEncoding { name })
            }
        }
    }
}

/// Ordered stack of sources. The first source that has a value for a key
/// wins, even if that value is empty.
#[derive(Default)]
pub struct Layered {
    sources: Vec<Box<dyn ConfigSource + Send + Sync>>,
}

impl Layered {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source with lower precedence than the ones already added.
    #[must_use]
    pub fn with(mut self, source: impl ConfigSource + Send + Sync + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl fmt::Debug for Layered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layered")
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl ConfigSource for Layered {
    fn get(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.get(key))
    }

    /// Stops at the first source that has a value or fails to read one.
    fn try_get(&self, key: &str) -> Result<Option<String>, ArgsError> {
        for source in &self.sources {
            if let Some(value) = source.try_get(key)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}
