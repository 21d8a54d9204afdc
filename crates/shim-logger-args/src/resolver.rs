// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Resolution of the shim logger's global arguments from a [`ConfigSource`].
//!
//! Resolution is sequential and stops at the first error:
//! 1. required identifiers (`container-id`, `container-name`, `log-driver`)
//! 2. mode and max buffer size
//! 3. cleanup time
//! 4. owner ids and container metadata

use std::time::Duration;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::buffer_size::{parse_buffer_size, DEFAULT_MAX_BUFFER_SIZE};
use crate::cleanup_time::CleanupTimePolicy;
use crate::container::{parse_env, parse_labels, ContainerMetadata};
use crate::error::ArgsError;
use crate::keys::{
    CLEANUP_TIME_KEY, CONTAINER_ENV_KEY, CONTAINER_ID_KEY, CONTAINER_IMAGE_ID_KEY,
    CONTAINER_IMAGE_NAME_KEY, CONTAINER_LABELS_KEY, CONTAINER_NAME_KEY, GID_KEY, LOG_DRIVER_KEY,
    MAX_BUFFER_SIZE_KEY, MODE_KEY, UID_KEY, UNSET_OWNER_ID,
};
use crate::mode::Mode;
use crate::source::ConfigSource;

/// Validated global arguments of one shim logger invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalArgs {
    pub container_id: String,
    pub container_name: String,
    pub log_driver: String,
    pub mode: Mode,
    /// Ring buffer size in bytes; always 0 in blocking mode.
    pub max_buffer_size: usize,
    #[serde(serialize_with = "serialize_cleanup_time")]
    pub cleanup_time: Option<Duration>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub container: ContainerMetadata,
}

fn serialize_cleanup_time<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(duration) => {
            serializer.serialize_str(&humantime::format_duration(*duration).to_string())
        }
        None => serializer.serialize_none(),
    }
}

/// Reads the shim logger arguments out of a configuration source.
#[derive(Debug, Clone)]
pub struct ArgumentResolver<S> {
    source: S,
    cleanup_policy: CleanupTimePolicy,
}

impl<S: ConfigSource> ArgumentResolver<S> {
    pub fn new(source: S) -> Self {
        Self::with_policy(source, CleanupTimePolicy::default())
    }

    pub fn with_policy(source: S, cleanup_policy: CleanupTimePolicy) -> Self {
        Self {
            source,
            cleanup_policy,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cleanup_policy(&self) -> CleanupTimePolicy {
        self.cleanup_policy
    }

    /// Resolves and validates every global argument.
    ///
    /// Required keys are checked in a fixed order and the first missing one
    /// is reported; nested errors are returned unchanged.
    pub fn resolve_global_arguments(&self) -> Result<GlobalArgs, ArgsError> {
        let container_id = self.required(CONTAINER_ID_KEY)?;
        let container_name = self.required(CONTAINER_NAME_KEY)?;
        let log_driver = self.required(LOG_DRIVER_KEY)?;

        let (mode, max_buffer_size) = self.resolve_mode_and_buffer_size()?;
        let cleanup_time = self.resolve_cleanup_time()?;
        let (uid, gid) = self.resolve_owner_ids()?;
        let container = self.resolve_container_metadata()?;

        debug!(
            container_id = %container_id,
            log_driver = %log_driver,
            "Resolved global arguments"
        );

        Ok(GlobalArgs {
            container_id,
            container_name,
            log_driver,
            mode,
            max_buffer_size,
            cleanup_time,
            uid,
            gid,
            container,
        })
    }

    /// Resolves the delivery mode; the buffer size is only read in non-blocking mode.
    pub fn resolve_mode_and_buffer_size(&self) -> Result<(Mode, usize), ArgsError> {
        let mode = match self.source.get_non_empty(MODE_KEY)? {
            None => Mode::Blocking,
            Some(value) => value.parse::<Mode>()?,
        };

        let max_buffer_size = if mode.is_buffered() {
            self.resolve_max_buffer_size()?
        } else {
            0
        };

        debug!("Resolved mode {mode} with max buffer size {max_buffer_size}");
        Ok((mode, max_buffer_size))
    }

    /// Resolves `max-buffer-size`, defaulting to 1 MiB when unset.
    pub fn resolve_max_buffer_size(&self) -> Result<usize, ArgsError> {
        let Some(value) = self.source.get_non_empty(MAX_BUFFER_SIZE_KEY)? else {
            return Ok(DEFAULT_MAX_BUFFER_SIZE);
        };

        let size = parse_buffer_size(&value)?;
        if size == 0 {
            return Err(ArgsError::InvalidBufferSize {
                value,
                reason: "non-blocking mode requires a positive buffer size".to_string(),
            });
        }
        Ok(size)
    }

    /// Resolves `cleanup-time`; `None` when it is not configured.
    pub fn resolve_cleanup_time(&self) -> Result<Option<Duration>, ArgsError> {
        self.source
            .get_non_empty(CLEANUP_TIME_KEY)?
            .map(|value| self.cleanup_policy.parse(&value))
            .transpose()
    }

    /// Resolves `uid` and `gid`. Unset, empty and `-1` all mean "keep the current owner".
    pub fn resolve_owner_ids(&self) -> Result<(Option<u32>, Option<u32>), ArgsError> {
        Ok((self.owner_id(UID_KEY)?, self.owner_id(GID_KEY)?))
    }

    pub fn resolve_container_metadata(&self) -> Result<ContainerMetadata, ArgsError> {
        let env = match self.source.try_get(CONTAINER_ENV_KEY)? {
            Some(value) => parse_env(&value)?,
            None => Vec::new(),
        };
        let labels = match self.source.try_get(CONTAINER_LABELS_KEY)? {
            Some(value) => parse_labels(&value)?,
            None => Default::default(),
        };

        Ok(ContainerMetadata {
            image_id: self.source.get_non_empty(CONTAINER_IMAGE_ID_KEY)?,
            image_name: self.source.get_non_empty(CONTAINER_IMAGE_NAME_KEY)?,
            env,
            labels,
        })
    }

    fn required(&self, key: &'static str) -> Result<String, ArgsError> {
        self.source
            .get_non_empty(key)?
            .ok_or(ArgsError::MissingRequiredField { key })
    }

    fn owner_id(&self, key: &'static str) -> Result<Option<u32>, ArgsError> {
        match self.source.get_non_empty(key)? {
            None => Ok(None),
            Some(value) if value.trim() == UNSET_OWNER_ID => Ok(None),
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map(Some)
                .map_err(|_| ArgsError::InvalidOwnerId { key, value }),
        }
    }
}
