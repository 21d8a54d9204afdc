// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Configuration keys understood by the shim logger.
//!
//! Keys are the long flag names of the command line (`--container-id`); the
//! environment source derives its variable names from them.

pub const CONTAINER_ID_KEY: &str = "container-id";
pub const CONTAINER_NAME_KEY: &str = "container-name";
pub const LOG_DRIVER_KEY: &str = "log-driver";
pub const MODE_KEY: &str = "mode";
pub const MAX_BUFFER_SIZE_KEY: &str = "max-buffer-size";
pub const CLEANUP_TIME_KEY: &str = "cleanup-time";
pub const UID_KEY: &str = "uid";
pub const GID_KEY: &str = "gid";
pub const CONTAINER_IMAGE_ID_KEY: &str = "container-image-id";
pub const CONTAINER_IMAGE_NAME_KEY: &str = "container-image-name";
pub const CONTAINER_ENV_KEY: &str = "container-env";
pub const CONTAINER_LABELS_KEY: &str = "container-labels";

/// Required keys, in the order they are checked.
pub const REQUIRED_KEYS: [&str; 3] = [CONTAINER_ID_KEY, CONTAINER_NAME_KEY, LOG_DRIVER_KEY];

/// Every key the resolver reads.
pub const ALL_KEYS: [&str; 12] = [
    CONTAINER_ID_KEY,
    CONTAINER_NAME_KEY,
    LOG_DRIVER_KEY,
    MODE_KEY,
    MAX_BUFFER_SIZE_KEY,
    CLEANUP_TIME_KEY,
    UID_KEY,
    GID_KEY,
    CONTAINER_IMAGE_ID_KEY,
    CONTAINER_IMAGE_NAME_KEY,
    CONTAINER_ENV_KEY,
    CONTAINER_LABELS_KEY,
];

/// Default registered for `cleanup-time` by [`crate::Settings::with_defaults`].
pub const DEFAULT_CLEANUP_TIME: &str = "5s";

/// Sentinel meaning "keep the current owner" for `uid` and `gid`.
pub const UNSET_OWNER_ID: &str = "-1";
