// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Cleanup time: how long the shim waits for the log driver to drain after
//! the container exits.

use std::time::Duration;

use crate::error::ArgsError;

/// Longest cleanup time accepted by [`CleanupTimePolicy::default`].
pub const DEFAULT_MAX_CLEANUP_TIME: Duration = Duration::from_secs(12);

/// Upper bound applied to a parsed cleanup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupTimePolicy {
    pub max: Duration,
}

impl Default for CleanupTimePolicy {
    fn default() -> Self {
        Self {
            max: DEFAULT_MAX_CLEANUP_TIME,
        }
    }
}

impl CleanupTimePolicy {
    pub const fn with_max(max: Duration) -> Self {
        Self { max }
    }

    /// Parses a unit-suffixed duration (`3s`, `500ms`, `1.5s`, `1m 5s`) and
    /// checks it against the policy. A bare number such as `3` has no unit and
    /// is rejected, except `0`, which needs no unit.
    pub fn parse(&self, value: &str) -> Result<Duration, ArgsError> {
        let duration =
            humantime::parse_duration(value.trim()).map_err(|e| ArgsError::InvalidDuration {
                value: value.to_string(),
                reason: e.to_string(),
            })?;
        self.check(duration).map_err(|reason| ArgsError::InvalidDuration {
            value: value.to_string(),
            reason,
        })?;
        Ok(duration)
    }

    fn check(&self, duration: Duration) -> Result<(), String> {
        if duration > self.max {
            return Err(format!(
                "maximum cleanup time is {}",
                humantime::format_duration(self.max)
            ));
        }
        Ok(())
    }
}
