// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Delivery mode between the container and the log driver.
//!
//! - **Blocking**: writes from the container block while the log driver is busy.
//!   No buffer is allocated.
//! - **Non-blocking**: logs go through an in-memory ring buffer bounded by
//!   `max-buffer-size`; when the buffer is full, new logs are dropped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArgsError;

/// Log delivery mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Blocking,
    NonBlocking,
}

impl Mode {
    /// Literal accepted on the command line for this mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Blocking => "blocking",
            Mode::NonBlocking => "non-blocking",
        }
    }

    /// Returns true if a bounded buffer sits between the container and the driver.
    pub const fn is_buffered(self) -> bool {
        matches!(self, Mode::NonBlocking)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the two literals.
impl FromStr for Mode {
    type Err = ArgsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blocking" => Ok(Mode::Blocking),
            "non-blocking" => Ok(Mode::NonBlocking),
            _ => Err(ArgsError::InvalidMode {
                value: s.to_string(),
            }),
        }
    }
}
