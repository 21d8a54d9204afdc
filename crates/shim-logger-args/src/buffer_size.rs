// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Parsing of human-readable buffer sizes such as `4k` or `2m`.

use crate::error::ArgsError;

pub const KIB: usize = 1 << 10;
pub const MIB: usize = 1 << 20;

/// Buffer size used in non-blocking mode when `max-buffer-size` is not set.
pub const DEFAULT_MAX_BUFFER_SIZE: usize = MIB;

/// Parses `<digits><unit>` into a byte count.
///
/// The unit is optional and case-insensitive: none or `b` for bytes, `k`/`kb`
/// for KiB and `m`/`mb` for MiB. Surrounding whitespace is ignored.
///
/// # Examples
///
/// ```
/// use shim_logger_args::buffer_size::parse_buffer_size;
///
/// assert_eq!(parse_buffer_size("1234"), Ok(1234));
/// assert_eq!(parse_buffer_size("4k"), Ok(4096));
/// assert_eq!(parse_buffer_size("2m"), Ok(2 * 1024 * 1024));
/// assert!(parse_buffer_size("3q").is_err());
/// assert!(parse_buffer_size("-1").is_err());
/// ```
pub fn parse_buffer_size(value: &str) -> Result<usize, ArgsError> {
    let invalid = |reason: &str| ArgsError::InvalidBufferSize {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = value.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    if digits.is_empty() {
        return Err(invalid("expected a non-negative integer"));
    }

    let multiplier = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" => KIB,
        "m" | "mb" => MIB,
        _ => return Err(invalid("unknown unit, expected one of: k, m")),
    };

    digits
        .parse::<usize>()
        .ok()
        .and_then(|count| count.checked_mul(multiplier))
        .ok_or_else(|| invalid("value is too large"))
}
