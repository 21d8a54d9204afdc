// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Coarse classification of an [`ArgsError`], convenient for matching without
/// caring about the attached details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingRequiredField,
    InvalidMode,
    InvalidBufferSize,
    InvalidDuration,
    InvalidOwnerId,
    InvalidContainerMetadata,
    InvalidEncoding,
}

/// Errors that can occur while resolving the shim logger arguments
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgsError {
    #[error("{key} is required")]
    MissingRequiredField { key: &'static str },

    #[error("invalid mode '{value}', expected one of: blocking, non-blocking")]
    InvalidMode { value: String },

    #[error("invalid max buffer size '{value}': {reason}")]
    InvalidBufferSize { value: String, reason: String },

    #[error("invalid cleanup time '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("invalid {key} '{value}': expected -1 or a non-negative 32-bit integer")]
    InvalidOwnerId { key: &'static str, value: String },

    #[error("invalid {key}: {reason}")]
    InvalidContainerMetadata { key: &'static str, reason: String },

    #[error("{name} is set but is not valid unicode")]
    InvalidEncoding { name: String },
}

impl ArgsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArgsError::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            ArgsError::InvalidMode { .. } => ErrorKind::InvalidMode,
            ArgsError::InvalidBufferSize { .. } => ErrorKind::InvalidBufferSize,
            ArgsError::InvalidDuration { .. } => ErrorKind::InvalidDuration,
            ArgsError::InvalidOwnerId { .. } => ErrorKind::InvalidOwnerId,
            ArgsError::InvalidContainerMetadata { .. } => ErrorKind::InvalidContainerMetadata,
            ArgsError::InvalidEncoding { .. } => ErrorKind::InvalidEncoding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_field_display() {
        let error = ArgsError::MissingRequiredField {
            key: "container-id",
        };
        assert_eq!(error.to_string(), "container-id is required");
        assert_eq!(error.kind(), ErrorKind::MissingRequiredField);
    }

    #[test]
    fn test_invalid_mode_display() {
        let error = ArgsError::InvalidMode {
            value: "test-mode".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "invalid mode 'test-mode', expected one of: blocking, non-blocking"
        );
    }

    #[test]
    fn test_error_kinds() {
        let cases = [
            (
                ArgsError::InvalidBufferSize {
                    value: "3q".into(),
                    reason: "unknown unit".into(),
                },
                ErrorKind::InvalidBufferSize,
            ),
            (
                ArgsError::InvalidDuration {
                    value: "3".into(),
                    reason: "time unit needed".into(),
                },
                ErrorKind::InvalidDuration,
            ),
            (
                ArgsError::InvalidOwnerId {
                    key: "uid",
                    value: "abc".into(),
                },
                ErrorKind::InvalidOwnerId,
            ),
            (
                ArgsError::InvalidContainerMetadata {
                    key: "container-labels",
                    reason: "bad".into(),
                },
                ErrorKind::InvalidContainerMetadata,
            ),
            (
                ArgsError::InvalidEncoding {
                    name: "SHIM_LOGGER_MODE".into(),
                },
                ErrorKind::InvalidEncoding,
            ),
        ];
        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{error}");
        }
    }
}
