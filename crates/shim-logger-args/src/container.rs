// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Container metadata forwarded to log drivers for tag templating.
//!
//! `container-env` and `container-labels` accept either JSON (as emitted by
//! the runtime) or a comma-separated list:
//! - env: `["A=1","B=2"]` or `A=1,B=2`
//! - labels: `{"team":"core"}` or `team=core,tier=web`

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ArgsError;
use crate::keys::{CONTAINER_ENV_KEY, CONTAINER_LABELS_KEY};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContainerMetadata {
    pub image_id: Option<String>,
    pub image_name: Option<String>,
    pub env: Vec<String>,
    pub labels: BTreeMap<String, String>,
}

pub fn parse_env(value: &str) -> Result<Vec<String>, ArgsError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| ArgsError::InvalidContainerMetadata {
            key: CONTAINER_ENV_KEY,
            reason: e.to_string(),
        });
    }

    let mut env = Vec::new();
    for entry in split_list(trimmed) {
        // Bare names are allowed by runtimes, but an entry can't start with '='.
        if entry.starts_with('=') {
            return Err(ArgsError::InvalidContainerMetadata {
                key: CONTAINER_ENV_KEY,
                reason: format!("entry '{entry}' has no variable name"),
            });
        }
        env.push(entry.to_string());
    }
    Ok(env)
}

pub fn parse_labels(value: &str) -> Result<BTreeMap<String, String>, ArgsError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(BTreeMap::new());
    }
    if trimmed.starts_with('{') {
        return serde_json::from_str(trimmed).map_err(|e| ArgsError::InvalidContainerMetadata {
            key: CONTAINER_LABELS_KEY,
            reason: e.to_string(),
        });
    }

    let mut labels = BTreeMap::new();
    for entry in split_list(trimmed) {
        match entry.split_once('=') {
            Some((key, label)) if !key.trim().is_empty() => {
                labels.insert(key.trim().to_string(), label.trim().to_string());
            }
            _ => {
                return Err(ArgsError::InvalidContainerMetadata {
                    key: CONTAINER_LABELS_KEY,
                    reason: format!("expected key=value, got '{entry}'"),
                })
            }
        }
    }
    Ok(labels)
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_json() {
        assert_eq!(
            parse_env(r#"["PATH=/usr/bin","HOME=/root"]"#),
            Ok(vec!["PATH=/usr/bin".to_string(), "HOME=/root".to_string()])
        );
    }

    #[test]
    fn test_parse_env_comma_separated() {
        assert_eq!(
            parse_env("A=1, B=2,,DEBUG"),
            Ok(vec!["A=1".to_string(), "B=2".to_string(), "DEBUG".to_string()])
        );
    }

    #[test]
    fn test_parse_env_empty() {
        assert_eq!(parse_env(""), Ok(Vec::new()));
        assert_eq!(parse_env("   "), Ok(Vec::new()));
    }

    #[test]
    fn test_parse_env_invalid() {
        assert!(parse_env(r#"["A=1", 2]"#).is_err());
        assert!(parse_env("[not json").is_err());
        assert!(parse_env("=value").is_err());
    }

    #[test]
    fn test_parse_labels_json() {
        let labels = parse_labels(r#"{"team":"core","tier":"web"}"#).unwrap();
        assert_eq!(
            labels,
            BTreeMap::from([
                ("team".to_string(), "core".to_string()),
                ("tier".to_string(), "web".to_string()),
            ])
        );
    }

    #[test]
    fn test_parse_labels_comma_separated() {
        let labels = parse_labels("team=core, tier = web,empty=").unwrap();
        assert_eq!(
            labels,
            BTreeMap::from([
                ("empty".to_string(), String::new()),
                ("team".to_string(), "core".to_string()),
                ("tier".to_string(), "web".to_string()),
            ])
        );
    }

    #[test]
    fn test_parse_labels_invalid() {
        let err = parse_labels("team").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid container-labels: expected key=value, got 'team'"
        );
        assert!(parse_labels("=core").is_err());
        assert!(parse_labels(r#"{"team": 1}"#).is_err());
    }
}
