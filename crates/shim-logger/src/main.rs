// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use shim_logger_args::keys::{
    CLEANUP_TIME_KEY, CONTAINER_ENV_KEY, CONTAINER_ID_KEY, CONTAINER_IMAGE_ID_KEY,
    CONTAINER_IMAGE_NAME_KEY, CONTAINER_LABELS_KEY, CONTAINER_NAME_KEY, GID_KEY, LOG_DRIVER_KEY,
    MAX_BUFFER_SIZE_KEY, MODE_KEY, UID_KEY,
};
use shim_logger_args::{ArgumentResolver, EnvSource, GlobalArgs, Layered, Settings};

/// Logging shim between a container runtime and a log driver.
///
/// Every flag can also be given as a `SHIM_LOGGER_<FLAG>` environment
/// variable, e.g. `SHIM_LOGGER_CONTAINER_ID`. Flags win over the environment.
#[derive(Parser, Debug)]
#[command(author, version)]
struct Cli {
    /// Id of the container whose logs are forwarded
    #[arg(long = CONTAINER_ID_KEY)]
    container_id: Option<String>,

    /// Name of the container whose logs are forwarded
    #[arg(long = CONTAINER_NAME_KEY)]
    container_name: Option<String>,

    /// Log driver receiving the logs (awslogs, fluentd, splunk, ...)
    #[arg(long = LOG_DRIVER_KEY)]
    log_driver: Option<String>,

    /// Delivery mode: blocking or non-blocking [default: blocking]
    #[arg(long = MODE_KEY)]
    mode: Option<String>,

    /// Ring buffer size in non-blocking mode, e.g. 512k or 2m [default: 1m]
    #[arg(long = MAX_BUFFER_SIZE_KEY)]
    max_buffer_size: Option<String>,

    /// Time to wait for the log driver after the container exits [default: 5s]
    #[arg(long = CLEANUP_TIME_KEY)]
    cleanup_time: Option<String>,

    /// User id the log driver runs as, -1 to keep the current one
    #[arg(long = UID_KEY, allow_hyphen_values = true)]
    uid: Option<String>,

    /// Group id the log driver runs as, -1 to keep the current one
    #[arg(long = GID_KEY, allow_hyphen_values = true)]
    gid: Option<String>,

    #[arg(long = CONTAINER_IMAGE_ID_KEY)]
    container_image_id: Option<String>,

    #[arg(long = CONTAINER_IMAGE_NAME_KEY)]
    container_image_name: Option<String>,

    /// Container environment, as a JSON array or a comma-separated list
    #[arg(long = CONTAINER_ENV_KEY)]
    container_env: Option<String>,

    /// Container labels, as a JSON object or comma-separated key=value pairs
    #[arg(long = CONTAINER_LABELS_KEY)]
    container_labels: Option<String>,

    /// Log level of the shim itself (trace, debug, info, warn, error)
    #[arg(long, env = "SHIM_LOGGER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Print the resolved arguments as JSON on stdout
    #[arg(long)]
    print: bool,
}

impl Cli {
    /// Flags given on the command line, as explicit settings.
    fn flag_settings(&self) -> Settings {
        let flags = [
            (CONTAINER_ID_KEY, &self.container_id),
            (CONTAINER_NAME_KEY, &self.container_name),
            (LOG_DRIVER_KEY, &self.log_driver),
            (MODE_KEY, &self.mode),
            (MAX_BUFFER_SIZE_KEY, &self.max_buffer_size),
            (CLEANUP_TIME_KEY, &self.cleanup_time),
            (UID_KEY, &self.uid),
            (GID_KEY, &self.gid),
            (CONTAINER_IMAGE_ID_KEY, &self.container_image_id),
            (CONTAINER_IMAGE_NAME_KEY, &self.container_image_name),
            (CONTAINER_ENV_KEY, &self.container_env),
            (CONTAINER_LABELS_KEY, &self.container_labels),
        ];
        Settings::from_pairs(
            flags
                .into_iter()
                .filter_map(|(key, value)| value.clone().map(|value| (key, value))),
        )
    }

    /// Flags over `env` over registered defaults.
    fn source(&self, env: EnvSource) -> Layered {
        Layered::new()
            .with(self.flag_settings())
            .with(env)
            .with(Settings::with_defaults())
    }
}

fn init_logging(log_level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_new(log_level.to_lowercase())
        .with_context(|| format!("could not parse log level '{log_level}'"))?;

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;
    Ok(())
}

fn resolve(cli: &Cli, env: EnvSource) -> anyhow::Result<GlobalArgs> {
    ArgumentResolver::new(cli.source(env))
        .resolve_global_arguments()
        .context("failed to resolve global arguments")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }
    debug!("Logging subsystem enabled");

    let args = match resolve(&cli, EnvSource::default()) {
        Ok(args) => args,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        container_id = %args.container_id,
        container_name = %args.container_name,
        log_driver = %args.log_driver,
        mode = %args.mode,
        max_buffer_size = args.max_buffer_size,
        "Shim logger arguments resolved"
    );

    if cli.print {
        match serde_json::to_string_pretty(&args) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Failed to serialize resolved arguments: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use shim_logger_args::keys::ALL_KEYS;
    use shim_logger_args::{ConfigSource, Mode};
    use std::env;

    const TEST_PREFIX: &str = "SHIM_LOGGER_CLI_TEST";

    fn test_env() -> EnvSource {
        EnvSource::with_prefix(TEST_PREFIX)
    }

    fn clear_env() {
        let source = test_env();
        for key in ALL_KEYS {
            env::remove_var(source.var_name(key));
        }
    }

    #[test]
    fn test_flag_settings_only_contains_given_flags() {
        let cli = Cli::try_parse_from([
            "shim-logger",
            "--container-id",
            "3f2a9c",
            "--mode=non-blocking",
            "--uid",
            "-1",
        ])
        .unwrap();

        let settings = cli.flag_settings();
        assert_eq!(settings.get(CONTAINER_ID_KEY), Some("3f2a9c".to_string()));
        assert_eq!(settings.get(MODE_KEY), Some("non-blocking".to_string()));
        assert_eq!(settings.get(UID_KEY), Some("-1".to_string()));
        assert_eq!(settings.get(GID_KEY), None);
        assert_eq!(settings.get(CLEANUP_TIME_KEY), None);
    }

    #[test]
    #[serial]
    fn test_resolve_from_flags() {
        clear_env();
        let cli = Cli::try_parse_from([
            "shim-logger",
            "--container-id=3f2a9c",
            "--container-name=web",
            "--log-driver=awslogs",
            "--mode=non-blocking",
            "--max-buffer-size=4k",
            "--cleanup-time=10s",
            "--container-labels=team=core",
        ])
        .unwrap();

        let args = resolve(&cli, test_env()).unwrap();
        assert_eq!(args.container_id, "3f2a9c");
        assert_eq!(args.mode, Mode::NonBlocking);
        assert_eq!(args.max_buffer_size, 4096);
        assert_eq!(args.cleanup_time, Some(std::time::Duration::from_secs(10)));
        assert_eq!(args.container.labels.get("team"), Some(&"core".to_string()));
    }

    #[test]
    #[serial]
    fn test_resolve_error_has_context() {
        clear_env();
        let cli = Cli::try_parse_from([
            "shim-logger",
            "--container-id=3f2a9c",
            "--container-name=web",
            "--log-driver=awslogs",
            "--cleanup-time=15s",
        ])
        .unwrap();

        let err = resolve(&cli, test_env()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("failed to resolve global arguments: "));
        assert!(message.contains("invalid cleanup time '15s'"));
    }

    #[test]
    #[serial]
    fn test_resolve_ignores_environment_outside_prefix() {
        clear_env();
        env::set_var("SHIM_LOGGER_UID", "abc");
        env::set_var("SHIM_LOGGER_CLI_TEST_GID", "1000");
        let cli = Cli::try_parse_from([
            "shim-logger",
            "--container-id=3f2a9c",
            "--container-name=web",
            "--log-driver=awslogs",
        ])
        .unwrap();

        let args = resolve(&cli, test_env()).unwrap();
        assert_eq!(args.uid, None);
        assert_eq!(args.gid, Some(1000));

        env::remove_var("SHIM_LOGGER_UID");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_default_log_level() {
        env::remove_var("SHIM_LOGGER_LOG_LEVEL");
        let cli = Cli::try_parse_from(["shim-logger"]).unwrap();
        assert_eq!(cli.log_level, "info");
        assert!(!cli.print);
        assert!(EnvFilter::try_new(&cli.log_level).is_ok());
    }

    #[test]
    #[serial]
    fn test_log_level_from_environment() {
        env::set_var("SHIM_LOGGER_LOG_LEVEL", "debug");
        let cli = Cli::try_parse_from(["shim-logger"]).unwrap();
        env::remove_var("SHIM_LOGGER_LOG_LEVEL");
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
