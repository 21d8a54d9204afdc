// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Global argument resolution for the shim logger.
//!
//! The shim logger sits between a container runtime and a log driver. Before
//! it starts forwarding logs it resolves a small set of global arguments from
//! its configuration (command line flags, environment, registered defaults):
//!
//! ```
//! use shim_logger_args::{ArgumentResolver, Mode, Settings};
//! use std::time::Duration;
//!
//! let mut settings = Settings::with_defaults();
//! settings.set("container-id", "3f2a9c");
//! settings.set("container-name", "web");
//! settings.set("log-driver", "awslogs");
//! settings.set("mode", "non-blocking");
//! settings.set("max-buffer-size", "4m");
//!
//! let args = ArgumentResolver::new(&settings)
//!     .resolve_global_arguments()
//!     .unwrap();
//! assert_eq!(args.mode, Mode::NonBlocking);
//! assert_eq!(args.max_buffer_size, 4 * 1024 * 1024);
//! assert_eq!(args.cleanup_time, Some(Duration::from_secs(5)));
//! ```

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod buffer_size;
pub mod cleanup_time;
pub mod container;
pub mod error;
pub mod keys;
pub mod mode;
pub mod resolver;
pub mod source;

pub use cleanup_time::CleanupTimePolicy;
pub use container::ContainerMetadata;
pub use error::{ArgsError, ErrorKind};
pub use mode::Mode;
pub use resolver::{ArgumentResolver, GlobalArgs};
pub use source::{ConfigSource, EnvSource, Layered, Settings};
