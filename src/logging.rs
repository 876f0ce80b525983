// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Logging setup shared by both binaries.
//!
//! `RUST_LOG` takes precedence over the configured level. Logs go to stderr
//! so that tabular output on stdout stays machine-readable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// Install the global tracing subscriber.
///
/// `format` is `pretty` (human-readable) or `json`.
pub fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| Error::Config(format!("invalid log level '{}': {}", level, e)))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        "pretty" => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
        "json" => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        other => {
            return Err(Error::Config(format!(
                "unknown log format '{}', expected 'pretty' or 'json'",
                other
            )))
        }
    };

    installed.map_err(|e| Error::Config(format!("logging already initialized: {}", e)))
}
