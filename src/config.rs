// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::cd::DriverKind;
use crate::constants::{DEFAULT_YIELD_TIMEOUT, OPERATOR_NAME};
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace the controller runs in, handed to provisioners
    pub namespace: String,
    pub cd_driver: DriverKind,
    /// Flat requeue period for yielding or failing provisioners
    pub yield_timeout: Duration,
    pub controller_name: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration using the given variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = lookup("NAMESPACE").context("NAMESPACE environment variable not set")?;

        let cd_driver = lookup("CD_DRIVER")
            .unwrap_or_else(|| DriverKind::ArgoCd.to_string())
            .parse::<DriverKind>()?;

        let yield_timeout = match lookup("YIELD_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .with_context(|| format!("YIELD_TIMEOUT_SECS is not a number: {}", v))?,
            ),
            None => DEFAULT_YIELD_TIMEOUT,
        };

        let controller_name = lookup("CONTROLLER_NAME").unwrap_or_else(|| OPERATOR_NAME.to_string());

        Ok(Config {
            namespace,
            cd_driver,
            yield_timeout,
            controller_name,
        })
    }
}
