//! Server configuration.
//!
//! Deserialise [`ServerConfig`] from whatever format the application already
//! uses, or read it from the environment:
//!
//! | Variable        | Field    | Default        |
//! |-----------------|----------|----------------|
//! | `VERBUM_ADDR`   | `addr`   | `0.0.0.0:3000` |
//! | `VERBUM_PREFIX` | `prefix` | `/`            |

use std::net::SocketAddr;

use serde::Deserialize;

use crate::error::Error;

pub const ADDR_VAR: &str = "VERBUM_ADDR";
pub const PREFIX_VAR: &str = "VERBUM_PREFIX";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the server listens on.
    pub addr: SocketAddr,
    /// Path every bound resource is mounted under.
    pub prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            prefix: "/".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Reads `VERBUM_ADDR` and `VERBUM_PREFIX`, falling back to the defaults.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();
        if let Some(addr) = lookup(ADDR_VAR) {
            config.addr = addr
                .parse()
                .map_err(|e| Error::Config(format!("{ADDR_VAR}=`{addr}`: {e}")))?;
        }
        if let Some(prefix) = lookup(PREFIX_VAR) {
            config.prefix = prefix;
        }
        Ok(config)
    }
}
