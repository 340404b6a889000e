//! Server configuration, read from the process environment.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use ufpcal_core::upstream::DEFAULT_BASE_URL;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Deserialize)]
struct RawConfig {
    listen_addr: String,
    port: u16,
    upstream_url: String,
}

/// Validated server settings.
///
/// - `LISTEN_ADDR`: IP address to bind (default 127.0.0.1)
/// - `PORT`: TCP port (default 8080)
/// - `UPSTREAM_URL`: portal base URL (default https://portal.ufp.pt)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_addr: IpAddr,
    pub port: u16,
    pub upstream_url: String,
}

impl ServerConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn load() -> Result<Self> {
        Self::from_builder(Config::builder().add_source(Environment::default()))
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let raw: RawConfig = builder
            .set_default("listen_addr", DEFAULT_LISTEN_ADDR)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("upstream_url", DEFAULT_BASE_URL)?
            .build()?
            .try_deserialize()
            .context("Could not read configuration")?;

        let listen_addr = raw
            .listen_addr
            .parse()
            .with_context(|| format!("invalid $LISTEN_ADDR: {:?}", raw.listen_addr))?;

        Ok(ServerConfig {
            listen_addr,
            port: raw.port,
            upstream_url: raw.upstream_url,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_addr, self.port)
    }
}
