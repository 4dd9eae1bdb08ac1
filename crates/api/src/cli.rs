//! Command-line configuration for the server binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use hotcoffee_infra::config::{DEFAULT_DATA_DIR, StorageConfig};
use hotcoffee_observability::Environment;

/// Coffee shop order management server.
#[derive(Debug, Clone, Parser)]
#[command(name = "hotcoffee-api", version, about)]
pub struct Cli {
    /// Port to listen on.
    #[arg(long, default_value_t = 8080, value_parser = clap::value_parser!(u16).range(1024..=49151))]
    pub port: u16,

    /// Directory holding the JSON documents.
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub dir: PathBuf,

    /// Deployment environment: local, dev or prod.
    #[arg(long, default_value = "local")]
    pub env: Environment,
}

impl Cli {
    pub fn storage(&self) -> StorageConfig {
        StorageConfig::new(self.dir.clone())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
