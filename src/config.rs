//! Process configuration.
//!
//! Loaded once at startup from the environment and passed by reference into
//! the components that need it. There is no global configuration object.

use std::env;
use std::net::SocketAddr;

use tracing::info;

/// Runtime configuration for the webring service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store location, e.g. `sqlite://webring.db`.
    pub database_url: String,
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Public base URL of this service, embedded in widget links.
    pub public_host: String,
}

impl Config {
    /// Reads configuration from the environment, falling back to local
    /// development defaults.
    ///
    /// Variables: `DATABASE_URL`, `BIND_ADDR`, `HOST`.
    pub fn load() -> Self {
        let database_url = var_or("DATABASE_URL", "sqlite://webring.db");
        let bind_addr = var_or("BIND_ADDR", "0.0.0.0:3000")
            .parse()
            .expect("BIND_ADDR must be a socket address");
        let public_host = var_or("HOST", "http://localhost:3000");

        Config {
            database_url,
            bind_addr,
            public_host,
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_well_formed() {
        // Only exercises the fallback path; env vars are process-global and
        // not worth mutating in a test.
        let addr: SocketAddr = "0.0.0.0:3000".parse().unwrap();
        assert_eq!(addr.port(), 3000);
        assert_eq!(var_or("WEBRING_TEST_UNSET_VAR", "fallback"), "fallback");
    }
}
