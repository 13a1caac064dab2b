//! Process configuration loaded from the environment.

use std::net::SocketAddr;
use std::{env, fs};

use tracing::warn;

use crate::domain::SigningKey;

/// Default bind address when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default path the token signing key is read from.
pub const DEFAULT_TOKEN_KEY_FILE: &str = "/var/run/secrets/token_key";

/// Runtime configuration assembled at startup.
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection URL; absent runs the in-memory fixture stores.
    pub database_url: Option<String>,
    /// Key material for issuing and verifying bearer tokens.
    pub signing_key: SigningKey,
}

impl AppConfig {
    /// Assemble configuration from environment variables.
    ///
    /// The signing key is read from `TOKEN_KEY_FILE`. When the file is
    /// missing, debug builds (or `TOKEN_ALLOW_EPHEMERAL=1`) fall back to a
    /// generated key; release builds refuse to start, since an ephemeral key
    /// silently invalidates every token on restart.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR: {err}")))?;

        let database_url = env::var("DATABASE_URL").ok();

        let key_path =
            env::var("TOKEN_KEY_FILE").unwrap_or_else(|_| DEFAULT_TOKEN_KEY_FILE.into());
        let signing_key = match fs::read(&key_path) {
            Ok(bytes) => SigningKey::from_bytes(bytes),
            Err(err) => {
                let allow_dev = env::var("TOKEN_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!(path = %key_path, error = %err, "using temporary signing key (dev only)");
                    SigningKey::generate()
                } else {
                    return Err(std::io::Error::other(format!(
                        "failed to read token key at {key_path}: {err}"
                    )));
                }
            }
        };

        Ok(Self {
            bind_addr,
            database_url,
            signing_key,
        })
    }
}
