//! Server settings loaded via OrthoConfig.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;

/// Listener and persistence settings (`STOREFRONT_*`).
///
/// Without a database URL the server runs on the in-memory store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STOREFRONT")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
}

impl ServerSettings {
    /// Return the configured listener, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT))
    }

    /// Return the configured pool size.
    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Return the database URL when one is set and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("storefront")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("STOREFRONT_BIND_ADDR", None::<String>),
            ("STOREFRONT_DATABASE_URL", None::<String>),
            ("STOREFRONT_DB_POOL_SIZE", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr().port(), DEFAULT_PORT);
        assert_eq!(settings.db_pool_size(), DEFAULT_POOL_SIZE);
        assert!(settings.database_url().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("STOREFRONT_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "STOREFRONT_DATABASE_URL",
                Some("postgres://shop@localhost/storefront".to_owned()),
            ),
            ("STOREFRONT_DB_POOL_SIZE", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 9090)
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://shop@localhost/storefront")
        );
        assert_eq!(settings.db_pool_size(), 4);
    }

    #[rstest]
    fn blank_database_urls_select_memory() {
        let settings = ServerSettings {
            bind_addr: None,
            database_url: Some("  ".to_owned()),
            db_pool_size: None,
        };
        assert!(settings.database_url().is_none());
    }
}
