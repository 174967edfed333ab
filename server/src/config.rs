use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Where deleted recipes' media lives. Without it, media cleanup is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaStoreConfig {
    pub public_base_url: String,
    pub api_base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub pool_size: u32,
    pub bind_addr: SocketAddr,
    pub write_timeout: Duration,
    pub media_store: Option<MediaStoreConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let pool_size = match get("DATABASE_POOL_SIZE") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "DATABASE_POOL_SIZE",
                        value,
                        reason: "expected a positive integer",
                    })
                }
            },
            None => DEFAULT_POOL_SIZE,
        };

        let bind_value = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: bind_value.clone(),
                reason: "expected host:port",
            })?;

        let write_timeout_secs = match get("RECIPE_WRITE_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "RECIPE_WRITE_TIMEOUT_SECS",
                        value,
                        reason: "expected a positive number of seconds",
                    })
                }
            },
            None => DEFAULT_WRITE_TIMEOUT_SECS,
        };

        let media_store = match (get("MEDIA_API_BASE_URL"), get("MEDIA_PUBLIC_BASE_URL")) {
            (Some(api_base_url), Some(public_base_url)) => Some(MediaStoreConfig {
                public_base_url: trim_slash(&public_base_url),
                api_base_url: trim_slash(&api_base_url),
                api_key: get("MEDIA_API_KEY"),
            }),
            (Some(_), None) => return Err(ConfigError::Missing("MEDIA_PUBLIC_BASE_URL")),
            (None, _) => None,
        };

        Ok(Self {
            database_url,
            pool_size,
            bind_addr,
            write_timeout: Duration::from_secs(write_timeout_secs),
            media_store,
        })
    }
}

fn trim_slash(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/tastecheck")]).unwrap();
        assert_eq!(config.pool_size, 10);
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.write_timeout, Duration::from_secs(30));
        assert_eq!(config.media_store, None);
    }

    #[test]
    fn test_database_url_required() {
        assert_eq!(config(&[]), Err(ConfigError::Missing("DATABASE_URL")));
        assert_eq!(
            config(&[("DATABASE_URL", "  ")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = config(&[("DATABASE_URL", "x"), ("DATABASE_POOL_SIZE", "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "DATABASE_POOL_SIZE",
                ..
            }
        ));

        let err =
            config(&[("DATABASE_URL", "x"), ("RECIPE_WRITE_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "RECIPE_WRITE_TIMEOUT_SECS",
                ..
            }
        ));

        let err = config(&[("DATABASE_URL", "x"), ("BIND_ADDR", "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "BIND_ADDR", .. }));
    }

    #[test]
    fn test_media_store() {
        let config = config(&[
            ("DATABASE_URL", "x"),
            ("MEDIA_API_BASE_URL", "https://api.cdn.test/"),
            ("MEDIA_PUBLIC_BASE_URL", "https://cdn.test/media/"),
            ("MEDIA_API_KEY", "secret"),
        ])
        .unwrap();
        assert_eq!(
            config.media_store,
            Some(MediaStoreConfig {
                public_base_url: "https://cdn.test/media".to_string(),
                api_base_url: "https://api.cdn.test".to_string(),
                api_key: Some("secret".to_string()),
            })
        );
    }

    #[test]
    fn test_media_api_needs_public_base() {
        let err = config(&[
            ("DATABASE_URL", "x"),
            ("MEDIA_API_BASE_URL", "https://api.cdn.test"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("MEDIA_PUBLIC_BASE_URL"));
    }
}
