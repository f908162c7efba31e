use std::env;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redis { url: String },
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Redis { .. } => "redis",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub backend: StoreBackend,
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup("STORE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "redis" => StoreBackend::Redis {
                url: lookup("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
            },
            other => {
                return Err(ConfigError::InvalidValue(format!("STORE_BACKEND: {}", other)));
            }
        };

        let session_ttl = lookup("SESSION_TTL_SECS")
            .unwrap_or_else(|| "43200".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("SESSION_TTL_SECS".to_string()))?;

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
            backend,
            session_ttl: Duration::from_secs(session_ttl),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
    Store(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
            ConfigError::Store(msg) => write!(f, "Store config error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.session_ttl, Duration::from_secs(43_200));
    }

    #[test]
    fn redis_backend_uses_url() {
        let config = config(&[("STORE_BACKEND", "Redis"), ("REDIS_URL", "redis://cache:6379")]).unwrap();
        assert_eq!(
            config.backend,
            StoreBackend::Redis {
                url: "redis://cache:6379".to_string()
            }
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config(&[("STORE_BACKEND", "postgres")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
