use serde::{Deserialize, Serialize};
use std::env;

use crate::utils::spreadsheet::ImportAliases;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds.
    pub expires_in: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expires_in: 604_800, // 7 days
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Password assigned to imported santri rows that carry none.
    pub default_password: String,
    /// Accepted spreadsheet column names per canonical field, probed in order.
    #[serde(default)]
    pub aliases: ImportAliases,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_password: "123456".to_string(),
            aliases: ImportAliases::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Refuse to delete a santri that still owns transactions.
    #[default]
    Restrict,
    /// Delete the santri's transactions in the same unit of work.
    Cascade,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PolicyConfig {
    #[serde(default)]
    pub transaksi_on_santri_delete: DeletePolicy,
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str)
                    .map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // No config file: build from environment variables and defaults.
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    session: SessionConfig {
                        expires_in: get_env_parse("SESSION_EXPIRES_IN", 604_800i64),
                    },
                    import: ImportConfig {
                        default_password: get_env("IMPORT_DEFAULT_PASSWORD")
                            .unwrap_or_else(|| "123456".to_string()),
                        aliases: ImportAliases::default(),
                    },
                    policy: PolicyConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // Environment overrides apply on top of the file.
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("SESSION_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.session.expires_in = n;
        }
        if let Ok(v) = env::var("IMPORT_DEFAULT_PASSWORD") {
            config.import.default_password = v;
        }
        if let Ok(v) = env::var("TRANSAKSI_ON_SANTRI_DELETE") {
            config.policy.transaksi_on_santri_delete = match v.to_lowercase().as_str() {
                "cascade" => DeletePolicy::Cascade,
                _ => DeletePolicy::Restrict,
            };
        }

        Ok(config)
    }
}
