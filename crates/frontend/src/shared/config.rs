use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
    pub routes: RoutesConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RoutesConfig {
    pub login: String,
    pub home: String,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    pub token_key: String,
    pub user_key: String,
}

fn default_max_redirects() -> usize {
    8
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://localhost:8080/api"

[routes]
login = "/login"
home = "/"
max_redirects = 8

[storage]
token_key = "token"
user_key = "user"
"#;

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080/api".to_string(),
            },
            routes: RoutesConfig {
                login: "/login".to_string(),
                home: "/".to_string(),
                max_redirects: default_max_redirects(),
            },
            storage: StorageConfig {
                token_key: "token".to_string(),
                user_key: "user".to_string(),
            },
        }
    }
}

impl Config {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url is empty".into()));
        }
        let routes = [
            ("routes.login", &self.routes.login),
            ("routes.home", &self.routes.home),
        ];
        for (field, path) in routes {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "{} must be an absolute path, got '{}'",
                    field, path
                )));
            }
        }
        if self.routes.login == self.routes.home {
            return Err(ConfigError::Invalid(
                "routes.login and routes.home must differ".into(),
            ));
        }
        if self.routes.max_redirects == 0 {
            return Err(ConfigError::Invalid("routes.max_redirects must be > 0".into()));
        }
        if self.storage.token_key.is_empty() || self.storage.user_key.is_empty() {
            return Err(ConfigError::Invalid("storage keys must not be empty".into()));
        }
        Ok(())
    }
}

/// Load the configuration embedded in the bundle
pub fn load_config() -> Result<Config, ConfigError> {
    let config = Config::from_toml_str(DEFAULT_CONFIG)?;
    log::info!("Using embedded configuration, API at {}", config.api.base_url);
    Ok(config)
}
