use std::time::Duration;

use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config, read_config_from};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    jwt: String,
    database_uri: String,
    #[serde(default = "default_frontend_url")]
    frontend_url: String,
    #[serde(default = "default_assets_dir")]
    assets_dir: String,
    #[serde(default)]
    docs: bool,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    acquire_timeout_secs: u64,
}

fn default_frontend_url() -> String {
    String::from("http://localhost:5173")
}

fn default_assets_dir() -> String {
    String::from("./assets")
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let bytes = read_config(use_local)?;
                    Self::from_toml(&bytes)
                };

                match read_cfg(use_local) {
                    Ok(mut c) => {
                        c.apply_env_overrides(|key| std::env::var(key).ok());
                        c
                    }
                    Err(e) => {
                        if !matches!(e, error::ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found.");
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    pub fn from_toml(bytes: &[u8]) -> ConfigResult<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(toml::from_str(text)?)
    }

    /// `PORT`, `FRONTEND_URL` and `DATABASE_URL` take precedence over the file.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").filter(|p| p.parse::<u16>().is_ok()) {
            let host = self
                .host
                .bindto
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| String::from("0.0.0.0"));
            self.host.bindto = format!("{host}:{port}");
        }

        if let Some(url) = lookup("FRONTEND_URL") {
            self.app.frontend_url = url;
        }

        if let Some(uri) = lookup("DATABASE_URL") {
            self.app.database_uri = uri;
        }
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn frontend_url(&self) -> &str {
        &self.frontend_url
    }

    #[inline]
    pub fn assets_dir(&self) -> &str {
        &self.assets_dir
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }

    #[inline]
    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }

    #[inline]
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    const MINIMAL: &str = r#"
        [host]
        bindto = "127.0.0.1:5000"

        [app]
        jwt = "secret"
        database_uri = "postgres://localhost/gg"
    "#;

    #[tokio::test]
    async fn config_test() {
        let config = Config::get_or_init(true).await;
        assert_eq!(config.app().frontend_url(), "http://localhost:5173");
        assert!(!config.app().jwt().is_empty());
    }

    #[test]
    fn defaults_are_filled_in() {
        let config = Config::from_toml(MINIMAL.as_bytes()).unwrap();
        assert_eq!(config.host().bindto(), "127.0.0.1:5000");
        assert_eq!(config.app().assets_dir(), "./assets");
        assert_eq!(config.app().max_connections(), 10);
        assert_eq!(config.app().acquire_timeout(), Duration::from_secs(5));
        assert!(!config.app().docs());
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = Config::from_toml(MINIMAL.as_bytes()).unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("PORT", "3000"),
            ("FRONTEND_URL", "https://germangains.app"),
            ("DATABASE_URL", "postgres://db/prod"),
        ]);

        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.host().bindto(), "127.0.0.1:3000");
        assert_eq!(config.app().frontend_url(), "https://germangains.app");
        assert_eq!(config.app().database_uri(), "postgres://db/prod");
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut config = Config::from_toml(MINIMAL.as_bytes()).unwrap();
        config.apply_env_overrides(|k| (k == "PORT").then(|| String::from("not-a-port")));
        assert_eq!(config.host().bindto(), "127.0.0.1:5000");
    }

    #[test]
    fn missing_section_is_an_error() {
        let result = Config::from_toml(b"[host]\nbindto = \"0.0.0.0:1\"\n");
        assert!(matches!(result, Err(ConfigError::TomlDeError(_))));
    }
}
