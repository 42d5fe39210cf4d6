use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Asset directory shipped with the crate.
const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Runtime settings for the admin server and its widgets.
#[derive(Debug, Clone)]
pub struct FlexSelectConfig {
    pub host: String,
    pub port: u16,
    /// Load jQuery and jQuery UI from the Google CDN alongside the widget script.
    pub include_jquery: bool,
    pub static_url: String,
    /// Directory served under `static_url` when that URL is a local path.
    pub static_dir: PathBuf,
    pub login_url: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl Default for FlexSelectConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            include_jquery: false,
            static_url: "/static/".to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            login_url: "/accounts/login/".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "adminpass".to_string(),
        }
    }
}

impl FlexSelectConfig {
    /// Reads `FLEXSELECT_*` variables, loading `.env` first when present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let host = env::var("FLEXSELECT_HOST").unwrap_or(defaults.host);

        let port = match env::var("FLEXSELECT_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .context("FLEXSELECT_PORT must be a valid u16")?,
            Err(_) => defaults.port,
        };

        let include_jquery = match env::var("FLEXSELECT_INCLUDE_JQUERY") {
            Ok(raw) => parse_flag(&raw)
                .context("FLEXSELECT_INCLUDE_JQUERY must be true/false or 1/0")?,
            Err(_) => defaults.include_jquery,
        };

        let static_url = env::var("FLEXSELECT_STATIC_URL").unwrap_or(defaults.static_url);
        let static_dir = env::var("FLEXSELECT_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);
        let login_url = env::var("FLEXSELECT_LOGIN_URL").unwrap_or(defaults.login_url);
        let admin_username =
            env::var("FLEXSELECT_ADMIN_USERNAME").unwrap_or(defaults.admin_username);
        let admin_password =
            env::var("FLEXSELECT_ADMIN_PASSWORD").unwrap_or(defaults.admin_password);

        Ok(Self {
            host,
            port,
            include_jquery,
            static_url,
            static_dir,
            login_url,
            admin_username,
            admin_password,
        })
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn include_jquery(mut self, include: bool) -> Self {
        self.include_jquery = include;
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("unrecognised flag value '{other}'")),
    }
}
