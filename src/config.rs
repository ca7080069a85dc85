use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "feedback-rating.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Raises the default log level to debug
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default = "default_true")]
    pub allow_any_origin: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SentimentConfig {
    /// Extra lexicon merged over the built-in one
    pub lexicon_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            debug: false,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allow_any_origin: true }
    }
}

// Default value functions
fn default_true() -> bool { true }
fn default_address() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 5000 }
fn default_max_body_bytes() -> usize { 64 * 1024 }

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path, e))?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config '{}': {}", path, e))
    }

    /// Load from an explicit path, or from the default path when it exists.
    /// Returns the built-in defaults when neither applies.
    pub fn load_or_default(explicit: Option<&str>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// `HOST` / `PORT` from the environment win over the file
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(std::env::var("HOST").ok(), std::env::var("PORT").ok())
    }

    fn apply_overrides(&mut self, host: Option<String>, port: Option<String>) -> anyhow::Result<()> {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.server.address = host;
        }
        if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT '{}': {}", port, e))?;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.address, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert!(!config.server.debug);
        assert_eq!(config.server.max_body_bytes, 64 * 1024);
        assert!(config.cors.allow_any_origin);
        assert!(config.sentiment.lexicon_path.is_none());
        assert!(!config.logging.json);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [server]
            port = 8080
            debug = true

            [sentiment]
            lexicon_path = "extra.toml"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.address, "127.0.0.1");
        assert!(config.server.debug);
        assert_eq!(config.sentiment.lexicon_path.as_deref(), Some("extra.toml"));
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_bad_type_rejected() {
        assert!(Config::parse("[server]\nport = \"eighty\"").is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(Some("0.0.0.0".into()), Some("9000".into()))
            .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");

        // blank values are ignored
        config.apply_overrides(Some("".into()), Some(" ".into())).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");

        assert!(config.apply_overrides(None, Some("http".into())).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = Config::load_or_default(Some("/nonexistent/feedback-rating.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
