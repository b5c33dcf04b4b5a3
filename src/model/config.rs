use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

const ENV_CONFIG_PATH: &str = "LEGAL_INTEL_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_INFERENCE_URL: &str = "LEGAL_INTEL_INFERENCE_URL";
const ENV_PDF_EXTRACTOR_URL: &str = "LEGAL_INTEL_PDF_EXTRACTOR_URL";

const DEFAULT_INFERENCE_URL: &str = "http://127.0.0.1:9090";
const DEFAULT_PDF_EXTRACTOR_URL: &str = "http://127.0.0.1:9998";

/// Summarization tuning, overridable from the config file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Upper bound on generated summary tokens
    pub max_length: u32,
    /// Lower bound on generated summary tokens
    pub min_length: u32,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 30,
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub summary: SummaryConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the model-serving endpoint (NER, QA, summarization)
    pub inference_url: Url,
    /// Base URL of the PDF text extraction service
    pub pdf_extractor_url: Url,
    pub summary: SummaryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            inference_url: Url::parse(DEFAULT_INFERENCE_URL).unwrap(),
            pdf_extractor_url: Url::parse(DEFAULT_PDF_EXTRACTOR_URL).unwrap(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let host = std::env::var("HOST").unwrap_or(defaults.host);

        let inference_url = Self::url_from_env(ENV_INFERENCE_URL, defaults.inference_url);
        let pdf_extractor_url =
            Self::url_from_env(ENV_PDF_EXTRACTOR_URL, defaults.pdf_extractor_url);

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let summary = Self::load_config_file(&config_path)
            .map(|cf| cf.summary)
            .unwrap_or_default();

        Self {
            host,
            port,
            inference_url,
            pdf_extractor_url,
            summary,
        }
    }

    fn url_from_env(var: &str, default: Url) -> Url {
        match std::env::var(var) {
            Ok(raw) => match Url::parse(&raw) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(var = %var, value = %raw, error = %e, "Invalid URL in environment, using default");
                    default
                }
            },
            Err(_) => default,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.summary.max_length, 150);
        assert_eq!(config.summary.min_length, 30);
    }

    #[test]
    fn test_summary_config_from_yaml() {
        let cf: ConfigFile = serde_yaml::from_str("summary:\n  max_length: 200\n").unwrap();
        assert_eq!(cf.summary.max_length, 200);
        assert_eq!(cf.summary.min_length, 30);
    }
}
