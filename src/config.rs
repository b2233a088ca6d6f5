//! Runtime configuration, read from environment variables and an optional
//! `.env` file. Variables already set in the environment win over the file.

use crate::domain::ConfigError;
use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding the key-value files and the log file.
    pub data_dir: PathBuf,
    /// Directory that receives `resume.pdf`.
    pub export_dir: PathBuf,
    pub log_level: String,
    /// Enables the hosted identity provider when set.
    pub auth_api_key: Option<String>,
    pub auth_endpoint: Option<String>,
    pub admin_emails: Vec<String>,
    pub export_settle: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is fine
        let dotenv = dotenvy::dotenv_iter().map(dotenv_vars).unwrap_or_default();
        Self::layered(&dotenv)
    }

    fn layered(dotenv: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| dotenv.get(key).cloned()))
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let data_dir = match var("TRESUME_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir().ok_or(ConfigError::NoDataDir)?.join("tresume"),
        };
        let export_dir = var("TRESUME_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_level = var("TRESUME_LOG")
            .or_else(|| var("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());
        let admin_emails = var("TRESUME_ADMIN_EMAILS")
            .map(|list| {
                list.split(',')
                    .map(|e| e.trim().to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let export_settle = match var("TRESUME_EXPORT_SETTLE_MS") {
            Some(ms) => Duration::from_millis(ms.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TRESUME_EXPORT_SETTLE_MS",
                value: ms.clone(),
            })?),
            None => Duration::from_millis(100),
        };

        Ok(Self {
            data_dir,
            export_dir,
            log_level,
            auth_api_key: var("TRESUME_AUTH_API_KEY"),
            auth_endpoint: var("TRESUME_AUTH_ENDPOINT"),
            admin_emails,
            export_settle,
        })
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("tresume.log")
    }
}

fn dotenv_vars(lines: dotenvy::Iter<File>) -> HashMap<String, String> {
    lines
        .filter_map(|line| match line {
            Ok(pair) => Some(pair),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed .env line");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_explicit_values() {
        let config = config_from(&[
            ("TRESUME_DATA_DIR", "/tmp/tresume-data"),
            ("TRESUME_EXPORT_DIR", "/tmp/out"),
            ("TRESUME_LOG", "debug"),
            ("TRESUME_ADMIN_EMAILS", "Boss@Example.com, ,ops@example.com"),
            ("TRESUME_EXPORT_SETTLE_MS", "250"),
            ("TRESUME_AUTH_API_KEY", "abc"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/tresume-data"));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.admin_emails, vec!["boss@example.com", "ops@example.com"]);
        assert_eq!(config.export_settle, Duration::from_millis(250));
        assert_eq!(config.auth_api_key.as_deref(), Some("abc"));
        assert_eq!(config.log_file(), PathBuf::from("/tmp/tresume-data/tresume.log"));
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("TRESUME_DATA_DIR", "/tmp/x"), ("TRESUME_AUTH_API_KEY", "  ")]).unwrap();

        assert_eq!(config.export_dir, PathBuf::from("."));
        assert_eq!(config.log_level, "info");
        assert!(config.admin_emails.is_empty());
        assert_eq!(config.export_settle, Duration::from_millis(100));
        assert_eq!(config.auth_api_key, None);
    }

    #[test]
    fn test_rust_log_fallback() {
        let config = config_from(&[("TRESUME_DATA_DIR", "/tmp/x"), ("RUST_LOG", "warn")]).unwrap();
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_invalid_settle_delay() {
        let err = config_from(&[("TRESUME_DATA_DIR", "/tmp/x"), ("TRESUME_EXPORT_SETTLE_MS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("TRESUME_EXPORT_SETTLE_MS"));
    }

    #[test]
    fn test_dotenv_file_supplies_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "TRESUME_DATA_DIR=/tmp/from-dotenv\nTRESUME_ADMIN_EMAILS=ops@example.com\n# comment\n",
        )
        .unwrap();

        let vars = dotenv_vars(dotenvy::from_path_iter(&path).unwrap());
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.get("TRESUME_DATA_DIR").map(String::as_str), Some("/tmp/from-dotenv"));

        let config = AppConfig::layered(&vars).unwrap();
        if std::env::var("TRESUME_DATA_DIR").is_err() {
            assert_eq!(config.data_dir, PathBuf::from("/tmp/from-dotenv"));
        }
        if std::env::var("TRESUME_ADMIN_EMAILS").is_err() {
            assert_eq!(config.admin_emails, vec!["ops@example.com"]);
        }
    }
}
