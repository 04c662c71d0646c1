//! Settings file loading.
//!
//! All tables are optional; a missing key keeps its default.
//!
//! ```toml
//! [fetch]
//! timeout = 15
//!
//! [compose]
//! mode = "lenient"
//! default_model = "distilgpt2"
//!
//! [generator]
//! endpoint = "http://gpu-box:11434"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compose::ComposeConfig;
use crate::extract::ExtractConfig;
use crate::fetch::FetchConfig;
use crate::generator::GeneratorConfig;
use crate::{NewsletterError, Result};

/// Environment variable overriding the model runtime address.
pub const OLLAMA_URL_ENV: &str = "OLLAMA_URL";

/// Everything the extraction and composition pipeline needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fetch: FetchConfig,
    pub extract: ExtractConfig,
    pub compose: ComposeConfig,
    pub generator: GeneratorConfig,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| NewsletterError::ConfigError(e.to_string()))
    }

    /// Read settings from `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(NewsletterError::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text).map_err(|e| match e {
            NewsletterError::ConfigError(msg) => NewsletterError::ConfigError(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Load settings for a run.
    ///
    /// Reads `path` when given, else the user config file when it exists,
    /// else starts from defaults. `OLLAMA_URL` then overrides the runtime
    /// endpoint.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => {
                    debug!(path = %path.display(), "loading user settings");
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };

        if let Ok(endpoint) = env::var(OLLAMA_URL_ENV) {
            settings.apply_endpoint_override(&endpoint);
        }

        Ok(settings)
    }

    /// User settings file (~/.config/newsletter/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("newsletter").join("config.toml"))
    }

    fn apply_endpoint_override(&mut self, endpoint: &str) {
        let endpoint = endpoint.trim();
        if !endpoint.is_empty() {
            self.generator.endpoint = endpoint.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::CompositionMode;
    use crate::extract::ExtractMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_is_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_tables() {
        let settings = Settings::from_toml(
            r#"
            [fetch]
            timeout = 15

            [compose]
            mode = "lenient"
            default_model = "distilgpt2"
            "#,
        )
        .unwrap();

        assert_eq!(settings.fetch.timeout, 15);
        assert_eq!(settings.compose.mode, CompositionMode::Lenient);
        assert_eq!(settings.compose.default_model, "distilgpt2");
        assert_eq!(settings.compose.min_content_chars, 50);
        assert_eq!(settings.generator, GeneratorConfig::default());
    }

    #[test]
    fn test_enhanced_extract_table() {
        let written = Settings { extract: ExtractConfig::for_mode(ExtractMode::Enhanced), ..Default::default() };
        let text = toml::to_string(&written).unwrap();

        assert!(text.contains("[extract.strategy]"));
        assert_eq!(Settings::from_toml(&text).unwrap(), written);
    }

    #[test]
    fn test_invalid_toml() {
        let result = Settings::from_toml("[compose]\nmode = \"sometimes\"");
        assert!(matches!(result, Err(NewsletterError::ConfigError(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[generator]\nendpoint = \"http://gpu-box:11434\"").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.generator.endpoint, "http://gpu-box:11434");
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = Settings::load(Some(Path::new("/nonexistent/newsletter.toml")));
        assert!(matches!(result, Err(NewsletterError::FileNotFound(_))));
    }

    #[test]
    fn test_endpoint_override() {
        let mut settings = Settings::default();
        settings.apply_endpoint_override("  ");
        assert_eq!(settings.generator.endpoint, crate::generator::DEFAULT_OLLAMA_URL);

        settings.apply_endpoint_override("http://10.0.0.2:11434");
        assert_eq!(settings.generator.endpoint, "http://10.0.0.2:11434");
    }
}
