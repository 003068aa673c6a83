use crate::adapters::http_fetcher::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::core::styles::{StyleMode, DEFAULT_SCRIPT_FREE_PROFILES};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PreviewError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub rewrite: RewriteSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub cors_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteSettings {
    #[serde(default)]
    pub style_mode: StyleMode,
    #[serde(default = "default_script_free_profiles")]
    pub script_free_profiles: Vec<String>,
    /// Replaces the built-in shared sheet used by `shared_class` mode.
    pub shared_css_path: Option<PathBuf>,
    /// Extra or replacement per-profile sheets, keyed by profile.
    #[serde(default)]
    pub profiles: HashMap<String, String>,
    #[serde(default)]
    pub gradients: HashMap<String, String>,
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_script_free_profiles() -> Vec<String> {
    DEFAULT_SCRIPT_FREE_PROFILES
        .iter()
        .map(|key| key.to_string())
        .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cors_enabled: false,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for RewriteSettings {
    fn default() -> Self {
        Self {
            style_mode: StyleMode::default(),
            script_free_profiles: default_script_free_profiles(),
            shared_css_path: None,
            profiles: HashMap::new(),
            gradients: HashMap::new(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| PreviewError::ConfigError {
            message: format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PreviewError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${USER_AGENT})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PreviewError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_socket_addr("server.listen_addr", &self.server.listen_addr)?;
        validation::validate_range("fetch.timeout_seconds", self.fetch.timeout_seconds, 1, 300)?;
        validation::validate_non_empty_string("fetch.user_agent", &self.fetch.user_agent)?;

        for key in &self.rewrite.script_free_profiles {
            validation::validate_non_empty_string("rewrite.script_free_profiles", key)?;
        }

        if let Some(path) = &self.rewrite.shared_css_path {
            if !path.is_file() {
                return Err(PreviewError::InvalidConfigValueError {
                    field: "rewrite.shared_css_path".to_string(),
                    value: path.display().to_string(),
                    reason: "File does not exist".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn listen_addr(&self) -> &str {
        &self.server.listen_addr
    }

    fn fetch_timeout_secs(&self) -> u64 {
        self.fetch.timeout_seconds
    }

    fn user_agent(&self) -> &str {
        &self.fetch.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.listen_addr(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.fetch_timeout_secs(), 12);
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(config.rewrite.style_mode, StyleMode::PerProfile);
        assert_eq!(
            config.rewrite.script_free_profiles,
            vec!["adhd".to_string(), "photosensitive".to_string()]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[server]
listen_addr = "0.0.0.0:8080"
cors_enabled = true

[fetch]
timeout_seconds = 5
user_agent = "a11y-simulator/1.0"

[rewrite]
style_mode = "shared_class"
script_free_profiles = ["adhd"]

[rewrite.profiles]
zen = "body { filter: grayscale(1); }"

[rewrite.gradients]
sea = "linear-gradient(90deg, #0ea5e9, #1e3a8a)"
"#,
        )
        .unwrap();

        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert!(config.server.cors_enabled);
        assert_eq!(config.fetch_timeout_secs(), 5);
        assert_eq!(config.user_agent(), "a11y-simulator/1.0");
        assert_eq!(config.rewrite.style_mode, StyleMode::SharedClass);
        assert_eq!(config.rewrite.script_free_profiles, vec!["adhd".to_string()]);
        assert!(config.rewrite.profiles.contains_key("zen"));
        assert!(config.rewrite.gradients.contains_key("sea"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("A11Y_LENS_TEST_UA", "substituted-agent/2.0");
        let config = TomlConfig::from_toml_str(
            r#"
[fetch]
user_agent = "${A11Y_LENS_TEST_UA}"
"#,
        )
        .unwrap();
        assert_eq!(config.user_agent(), "substituted-agent/2.0");

        let untouched = TomlConfig::from_toml_str(
            r#"
[fetch]
user_agent = "${A11Y_LENS_SURELY_UNSET_VAR}"
"#,
        )
        .unwrap();
        assert_eq!(untouched.user_agent(), "${A11Y_LENS_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let config = TomlConfig::from_toml_str(
            r#"
[fetch]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(PreviewError::InvalidConfigValueError { .. })
        ));

        let config = TomlConfig::from_toml_str(
            r#"
[server]
listen_addr = "not an address"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[rewrite]
shared_css_path = "/definitely/not/here.css"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_style_mode_is_parse_error() {
        let result = TomlConfig::from_toml_str(
            r#"
[rewrite]
style_mode = "sideways"
"#,
        );
        assert!(matches!(result, Err(PreviewError::ConfigError { .. })));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fetch]\ntimeout_seconds = 30").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.fetch_timeout_secs(), 30);

        assert!(TomlConfig::from_file("/no/such/config.toml").is_err());
    }
}
