#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::TomlConfig;

use crate::adapters::{ConfiguredIdentity, ReqwestTransport, DEFAULT_EMAIL_ENV};
use crate::core::functions::GranaFunctions;
use crate::core::request_builder::{
    Endpoints, RequestBuilder, DEFAULT_API_BASE_URL, DEFAULT_STOCKS_BASE_URL,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "grana.toml";
pub const DEFAULT_USER_AGENT: &str = concat!("grana-functions/", env!("CARGO_PKG_VERSION"));

/// 預設值 ← TOML ← 命令列
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub stocks_base_url: String,
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
    pub email: Option<String>,
    pub email_env: String,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            stocks_base_url: DEFAULT_STOCKS_BASE_URL.to_string(),
            timeout_seconds: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            email: None,
            email_env: DEFAULT_EMAIL_ENV.to_string(),
            log_level: None,
            json_logs: false,
        }
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let mut settings = Self::default();
        settings.merge(config);
        settings
    }

    pub fn merge(&mut self, config: &TomlConfig) {
        if let Some(url) = &config.api.base_url {
            self.api_base_url = url.clone();
        }
        if let Some(url) = &config.api.stocks_url {
            self.stocks_base_url = url.clone();
        }
        if config.http.timeout_seconds.is_some() {
            self.timeout_seconds = config.http.timeout_seconds;
        }
        if let Some(agent) = &config.http.user_agent {
            self.user_agent = agent.clone();
        }
        match &config.identity.email {
            // 未解析的 ${VAR} 視為未設定，改由 email_env 解析
            Some(email) if email.contains("${") => {
                tracing::warn!("identity.email placeholder {} was not resolved", email);
            }
            Some(email) => self.email = Some(email.clone()),
            None => {}
        }
        if let Some(var) = &config.identity.email_env {
            self.email_env = var.clone();
        }
        if config.logging.level.is_some() {
            self.log_level = config.logging.level.clone();
        }
        if let Some(json) = config.logging.json {
            self.json_logs = json;
        }
    }

    /// 指定路徑必須存在；未指定時若工作目錄有 `grana.toml` 就讀取
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::from_toml(&TomlConfig::from_file(path)?)),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Ok(Self::from_toml(&TomlConfig::from_file(DEFAULT_CONFIG_FILE)?))
            }
            None => Ok(Self::default()),
        }
    }

    /// 可寫進日誌的副本，e-mail 以 `***` 取代
    pub fn redacted(&self) -> Self {
        Self {
            email: self.email.as_ref().map(|_| "***".to_string()),
            ..self.clone()
        }
    }

    pub fn identity(&self) -> ConfiguredIdentity {
        ConfiguredIdentity::new(self.email.clone(), self.email_env.clone())
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::from_config(self)
    }

    pub fn transport(&self) -> Result<ReqwestTransport> {
        ReqwestTransport::from_config(self)
    }

    /// 以這份設定組出完整的函式入口
    pub fn functions(&self) -> Result<GranaFunctions<ReqwestTransport, ConfiguredIdentity>> {
        let builder = RequestBuilder::new(self.transport()?, self.identity(), self.endpoints()?);
        Ok(GranaFunctions::new(builder))
    }
}

impl ConfigProvider for Settings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn stocks_base_url(&self) -> &str {
        &self.stocks_base_url
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api_base_url)?;
        validation::validate_url("api.stocks_url", &self.stocks_base_url)?;
        validation::validate_non_empty_string("http.user_agent", &self.user_agent)?;
        validation::validate_non_empty_string("identity.email_env", &self.email_env)?;
        if let Some(seconds) = self.timeout_seconds {
            validation::validate_range("http.timeout_seconds", seconds, 1, 600)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::IdentityResolver;
    use crate::utils::error::GranaError;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.email_env, "GRANA_EMAIL");
        assert!(settings.endpoints().is_ok());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "http://localhost:8080/api"

[http]
timeout_seconds = 5

[identity]
email = "owner@example.com"
"#,
        )
        .unwrap();

        let settings = Settings::from_toml(&config);
        assert_eq!(settings.api_base_url, "http://localhost:8080/api");
        assert_eq!(settings.stocks_base_url, DEFAULT_STOCKS_BASE_URL);
        assert_eq!(settings.timeout_seconds, Some(5));
        assert_eq!(settings.email.as_deref(), Some("owner@example.com"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = Settings {
            api_base_url: "not a url".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        settings.api_base_url = DEFAULT_API_BASE_URL.to_string();
        settings.timeout_seconds = Some(0);
        assert!(settings.validate().is_err());

        settings.timeout_seconds = None;
        settings.email_env = " ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_unresolved_email_placeholder_falls_back_to_env() {
        let config = TomlConfig::from_toml_str(
            r#"
[identity]
email = "${GRANA_TEST_EMAIL_NEVER_SET}"
email_env = "GRANA_TEST_EMAIL_NEVER_SET"
"#,
        )
        .unwrap();

        let settings = Settings::from_toml(&config);
        assert_eq!(settings.email, None);
        assert!(settings.validate().is_ok());
        assert_eq!(
            settings.identity().resolve().unwrap_err().to_string(),
            "environment variable GRANA_TEST_EMAIL_NEVER_SET is not set"
        );
    }

    #[test]
    fn test_redacted_hides_email() {
        let settings = Settings {
            email: Some("owner@example.com".to_string()),
            ..Settings::default()
        };

        let redacted = settings.redacted();
        assert_eq!(redacted.email.as_deref(), Some("***"));
        assert!(!format!("{:?}", redacted).contains("owner@example.com"));
        assert_eq!(redacted.api_base_url, settings.api_base_url);
        assert_eq!(Settings::default().redacted().email, None);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let result = Settings::load(Some(Path::new("/definitely/not/here/grana.toml")));
        assert!(matches!(result, Err(GranaError::IoError(_))));
    }
}
