use crate::domain::ports::{IdentityError, IdentityResolver};

pub const DEFAULT_EMAIL_ENV: &str = "GRANA_EMAIL";

/// 固定的 e-mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentity {
    email: String,
}

impl StaticIdentity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

impl IdentityResolver for StaticIdentity {
    fn resolve(&self) -> Result<String, IdentityError> {
        Ok(self.email.clone())
    }
}

/// Reads the e-mail from an environment variable on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvIdentity {
    var: String,
}

impl EnvIdentity {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_EMAIL_ENV)
    }
}

impl IdentityResolver for EnvIdentity {
    fn resolve(&self) -> Result<String, IdentityError> {
        match std::env::var(&self.var) {
            Ok(email) if !email.trim().is_empty() => Ok(email),
            _ => Err(IdentityError::MissingVar(self.var.clone())),
        }
    }
}

/// 設定檔中的 e-mail 優先，否則讀環境變數
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredIdentity {
    email: Option<String>,
    fallback: EnvIdentity,
}

impl ConfiguredIdentity {
    pub fn new(email: Option<String>, env_var: impl Into<String>) -> Self {
        Self {
            email: email.filter(|e| !e.trim().is_empty()),
            fallback: EnvIdentity::new(env_var),
        }
    }
}

impl IdentityResolver for ConfiguredIdentity {
    fn resolve(&self) -> Result<String, IdentityError> {
        match &self.email {
            Some(email) => Ok(email.clone()),
            None => self.fallback.resolve(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_identity() {
        let identity = StaticIdentity::new("owner@example.com");
        assert_eq!(identity.resolve().unwrap(), "owner@example.com");
    }

    #[test]
    fn test_env_identity_reads_variable() {
        std::env::set_var("GRANA_TEST_EMAIL_SET", "env@example.com");
        let identity = EnvIdentity::new("GRANA_TEST_EMAIL_SET");
        assert_eq!(identity.resolve().unwrap(), "env@example.com");
        std::env::remove_var("GRANA_TEST_EMAIL_SET");
    }

    #[test]
    fn test_env_identity_missing_variable() {
        let identity = EnvIdentity::new("GRANA_TEST_EMAIL_NEVER_SET");
        let err = identity.resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "environment variable GRANA_TEST_EMAIL_NEVER_SET is not set"
        );
    }

    #[test]
    fn test_configured_identity_prefers_explicit_email() {
        std::env::set_var("GRANA_TEST_EMAIL_CONFIGURED", "env@example.com");
        let identity = ConfiguredIdentity::new(
            Some("file@example.com".to_string()),
            "GRANA_TEST_EMAIL_CONFIGURED",
        );
        assert_eq!(identity.resolve().unwrap(), "file@example.com");

        let identity = ConfiguredIdentity::new(Some("  ".to_string()), "GRANA_TEST_EMAIL_CONFIGURED");
        assert_eq!(identity.resolve().unwrap(), "env@example.com");
        std::env::remove_var("GRANA_TEST_EMAIL_CONFIGURED");
    }
}
