use crate::utils::error::Result;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// 同步 HTTP 取得：回傳回應本文文字，網路錯誤時回傳 Err
pub trait Transport: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<String>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn fetch(&self, url: &Url) -> Result<String> {
        (**self).fetch(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn fetch(&self, url: &Url) -> Result<String> {
        (**self).fetch(url)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("environment variable {0} is not set")]
    MissingVar(String),

    #[error("{0}")]
    Unavailable(String),
}

/// Resolves the e-mail address requests are attributed to.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self) -> std::result::Result<String, IdentityError>;
}

impl<T: IdentityResolver + ?Sized> IdentityResolver for Arc<T> {
    fn resolve(&self) -> std::result::Result<String, IdentityError> {
        (**self).resolve()
    }
}

impl<T: IdentityResolver + ?Sized> IdentityResolver for Box<T> {
    fn resolve(&self) -> std::result::Result<String, IdentityError> {
        (**self).resolve()
    }
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn stocks_base_url(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
    fn user_agent(&self) -> &str;
}
