use crate::domain::ports::{ConfigProvider, Transport};
use crate::utils::error::Result;
use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

/// 以 reqwest blocking client 實作的傳輸層
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent().to_string());
        if let Some(seconds) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        Ok(Self::new(builder.build()?))
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl Transport for ReqwestTransport {
    fn fetch(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        // 不檢查狀態碼：錯誤頁面會在 JSON 解析時失敗
        if !status.is_success() {
            tracing::warn!("Service answered with status {}", status);
        }

        Ok(response.text()?)
    }
}
