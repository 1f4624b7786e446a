use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::config::RegistryConfig;
use crate::error::{HubError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| HubError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        let fetch_err = |source| HubError::Fetch {
            url: url.to_string(),
            source,
        };
        let resp = self.client.get(url).send().await.map_err(fetch_err)?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(fetch_err)?.to_vec();
        debug!(url, status, bytes = bytes.len(), "GET");
        Ok(HttpGetResult { status, bytes })
    }
}
