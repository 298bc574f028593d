use super::{HandlerTimings, ProbeError, Target};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::from_slice;
use std::time::Duration;

/// Issues one request to a deployed image handler and returns the timings it reports.
#[async_trait]
pub trait Invoke {
    async fn invoke(&self, target: &Target, image_url: &str) -> Result<HandlerTimings, ProbeError>;
}

#[derive(Debug, Clone)]
pub struct RestClient {
    pub client: Client,
}

impl RestClient {
    pub const IMAGE_URL_PARAM: &'static str = "url";

    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        image_url: &str,
    ) -> Result<T, ProbeError> {
        self.request(Method::GET, endpoint, image_url).await
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        image_url: &str,
    ) -> Result<T, ProbeError> {
        let response = self
            .client
            .request(method, endpoint)
            .query(&[(Self::IMAGE_URL_PARAM, image_url)])
            .send()
            .await?;

        // Only a plain 200 counts as a data point
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProbeError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(from_slice(&body)?)
    }
}

#[async_trait]
impl Invoke for RestClient {
    async fn invoke(&self, target: &Target, image_url: &str) -> Result<HandlerTimings, ProbeError> {
        self.get(&target.endpoint(), image_url).await
    }
}
