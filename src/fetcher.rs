use std::future::Future;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("body error: {0}")]
    Body(String),
}

pub trait UrlFetcher {
    fn fetch_text(&self, url: &str)
        -> impl Future<Output = Result<String, FetchError>> + Send;

    fn fetch_bytes(&self, url: &str)
        -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

const USER_AGENT: &str = "ai4boundaries-dl/0.1";

impl UrlFetcher for reqwest::Client {
    #[tracing::instrument(skip(self))]
    fn fetch_text(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send {
        let request = self.get(url).header("user-agent", USER_AGENT);
        async move {
            let resp = check_status(request.send().await)?;
            match resp.text().await {
                Ok(text) => Ok(text),
                Err(err) => {
                    tracing::error!("{}", err.to_string());
                    Err(FetchError::Body(err.to_string()))
                }
            }
        }
    }

    #[tracing::instrument(skip(self))]
    fn fetch_bytes(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send {
        let request = self.get(url).header("user-agent", USER_AGENT);
        async move {
            let resp = check_status(request.send().await)?;
            match resp.bytes().await {
                Ok(bytes) => Ok(bytes.to_vec()),
                Err(err) => {
                    tracing::error!("{}", err.to_string());
                    Err(FetchError::Body(err.to_string()))
                }
            }
        }
    }
}

fn check_status(
    result: Result<reqwest::Response, reqwest::Error>,
) -> Result<reqwest::Response, FetchError> {
    match result {
        Ok(resp) if resp.status().is_success() => Ok(resp),
        Ok(resp) => {
            tracing::warn!("status {} from {}", resp.status(), resp.url());
            Err(FetchError::Status(resp.status().as_u16()))
        }
        Err(err) => {
            tracing::error!("{}", err.to_string());
            Err(FetchError::Request(err.to_string()))
        }
    }
}
