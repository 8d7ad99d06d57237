use dashboard_logging::{dash_debug, dash_info};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::progress::parse_progress;
use crate::{ApiError, CompanyRecord, EngineSettings, FailureKind};

const RECORDS_PATH: &str = "/data";
const TRIGGER_PATH: &str = "/data/trigger-scraping";
const PROGRESS_PATH: &str = "/data/scraping-progress";

/// REST surface of the scraping server. No call is retried.
#[async_trait::async_trait]
pub trait ScraperApi: Send + Sync {
    /// Current record batch, numbered from 0 in response order.
    async fn list_records(&self) -> Result<Vec<CompanyRecord>, ApiError>;

    /// Asks the server to start a scrape. Completion is reported elsewhere.
    async fn trigger_scrape(&self) -> Result<(), ApiError>;

    /// Drops every stored record server-side.
    async fn clear_records(&self) -> Result<(), ApiError>;

    /// Latest progress percentage, for the polling fallback.
    async fn scraping_progress(&self) -> Result<u8, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestScraperApi {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestScraperApi {
    pub fn new(settings: &EngineSettings) -> Result<Self, ApiError> {
        reqwest::Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, method: Method, path: &str) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path);
        dash_debug!("{} {}", method, url);
        let response = self
            .client
            .request(method, &url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        Ok(response)
    }

    async fn body(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.send(Method::GET, path).await?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl ScraperApi for ReqwestScraperApi {
    async fn list_records(&self) -> Result<Vec<CompanyRecord>, ApiError> {
        let body = self.body(RECORDS_PATH).await?;
        let records = decode_records(&body)?;
        dash_info!("Fetched {} records", records.len());
        Ok(records)
    }

    async fn trigger_scrape(&self) -> Result<(), ApiError> {
        self.send(Method::POST, TRIGGER_PATH).await?;
        dash_info!("Scrape triggered");
        Ok(())
    }

    async fn clear_records(&self) -> Result<(), ApiError> {
        self.send(Method::DELETE, RECORDS_PATH).await?;
        dash_info!("Records cleared");
        Ok(())
    }

    async fn scraping_progress(&self) -> Result<u8, ApiError> {
        let body = self.body(PROGRESS_PATH).await?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::InvalidResponse, err.to_string()))?;
        parse_progress(&value).ok_or_else(|| {
            ApiError::new(
                FailureKind::InvalidResponse,
                format!("not a progress value: {value}"),
            )
        })
    }
}

/// Decodes a `GET /data` body into a numbered batch.
///
/// Anything but a JSON array of objects is rejected as a whole.
pub fn decode_records(body: &[u8]) -> Result<Vec<CompanyRecord>, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| ApiError::new(FailureKind::InvalidResponse, err.to_string()))?;
    if !value.is_array() {
        return Err(ApiError::new(
            FailureKind::InvalidResponse,
            "expected a JSON array of records",
        ));
    }

    let mut records: Vec<CompanyRecord> = serde_json::from_value(value)
        .map_err(|err| ApiError::new(FailureKind::InvalidResponse, err.to_string()))?;
    for (index, record) in records.iter_mut().enumerate() {
        record.id = index;
    }
    Ok(records)
}

fn status_error(status: StatusCode) -> ApiError {
    ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
