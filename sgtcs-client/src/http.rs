//! HTTP client for the certificate-management REST API

use crate::types::{CertificateProfile, EnrollResponse, EnrollmentRequest, ServiceErrorBody, TrackingRecord};
use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

const TYPES_PATH: &[&str] = &["ssl", "v1", "types"];
const ENROLL_PATH: &[&str] = &["ssl", "v1", "enroll"];
const COLLECT_PATH: &[&str] = &["ssl", "v1", "collect"];

/// Certificate format requested from the collect endpoint (X.509, certificate only).
pub const COLLECT_FORMAT: &str = "x509CO";

/// HTTP client carrying the customer/login/password headers on every request
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    customer: String,
    username: String,
    password: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            customer: config.customer.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "calling certificate service");
        self.client
            .request(method, url)
            .header("customerUri", &self.customer)
            .header("login", &self.username)
            .header("password", &self.password)
    }

    /// Make a GET request with query parameters, decoding a JSON body
    pub async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &[&str],
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let response = self.request(Method::GET, self.url(path)?).query(query).send().await?;
        Self::handle_response(operation, response).await?.json().await.map_err(Into::into)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        operation: &'static str,
        path: &[&str],
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(Method::POST, self.url(path)?).json(body).send().await?;
        Self::handle_response(operation, response).await?.json().await.map_err(Into::into)
    }

    /// Make a GET request returning the body as text
    pub async fn get_text(&self, operation: &'static str, path: &[&str]) -> ClientResult<String> {
        let response = self.request(Method::GET, self.url(path)?).send().await?;
        Self::handle_response(operation, response).await?.text().await.map_err(Into::into)
    }

    /// Turn non-success statuses into [`ClientError::Service`]
    async fn handle_response(operation: &'static str, response: Response) -> ClientResult<Response> {
        let status = response.status();
        tracing::debug!(%status, operation, "certificate service responded");

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let description = serde_json::from_str::<ServiceErrorBody>(&text)
            .ok()
            .and_then(|body| body.description)
            .or_else(|| {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            });

        Err(ClientError::Service {
            operation,
            status: status.as_u16(),
            description,
        })
    }

    // ========== Certificate API ==========

    /// Fetch the profile catalog for an organization
    pub async fn types(&self, organization_id: u64) -> ClientResult<Vec<CertificateProfile>> {
        self.get(
            "could not retrieve certificate profiles",
            TYPES_PATH,
            &[("organizationId", organization_id.to_string())],
        )
        .await
    }

    /// Submit an enrollment request
    pub async fn enroll(&self, request: &EnrollmentRequest) -> ClientResult<EnrollResponse> {
        self.post("could not submit certificate request", ENROLL_PATH, request)
            .await
    }

    /// Collect the issued certificate as PEM text
    pub async fn collect(&self, record: &TrackingRecord) -> ClientResult<String> {
        self.get_text("could not retrieve certificate", &collect_path(record)?)
            .await
    }
}

/// Path of the collect endpoint for `record`; dot segments would be dropped
/// from the URL, so they are refused.
fn collect_path(record: &TrackingRecord) -> ClientResult<Vec<&str>> {
    let id = record.as_str();
    if id.is_empty() || id == "." || id == ".." {
        return Err(ClientError::InvalidUrl(format!("unusable request id {:?}", id)));
    }
    Ok(COLLECT_PATH.iter().copied().chain([id, COLLECT_FORMAT]).collect())
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("customer", &self.customer)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
