use std::path::PathBuf;

use log::Level;
use logging_timer::timer;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::conf::EndpointConfig;
use crate::error::IngestError;

const NDJSON: &str = "application/x-ndjson";
const JSON: &str = "application/json";

#[derive(Debug)]
pub struct EsClient {
    endpoint: EndpointConfig,
    http_client: Client,
}

/// Status and raw body of a single-document index call.
#[derive(Debug, Clone)]
pub struct DocResponse {
    pub status: StatusCode,
    pub body: String,
}

fn inject_auth(request_builder: RequestBuilder, endpoint: &EndpointConfig) -> RequestBuilder {
    if endpoint.has_basic_auth() {
        request_builder.basic_auth(endpoint.get_username(), endpoint.get_password())
    } else {
        request_builder
    }
}

impl EsClient {
    pub fn new(endpoint: EndpointConfig) -> Result<Self, IngestError> {
        if endpoint.is_insecure() {
            warn!(
                "--insecure disables TLS certificate verification for {}",
                endpoint.get_url()
            );
        }
        let http_client =
            build_reqwest_client(endpoint.get_root_certificates(), endpoint.is_insecure())?;
        Ok(Self::with_client(endpoint, http_client))
    }

    pub fn with_client(endpoint: EndpointConfig, http_client: Client) -> Self {
        Self {
            endpoint,
            http_client,
        }
    }

    fn call_post(&self, path: &str, content_type: &'static str) -> RequestBuilder {
        let url = format!("{}{}", self.endpoint.get_url(), path);
        debug!("POST {}", url);
        let mut request_builder = self.http_client.post(url).header(CONTENT_TYPE, content_type);
        if let Some(timeout) = self.endpoint.get_timeout() {
            request_builder = request_builder.timeout(timeout);
        }
        inject_auth(request_builder, &self.endpoint)
    }

    /// Sends the whole NDJSON payload to `/_bulk` in one request.
    ///
    /// Only the HTTP status is checked; per-item results inside the body are
    /// returned untouched.
    pub async fn bulk(&self, payload: String) -> Result<Value, IngestError> {
        let _tmr = timer!(Level::Info; "BULK_REQUEST", "{} bytes", payload.len());
        let response = self.call_post("/_bulk", NDJSON).body(payload).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(IngestError::Server {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text)
            .map_err(|e| IngestError::Parse(format!("bulk response is not JSON: {e}")))
    }

    /// Indexes one document under `/{index}/_doc`, whatever the response status.
    pub async fn index_document<T: Serialize>(&self, doc: &T) -> Result<DocResponse, IngestError> {
        let body = serde_json::to_string(doc)?;
        let path = format!("/{}/_doc", self.endpoint.get_index());
        let response = self.call_post(&path, JSON).body(body).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(DocResponse { status, body })
    }
}

pub fn build_reqwest_client(
    ca_path: Option<&PathBuf>,
    insecure: bool,
) -> Result<Client, IngestError> {
    let mut builder = Client::builder();
    if insecure {
        builder = builder.danger_accept_invalid_certs(true);
    }
    if let Some(path) = ca_path {
        let certs = load_certificates(path)?;
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }
    builder
        .build()
        .map_err(|e| IngestError::Config(format!("failed to build HTTP client: {e}")))
}

fn load_certificates(path: &PathBuf) -> Result<Vec<Certificate>, IngestError> {
    let mut certs = Vec::new();
    let entries = std::fs::read_dir(path).map_err(|e| IngestError::io(path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| IngestError::io(path, e))?;
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if let Ok(content) = std::fs::read(&file_path) {
            match Certificate::from_pem(&content) {
                Ok(cert) => certs.push(cert),
                Err(e) => warn!("Skipping {:?}, not a PEM certificate: {}", file_path, e),
            }
        }
    }
    Ok(certs)
}
