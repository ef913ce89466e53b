//! Network side of a check: turns a resolved service into a status/body pair.
pub mod soap;

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use svcprobe_common::{ResolvedService, ServiceType};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("URL required")]
    UrlRequired,
    #[error("SOAP operation required: set `method` to the operation name")]
    OperationRequired,
    #[error("Unsupported HTTP method: {0}")]
    InvalidMethod(String),
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error(transparent)]
    InvalidElementName(#[from] soap::InvalidElementName),
    #[error("Request timed out after {0} ms")]
    Timeout(u64),
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status_code: u16,
    /// Parsed payload: JSON for REST when possible, XML converted to JSON for SOAP.
    pub body: Value,
    pub raw: String,
    pub elapsed_ms: u64,
}

/// Performs the call for one resolved service.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn invoke(&self, service: &ResolvedService) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn invoke(&self, service: &ResolvedService) -> Result<TransportResponse, TransportError> {
        (**self).invoke(service).await
    }
}

/// REST and SOAP over HTTP with a per-call timeout.
pub struct HttpTransport {
    client: Client,
    default_timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(default_timeout_ms: u64) -> Result<Self, TransportError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            default_timeout_ms: default_timeout_ms.max(1),
        })
    }

    fn timeout_ms(&self, service: &ResolvedService) -> u64 {
        service.timeout_ms.unwrap_or(self.default_timeout_ms).max(1)
    }

    fn header_map(headers: &BTreeMap<String, String>) -> Result<header::HeaderMap, TransportError> {
        let mut header_map = header::HeaderMap::new();
        for (key, value) in headers {
            let header_name = header::HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                TransportError::InvalidHeader {
                    name: key.clone(),
                    reason: e.to_string(),
                }
            })?;
            let header_value = header::HeaderValue::from_str(value).map_err(|e| {
                TransportError::InvalidHeader {
                    name: key.clone(),
                    reason: e.to_string(),
                }
            })?;
            header_map.insert(header_name, header_value);
        }
        Ok(header_map)
    }

    fn rest_request(&self, url: &str, service: &ResolvedService) -> Result<RequestBuilder, TransportError> {
        let method_name = service.method.as_deref().unwrap_or("GET").to_uppercase();
        let method = Method::from_bytes(method_name.as_bytes())
            .map_err(|_| TransportError::InvalidMethod(method_name.clone()))?;

        let mut request = self
            .client
            .request(method.clone(), url)
            .headers(Self::header_map(&service.headers)?);

        if method != Method::GET && method != Method::HEAD {
            match &service.body {
                Some(Value::String(text)) => request = request.body(text.clone()),
                Some(Value::Null) | None => {}
                Some(body) => request = request.json(body),
            }
        }
        Ok(request)
    }

    fn soap_request(&self, url: &str, service: &ResolvedService) -> Result<RequestBuilder, TransportError> {
        let operation = service
            .method
            .as_deref()
            .filter(|op| !op.is_empty())
            .ok_or(TransportError::OperationRequired)?;
        let namespace = service.namespace.as_deref();
        let envelope = soap::build_envelope(operation, namespace, service.args.as_ref())?;
        let action = service
            .soap_action
            .clone()
            .unwrap_or_else(|| soap::default_soap_action(operation, namespace));

        // Descriptor headers go last so they can override the SOAP defaults.
        Ok(self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{action}\""))
            .headers(Self::header_map(&service.headers)?)
            .body(envelope))
    }

    async fn send(&self, request: RequestBuilder, timeout_ms: u64) -> Result<(u16, String, u64), TransportError> {
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout(timeout_ms)
            } else {
                TransportError::Request(e)
            }
        };

        let start_time = Instant::now();
        let response = request
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(map_err)?;
        let status_code = response.status().as_u16();
        let raw = response.text().await.map_err(map_err)?;
        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        Ok((status_code, raw, elapsed_ms))
    }
}

/// JSON when the payload parses, otherwise the raw text; an empty payload is null.
pub fn parse_rest_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn invoke(&self, service: &ResolvedService) -> Result<TransportResponse, TransportError> {
        let url = service
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(TransportError::UrlRequired)?;
        let timeout_ms = self.timeout_ms(service);

        let request = match service.service_type {
            ServiceType::Rest => self.rest_request(url, service)?,
            ServiceType::Soap => self.soap_request(url, service)?,
        };
        debug!(service_id = %service.id, url = %url, timeout_ms, "Invoking service.");

        let (status_code, raw, elapsed_ms) = self.send(request, timeout_ms).await?;

        let body = match service.service_type {
            ServiceType::Rest => parse_rest_body(&raw),
            ServiceType::Soap if raw.trim().is_empty() => Value::Null,
            ServiceType::Soap => soap::response_to_json(&raw).unwrap_or_else(|e| {
                warn!(service_id = %service.id, error = %e, "SOAP response is not valid XML, keeping raw text.");
                Value::String(raw.clone())
            }),
        };

        Ok(TransportResponse {
            status_code,
            body,
            raw,
            elapsed_ms,
        })
    }
}
