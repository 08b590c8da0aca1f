//! Signed JSON transport for Tencent Cloud API 3.0
//!
//! Every action is a `POST /` with a JSON body, signed with
//! TC3-HMAC-SHA256. Failures come back inside the `Response` envelope as
//! `{"Error": {"Code", "Message"}, "RequestId"}`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, error};

use tccloud_common::{Error, Result};

use crate::client::{Service, Transport};
use crate::config::ProviderConfig;

const ALGORITHM: &str = "TC3-HMAC-SHA256";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host";

/// Maximum length of response body to log
const MAX_LOG_BODY_LENGTH: usize = 200;

type HmacSha256 = Hmac<Sha256>;

fn sanitize_for_log(body: &str) -> String {
    let truncated: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
    if truncated.len() < body.len() {
        format!("{}... [truncated, {} bytes total]", truncated, body.len())
    } else {
        truncated
    }
}

/// API credentials
#[derive(Clone)]
pub struct Credentials {
    pub secret_id: String,
    pub secret_key: String,
    pub token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"***")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// HTTPS transport signing every call
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    credentials: Credentials,
    region: String,
    protocol: String,
    domain: String,
    endpoint_override: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiError {
    code: String,
    #[serde(default)]
    message: String,
}

impl HttpTransport {
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Result<Self> {
        Self::build(credentials, region.into(), std::time::Duration::from_secs(30))
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let credentials = Credentials {
            secret_id: config.secret_id.clone().unwrap_or_default(),
            secret_key: config.secret_key.clone().unwrap_or_default(),
            token: config.security_token.clone(),
        };
        let mut transport = Self::build(credentials, config.region().to_string(), config.request_timeout())?;
        transport.protocol = config.protocol.clone();
        transport.domain = config.domain.clone();
        transport.endpoint_override = config.endpoint_override.clone();
        Ok(transport)
    }

    fn build(credentials: Credentials, region: String, timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tccloud/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credentials,
            region,
            protocol: "https".to_string(),
            domain: "tencentcloudapi.com".to_string(),
            endpoint_override: None,
        })
    }

    /// Send every service to one base URL instead of `<service>.<domain>`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_override = Some(endpoint.into());
        self
    }

    fn endpoint(&self, service: Service) -> String {
        match &self.endpoint_override {
            Some(url) => url.clone(),
            None => format!("{}://{}.{}/", self.protocol, service.name(), self.domain),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn invoke(&self, service: Service, action: &str, payload: Value) -> Result<Value> {
        let url = reqwest::Url::parse(&self.endpoint(service))
            .map_err(|e| Error::InvalidConfig(format!("invalid endpoint: {}", e)))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(Error::InvalidConfig(format!("endpoint {} has no host", url))),
        };

        let body = serde_json::to_string(&payload)?;
        let timestamp = Utc::now().timestamp();
        let authorization = sign(
            &self.credentials,
            service.name(),
            &host,
            &body,
            timestamp,
        )?;

        debug!("POST {} {}", url, action);

        let mut request = self
            .client
            .post(url.clone())
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("Host", &host)
            .header("X-TC-Action", action)
            .header("X-TC-Version", service.version())
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Region", &self.region);
        if let Some(token) = &self.credentials.token {
            request = request.header("X-TC-Token", token);
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!("API error: {} - {}", status, sanitize_for_log(&text));
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: sanitize_for_log(&text),
            });
        }

        parse_response(&text)
    }
}

/// Unwrap the `Response` envelope, turning an embedded error into
/// [`Error::Api`].
pub fn parse_response(text: &str) -> Result<Value> {
    let envelope: Envelope = serde_json::from_str(text)?;
    let mut response = envelope
        .response
        .ok_or_else(|| Error::Transport("response has no `Response` envelope".to_string()))?;

    if let Some(raw) = response.get("Error") {
        let api: ApiError = serde_json::from_value(raw.clone())?;
        let request_id = response
            .get("RequestId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(Error::Api {
            code: api.code,
            message: api.message,
            request_id,
        });
    }

    if let Some(fields) = response.as_object_mut() {
        fields.remove("RequestId");
    }
    Ok(response)
}

fn hmac_sha256(key: &[u8], message: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| Error::Internal(format!("invalid signing key: {}", e)))?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

/// Build the `Authorization` header for one request.
pub fn sign(
    credentials: &Credentials,
    service: &str,
    host: &str,
    body: &str,
    timestamp: i64,
) -> Result<String> {
    let date = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or_else(|| Error::Internal(format!("timestamp {} out of range", timestamp)))?
        .format("%Y-%m-%d")
        .to_string();

    let canonical_request = format!(
        "POST\n/\n\ncontent-type:{}\nhost:{}\n\n{}\n{}",
        CONTENT_TYPE,
        host,
        SIGNED_HEADERS,
        sha256_hex(body)
    );
    let scope = format!("{}/{}/tc3_request", date, service);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        timestamp,
        scope,
        sha256_hex(&canonical_request)
    );

    let secret_date = hmac_sha256(format!("TC3{}", credentials.secret_key).as_bytes(), &date)?;
    let secret_service = hmac_sha256(&secret_date, service)?;
    let secret_signing = hmac_sha256(&secret_service, "tc3_request")?;
    let signature = hex::encode(hmac_sha256(&secret_signing, &string_to_sign)?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, credentials.secret_id, scope, SIGNED_HEADERS, signature
    ))
}
