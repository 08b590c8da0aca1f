//! Client for calling Tencent Cloud APIs
//!
//! [`ApiClient`] is the authenticated handle every resource operation
//! receives. It owns the transport and the per-action rate limiter and hands
//! out typed per-service wrappers.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use tccloud_common::{RateLimiter, Result};

use crate::api::mps::MpsApi;
use crate::api::pts::PtsApi;
use crate::config::ProviderConfig;
use crate::transport::HttpTransport;

/// Page size for list/describe calls.
pub const PAGE_SIZE: i64 = 20;

/// Services this provider talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Pts,
    Mps,
}

impl Service {
    pub fn name(&self) -> &'static str {
        match self {
            Service::Pts => "pts",
            Service::Mps => "mps",
        }
    }

    /// API version sent as `X-TC-Version`.
    pub fn version(&self) -> &'static str {
        match self {
            Service::Pts => "2021-07-28",
            Service::Mps => "2019-06-12",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One signed request/response exchange.
///
/// Implementations return the body of the `Response` envelope on success and
/// a classified [`tccloud_common::Error`] otherwise.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn invoke(&self, service: Service, action: &str, payload: Value) -> Result<Value>;
}

/// Authenticated API handle
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    limiter: RateLimiter,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            limiter: RateLimiter::default(),
        }
    }

    pub fn with_rate_limit(mut self, per_second: u32) -> Self {
        self.limiter = RateLimiter::new(per_second);
        self
    }

    /// Build a client speaking signed HTTPS to the real endpoints.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport)).with_rate_limit(config.rate_limit_per_second))
    }

    pub fn pts(&self) -> PtsApi<'_> {
        PtsApi::new(self)
    }

    pub fn mps(&self) -> MpsApi<'_> {
        MpsApi::new(self)
    }

    /// Call one action with a typed request and response.
    pub async fn call<Req, Resp>(&self, service: Service, action: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        self.limiter
            .acquire(&format!("{}.{}", service, action))
            .await;

        let payload = serde_json::to_value(request)?;
        debug!(%service, action, request = %payload, "API request");

        let response = self.transport.invoke(service, action, payload).await?;
        debug!(%service, action, response = %response, "API response");

        Ok(serde_json::from_value(response)?)
    }
}

/// Collect every page of a list call.
///
/// `fetch` receives `(offset, limit)` and returns one page; a page shorter
/// than the limit ends the walk.
pub async fn paginate<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(i64, i64) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut offset = 0;
    let mut out = Vec::new();
    loop {
        let page = fetch(offset, PAGE_SIZE).await?;
        let count = page.len() as i64;
        out.extend(page);
        if count < PAGE_SIZE {
            break;
        }
        offset += PAGE_SIZE;
    }
    Ok(out)
}
