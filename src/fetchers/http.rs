use crate::config::ClientConfig;
use crate::fetchers::transport::{RawResponse, Transport, TransportError};
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use std::time::Duration;
use url::Url;

/// [`Transport`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client with the configured user agent and timeout.
    /// Without a timeout the reqwest default (none) applies.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError> {
        ::log::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            // Always go to the origin; stale copies are the snapshot cache's job
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status().as_u16();
        ::log::debug!("{} answered with status {}", url, status);

        if !response.status().is_success() {
            return Ok(RawResponse::status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::NoBody(e.to_string()))?;

        Ok(RawResponse {
            status,
            body: Some(body.to_vec()),
        })
    }
}

/// Only failures to reach the server count as connectivity loss
fn classify_send_error(error: reqwest::Error) -> TransportError {
    let message = error.to_string();
    if error.is_builder() {
        TransportError::InvalidRequest(message)
    } else if error.is_connect() || error.is_timeout() {
        TransportError::Unreachable(message)
    } else if error.is_redirect() {
        TransportError::Protocol(message)
    } else if caused_by_io(&error) {
        // Connection reset or closed mid-exchange
        TransportError::Unreachable(message)
    } else {
        TransportError::Protocol(message)
    }
}

fn caused_by_io(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = error.source();
    while let Some(err) = source {
        if err.is::<std::io::Error>() {
            return true;
        }
        source = err.source();
    }
    false
}
