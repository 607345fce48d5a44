//! Outbound GET with a single fallback from verified to unverified TLS.

use std::error::Error as StdError;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::{Result, WxError};

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Outcome of one failed attempt, split by whether a downgrade may help.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttemptError {
    #[error("certificate verification failed: {0}")]
    Certificate(String),
    #[error("{0}")]
    Other(String),
}

pub trait Transport {
    fn get(&self, url: &str, verify_tls: bool) -> std::result::Result<HttpResponse, AttemptError>;
}

/// reqwest blocking transport with one prebuilt client per verification mode.
pub struct HttpTransport {
    verified: Client,
    unverified: Client,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> std::result::Result<Self, reqwest::Error> {
        let builder = || {
            Client::builder()
                .user_agent(settings.user_agent.as_str())
                .timeout(settings.timeout)
        };
        Ok(Self {
            verified: builder().build()?,
            unverified: builder().danger_accept_invalid_certs(true).build()?,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, verify_tls: bool) -> std::result::Result<HttpResponse, AttemptError> {
        let client = if verify_tls {
            &self.verified
        } else {
            &self.unverified
        };
        let response = client.get(url).send().map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(classify)?;
        Ok(HttpResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> AttemptError {
    let message = describe(&err);
    if is_certificate_error(&err) {
        AttemptError::Certificate(message)
    } else {
        AttemptError::Other(message)
    }
}

fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn mentions_tls(message: &str) -> bool {
    let message = message.to_lowercase();
    ["certificate", "tls", "ssl", "handshake"]
        .iter()
        .any(|needle| message.contains(needle))
}

/// The top-level reqwest message embeds the URL, so only its causes are inspected.
fn is_certificate_error(err: &reqwest::Error) -> bool {
    if err.is_timeout() {
        return false;
    }
    let mut source = err.source();
    while let Some(cause) = source {
        if mentions_tls(&cause.to_string()) {
            return true;
        }
        source = cause.source();
    }
    false
}

pub struct ResilientClient<T = HttpTransport> {
    transport: T,
    silence_insecure_warnings: bool,
}

impl<T: Transport> ResilientClient<T> {
    pub fn new(transport: T, silence_insecure_warnings: bool) -> Self {
        Self {
            transport,
            silence_insecure_warnings,
        }
    }

    pub fn get(&self, url: &str) -> Result<HttpResponse> {
        debug!(url, "GET");
        let transport_error = |err: AttemptError| WxError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        };

        match self.transport.get(url, true) {
            Ok(response) => Ok(response),
            Err(AttemptError::Certificate(reason)) => {
                if self.silence_insecure_warnings {
                    debug!(url, %reason, "retrying without certificate verification");
                } else {
                    warn!(url, %reason, "retrying without certificate verification");
                }
                self.transport.get(url, false).map_err(transport_error)
            }
            Err(err) => Err(transport_error(err)),
        }
    }

    pub fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        let response = self.get(url)?;
        if !(200..300).contains(&response.status) {
            return Err(WxError::Http {
                url: url.to_string(),
                status: response.status,
            });
        }
        serde_json::from_str(&response.body).map_err(|source| WxError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
