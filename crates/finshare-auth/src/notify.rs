//! Issuance callback delivery.
//!
//! One issuance mode hands the freshly minted consent and API key off
//! to a caller-supplied callback URL. The hand-off is part of the
//! issuance transaction: timeout or a non-2xx response is a hard
//! failure of the attempt, never fire-and-forget.

use std::time::Duration;

use finshare_core::error::{FinshareError, FinshareResult};
use serde::Serialize;
use uuid::Uuid;

/// Payload POSTed to the callback URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentIssuedNotice {
    pub consent_id: Uuid,
    pub api_key: String,
}

/// Delivery of consent-issuance notices to a second party.
pub trait ConsentNotifier: Send + Sync {
    fn consent_issued(
        &self,
        callback_url: &str,
        notice: ConsentIssuedNotice,
    ) -> impl Future<Output = FinshareResult<()>> + Send;
}

/// HTTP notifier with a bounded per-request timeout.
#[derive(Clone)]
pub struct HttpConsentNotifier {
    client: reqwest::Client,
}

impl HttpConsentNotifier {
    pub fn new(timeout_secs: u64) -> FinshareResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FinshareError::Internal(format!("HTTP client build: {e}")))?;
        Ok(Self { client })
    }
}

impl ConsentNotifier for HttpConsentNotifier {
    async fn consent_issued(
        &self,
        callback_url: &str,
        notice: ConsentIssuedNotice,
    ) -> FinshareResult<()> {
        let response = self
            .client
            .post(callback_url)
            .json(&notice)
            .send()
            .await
            .map_err(|e| FinshareError::UpstreamFailure(format!("consent callback: {e}")))?;

        if !response.status().is_success() {
            return Err(FinshareError::UpstreamFailure(format!(
                "consent callback returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Notifier for issuance without a callback leg.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ConsentNotifier for NoopNotifier {
    async fn consent_issued(
        &self,
        _callback_url: &str,
        _notice: ConsentIssuedNotice,
    ) -> FinshareResult<()> {
        Ok(())
    }
}
