use crate::config::ServiceConfig;
use crate::domain::code::QrisCode;
use crate::domain::draft::{SubmissionReceipt, TransactionDraft};
use crate::domain::merchant::MerchantRecord;
use crate::domain::ports::{MerchantLookup, SubmissionGateway};
use crate::error::{PayError, ResolutionError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Wire shape of `GET /merchants/qris/{code}`.
#[derive(Debug, Deserialize)]
struct MerchantResponse {
    name: String,
    terminal_id: String,
    nmid: String,
    amount: Option<u64>,
    #[serde(default)]
    image_path: String,
    #[serde(default)]
    address: String,
}

/// Payload posted to the submission service for a confirmed draft.
#[derive(Debug, Serialize)]
struct SubmissionRequest<'a> {
    account_number: &'a str,
    number_destination: &'a str,
    amount: u64,
    admin_fee: u64,
    notes: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SubmissionResponse {
    id: String,
}

/// Merchant lookup over HTTP with bearer auth and a per-request timeout.
#[derive(Clone)]
pub struct HttpMerchantLookup {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpMerchantLookup {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ResolutionError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl MerchantLookup for HttpMerchantLookup {
    async fn resolve(&self, code: &QrisCode) -> Result<MerchantRecord> {
        let url = format!(
            "{}/merchants/qris/{}",
            self.config.base_url.trim_end_matches('/'),
            code
        );
        debug!(%url, "resolving merchant code");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_transport)?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ResolutionError::NotFound.into());
        }
        if !response.status().is_success() {
            return Err(
                ResolutionError::Network(format!("lookup returned {}", response.status())).into(),
            );
        }

        let body: MerchantResponse = response
            .json()
            .await
            .map_err(|e| ResolutionError::Network(e.to_string()))?;

        // Field renaming only; no computation on the way in.
        Ok(MerchantRecord {
            name: body.name,
            merchant_id: body.nmid,
            terminal_id: body.terminal_id,
            amount: body.amount,
            image_path: body.image_path,
            address: body.address,
            raw_code: code.clone(),
        })
    }
}

/// Transfer submission over HTTP.
#[derive(Clone)]
pub struct HttpSubmissionGateway {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpSubmissionGateway {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| PayError::Submission(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl SubmissionGateway for HttpSubmissionGateway {
    async fn submit(&self, draft: &TransactionDraft) -> Result<SubmissionReceipt> {
        let recipient = draft
            .recipient
            .as_ref()
            .ok_or(PayError::IncompleteDraft("recipient"))?;
        let amount = draft.amount.ok_or(PayError::IncompleteDraft("amount"))?;

        let payload = SubmissionRequest {
            account_number: &recipient.account_number,
            number_destination: &recipient.number_destination,
            amount,
            admin_fee: draft.admin_fee,
            notes: draft.notes.as_deref(),
        };

        let url = format!(
            "{}/transactions",
            self.config.base_url.trim_end_matches('/')
        );
        let mut request = self.client.post(&url).json(&payload);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PayError::Submission("timed out".to_string())
            } else {
                PayError::Submission(e.to_string())
            }
        })?;
        if !response.status().is_success() {
            return Err(PayError::Submission(format!(
                "submission returned {}",
                response.status()
            )));
        }

        let body: SubmissionResponse = response
            .json()
            .await
            .map_err(|e| PayError::Submission(e.to_string()))?;
        Ok(SubmissionReceipt(body.id))
    }
}

fn map_transport(err: reqwest::Error) -> PayError {
    if err.is_timeout() {
        ResolutionError::Timeout.into()
    } else {
        ResolutionError::Network(err.to_string()).into()
    }
}
