use crate::domain::code::InvalidCodeReason;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PayError>;

/// Every failure the scan-to-pay pipeline can produce.
///
/// Validation and draft-guard failures (`InvalidCode`, `InvalidAmount`,
/// `IncompleteDraft`, `NotConfirmed`, `AlreadyConfirmed`) are recoverable:
/// the caller redirects the user to the right step. Device, decode,
/// resolution and submission failures are retryable and never discard the
/// data already entered into the draft.
#[derive(Error, Debug)]
pub enum PayError {
    #[error("no camera device available")]
    NoDeviceAvailable,
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("invalid merchant code: {0}")]
    InvalidCode(InvalidCodeReason),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("amount {amount} is below the minimum transfer of {minimum}")]
    InvalidAmount { amount: u64, minimum: u64 },
    #[error("draft is missing a {0}")]
    IncompleteDraft(&'static str),
    #[error("draft has not been confirmed")]
    NotConfirmed,
    #[error("draft is already confirmed; reset it to edit")]
    AlreadyConfirmed,
    #[error("submission failed: {0}")]
    Submission(String),
}

/// Failure modes of the merchant lookup service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("merchant lookup network failure: {0}")]
    Network(String),
    #[error("merchant code not recognized")]
    NotFound,
    #[error("merchant lookup timed out")]
    Timeout,
}
