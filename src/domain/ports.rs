use crate::domain::code::QrisCode;
use crate::domain::draft::{SubmissionReceipt, TransactionDraft};
use crate::domain::merchant::MerchantRecord;
use crate::domain::scan::{DeviceId, Frame};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Camera hardware access: enumerate devices and open live frame streams.
#[async_trait]
pub trait CameraBackend: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<DeviceId>>;
    async fn open_stream(&self, device: &DeviceId) -> Result<FrameSourceBox>;
}

/// A live frame stream from an opened camera device.
///
/// Implementations must also release the device on `Drop`, so that an
/// aborted scan task can never leak the hardware track.
#[async_trait]
pub trait FrameSource: Send {
    /// Next frame from the stream; `None` once the stream ends.
    async fn next_frame(&mut self) -> Option<Frame>;
    /// Releases the underlying device track. Idempotent.
    fn close(&mut self);
}

/// Visual-code decode primitive, shared by the camera and upload paths.
#[async_trait]
pub trait CodeDecoder: Send + Sync {
    /// Attempts to find a code in a single frame; `None` means keep scanning.
    async fn decode_frame(&self, frame: &Frame) -> Option<String>;
    /// Decodes one still image; errors when the image is unreadable or holds
    /// no code.
    async fn decode_image(&self, bytes: &[u8]) -> Result<String>;
}

/// Merchant lookup service. Callers gate on the code validator first, so a
/// structurally invalid code never reaches this port.
#[async_trait]
pub trait MerchantLookup: Send + Sync {
    async fn resolve(&self, code: &QrisCode) -> Result<MerchantRecord>;
}

/// Final transfer-submission service.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, draft: &TransactionDraft) -> Result<SubmissionReceipt>;
}

pub type FrameSourceBox = Box<dyn FrameSource>;
pub type CameraBackendArc = Arc<dyn CameraBackend>;
pub type CodeDecoderArc = Arc<dyn CodeDecoder>;
pub type MerchantLookupArc = Arc<dyn MerchantLookup>;
pub type SubmissionGatewayArc = Arc<dyn SubmissionGateway>;
