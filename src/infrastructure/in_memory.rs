use crate::domain::code::QrisCode;
use crate::domain::draft::{SubmissionReceipt, TransactionDraft};
use crate::domain::merchant::MerchantRecord;
use crate::domain::ports::{
    CameraBackend, CodeDecoder, FrameSource, FrameSourceBox, MerchantLookup, SubmissionGateway,
};
use crate::domain::scan::{DeviceId, Frame};
use crate::error::{PayError, ResolutionError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Counters shared between a [`ScriptedCamera`] and the streams it opens, so
/// tests can assert that every opened stream was released.
#[derive(Default, Debug)]
pub struct StreamTracker {
    opened: AtomicUsize,
    released: AtomicUsize,
}

impl StreamTracker {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn all_released(&self) -> bool {
        self.opened() == self.released()
    }
}

/// Camera backend that plays a fixed frame script on every opened stream.
#[derive(Clone)]
pub struct ScriptedCamera {
    devices: Vec<DeviceId>,
    frames: Vec<Frame>,
    tracker: Arc<StreamTracker>,
}

impl ScriptedCamera {
    pub fn new(devices: Vec<DeviceId>) -> Self {
        Self {
            devices,
            frames: Vec::new(),
            tracker: Arc::new(StreamTracker::default()),
        }
    }

    /// One default device playing the given frames.
    pub fn single_device(frames: Vec<Frame>) -> Self {
        let mut camera = Self::new(vec![DeviceId("cam-0".to_string())]);
        camera.frames = frames;
        camera
    }

    pub fn tracker(&self) -> Arc<StreamTracker> {
        self.tracker.clone()
    }
}

#[async_trait]
impl CameraBackend for ScriptedCamera {
    async fn list_devices(&self) -> Result<Vec<DeviceId>> {
        Ok(self.devices.clone())
    }

    async fn open_stream(&self, _device: &DeviceId) -> Result<FrameSourceBox> {
        self.tracker.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedFrameSource {
            frames: self.frames.iter().cloned().collect(),
            tracker: self.tracker.clone(),
            open: true,
        }))
    }
}

/// Frame stream over a fixed script; counts its release on the shared
/// tracker exactly once, whether closed explicitly or dropped.
pub struct ScriptedFrameSource {
    frames: VecDeque<Frame>,
    tracker: Arc<StreamTracker>,
    open: bool,
}

#[async_trait]
impl FrameSource for ScriptedFrameSource {
    async fn next_frame(&mut self) -> Option<Frame> {
        if !self.open {
            return None;
        }
        // Let a pending cancellation win the race against the next frame.
        tokio::task::yield_now().await;
        self.frames.pop_front()
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.tracker.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Drop for ScriptedFrameSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// Stand-in decode primitive: the payload bytes *are* the decoded text.
/// An empty frame means "no code in this frame"; an empty or non-UTF-8
/// image fails to decode.
pub struct TextFrameDecoder;

#[async_trait]
impl CodeDecoder for TextFrameDecoder {
    async fn decode_frame(&self, frame: &Frame) -> Option<String> {
        if frame.0.is_empty() {
            return None;
        }
        String::from_utf8(frame.0.clone())
            .ok()
            .filter(|text| !text.trim().is_empty())
    }

    async fn decode_image(&self, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(PayError::Decode("empty image".to_string()));
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|_| PayError::Decode("unreadable image".to_string()))?;
        let text = text.trim();
        if text.is_empty() {
            return Err(PayError::Decode("no code found in image".to_string()));
        }
        Ok(text.to_string())
    }
}

/// Merchant lookup backed by a map, for tests and the demo CLI.
///
/// Counts resolve calls so tests can assert that invalid codes never reach
/// the resolver; an optional artificial delay exercises the timeout path.
#[derive(Default, Clone)]
pub struct InMemoryMerchantDirectory {
    merchants: Arc<RwLock<HashMap<String, MerchantRecord>>>,
    resolve_calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl InMemoryMerchantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn insert(&self, record: MerchantRecord) {
        let mut merchants = self.merchants.write().await;
        merchants.insert(record.raw_code.as_str().to_string(), record);
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MerchantLookup for InMemoryMerchantDirectory {
    async fn resolve(&self, code: &QrisCode) -> Result<MerchantRecord> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let merchants = self.merchants.read().await;
        merchants
            .get(code.as_str())
            .cloned()
            .ok_or_else(|| ResolutionError::NotFound.into())
    }
}

/// Submission gateway that records every accepted draft and can be told to
/// fail the next call, for retry tests.
#[derive(Default, Clone)]
pub struct RecordingGateway {
    submitted: Arc<RwLock<Vec<TransactionDraft>>>,
    fail_next: Arc<AtomicBool>,
    counter: Arc<AtomicUsize>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub async fn submissions(&self) -> Vec<TransactionDraft> {
        self.submitted.read().await.clone()
    }
}

#[async_trait]
impl SubmissionGateway for RecordingGateway {
    async fn submit(&self, draft: &TransactionDraft) -> Result<SubmissionReceipt> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(PayError::Submission(
                "submission service unavailable".to_string(),
            ));
        }
        self.submitted.write().await.push(draft.clone());
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SubmissionReceipt(format!("SUB-{n:04}")))
    }
}
