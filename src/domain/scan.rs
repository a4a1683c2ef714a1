use std::time::SystemTime;

/// Opaque handle to a camera device, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(pub String);

/// A single frame captured from a live camera stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(pub Vec<u8>);

/// Which acquisition path produced a decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanSource {
    Camera,
    ImageUpload,
}

/// One successful decode attempt. Transient: produced once, then either
/// consumed by the pipeline or discarded.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub raw_text: String,
    pub source: ScanSource,
    pub timestamp: SystemTime,
}

impl ScanResult {
    pub fn new(raw_text: String, source: ScanSource) -> Self {
        Self {
            raw_text,
            source,
            timestamp: SystemTime::now(),
        }
    }
}
