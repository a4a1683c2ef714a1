use crate::domain::ports::{CameraBackendArc, CodeDecoderArc};
use crate::domain::scan::{ScanResult, ScanSource};
use crate::error::{PayError, Result};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

/// Owns the lifecycle of at most one active code-acquisition source.
///
/// A camera session runs as a spawned decode-loop task that publishes at
/// most one [`ScanResult`] on a single-slot channel. The task closes the
/// frame source *before* publishing a hit, so the device is released before
/// any resolution work starts. Uploaded-image decoding is independent of any
/// camera session.
pub struct ScanController {
    camera: CameraBackendArc,
    decoder: CodeDecoderArc,
    session: Option<ScanSession>,
}

struct ScanSession {
    task: JoinHandle<()>,
    result_rx: oneshot::Receiver<ScanResult>,
    // Dropping this wakes the decode loop's cancel branch.
    cancel_tx: oneshot::Sender<()>,
}

impl ScanController {
    pub fn new(camera: CameraBackendArc, decoder: CodeDecoderArc) -> Self {
        Self {
            camera,
            decoder,
            session: None,
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.session.is_some()
    }

    /// Opens the first available camera device and starts the continuous
    /// decode loop. Fails with [`PayError::NoDeviceAvailable`] when no device
    /// exists. A no-op while a session is already active.
    pub async fn start_camera_session(&mut self) -> Result<()> {
        if self.session.is_some() {
            debug!("camera session already active");
            return Ok(());
        }

        let devices = self.camera.list_devices().await?;
        let device = devices
            .into_iter()
            .next()
            .ok_or(PayError::NoDeviceAvailable)?;
        let mut source = self.camera.open_stream(&device).await?;
        debug!(device = %device.0, "camera session started");

        let decoder = self.decoder.clone();
        let (result_tx, result_rx) = oneshot::channel();
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut cancel_rx => {
                        debug!("scan cancelled, releasing camera");
                        source.close();
                        return;
                    }
                    frame = source.next_frame() => {
                        let Some(frame) = frame else {
                            debug!("camera stream ended without a hit");
                            source.close();
                            return;
                        };
                        if let Some(text) = decoder.decode_frame(&frame).await {
                            // Stop decoding the moment a code is found:
                            // release the device before publishing the hit.
                            source.close();
                            debug!("code decoded from camera frame");
                            let _ = result_tx.send(ScanResult::new(text, ScanSource::Camera));
                            return;
                        }
                    }
                }
            }
        });

        self.session = Some(ScanSession {
            task,
            result_rx,
            cancel_tx,
        });
        Ok(())
    }

    /// Awaits the single scan result of the active session, starting one
    /// first if necessary. By the time this returns, the camera device has
    /// been released and the session reaped.
    pub async fn wait_for_scan(&mut self) -> Result<ScanResult> {
        if self.session.is_none() {
            self.start_camera_session().await?;
        }
        let Some(session) = self.session.take() else {
            return Err(PayError::NoDeviceAvailable);
        };
        let ScanSession {
            task,
            result_rx,
            cancel_tx,
        } = session;

        let outcome = result_rx.await;
        // Keep the cancel channel alive until the task has finished, then
        // reap it; the loop has already closed the frame source.
        let _ = task.await;
        drop(cancel_tx);

        outcome.map_err(|_| PayError::Decode("camera stream ended without a code".to_string()))
    }

    /// Decodes a single uploaded image. Independent of any camera session;
    /// cancellable by simply discarding the pending future.
    pub async fn decode_uploaded_image(&self, bytes: &[u8]) -> Result<ScanResult> {
        let text = self.decoder.decode_image(bytes).await?;
        Ok(ScanResult::new(text, ScanSource::ImageUpload))
    }

    /// Cancels any active camera session and waits until the device has been
    /// released. Idempotent; safe to call on every exit path.
    pub async fn stop_session(&mut self) {
        if let Some(session) = self.session.take() {
            drop(session.cancel_tx);
            let _ = session.task.await;
            debug!("camera session stopped");
        }
    }
}

impl Drop for ScanController {
    fn drop(&mut self) {
        // Last-resort teardown when the controller is dropped mid-session;
        // frame sources release the device on Drop as well.
        if let Some(session) = self.session.take() {
            session.task.abort();
        }
    }
}
