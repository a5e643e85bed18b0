//! Single-slot frame mailbox
//!
//! The acquisition thread writes the newest frame into a mutex-guarded
//! slot as fast as the source allows and never waits for the consumer.
//! The control loop reads the latest frame at its own cadence; frames
//! the consumer never sees are dropped. Lossy sampling is the contract,
//! not a defect.

use crate::{CameraError, VideoFrame};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Blocking frame capture device.
///
/// `read` blocks until the device produces the next frame. Failure to
/// construct a source at all is `CameraError::SourceUnavailable` and must
/// abort startup before `FrameMailbox::spawn` is called.
pub trait FrameSource: Send + 'static {
    fn read(&mut self) -> Result<VideoFrame, CameraError>;
}

/// Shared slot between producer and consumer. `None` until the first
/// frame has ever been written.
type Slot = Arc<Mutex<Option<VideoFrame>>>;

/// Handle to the acquisition thread and its mailbox slot.
///
/// Owns the only stop path: `stop` flags the producer, joins it, and only
/// then lets the source drop (the source lives on the producer thread, so
/// the join is the release barrier).
pub struct FrameMailbox {
    slot: Slot,
    stop: Arc<AtomicBool>,
    producer: Option<JoinHandle<()>>,
}

impl FrameMailbox {
    /// Spawn the acquisition thread around an opened source.
    pub fn spawn<S: FrameSource>(mut source: S) -> std::io::Result<Self> {
        let slot: Slot = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));

        let producer_slot = Arc::clone(&slot);
        let producer_stop = Arc::clone(&stop);
        let producer = std::thread::Builder::new()
            .name("frame-acquisition".into())
            .spawn(move || {
                info!("frame acquisition started");
                while !producer_stop.load(Ordering::Acquire) {
                    match source.read() {
                        Ok(frame) => {
                            let mut guard = producer_slot
                                .lock()
                                .unwrap_or_else(|poisoned| poisoned.into_inner());
                            *guard = Some(frame);
                        }
                        Err(CameraError::FrameUnavailable) => {
                            // Transient; keep the last good frame in the slot
                            debug!("empty read from source, retrying");
                        }
                        Err(e) => {
                            warn!("frame source error: {}", e);
                        }
                    }
                }
                info!("frame acquisition stopped");
                // `source` drops here, after the stop flag was observed
            })?;

        Ok(Self {
            slot,
            stop,
            producer: Some(producer),
        })
    }

    /// Latest frame, or `None` if no frame has ever been produced.
    /// The caller treats `None` as a no-op tick, not an error.
    pub fn read(&self) -> Option<VideoFrame> {
        let guard = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.clone()
    }

    /// Signal the producer and wait for it to exit, releasing the source.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.producer.take() {
            if handle.join().is_err() {
                warn!("frame acquisition thread panicked");
            }
        }
    }
}

impl Drop for FrameMailbox {
    fn drop(&mut self) {
        self.stop();
    }
}
