//! Latest-frame-only capture source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use deskwell_core::Frame;

use crate::device::CameraDevice;

/// How long `stop` waits for the capture thread before detaching it.
const STOP_DEADLINE: Duration = Duration::from_secs(2);

/// Initial sleep after a failed device read.
const RETRY_BACKOFF_MIN: Duration = Duration::from_millis(10);

/// Ceiling for the failed-read backoff.
const RETRY_BACKOFF_MAX: Duration = Duration::from_millis(500);

/// A single-slot, last-write-wins frame channel fed by a capture thread.
///
/// There is no queue: stale frames have no value to the pipeline, and the
/// slot is overwritten in place under a lock held only for the copy-in.
/// `read` never blocks beyond that bounded critical section and may return
/// the same frame twice when analysis outpaces capture; re-reads carry an
/// identical timestamp.
pub struct FrameSource {
    slot: Arc<Mutex<Option<Frame>>>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    done_rx: mpsc::Receiver<()>,
}

impl FrameSource {
    /// Spawn the capture thread over an already-opened device.
    ///
    /// Device acquisition (and its `DeviceUnavailable` failure) happens in
    /// the device constructor; no thread is spawned on acquisition failure
    /// simply because this is never reached without a device.
    pub fn start<D: CameraDevice>(mut device: D) -> Self {
        let slot = Arc::new(Mutex::new(None));
        let running = Arc::new(AtomicBool::new(true));
        let (done_tx, done_rx) = mpsc::channel();

        let handle = {
            let slot = Arc::clone(&slot);
            let running = Arc::clone(&running);
            std::thread::spawn(move || {
                capture_loop(&mut device, &slot, &running);
                // Device handle drops here, after the loop has fully exited.
                drop(device);
                let _ = done_tx.send(());
            })
        };

        Self {
            slot,
            running,
            handle: Some(handle),
            done_rx,
        }
    }

    /// The most recently captured frame as an owned copy, or `None` if no
    /// frame has ever been captured.
    pub fn read(&self) -> Option<Frame> {
        lock_slot(&self.slot).clone()
    }

    /// Signal the capture thread to exit, join it with a deadline, and
    /// release the device.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        let Some(handle) = self.handle.take() else {
            return;
        };
        // Join must complete before the device is considered released;
        // the exit notification bounds the wait so a hung driver cannot
        // hang shutdown.
        match self.done_rx.recv_timeout(STOP_DEADLINE) {
            Ok(()) => {
                let _ = handle.join();
            }
            Err(_) => {
                tracing::warn!("capture thread did not exit within deadline, detaching");
            }
        }
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn capture_loop<D: CameraDevice>(
    device: &mut D,
    slot: &Mutex<Option<Frame>>,
    running: &AtomicBool,
) {
    let mut backoff = RETRY_BACKOFF_MIN;

    while running.load(Ordering::Relaxed) {
        match device.read_frame() {
            Ok(image) => {
                backoff = RETRY_BACKOFF_MIN;
                let frame = Frame::new(image);
                // Lock held only for the overwrite, never for device I/O.
                *lock_slot(slot) = Some(frame);
            }
            Err(err) => {
                // Transient by policy: keep retrying so `read` keeps
                // serving the last good frame, but back off instead of
                // spinning on a dead device.
                tracing::debug!(error = %err, "camera read failed, retrying");
                std::thread::sleep(backoff);
                backoff = (backoff * 2).min(RETRY_BACKOFF_MAX);
            }
        }
    }
}

fn lock_slot<'a>(slot: &'a Mutex<Option<Frame>>) -> MutexGuard<'a, Option<Frame>> {
    // A poisoned slot only means a reader panicked mid-clone; the frame
    // itself is still the last complete write.
    match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::CaptureError;
    use image::RgbImage;
    use std::time::Instant;

    /// Device that emits frames whose top-left pixel counts up.
    struct CountingDevice {
        counter: u8,
        released: Arc<AtomicBool>,
    }

    impl CameraDevice for CountingDevice {
        fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
            std::thread::sleep(Duration::from_millis(5));
            self.counter = self.counter.wrapping_add(1);
            let mut image = RgbImage::new(4, 4);
            image.put_pixel(0, 0, image::Rgb([self.counter, 0, 0]));
            Ok(image)
        }
    }

    impl Drop for CountingDevice {
        fn drop(&mut self) {
            self.released.store(true, Ordering::Relaxed);
        }
    }

    /// Device that never produces a frame.
    struct DeadDevice;

    impl CameraDevice for DeadDevice {
        fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
            Err(CaptureError::ReadFailed("unplugged".into()))
        }
    }

    fn wait_for<F: FnMut() -> bool>(mut cond: F) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn read_returns_none_until_first_capture() {
        let source = FrameSource::start(DeadDevice);
        std::thread::sleep(Duration::from_millis(100));
        assert!(source.read().is_none());
        source.stop();
    }

    #[test]
    fn read_observes_progressively_newer_frames() {
        let released = Arc::new(AtomicBool::new(false));
        let source = FrameSource::start(CountingDevice {
            counter: 0,
            released: Arc::clone(&released),
        });

        assert!(wait_for(|| source.read().is_some()));
        let first = source.read().unwrap().image.get_pixel(0, 0)[0];
        assert!(wait_for(|| {
            source
                .read()
                .map(|f| f.image.get_pixel(0, 0)[0] != first)
                .unwrap_or(false)
        }));

        source.stop();
    }

    #[test]
    fn stop_joins_and_releases_the_device() {
        let released = Arc::new(AtomicBool::new(false));
        let source = FrameSource::start(CountingDevice {
            counter: 0,
            released: Arc::clone(&released),
        });

        assert!(wait_for(|| source.read().is_some()));
        source.stop();
        assert!(released.load(Ordering::Relaxed));

        // The device slot is free again; a new source can start.
        let source = FrameSource::start(CountingDevice {
            counter: 0,
            released: Arc::new(AtomicBool::new(false)),
        });
        assert!(wait_for(|| source.read().is_some()));
        source.stop();
    }

    /// Device slower than the reader, to force a re-read of one frame.
    struct SlowDevice;

    impl CameraDevice for SlowDevice {
        fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(RgbImage::new(2, 2))
        }
    }

    #[test]
    fn reread_of_the_same_frame_has_identical_timestamp() {
        let source = FrameSource::start(SlowDevice);
        assert!(wait_for(|| source.read().is_some()));

        let a = source.read().unwrap();
        let b = source.read().unwrap();
        assert_eq!(a.timestamp, b.timestamp);

        source.stop();
    }
}
