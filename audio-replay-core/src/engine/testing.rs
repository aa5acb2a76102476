//! Scripted device and gateway doubles shared by the engine tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::codec::gateway::CodecGateway;
use crate::models::error::{CodecError, DeviceError};
use crate::models::frame::{AudioFrame, SAMPLE_RATE};
use crate::traits::capture_provider::{CaptureDevice, CaptureProvider};
use crate::traits::playback_provider::{OutputSink, PlaybackProvider};

/// Capture provider replaying a fixed frame script on every open.
pub struct ScriptedCapture {
    frames: Mutex<Vec<Vec<i16>>>,
    fail_next: AtomicBool,
    fail_first_read: AtomicBool,
}

impl ScriptedCapture {
    pub fn with_frames(frames: Vec<Vec<i16>>) -> Self {
        Self {
            frames: Mutex::new(frames),
            fail_next: AtomicBool::new(false),
            fail_first_read: AtomicBool::new(false),
        }
    }

    pub fn fail_next_open(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Make the next opened device fail its first read, then recover.
    pub fn fail_first_read(&self) {
        self.fail_first_read.store(true, Ordering::SeqCst);
    }
}

impl CaptureProvider for ScriptedCapture {
    type Device = ScriptedDevice;

    fn open_device(&self) -> Result<ScriptedDevice, DeviceError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DeviceError::InitFailed("scripted open failure".into()));
        }
        Ok(ScriptedDevice {
            frames: self.frames.lock().clone().into(),
            fail_first_read: self.fail_first_read.swap(false, Ordering::SeqCst),
        })
    }
}

/// Device handing out the scripted frames one blocking read at a time,
/// then idling with empty reads like a silent microphone.
pub struct ScriptedDevice {
    frames: VecDeque<Vec<i16>>,
    fail_first_read: bool,
}

impl CaptureDevice for ScriptedDevice {
    fn buffer_samples(&self) -> usize {
        2048
    }

    fn read(&mut self, buf: &mut [i16]) -> Result<usize, DeviceError> {
        if self.fail_first_read {
            self.fail_first_read = false;
            return Err(DeviceError::Io("scripted read failure".into()));
        }
        match self.frames.pop_front() {
            Some(frame) => {
                let n = frame.len().min(buf.len());
                buf[..n].copy_from_slice(&frame[..n]);
                Ok(n)
            }
            None => {
                thread::sleep(Duration::from_millis(2));
                Ok(0)
            }
        }
    }
}

/// Observation points for a [`MockGateway`], shared with the test.
#[derive(Default)]
pub struct GatewayProbe {
    pub processed: Mutex<Vec<Vec<i16>>>,
    closes: AtomicUsize,
    fail_prepare_write: AtomicBool,
    fail_prepare_read: AtomicBool,
}

impl GatewayProbe {
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn fail_prepare_write(&self) {
        self.fail_prepare_write.store(true, Ordering::SeqCst);
    }

    pub fn fail_prepare_read(&self) {
        self.fail_prepare_read.store(true, Ordering::SeqCst);
    }
}

/// Gateway double: records processed frames, reports each frame's
/// first sample as its level, and reads frames from a test-driven
/// script channel (`None` or a dropped sender is end-of-stream).
pub struct MockGateway {
    probe: Arc<GatewayProbe>,
    script: Receiver<Option<Vec<i16>>>,
}

impl MockGateway {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Self, Sender<Option<Vec<i16>>>, Arc<GatewayProbe>) {
        let (tx, rx) = unbounded();
        let probe = Arc::new(GatewayProbe::default());
        (
            Self {
                probe: Arc::clone(&probe),
                script: rx,
            },
            tx,
            probe,
        )
    }
}

impl CodecGateway for MockGateway {
    fn prepare_write(&mut self, _path: &Path) -> Result<(), CodecError> {
        if self.probe.fail_prepare_write.load(Ordering::SeqCst) {
            return Err(CodecError::NotOpen);
        }
        Ok(())
    }

    fn prepare_read(&mut self, _path: &Path) -> Result<(), CodecError> {
        if self.probe.fail_prepare_read.load(Ordering::SeqCst) {
            return Err(CodecError::NotOpen);
        }
        Ok(())
    }

    fn process_frame(&mut self, frame: &[i16]) -> i32 {
        self.probe.processed.lock().push(frame.to_vec());
        frame.first().copied().unwrap_or(0) as i32
    }

    fn read_frame(&mut self) -> Result<Option<AudioFrame>, CodecError> {
        match self.script.recv() {
            Ok(Some(samples)) => Ok(Some(AudioFrame::new(samples))),
            Ok(None) | Err(_) => Ok(None),
        }
    }

    fn close(&mut self) {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Observation points for a [`RecordingSink`], shared with the test.
#[derive(Default)]
pub struct SinkProbe {
    opens: AtomicUsize,
    open_buffer_bytes: AtomicUsize,
    /// (rate in effect, samples) per write, in order.
    pub writes: Mutex<Vec<(u32, usize)>>,
    pub rate_calls: Mutex<Vec<u32>>,
    fail_next_write: AtomicBool,
}

impl SinkProbe {
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn buffer_bytes(&self) -> usize {
        self.open_buffer_bytes.load(Ordering::SeqCst)
    }

    /// Make the sink's next write fail, then recover.
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }
}

/// Playback provider minting probe-backed sinks.
pub struct ScriptedPlayback {
    probe: Arc<SinkProbe>,
    min_buffer: Option<usize>,
    fail_next: AtomicBool,
}

impl ScriptedPlayback {
    pub fn new() -> Self {
        Self {
            probe: Arc::new(SinkProbe::default()),
            min_buffer: None,
            fail_next: AtomicBool::new(false),
        }
    }

    pub fn with_min_buffer(bytes: usize) -> Self {
        Self {
            min_buffer: Some(bytes),
            ..Self::new()
        }
    }

    pub fn probe(&self) -> Arc<SinkProbe> {
        Arc::clone(&self.probe)
    }

    pub fn fail_next_open(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl PlaybackProvider for ScriptedPlayback {
    type Sink = RecordingSink;

    fn min_buffer_bytes(&self) -> Option<usize> {
        self.min_buffer
    }

    fn open_sink(&self, buffer_bytes: usize) -> Result<RecordingSink, DeviceError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DeviceError::InitFailed("scripted open failure".into()));
        }
        self.probe.opens.fetch_add(1, Ordering::SeqCst);
        self.probe
            .open_buffer_bytes
            .store(buffer_bytes, Ordering::SeqCst);
        Ok(RecordingSink {
            probe: Arc::clone(&self.probe),
            rate: SAMPLE_RATE,
        })
    }
}

/// Sink recording every write together with the rate in effect.
pub struct RecordingSink {
    probe: Arc<SinkProbe>,
    rate: u32,
}

impl OutputSink for RecordingSink {
    fn write(&mut self, frame: &[i16]) -> Result<usize, DeviceError> {
        if self.probe.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(DeviceError::Io("scripted write failure".into()));
        }
        self.probe.writes.lock().push((self.rate, frame.len()));
        Ok(frame.len())
    }

    fn set_playback_rate(&mut self, rate_hz: u32) -> Result<(), DeviceError> {
        self.rate = rate_hz;
        self.probe.rate_calls.lock().push(rate_hz);
        Ok(())
    }
}
