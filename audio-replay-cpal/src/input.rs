//! Microphone capture over cpal.
//!
//! cpal delivers input through a callback on its own audio thread; the
//! engine wants a blocking `read`. The device bridges the two with a
//! bounded channel: the callback pushes chunks, `read` blocks on the
//! receiving end.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, StreamConfig};
use crossbeam_channel::{bounded, Receiver};

use audio_replay_core::{CaptureDevice, CaptureProvider, DeviceError, SAMPLE_RATE};

/// Read granularity handed to the engine, in samples (~30 ms).
const READ_CHUNK_SAMPLES: usize = 1344;

/// Chunks buffered between the cpal callback and the blocking reader.
/// Overflow drops the chunk; the engine tolerates short reads.
const BRIDGE_CAPACITY: usize = 32;

/// Capture provider over the host's cpal input devices.
pub struct CpalCaptureProvider {
    device_name: Option<String>,
}

impl CpalCaptureProvider {
    /// Provider for the system default microphone.
    pub fn default_device() -> Self {
        Self { device_name: None }
    }

    /// Provider for a specific input device by cpal name.
    pub fn with_device(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
        }
    }
}

impl CaptureProvider for CpalCaptureProvider {
    type Device = CpalCaptureDevice;

    fn open_device(&self) -> Result<CpalCaptureDevice, DeviceError> {
        let host = cpal::default_host();
        let device = match &self.device_name {
            Some(wanted) => host
                .input_devices()
                .map_err(|e| DeviceError::InitFailed(e.to_string()))?
                .find(|d| d.name().map(|n| &n == wanted).unwrap_or(false))
                .ok_or_else(|| DeviceError::InitFailed(format!("no input device {}", wanted)))?,
            None => host
                .default_input_device()
                .ok_or_else(|| DeviceError::InitFailed("no default input device".into()))?,
        };
        let name = device.name().unwrap_or_else(|_| "unknown".into());
        log::info!("opening capture device: {}", name);

        let config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(SAMPLE_RATE),
            buffer_size: BufferSize::Default,
        };

        let (tx, rx) = bounded::<Vec<i16>>(BRIDGE_CAPACITY);
        let stream = device
            .build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if tx.try_send(data.to_vec()).is_err() {
                        log::warn!("capture bridge full, dropping {} samples", data.len());
                    }
                },
                |err| log::error!("input stream error: {}", err),
                None,
            )
            .map_err(|e| DeviceError::InitFailed(e.to_string()))?;
        stream
            .play()
            .map_err(|e| DeviceError::InitFailed(e.to_string()))?;

        Ok(CpalCaptureDevice {
            _stream: stream,
            rx,
            pending: Vec::new(),
            offset: 0,
        })
    }
}

/// An open cpal input stream with a blocking-read face.
///
/// Owned by the capture worker thread for the whole session; the
/// stream stops and the hardware is released on drop.
pub struct CpalCaptureDevice {
    _stream: cpal::Stream,
    rx: Receiver<Vec<i16>>,
    pending: Vec<i16>,
    offset: usize,
}

impl CaptureDevice for CpalCaptureDevice {
    fn buffer_samples(&self) -> usize {
        READ_CHUNK_SAMPLES
    }

    fn read(&mut self, buf: &mut [i16]) -> Result<usize, DeviceError> {
        if self.offset >= self.pending.len() {
            // Blocks until the callback delivers the next chunk.
            self.pending = self
                .rx
                .recv()
                .map_err(|_| DeviceError::Io("input stream closed".into()))?;
            self.offset = 0;
        }

        let available = &self.pending[self.offset..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.offset += n;
        Ok(n)
    }
}
