//! Playback output over cpal.
//!
//! The engine writes whole frames and expects backpressure; cpal pulls
//! samples from a callback. The sink bridges with a bounded sample
//! channel sized to the requested device buffer: `write` blocks while
//! the channel is full, the callback drains it and zero-fills
//! underruns.
//!
//! cpal cannot retarget an open stream's hardware rate, so tempo is
//! applied at write time: frames are resampled by
//! `base_rate / desired_rate` before queueing, which plays them back
//! proportionally faster or slower through the fixed-rate stream.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, StreamConfig};
use crossbeam_channel::{bounded, Sender};

use audio_replay_core::{DeviceError, OutputSink, PlaybackProvider, SAMPLE_RATE};

/// Playback provider over the host's cpal output devices.
pub struct CpalPlaybackProvider {
    device_name: Option<String>,
}

impl CpalPlaybackProvider {
    /// Provider for the system default output.
    pub fn default_device() -> Self {
        Self { device_name: None }
    }

    /// Provider for a specific output device by cpal name.
    pub fn with_device(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
        }
    }
}

impl PlaybackProvider for CpalPlaybackProvider {
    type Sink = CpalOutputSink;

    fn min_buffer_bytes(&self) -> Option<usize> {
        // cpal does not expose a minimum safe buffer size; the engine
        // falls back to its computed default.
        None
    }

    fn open_sink(&self, buffer_bytes: usize) -> Result<CpalOutputSink, DeviceError> {
        let host = cpal::default_host();
        let device = match &self.device_name {
            Some(wanted) => host
                .output_devices()
                .map_err(|e| DeviceError::InitFailed(e.to_string()))?
                .find(|d| d.name().map(|n| &n == wanted).unwrap_or(false))
                .ok_or_else(|| DeviceError::InitFailed(format!("no output device {}", wanted)))?,
            None => host
                .default_output_device()
                .ok_or_else(|| DeviceError::InitFailed("no default output device".into()))?,
        };
        let name = device.name().unwrap_or_else(|_| "unknown".into());
        log::info!("opening output sink: {}, buffer {} bytes", name, buffer_bytes);

        let config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(SAMPLE_RATE),
            buffer_size: BufferSize::Default,
        };

        let capacity = (buffer_bytes / 2).max(1);
        let (tx, rx) = bounded::<i16>(capacity);
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    for slot in data.iter_mut() {
                        // Underruns play silence rather than stalling
                        // the audio thread.
                        *slot = rx.try_recv().unwrap_or(0);
                    }
                },
                |err| log::error!("output stream error: {}", err),
                None,
            )
            .map_err(|e| DeviceError::InitFailed(e.to_string()))?;
        stream
            .play()
            .map_err(|e| DeviceError::InitFailed(e.to_string()))?;

        Ok(CpalOutputSink {
            _stream: stream,
            tx,
            rate: SAMPLE_RATE,
        })
    }
}

/// An open cpal output stream with a blocking-write face.
///
/// Owned by the playback worker thread for the whole session; released
/// on drop.
pub struct CpalOutputSink {
    _stream: cpal::Stream,
    tx: Sender<i16>,
    rate: u32,
}

impl OutputSink for CpalOutputSink {
    fn write(&mut self, frame: &[i16]) -> Result<usize, DeviceError> {
        let queued: Vec<i16> = if self.rate == SAMPLE_RATE {
            frame.to_vec()
        } else {
            resample_linear(frame, self.rate)
        };

        for sample in queued {
            // Blocks on device backpressure once the ring is full.
            if self.tx.send(sample).is_err() {
                return Err(DeviceError::Io("output stream closed".into()));
            }
        }
        Ok(frame.len())
    }

    fn set_playback_rate(&mut self, rate_hz: u32) -> Result<(), DeviceError> {
        if rate_hz == 0 {
            return Err(DeviceError::UnsupportedRate(rate_hz));
        }
        self.rate = rate_hz;
        Ok(())
    }
}

/// Linear-interpolation resample of one mono frame from the desired
/// playback rate down/up to the stream's fixed base rate.
fn resample_linear(frame: &[i16], desired_rate: u32) -> Vec<i16> {
    if frame.is_empty() {
        return Vec::new();
    }

    let ratio = SAMPLE_RATE as f64 / desired_rate as f64;
    let output_len = ((frame.len() as f64 * ratio) as usize).max(1);

    let mut output = Vec::with_capacity(output_len);
    for i in 0..output_len {
        let source_index = i as f64 / ratio;
        let index = source_index as usize;
        let fraction = source_index - index as f64;

        let sample = if index + 1 < frame.len() {
            let a = frame[index] as f64;
            let b = frame[index + 1] as f64;
            a * (1.0 - fraction) + b * fraction
        } else {
            frame[frame.len() - 1] as f64
        };
        output.push(sample as i16);
    }
    output
}
