/// Fixed capture/playback sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Mono only; both the store and the devices are single-channel.
pub const CHANNELS: u16 = 1;

/// 16-bit linear PCM.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Read granularity of the raw PCM store, in samples.
pub const FRAME_SAMPLES: usize = 1344;

/// Output-sink buffer size used when the platform cannot report a
/// minimum safe size: one second of 16-bit mono audio.
pub const FALLBACK_BUFFER_BYTES: usize = SAMPLE_RATE as usize * 2;

/// One frame of mono 16-bit samples at [`SAMPLE_RATE`].
///
/// A frame is exclusively owned by the engine that produced it for the
/// duration of one processing step; hand-off across threads is by move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    pub samples: Vec<i16>,
}

impl AudioFrame {
    pub fn new(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration this frame covers at the fixed sample rate, in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / SAMPLE_RATE as f64
    }
}

impl From<Vec<i16>> for AudioFrame {
    fn from(samples: Vec<i16>) -> Self {
        Self::new(samples)
    }
}
