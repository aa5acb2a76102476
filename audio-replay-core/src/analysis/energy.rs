/// Floor sentinel returned when the mean-square energy underflows the
/// logarithm's domain (all-zero or empty frames). Marks silence; it is
/// never produced by an audible frame since the display range is
/// clamped to `[SILENCE_FLOOR, LEVEL_CEILING_DB]`.
pub const SILENCE_FLOOR: i32 = -100;

/// Ceiling applied to the dB value; a full-scale frame reads exactly this.
pub const LEVEL_CEILING_DB: f64 = 100.0;

/// Reference calibration constant for the RMS-dB mapping.
///
/// The mean-square energy is divided by this before the log transform,
/// so it determines where the silence floor of the mapped range sits.
pub const REFERENCE_CALIBRATION: f64 = 4000.0;

/// Level computation variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelMode {
    /// Magnitude of the frame's last sample. Smoke-test variant; the
    /// value tracks raw amplitude, not perceived loudness.
    Linear,

    /// Canonical variant: mean of squared samples divided by the
    /// calibration constant, `20 * log10`, truncated to an integer.
    RmsDb { calibration: f64 },
}

impl Default for LevelMode {
    fn default() -> Self {
        Self::RmsDb {
            calibration: REFERENCE_CALIBRATION,
        }
    }
}

/// Pure per-frame energy computation: PCM frame in, display level out.
///
/// Total for every input, including empty and full-scale frames; never
/// panics and never yields NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyAnalyzer {
    mode: LevelMode,
}

impl EnergyAnalyzer {
    pub fn new(mode: LevelMode) -> Self {
        Self { mode }
    }

    pub fn compute_level(&self, frame: &[i16]) -> i32 {
        match self.mode {
            LevelMode::Linear => frame.last().map(|&s| (s as i32).abs()).unwrap_or(0),
            LevelMode::RmsDb { calibration } => Self::rms_db(frame, calibration),
        }
    }

    fn rms_db(frame: &[i16], calibration: f64) -> i32 {
        if frame.is_empty() {
            return SILENCE_FLOOR;
        }

        let sum_sq: u64 = frame.iter().map(|&s| (s as i64 * s as i64) as u64).sum();
        let mean_sq = sum_sq as f64 / frame.len() as f64;

        let ratio = mean_sq / calibration;
        if ratio <= 0.0 {
            return SILENCE_FLOOR;
        }

        let energy = 20.0 * ratio.log10();
        if !energy.is_finite() {
            return SILENCE_FLOOR;
        }

        energy.clamp(SILENCE_FLOOR as f64, LEVEL_CEILING_DB) as i32
    }
}
