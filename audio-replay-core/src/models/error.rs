use thiserror::Error;

/// Terminal failures surfaced on a level stream.
///
/// All variants are session-start failures: the engine fails fast,
/// recovers to idle, and a subsequent `start()` may be retried by the
/// caller. Mid-session device hiccups (short reads, partial writes)
/// are absorbed and logged, never surfaced here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The capture device failed to initialize (busy, missing, or in
    /// an unusable state). Carries the provider's failure detail.
    #[error("recorder unavailable: {0}")]
    RecorderUnavailable(String),

    /// The playback output sink failed to open. Carries the
    /// provider's failure detail.
    #[error("player unavailable: {0}")]
    PlayerUnavailable(String),

    /// The codec gateway could not open the backing file.
    #[error("storage open failure: {0}")]
    StorageOpenFailure(String),
}

/// Errors at the codec gateway boundary.
///
/// End-of-stream is not an error; `read_frame` reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("codec i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("no open stream")]
    NotOpen,
}

/// Errors reported by device providers (capture devices, output sinks).
///
/// Engines translate these into [`EngineError`] at the session-start
/// boundary and log them mid-session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("device failed to initialize: {0}")]
    InitFailed(String),

    #[error("device i/o: {0}")]
    Io(String),

    #[error("unsupported playback rate: {0} Hz")]
    UnsupportedRate(u32),
}
