use crate::models::error::DeviceError;

/// Factory seam for playback output backends.
///
/// Mirror of [`CaptureProvider`](super::capture_provider::CaptureProvider)
/// for the output side: the playback engine opens one sink per session
/// from its worker thread.
pub trait PlaybackProvider: Send + Sync + 'static {
    type Sink: OutputSink;

    /// Minimum safe sink buffer in bytes, when the platform can report
    /// one. `None` makes the engine fall back to one second of audio.
    fn min_buffer_bytes(&self) -> Option<usize>;

    /// Open an output sink at the fixed format with the given buffer
    /// size. Failure aborts the session.
    fn open_sink(&self, buffer_bytes: usize) -> Result<Self::Sink, DeviceError>;
}

/// An open output sink, exclusively owned by the playback worker.
///
/// Released on drop, on every loop exit path.
pub trait OutputSink {
    /// Write one frame toward the device.
    ///
    /// May block on device ring-buffer backpressure — the playback
    /// loop's only block point. Returns the number of samples
    /// accepted; short writes are allowed and tolerated by the caller.
    fn write(&mut self, frame: &[i16]) -> Result<usize, DeviceError>;

    /// Retarget the effective output sample rate without reopening the
    /// sink. Frames already queued keep the old rate; the new rate
    /// applies to subsequent writes.
    fn set_playback_rate(&mut self, rate_hz: u32) -> Result<(), DeviceError>;
}
