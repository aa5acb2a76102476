use crate::models::error::DeviceError;

/// Factory seam for microphone capture backends.
///
/// The capture engine calls `open_device` from its worker thread at
/// session start; the returned device never leaves that thread.
/// Implemented by `audio-replay-cpal`'s provider for real hardware and
/// by scripted providers in tests.
pub trait CaptureProvider: Send + Sync + 'static {
    type Device: CaptureDevice;

    /// Acquire a capture device at the fixed format
    /// (44.1 kHz, mono, 16-bit PCM). Failure aborts the session.
    fn open_device(&self) -> Result<Self::Device, DeviceError>;
}

/// An open microphone handle, exclusively owned by the capture worker.
///
/// Hardware is released on drop.
pub trait CaptureDevice {
    /// Preferred read granularity in samples; the worker sizes its
    /// capture buffer to this.
    fn buffer_samples(&self) -> usize;

    /// Blocking read of up to `buf.len()` samples.
    ///
    /// Blocks until one buffer's worth of samples is available — this
    /// is the capture loop's only block point. Short reads (including
    /// zero) are allowed and tolerated by the caller.
    fn read(&mut self, buf: &mut [i16]) -> Result<usize, DeviceError>;
}
