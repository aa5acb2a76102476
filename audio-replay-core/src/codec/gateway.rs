use std::path::Path;

use crate::models::error::CodecError;
use crate::models::frame::AudioFrame;

/// Boundary to the persistence/transform collaborator.
///
/// The engines treat the gateway as a black box around the on-disk
/// format: it opens backing storage for one pass (write or read),
/// handles one frame at a time, and tears down cleanly. `close` is
/// invoked on every loop exit, including early exits, and must be
/// idempotent.
pub trait CodecGateway: Send + 'static {
    /// Open backing storage for a write pass, truncating any previous
    /// recording.
    fn prepare_write(&mut self, path: &Path) -> Result<(), CodecError>;

    /// Open backing storage for a read pass.
    fn prepare_read(&mut self, path: &Path) -> Result<(), CodecError>;

    /// Persist one captured frame and return its energy level in the
    /// same step (capture path). Mid-session storage hiccups are
    /// absorbed by the implementation, not surfaced.
    fn process_frame(&mut self, frame: &[i16]) -> i32;

    /// Read the next frame of the current read pass.
    ///
    /// `Ok(None)` is end-of-stream: a normal, non-error termination,
    /// distinct from a read failure.
    fn read_frame(&mut self) -> Result<Option<AudioFrame>, CodecError>;

    /// Tear down the current pass. Safe to call repeatedly.
    fn close(&mut self);
}
