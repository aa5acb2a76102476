//! # audio-replay-core
//!
//! Platform-agnostic record/replay audio engine.
//!
//! Captures microphone PCM on a dedicated thread, persists it through
//! a pluggable codec gateway, replays it with adjustable tempo, and
//! emits one perceptual energy level per frame on a live stream the
//! caller observes from any thread.
//!
//! ## Architecture
//!
//! ```text
//! audio-replay-core (this crate)
//! ├── traits/     ← CaptureProvider/CaptureDevice, PlaybackProvider/OutputSink
//! ├── models/     ← EngineError, EngineState, EngineConfig, AudioFrame, format constants
//! ├── analysis/   ← EnergyAnalyzer (linear and RMS-dB level mapping)
//! ├── codec/      ← CodecGateway trait, RawPcmCodec default store
//! └── engine/     ← CaptureEngine, PlaybackEngine, EngineController, LevelStream
//! ```
//!
//! Real devices plug in through `audio-replay-cpal`; tests plug in
//! scripted providers. Each active engine runs one worker thread whose
//! only block points are the device read (capture) and the sink write
//! (playback); cancellation is cooperative through a per-session
//! atomic flag, checked once per frame.

pub mod analysis;
pub mod codec;
pub mod engine;
pub mod models;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use analysis::energy::{EnergyAnalyzer, LevelMode, REFERENCE_CALIBRATION, SILENCE_FLOOR};
pub use codec::gateway::CodecGateway;
pub use codec::raw_pcm::RawPcmCodec;
pub use engine::capture::CaptureEngine;
pub use engine::controller::EngineController;
pub use engine::playback::{PlaybackEngine, MAX_TEMPO, MIN_TEMPO};
pub use engine::stream::{LevelItem, LevelStream};
pub use models::config::EngineConfig;
pub use models::error::{CodecError, DeviceError, EngineError};
pub use models::frame::{AudioFrame, FALLBACK_BUFFER_BYTES, FRAME_SAMPLES, SAMPLE_RATE};
pub use models::state::EngineState;
pub use traits::capture_provider::{CaptureDevice, CaptureProvider};
pub use traits::playback_provider::{OutputSink, PlaybackProvider};
