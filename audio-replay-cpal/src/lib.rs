//! # audio-replay-cpal
//!
//! Real-device backend for `audio-replay-core` over cpal: a
//! [`CpalCaptureProvider`] for microphone input and a
//! [`CpalPlaybackProvider`] for the output sink, both at the engine's
//! fixed 44.1 kHz mono 16-bit format.
//!
//! ```no_run
//! use audio_replay_core::{EnergyAnalyzer, EngineConfig, EngineController, RawPcmCodec};
//! use audio_replay_cpal::{CpalCaptureProvider, CpalPlaybackProvider};
//!
//! let config = EngineConfig::default();
//! let analyzer = EnergyAnalyzer::new(config.level_mode);
//! let mut controller = EngineController::new(
//!     &config,
//!     CpalCaptureProvider::default_device(),
//!     CpalPlaybackProvider::default_device(),
//!     RawPcmCodec::new(analyzer),
//!     RawPcmCodec::new(analyzer),
//! );
//!
//! let levels = controller.start_recording();
//! for level in levels.take(100) {
//!     println!("level: {:?}", level);
//! }
//! controller.stop_recording();
//! ```

pub mod input;
pub mod output;

pub use input::{CpalCaptureDevice, CpalCaptureProvider};
pub use output::{CpalOutputSink, CpalPlaybackProvider};
