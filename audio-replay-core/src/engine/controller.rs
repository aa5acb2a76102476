use crate::analysis::energy::EnergyAnalyzer;
use crate::codec::gateway::CodecGateway;
use crate::engine::capture::CaptureEngine;
use crate::engine::playback::PlaybackEngine;
use crate::engine::stream::LevelStream;
use crate::models::config::EngineConfig;
use crate::traits::capture_provider::CaptureProvider;
use crate::traits::playback_provider::PlaybackProvider;

/// Divisor mapping a UI tempo step to a playback multiplier.
pub const TEMPO_STEP_DIVISOR: f64 = 3.0;

/// Front door for the UI layer: one capture engine and one playback
/// engine over the single backing recording, with a uniform surface.
///
/// Precondition (documented, not enforced): only one engine is active
/// at a time. Starting playback while capture runs, or vice versa, is
/// a caller error the UI must prevent through enabled/disabled
/// affordances; both sessions would otherwise contend for the same
/// backing file and audio hardware.
pub struct EngineController<CP, PP, G>
where
    CP: CaptureProvider,
    PP: PlaybackProvider,
    G: CodecGateway,
{
    capture: CaptureEngine<CP, G>,
    playback: PlaybackEngine<PP, G>,
}

impl<CP, PP, G> EngineController<CP, PP, G>
where
    CP: CaptureProvider,
    PP: PlaybackProvider,
    G: CodecGateway,
{
    /// Wire both engines over `config.storage_path()`. The gateways
    /// are separate instances of the same codec: one per pass
    /// direction, so a write session never shares handles with a read
    /// session.
    pub fn new(
        config: &EngineConfig,
        capture_provider: CP,
        playback_provider: PP,
        write_gateway: G,
        read_gateway: G,
    ) -> Self {
        let path = config.storage_path();
        Self {
            capture: CaptureEngine::new(capture_provider, write_gateway, path.clone()),
            playback: PlaybackEngine::new(
                playback_provider,
                read_gateway,
                path,
                EnergyAnalyzer::new(config.level_mode),
            ),
        }
    }

    /// Start recording; the previous recording is overwritten.
    pub fn start_recording(&mut self) -> LevelStream {
        self.capture.start()
    }

    pub fn stop_recording(&self) {
        self.capture.stop();
    }

    pub fn start_playback(&mut self) -> LevelStream {
        self.playback.start()
    }

    pub fn stop_playback(&self) {
        self.playback.stop();
    }

    /// Map a UI tempo step to a playback multiplier (`step / 3`) and
    /// forward it to the active playback session.
    pub fn set_tempo(&self, step: u32) {
        self.playback.set_tempo(step as f64 / TEMPO_STEP_DIVISOR);
    }

    pub fn capture(&self) -> &CaptureEngine<CP, G> {
        &self.capture
    }

    pub fn playback(&self) -> &PlaybackEngine<PP, G> {
        &self.playback
    }

    /// Wait for both engines to wind down. Test and shutdown helper.
    pub fn join(&mut self) {
        self.capture.join();
        self.playback.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::energy::{LevelMode, SILENCE_FLOOR};
    use crate::codec::raw_pcm::RawPcmCodec;
    use crate::engine::testing::{ScriptedCapture, ScriptedPlayback};
    use crate::models::frame::FRAME_SAMPLES;

    fn controller_over(
        dir: &std::path::Path,
        frames: Vec<Vec<i16>>,
    ) -> EngineController<ScriptedCapture, ScriptedPlayback, RawPcmCodec> {
        let config = EngineConfig {
            data_dir: dir.to_path_buf(),
            level_mode: LevelMode::default(),
        };
        let analyzer = EnergyAnalyzer::new(config.level_mode);
        EngineController::new(
            &config,
            ScriptedCapture::with_frames(frames),
            ScriptedPlayback::new(),
            RawPcmCodec::new(analyzer),
            RawPcmCodec::new(analyzer),
        )
    }

    #[test]
    fn record_then_replay_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![vec![2000i16; FRAME_SAMPLES], vec![0i16; FRAME_SAMPLES]];
        let mut controller = controller_over(dir.path(), frames);

        let stream = controller.start_recording();
        assert_eq!(stream.recv(), Some(Ok(60)));
        assert_eq!(stream.recv(), Some(Ok(SILENCE_FLOOR)));
        controller.stop_recording();
        controller.join();
        assert_eq!(stream.recv(), None);
        assert!(dir.path().join("audio").join("raw.audio").exists());

        // Replaying the stored stream reproduces the same levels.
        let stream = controller.start_playback();
        let items: Vec<_> = stream.collect();
        assert_eq!(items, vec![Ok(60), Ok(SILENCE_FLOOR)]);
        controller.join();
    }

    #[test]
    fn tempo_step_maps_through_the_divisor() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller_over(dir.path(), Vec::new());

        controller.set_tempo(6); // 6 / 3 = 2.0
        assert_eq!(controller.playback().current_playback_rate(), 88_200);
        controller.set_tempo(3); // base tempo
        assert_eq!(controller.playback().current_playback_rate(), 44_100);
        controller.set_tempo(0); // clamped to the minimum multiplier
        assert_eq!(controller.playback().current_playback_rate(), 22_050);
    }
}
