use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;
use parking_lot::Mutex;

use crate::analysis::energy::EnergyAnalyzer;
use crate::codec::gateway::CodecGateway;
use crate::engine::stream::{LevelItem, LevelStream};
use crate::models::error::EngineError;
use crate::models::frame::{FALLBACK_BUFFER_BYTES, SAMPLE_RATE};
use crate::models::state::EngineState;
use crate::traits::playback_provider::{OutputSink, PlaybackProvider};

/// Lowest accepted tempo multiplier; values below are clamped.
pub const MIN_TEMPO: f64 = 0.5;

/// Highest accepted tempo multiplier; values above are clamped.
pub const MAX_TEMPO: f64 = 2.0;

/// File-backed playback engine.
///
/// `start` spawns a dedicated worker thread that pulls frames from the
/// codec gateway, writes them to the output sink (the loop's one block
/// point, on device backpressure), and emits each frame's energy level
/// on the returned [`LevelStream`] in strict read order. Exhausting
/// the source is a normal completion, not a failure.
///
/// Tempo changes retarget the open sink in place: the caller thread
/// publishes the desired output rate through an atomic and the worker
/// applies it before its next write, without restarting the session.
pub struct PlaybackEngine<P: PlaybackProvider, G: CodecGateway> {
    provider: Arc<P>,
    gateway: Arc<Mutex<G>>,
    source_path: PathBuf,
    analyzer: EnergyAnalyzer,
    state: Arc<Mutex<EngineState>>,
    continue_flag: Arc<AtomicBool>,
    // Desired output rate in Hz; the only state shared with the worker
    // besides the continuation flag.
    playback_rate: Arc<AtomicU32>,
    worker: Option<thread::JoinHandle<()>>,
}

impl<P: PlaybackProvider, G: CodecGateway> PlaybackEngine<P, G> {
    pub fn new(provider: P, gateway: G, source_path: PathBuf, analyzer: EnergyAnalyzer) -> Self {
        Self {
            provider: Arc::new(provider),
            gateway: Arc::new(Mutex::new(gateway)),
            source_path,
            analyzer,
            state: Arc::new(Mutex::new(EngineState::Idle)),
            continue_flag: Arc::new(AtomicBool::new(false)),
            playback_rate: Arc::new(AtomicU32::new(SAMPLE_RATE)),
            worker: None,
        }
    }

    pub fn state(&self) -> EngineState {
        *self.state.lock()
    }

    /// Effective output rate in Hz (base rate × current tempo).
    pub fn current_playback_rate(&self) -> u32 {
        self.playback_rate.load(Ordering::SeqCst)
    }

    /// Start a playback session and return its level stream.
    ///
    /// The sink is sized to the provider's minimum safe buffer, or to
    /// [`FALLBACK_BUFFER_BYTES`] when the platform cannot report one.
    /// Open failures surface as one terminal `Err` on the stream and
    /// the engine recovers to `Idle`. Each session starts at the base
    /// rate; tempo is per-session.
    pub fn start(&mut self) -> LevelStream {
        // Wind down a straggling session and reap its worker before
        // spawning; a still-running teardown would race the new
        // session on the shared gateway and state.
        self.continue_flag.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
        self.playback_rate.store(SAMPLE_RATE, Ordering::SeqCst);

        let (tx, stream) = LevelStream::channel();
        let flag = Arc::new(AtomicBool::new(true));
        self.continue_flag = Arc::clone(&flag);

        let provider = Arc::clone(&self.provider);
        let gateway = Arc::clone(&self.gateway);
        let state = Arc::clone(&self.state);
        let rate = Arc::clone(&self.playback_rate);
        let path = self.source_path.clone();
        let analyzer = self.analyzer;

        let handle = thread::Builder::new()
            .name("playback-engine".into())
            .spawn(move || run_session(provider, gateway, state, path, analyzer, flag, rate, tx))
            .expect("failed to spawn playback thread");
        self.worker = Some(handle);

        stream
    }

    /// Retarget playback speed of the active session.
    ///
    /// Out-of-range multipliers are clamped (and logged), never
    /// silently ignored. Frames already queued in the device keep the
    /// old rate; the new rate applies from the worker's next write.
    pub fn set_tempo(&self, multiplier: f64) {
        if !multiplier.is_finite() {
            log::warn!("ignoring non-finite tempo multiplier {}", multiplier);
            return;
        }
        let clamped = multiplier.clamp(MIN_TEMPO, MAX_TEMPO);
        if clamped != multiplier {
            log::warn!(
                "tempo multiplier {} out of range, clamped to {}",
                multiplier,
                clamped
            );
        }
        let rate = (SAMPLE_RATE as f64 * clamped).round() as u32;
        self.playback_rate.store(rate, Ordering::SeqCst);
    }

    /// Request the current session to stop. Idempotent fire-and-forget.
    pub fn stop(&self) {
        self.continue_flag.store(false, Ordering::SeqCst);
    }

    /// Synchronous variant of [`stop`](Self::stop): additionally waits
    /// for the worker thread to exit.
    pub fn join(&mut self) {
        self.stop();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl<P: PlaybackProvider, G: CodecGateway> Drop for PlaybackEngine<P, G> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[allow(clippy::too_many_arguments)]
fn run_session<P: PlaybackProvider, G: CodecGateway>(
    provider: Arc<P>,
    gateway: Arc<Mutex<G>>,
    state: Arc<Mutex<EngineState>>,
    path: PathBuf,
    analyzer: EnergyAnalyzer,
    flag: Arc<AtomicBool>,
    rate: Arc<AtomicU32>,
    tx: Sender<LevelItem>,
) {
    *state.lock() = EngineState::Preparing;

    if let Err(e) = gateway.lock().prepare_read(&path) {
        log::error!("could not open {} for read: {}", path.display(), e);
        *state.lock() = EngineState::Idle;
        let _ = tx.send(Err(EngineError::StorageOpenFailure(e.to_string())));
        return;
    }

    let buffer_bytes = provider.min_buffer_bytes().unwrap_or(FALLBACK_BUFFER_BYTES);
    let mut sink = match provider.open_sink(buffer_bytes) {
        Ok(sink) => sink,
        Err(e) => {
            log::error!("output sink failed to open: {}", e);
            gateway.lock().close();
            *state.lock() = EngineState::Idle;
            let _ = tx.send(Err(EngineError::PlayerUnavailable(e.to_string())));
            return;
        }
    };

    *state.lock() = EngineState::Playing;
    log::info!("playback started, sink buffer {} bytes", buffer_bytes);

    let mut applied_rate = SAMPLE_RATE;
    let mut samples_written: u64 = 0;

    while flag.load(Ordering::SeqCst) {
        let frame = match gateway.lock().read_frame() {
            Ok(Some(frame)) => frame,
            // End of stream: normal completion, distinct from failure.
            Ok(None) => break,
            Err(e) => {
                log::warn!("codec read failed, ending playback: {}", e);
                break;
            }
        };

        let desired_rate = rate.load(Ordering::SeqCst);
        if desired_rate != applied_rate {
            match sink.set_playback_rate(desired_rate) {
                Ok(()) => {
                    applied_rate = desired_rate;
                    log::debug!("playback rate now {} Hz", desired_rate);
                }
                Err(e) => log::warn!("sink rejected rate {} Hz: {}", desired_rate, e),
            }
        }

        match sink.write(&frame.samples) {
            Ok(n) => {
                samples_written += n as u64;
                if n < frame.len() {
                    log::debug!("short sink write: {} of {} samples", n, frame.len());
                }
            }
            Err(e) => log::warn!("sink write hiccup: {}", e),
        }

        let level = analyzer.compute_level(&frame.samples);
        if tx.send(Ok(level)).is_err() {
            break;
        }
    }

    *state.lock() = EngineState::Stopping;
    gateway.lock().close();
    drop(sink);
    *state.lock() = EngineState::Idle;
    log::info!("playback finished, samples written: {}", samples_written);
}
