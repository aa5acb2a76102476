use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;
use parking_lot::Mutex;

use crate::codec::gateway::CodecGateway;
use crate::engine::stream::{LevelItem, LevelStream};
use crate::models::error::EngineError;
use crate::models::state::EngineState;
use crate::traits::capture_provider::{CaptureDevice, CaptureProvider};

/// Microphone capture engine.
///
/// `start` spawns a dedicated worker thread that repeatedly performs a
/// blocking device read, hands the raw frame to the codec gateway for
/// persistence, and emits the frame's energy level on the returned
/// [`LevelStream`] — one emission per frame, in strict capture order.
///
/// One live session per engine instance at a time; starting a new
/// session winds down any previous one and waits for its worker to
/// exit before spawning. Running capture and playback
/// against the same physical device concurrently is a caller error the
/// UI layer must prevent — the engine documents the precondition but
/// does not enforce mutual exclusion.
pub struct CaptureEngine<P: CaptureProvider, G: CodecGateway> {
    provider: Arc<P>,
    gateway: Arc<Mutex<G>>,
    output_path: PathBuf,
    state: Arc<Mutex<EngineState>>,
    // Continuation flag of the current session; replaced on each start
    // so sessions cannot observe a stale stop.
    continue_flag: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl<P: CaptureProvider, G: CodecGateway> CaptureEngine<P, G> {
    pub fn new(provider: P, gateway: G, output_path: PathBuf) -> Self {
        Self {
            provider: Arc::new(provider),
            gateway: Arc::new(Mutex::new(gateway)),
            output_path,
            state: Arc::new(Mutex::new(EngineState::Idle)),
            continue_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    pub fn state(&self) -> EngineState {
        *self.state.lock()
    }

    /// Start a capture session and return its level stream.
    ///
    /// Device or storage failures do not panic and are not silent:
    /// they surface as a single terminal `Err` on the stream, after
    /// which the engine is back at `Idle` and `start` may be retried.
    pub fn start(&mut self) -> LevelStream {
        // Wind down a straggling session and reap its worker before
        // spawning; a still-running teardown would race the new
        // session on the shared gateway and state.
        self.continue_flag.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        let (tx, stream) = LevelStream::channel();
        let flag = Arc::new(AtomicBool::new(true));
        self.continue_flag = Arc::clone(&flag);

        let provider = Arc::clone(&self.provider);
        let gateway = Arc::clone(&self.gateway);
        let state = Arc::clone(&self.state);
        let path = self.output_path.clone();

        let handle = thread::Builder::new()
            .name("capture-engine".into())
            .spawn(move || run_session(provider, gateway, state, path, flag, tx))
            .expect("failed to spawn capture thread");
        self.worker = Some(handle);

        stream
    }

    /// Request the current session to stop. Idempotent fire-and-forget:
    /// the worker observes the flag within one frame-processing step.
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

impl<P: CaptureProvider, G: CodecGateway> Drop for CaptureEngine<P, G> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_session<P: CaptureProvider, G: CodecGateway>(
    provider: Arc<P>,
    gateway: Arc<Mutex<G>>,
    state: Arc<Mutex<EngineState>>,
    path: PathBuf,
    flag: Arc<AtomicBool>,
    tx: Sender<LevelItem>,
) {
    *state.lock() = EngineState::Preparing;

    let mut device = match provider.open_device() {
        Ok(device) => device,
        Err(e) => {
            log::error!("capture device failed to initialize: {}", e);
            *state.lock() = EngineState::Idle;
            let _ = tx.send(Err(EngineError::RecorderUnavailable(e.to_string())));
            return;
        }
    };

    if let Err(e) = gateway.lock().prepare_write(&path) {
        log::error!("could not open {} for write: {}", path.display(), e);
        *state.lock() = EngineState::Idle;
        let _ = tx.send(Err(EngineError::StorageOpenFailure(e.to_string())));
        return;
    }

    *state.lock() = EngineState::Recording;
    log::info!("recording started");

    let mut buf = vec![0i16; device.buffer_samples().max(1)];
    let mut samples_read: u64 = 0;

    while flag.load(Ordering::SeqCst) {
        let n = match device.read(&mut buf) {
            Ok(n) => n,
            Err(e) => {
                // Devices routinely hiccup mid-session; absorb and go on.
                log::warn!("capture read hiccup: {}", e);
                continue;
            }
        };
        if n == 0 {
            continue;
        }
        samples_read += n as u64;

        let level = gateway.lock().process_frame(&buf[..n]);
        if tx.send(Ok(level)).is_err() {
            // Consumer dropped the stream: unsubscription cancels us.
            break;
        }
    }

    *state.lock() = EngineState::Stopping;
    drop(device);
    gateway.lock().close();
    *state.lock() = EngineState::Idle;
    log::info!("recording stopped, samples read: {}", samples_read);
}
