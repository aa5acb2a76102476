/// Engine session state machine.
///
/// State transitions:
/// ```text
/// idle → preparing → recording / playing → stopping → idle
///            ↓ (device or storage failure)
///          idle
/// ```
///
/// A failed start returns directly to `Idle` so the session can be
/// retried; the failure itself travels on the level stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Preparing,
    Recording,
    Playing,
    Stopping,
}

impl EngineState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether a worker loop is currently producing frames.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Recording | Self::Playing)
    }
}
