//! Synth backend trait: a semantic-level abstraction over the voice graph.
//!
//! `SynthBackend` captures what the engine *means* to do (start a voice,
//! ramp its amplitude, retune it) independently of how the oscillator,
//! filter and delay nodes are actually wired. This keeps the voice
//! management logic unit-testable without any audio output.

use std::fmt;

use beltane_types::Waveform;

/// Result type for backend operations.
pub type BackendResult<T = ()> = Result<T, BackendError>;

/// Error from a backend operation.
#[derive(Debug, Clone)]
pub struct BackendError(pub String);

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BackendError {}

impl From<String> for BackendError {
    fn from(s: String) -> Self {
        BackendError(s)
    }
}

/// Semantic-level voice graph operations. One voice per pool slot;
/// implementations translate these into whatever node graph they drive.
pub trait SynthBackend: Send {
    /// Start the oscillator behind a slot.
    fn start_voice(&mut self, slot: usize) -> BackendResult;

    /// Hard-stop the oscillator behind a slot.
    fn stop_voice(&mut self, slot: usize) -> BackendResult;

    /// Retune a slot's voice.
    fn set_freq(&mut self, slot: usize, hz: f64) -> BackendResult;

    /// Set a slot's amplitude immediately.
    fn set_amp(&mut self, slot: usize, amp: f32) -> BackendResult;

    /// Ramp a slot's amplitude to `target` over `secs` (attack/release).
    fn ramp_amp(&mut self, slot: usize, target: f32, secs: f32) -> BackendResult;

    /// Switch the waveform of every voice.
    fn set_waveform(&mut self, waveform: Waveform) -> BackendResult;

    /// Dry/wet mix of the shared delay.
    fn set_delay_wet(&mut self, wet: f32) -> BackendResult;

    /// Whether the output context is currently running. A suspended
    /// context turns note-start requests into resume requests upstream.
    fn is_running(&self) -> bool {
        true
    }

    /// Ask the host to resume a suspended output context.
    fn request_resume(&mut self) {}
}

/// Backend that does nothing and reports a running context. Useful when no
/// audio output is attached at all.
#[derive(Debug, Default)]
pub struct NullBackend;

impl SynthBackend for NullBackend {
    fn start_voice(&mut self, _slot: usize) -> BackendResult {
        Ok(())
    }
    fn stop_voice(&mut self, _slot: usize) -> BackendResult {
        Ok(())
    }
    fn set_freq(&mut self, _slot: usize, _hz: f64) -> BackendResult {
        Ok(())
    }
    fn set_amp(&mut self, _slot: usize, _amp: f32) -> BackendResult {
        Ok(())
    }
    fn ramp_amp(&mut self, _slot: usize, _target: f32, _secs: f32) -> BackendResult {
        Ok(())
    }
    fn set_waveform(&mut self, _waveform: Waveform) -> BackendResult {
        Ok(())
    }
    fn set_delay_wet(&mut self, _wet: f32) -> BackendResult {
        Ok(())
    }
}

/// A recorded backend operation, for asserting on routing logic in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOp {
    StartVoice(usize),
    StopVoice(usize),
    SetFreq(usize, f64),
    SetAmp(usize, f32),
    RampAmp(usize, f32, f32),
    SetWaveform(Waveform),
    SetDelayWet(f32),
}

/// Backend that records every operation instead of producing sound.
///
/// Clones share their recording, so a test can keep one clone and hand the
/// other to the engine.
#[derive(Debug, Default, Clone)]
pub struct RecordingBackend {
    ops: std::sync::Arc<std::sync::Mutex<Vec<BackendOp>>>,
    suspended: std::sync::Arc<std::sync::atomic::AtomicBool>,
    resume_requests: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<BackendOp> {
        self.ops.lock().expect("recording poisoned").clone()
    }

    pub fn clear(&self) {
        self.ops.lock().expect("recording poisoned").clear();
    }

    /// Recorded ops that target one slot.
    pub fn ops_for_slot(&self, slot: usize) -> Vec<BackendOp> {
        self.ops()
            .into_iter()
            .filter(|op| match op {
                BackendOp::StartVoice(s)
                | BackendOp::StopVoice(s)
                | BackendOp::SetFreq(s, _)
                | BackendOp::SetAmp(s, _)
                | BackendOp::RampAmp(s, _, _) => *s == slot,
                _ => false,
            })
            .collect()
    }

    pub fn set_suspended(&self, suspended: bool) {
        self.suspended
            .store(suspended, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn resume_requests(&self) -> usize {
        self.resume_requests.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn push(&self, op: BackendOp) {
        self.ops.lock().expect("recording poisoned").push(op);
    }
}

impl SynthBackend for RecordingBackend {
    fn start_voice(&mut self, slot: usize) -> BackendResult {
        self.push(BackendOp::StartVoice(slot));
        Ok(())
    }
    fn stop_voice(&mut self, slot: usize) -> BackendResult {
        self.push(BackendOp::StopVoice(slot));
        Ok(())
    }
    fn set_freq(&mut self, slot: usize, hz: f64) -> BackendResult {
        self.push(BackendOp::SetFreq(slot, hz));
        Ok(())
    }
    fn set_amp(&mut self, slot: usize, amp: f32) -> BackendResult {
        self.push(BackendOp::SetAmp(slot, amp));
        Ok(())
    }
    fn ramp_amp(&mut self, slot: usize, target: f32, secs: f32) -> BackendResult {
        self.push(BackendOp::RampAmp(slot, target, secs));
        Ok(())
    }
    fn set_waveform(&mut self, waveform: Waveform) -> BackendResult {
        self.push(BackendOp::SetWaveform(waveform));
        Ok(())
    }
    fn set_delay_wet(&mut self, wet: f32) -> BackendResult {
        self.push(BackendOp::SetDelayWet(wet));
        Ok(())
    }
    fn is_running(&self) -> bool {
        !self.suspended.load(std::sync::atomic::Ordering::SeqCst)
    }
    fn request_resume(&mut self) {
        self.resume_requests
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}
