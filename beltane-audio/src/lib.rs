//! # beltane-audio
//!
//! Voice management for the Beltane instrument: a fixed pool of sixteen
//! polyphonic voice channels driven by pointer, keyboard and MIDI gestures,
//! in front of a [`engine::SynthBackend`] that abstracts the actual
//! oscillator/filter/delay graph.
//!
//! The engine is single-threaded by design — every entry point runs in the
//! caller's event loop. The one deferred piece, the stop at the end of a
//! fade-out, is a cancellable scheduled task driven by
//! [`engine::AudioEngine::tick`].

pub mod engine;

pub use engine::{
    AudioEngine, BackendError, BackendOp, BackendResult, ChannelBank, ChannelSource,
    EngineFeedback, NullBackend, RecordingBackend, SourceKind, SynthBackend, VoiceChannel,
    CHANNEL_COUNT,
};
