//! The fixed-capacity voice channel arena.

use super::voices::{ChannelSource, SourceKind, VoiceChannel};

/// Polyphony of the instrument. Input beyond this many simultaneous
/// gestures is dropped rather than stealing audible voices.
pub const CHANNEL_COUNT: usize = 16;

/// Owns all voice channels. Slots are addressed by index; lookup by source
/// identity is a linear scan bounded by the pool size.
#[derive(Debug)]
pub struct ChannelBank {
    channels: Vec<VoiceChannel>,
}

impl Default for ChannelBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelBank {
    pub fn new() -> Self {
        Self {
            channels: vec![VoiceChannel::default(); CHANNEL_COUNT],
        }
    }

    pub fn channels(&self) -> &[VoiceChannel] {
        &self.channels
    }

    pub fn channel(&self, slot: usize) -> &VoiceChannel {
        &self.channels[slot]
    }

    pub fn channel_mut(&mut self, slot: usize) -> &mut VoiceChannel {
        &mut self.channels[slot]
    }

    /// First allocable slot, if any. O(pool size).
    pub fn first_off(&self) -> Option<usize> {
        self.channels
            .iter()
            .position(|c| c.source == ChannelSource::Off)
    }

    /// The slot currently owned by exactly this source and identity.
    /// O(pool size).
    pub fn find_exact(&self, source: ChannelSource) -> Option<usize> {
        self.channels.iter().position(|c| c.source == source)
    }

    /// Claim the first off slot for `source`. Returns `None` with the pool
    /// untouched when it is exhausted.
    pub fn allocate(&mut self, source: ChannelSource) -> Option<usize> {
        let slot = self.first_off()?;
        self.channels[slot].assign(source);
        Some(slot)
    }

    /// Move a slot into its fade-out. Returns the generation the deferred
    /// stop must capture.
    pub fn begin_release(&mut self, slot: usize) -> u64 {
        self.channels[slot].begin_release()
    }

    pub fn finish_release(&mut self, slot: usize) {
        self.channels[slot].finish_release();
    }

    pub fn kill(&mut self, slot: usize) {
        self.channels[slot].kill();
    }

    /// Slots to release for a `release_all`: every playing channel of the
    /// given kind, or every non-off channel when no filter is given (so an
    /// already fading channel gets its timer replaced).
    pub fn release_candidates(&self, filter: Option<SourceKind>) -> Vec<usize> {
        self.channels
            .iter()
            .enumerate()
            .filter(|(_, c)| match filter {
                Some(kind) => c.source.kind() == Some(kind),
                None => c.source != ChannelSource::Off,
            })
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Playing channels (neither off nor fading), with their slots.
    pub fn playing(&self) -> impl Iterator<Item = (usize, &VoiceChannel)> {
        self.channels
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_playing())
    }
}
