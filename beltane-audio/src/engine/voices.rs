//! Voice channel data: the source tag and the pitch/snap record.

use beltane_types::{PointerId, SnapState};

/// Who owns a channel, with the identity that input events use to find it
/// again. `Off` channels are allocable; `Release` channels are fading out
/// and become `Off` when their deferred stop fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelSource {
    #[default]
    Off,
    Release,
    Kbd {
        key: u8,
    },
    Pointer {
        id: PointerId,
    },
    Mouse,
    Midi {
        offset: i32,
    },
}

/// Source category without identity, for filters and queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Kbd,
    Pointer,
    Mouse,
    Midi,
}

impl ChannelSource {
    /// The input category behind a playing channel; `None` for `Off` and
    /// `Release`.
    pub fn kind(&self) -> Option<SourceKind> {
        match self {
            ChannelSource::Off | ChannelSource::Release => None,
            ChannelSource::Kbd { .. } => Some(SourceKind::Kbd),
            ChannelSource::Pointer { .. } => Some(SourceKind::Pointer),
            ChannelSource::Mouse => Some(SourceKind::Mouse),
            ChannelSource::Midi { .. } => Some(SourceKind::Midi),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.kind().is_some()
    }
}

/// One slot of the fixed voice pool.
///
/// The generation counter guards deferred stops: every release and every
/// reallocation bumps it, and a scheduled stop only fires if the counter
/// still matches the value captured at release time.
#[derive(Debug, Clone, Default)]
pub struct VoiceChannel {
    pub source: ChannelSource,
    /// Current pitch offset from the base frequency. Defined while the
    /// channel plays, kept through the fade-out, cleared at `Off`.
    pub cents: Option<f64>,
    /// Previous sample's raw cents; the snapper uses it to detect jumps.
    pub last_cents: Option<f64>,
    pub snap: SnapState,
    generation: u64,
}

impl VoiceChannel {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_playing(&self) -> bool {
        self.source.is_playing()
    }

    /// Claim an off channel for a new gesture.
    pub(crate) fn assign(&mut self, source: ChannelSource) {
        self.source = source;
        self.cents = None;
        self.last_cents = None;
        self.snap = SnapState::default();
        self.generation += 1;
    }

    /// Begin the fade-out. Pitch stays visible for the display layer;
    /// identity and snap state are gone.
    pub(crate) fn begin_release(&mut self) -> u64 {
        self.source = ChannelSource::Release;
        self.last_cents = None;
        self.snap = SnapState::default();
        self.generation += 1;
        self.generation
    }

    /// The deferred transition at the end of the fade.
    pub(crate) fn finish_release(&mut self) {
        self.source = ChannelSource::Off;
        self.cents = None;
    }

    /// Immediate hard reset, bypassing any fade.
    pub(crate) fn kill(&mut self) {
        self.source = ChannelSource::Off;
        self.cents = None;
        self.last_cents = None;
        self.snap = SnapState::default();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_classify_sources() {
        assert_eq!(ChannelSource::Off.kind(), None);
        assert_eq!(ChannelSource::Release.kind(), None);
        assert_eq!(ChannelSource::Kbd { key: 2 }.kind(), Some(SourceKind::Kbd));
        assert_eq!(
            ChannelSource::Pointer {
                id: PointerId::new(7)
            }
            .kind(),
            Some(SourceKind::Pointer)
        );
        assert_eq!(ChannelSource::Midi { offset: -3 }.kind(), Some(SourceKind::Midi));
    }

    #[test]
    fn release_keeps_cents_until_finished() {
        let mut channel = VoiceChannel::default();
        channel.assign(ChannelSource::Mouse);
        channel.cents = Some(350.0);
        channel.begin_release();
        assert_eq!(channel.source, ChannelSource::Release);
        assert_eq!(channel.cents, Some(350.0));
        channel.finish_release();
        assert_eq!(channel.source, ChannelSource::Off);
        assert_eq!(channel.cents, None);
    }

    #[test]
    fn lifecycle_bumps_generation() {
        let mut channel = VoiceChannel::default();
        let g0 = channel.generation();
        channel.assign(ChannelSource::Kbd { key: 0 });
        let g1 = channel.generation();
        let g2 = channel.begin_release();
        channel.kill();
        let g3 = channel.generation();
        assert!(g0 < g1 && g1 < g2 && g2 < g3);
    }
}
