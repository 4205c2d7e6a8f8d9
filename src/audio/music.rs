//! Background music selection.

use bevy::prelude::*;

/// Which background track should be playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicTrack {
    Menu,
    Normal,
    Boss,
}

impl MusicTrack {
    pub fn asset_path(self) -> &'static str {
        match self {
            MusicTrack::Menu => "audio/music_menu.ogg",
            MusicTrack::Normal => "audio/music_normal.ogg",
            MusicTrack::Boss => "audio/music_boss.ogg",
        }
    }
}

/// Owns the music channel. Gameplay asks for a track; the audio plugin
/// switches on the next frame. Lives for the whole app so music carries
/// across level loads.
#[derive(Resource, Debug, Default)]
pub struct MusicDirector {
    current: Option<MusicTrack>,
    pending: Option<MusicTrack>,
}

impl MusicDirector {
    /// Request a track. Asking for the track already playing does nothing.
    pub fn play(&mut self, track: MusicTrack) -> bool {
        let target = self.pending.or(self.current);
        if target == Some(track) {
            return false;
        }
        self.pending = Some(track);
        true
    }

    pub fn current(&self) -> Option<MusicTrack> {
        self.current
    }

    /// Take the requested change, marking it as current.
    pub fn take_pending(&mut self) -> Option<MusicTrack> {
        let track = self.pending.take()?;
        if self.current == Some(track) {
            return None;
        }
        self.current = Some(track);
        Some(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_track_is_not_restarted() {
        let mut director = MusicDirector::default();
        assert!(director.play(MusicTrack::Normal));
        assert_eq!(director.take_pending(), Some(MusicTrack::Normal));
        assert!(!director.play(MusicTrack::Normal));
        assert_eq!(director.take_pending(), None);
    }

    #[test]
    fn last_request_in_a_frame_wins() {
        let mut director = MusicDirector::default();
        director.play(MusicTrack::Boss);
        director.play(MusicTrack::Normal);
        assert_eq!(director.take_pending(), Some(MusicTrack::Normal));
        assert_eq!(director.current(), Some(MusicTrack::Normal));
    }

    #[test]
    fn switching_back_within_a_frame_keeps_current() {
        let mut director = MusicDirector::default();
        director.play(MusicTrack::Normal);
        director.take_pending();
        director.play(MusicTrack::Boss);
        director.play(MusicTrack::Normal);
        assert_eq!(director.take_pending(), None);
        assert_eq!(director.current(), Some(MusicTrack::Normal));
    }
}
