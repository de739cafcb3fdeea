//! Pure playback bookkeeping: the current track index, play/pause/stop
//! state, volume and the fraction math behind the progress and volume bars.
//!
//! Nothing here touches audio; the engine thread is driven from this state
//! by the runtime.

use std::time::Duration;

/// What the transport is doing right now.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Player-side view of playback. The invariant: `current` is either `None`
/// (stopped) or a valid index into the playlist the runtime manages.
#[derive(Debug)]
pub struct PlayerState {
    pub current: Option<usize>,
    pub playback: PlaybackState,
    /// Volume fraction in [0, 1], as set by the user.
    pub volume: f32,
    pub muted: bool,
    volume_before_mute: f32,
    /// Total duration reported by the engine for the loaded track.
    pub track_duration: Option<Duration>,
    /// Tag of the most recent load; engine events carrying an older tag are
    /// stale and get dropped.
    pub generation: u64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current: None,
            playback: PlaybackState::Stopped,
            volume: 1.0,
            muted: false,
            volume_before_mute: 1.0,
            track_duration: None,
            generation: 0,
        }
    }
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index to play after the current one, wrapping at the end. With no
    /// current track the first track is next. `None` for an empty playlist.
    pub fn next_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(match self.current {
            Some(c) => (c + 1) % len,
            None => 0,
        })
    }

    /// Index to play before the current one, wrapping at the start. With no
    /// current track the last track is previous. `None` for an empty
    /// playlist.
    pub fn prev_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(match self.current {
            Some(c) => (c + len - 1) % len,
            None => len - 1,
        })
    }

    /// Record a new load: bumps the generation, points `current` at `index`
    /// and resets the per-track fields. Returns the new generation for the
    /// engine command.
    pub fn begin_load(&mut self, index: usize, autoplay: bool) -> u64 {
        self.generation += 1;
        self.current = Some(index);
        self.playback = if autoplay {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };
        self.track_duration = None;
        self.generation
    }

    /// Playing <-> Paused. A stopped player stays stopped.
    pub fn toggle_pause(&mut self) {
        self.playback = match self.playback {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Playing,
            PlaybackState::Stopped => PlaybackState::Stopped,
        };
    }

    /// Clear the current track and stop.
    pub fn stop(&mut self) {
        self.current = None;
        self.playback = PlaybackState::Stopped;
        self.track_duration = None;
    }

    /// Adjust `current` after the playlist dropped the track at `index`:
    /// removing the current track stops playback, removing an earlier track
    /// shifts `current` down, removing a later one changes nothing.
    pub fn note_removed(&mut self, index: usize) {
        match self.current {
            Some(c) if c == index => self.stop(),
            Some(c) if index < c => self.current = Some(c - 1),
            _ => {}
        }
    }

    /// Adjust `current` after the playlist swapped the tracks at `a` and `b`.
    pub fn note_swapped(&mut self, a: usize, b: usize) {
        match self.current {
            Some(c) if c == a => self.current = Some(b),
            Some(c) if c == b => self.current = Some(a),
            _ => {}
        }
    }

    /// The playlist was emptied.
    pub fn note_cleared(&mut self) {
        self.stop();
    }

    /// Set the volume fraction, clamped to [0, 1]. Setting a volume ends
    /// mute.
    pub fn set_volume_fraction(&mut self, fraction: f32) {
        self.volume = fraction.clamp(0.0, 1.0);
        self.muted = false;
    }

    /// Nudge the volume by `delta`, clamped to [0, 1].
    pub fn step_volume(&mut self, delta: f32) {
        self.set_volume_fraction(self.volume + delta);
    }

    /// Flip mute. Unmuting restores the remembered volume.
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.muted = false;
            self.volume = self.volume_before_mute;
        } else {
            self.volume_before_mute = self.volume;
            self.muted = true;
        }
    }

    /// Volume the engine should actually play at.
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }
}

/// Fraction of a horizontal bar hit at `column`, clamped to [0, 1] for any
/// column, including ones outside the bar.
pub fn bar_fraction(column: u16, x: u16, width: u16) -> f32 {
    if width <= 1 {
        return if column > x { 1.0 } else { 0.0 };
    }
    let rel = column.saturating_sub(x) as f32;
    (rel / (width - 1) as f32).clamp(0.0, 1.0)
}

/// Absolute seek position for a bar fraction: [0, duration]. `None` when
/// the track length is unknown.
pub fn seek_target(fraction: f32, duration: Option<Duration>) -> Option<Duration> {
    duration.map(|d| d.mul_f32(fraction.clamp(0.0, 1.0)))
}

/// Progress through the current track as a [0, 1] fraction.
pub fn progress_fraction(elapsed: Duration, duration: Option<Duration>) -> f32 {
    match duration {
        Some(d) if !d.is_zero() => (elapsed.as_secs_f32() / d.as_secs_f32()).clamp(0.0, 1.0),
        _ => 0.0,
    }
}
