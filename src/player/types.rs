//! Engine-facing small types and handles: commands, events, shared playback
//! info and the engine error type.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

/// Commands accepted by the engine thread.
#[derive(Debug)]
pub enum EngineCmd {
    /// Swap in a fresh source for `path` and start (or cue) it.
    /// `generation` tags every event the engine emits for this load.
    Load {
        generation: u64,
        path: PathBuf,
        autoplay: bool,
    },
    /// Toggle pause/resume of the current sink.
    TogglePause,
    /// Stop playback and drop the current sink.
    Stop,
    /// Set the volume for the current and all future sinks.
    SetVolume(f32),
    /// Jump to an absolute position in the current track.
    SeekTo(Duration),
    /// Stop playback and shut the engine thread down.
    Quit,
}

/// Events the engine thread reports back to the runtime.
#[derive(Debug)]
pub enum EngineEvent {
    /// A load decoded successfully and is playing (or cued).
    Started {
        generation: u64,
        duration: Option<Duration>,
    },
    /// The current source ran out of audio.
    Finished { generation: u64 },
    /// The source could not be opened or decoded.
    Failed { generation: u64, message: String },
}

/// Live position data the engine thread publishes for the UI to read.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// How far into the current track playback has gotten.
    pub elapsed: Duration,
    /// Whether audio is currently advancing.
    pub playing: bool,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            elapsed: Duration::ZERO,
            playing: false,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Failures opening, decoding or playing a source.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },

    #[error("no audio output device: {0}")]
    Output(String),
}
