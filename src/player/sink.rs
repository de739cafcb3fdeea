//! Sink construction: open, decode and cue a source at a given position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::EngineError;

/// Create a paused `Sink` for the file at `path`, cued to `start_at`, with
/// `volume` already applied. Also reports the decoded total duration when
/// the format exposes one.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<(Sink, Option<Duration>), EngineError> {
    let file = File::open(path).map_err(|e| EngineError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;
    let duration = decoder.total_duration();

    // Seeks rebuild the sink, so cueing happens here. Duration::ZERO cues
    // the top of the track.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok((sink, duration))
}
