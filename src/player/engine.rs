//! The audio engine thread and its owning handle.
//!
//! The thread owns the output stream and the active sink. It processes
//! commands serially and reports lifecycle events (started, finished,
//! failed) tagged with the load generation, so the runtime can ignore
//! events from loads that have already been superseded.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::sink::create_sink_at;
use super::types::{EngineCmd, EngineError, EngineEvent, PlaybackHandle, PlaybackInfo};

pub struct AudioEngine {
    tx: Sender<EngineCmd>,
    events: Receiver<EngineEvent>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioEngine {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let (event_tx, events) = mpsc::channel::<EngineEvent>();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let handle = spawn_engine_thread(rx, event_tx, playback.clone());

        Self {
            tx,
            events,
            playback,
            join: Mutex::new(Some(handle)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn send(&self, cmd: EngineCmd) -> Result<(), mpsc::SendError<EngineCmd>> {
        self.tx.send(cmd)
    }

    /// One pending engine event, if any.
    pub fn try_recv_event(&self) -> Option<EngineEvent> {
        self.events.try_recv().ok()
    }

    /// Ask the thread to stop and wait for it.
    pub fn quit(&self) {
        let _ = self.send(EngineCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_engine_thread(
    rx: Receiver<EngineCmd>,
    events: Sender<EngineEvent>,
    playback_info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let err = EngineError::Output(e.to_string());
                warn!(error = %err, "audio output unavailable, engine inert");
                let _ = events.send(EngineEvent::Failed {
                    generation: 0,
                    message: err.to_string(),
                });
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped; noisy for a TUI.
        stream.log_on_drop(false);

        let mut generation: u64 = 0;
        let mut current_path: Option<PathBuf> = None;
        let mut sink: Option<Sink> = None;
        let mut paused = true;
        let mut volume: f32 = 1.0;

        // Ticker thread advancing the shared elapsed clock while playing.
        let info_for_ticker = playback_info.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(Duration::from_millis(500));
                if let Ok(mut info) = info_for_ticker.lock() {
                    if info.playing {
                        info.elapsed += Duration::from_millis(500);
                    }
                }
            }
        });

        fn do_stop(
            sink: &mut Option<Sink>,
            current_path: &mut Option<PathBuf>,
            paused: &mut bool,
            playback_info: &PlaybackHandle,
        ) {
            if let Some(s) = sink.as_ref() {
                s.stop();
            }
            *sink = None;
            *current_path = None;
            *paused = true;
            if let Ok(mut info) = playback_info.lock() {
                info.elapsed = Duration::ZERO;
                info.playing = false;
            }
        }

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    EngineCmd::Load {
                        generation: g,
                        path,
                        autoplay,
                    } => {
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }
                        sink = None;
                        generation = g;

                        match create_sink_at(&stream, &path, Duration::ZERO, volume) {
                            Ok((new_sink, duration)) => {
                                if autoplay {
                                    new_sink.play();
                                }
                                paused = !autoplay;
                                sink = Some(new_sink);
                                current_path = Some(path);
                                if let Ok(mut info) = playback_info.lock() {
                                    info.elapsed = Duration::ZERO;
                                    info.playing = autoplay;
                                }
                                debug!(generation = g, "source loaded");
                                let _ = events.send(EngineEvent::Started {
                                    generation: g,
                                    duration,
                                });
                            }
                            Err(e) => {
                                current_path = None;
                                paused = true;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.elapsed = Duration::ZERO;
                                    info.playing = false;
                                }
                                warn!(generation = g, error = %e, "load failed");
                                let _ = events.send(EngineEvent::Failed {
                                    generation: g,
                                    message: e.to_string(),
                                });
                            }
                        }
                    }

                    EngineCmd::TogglePause => {
                        if let Some(ref s) = sink {
                            if paused {
                                s.play();
                            } else {
                                s.pause();
                            }
                            paused = !paused;
                            if let Ok(mut info) = playback_info.lock() {
                                info.playing = !paused;
                            }
                        }
                    }

                    EngineCmd::Stop => {
                        do_stop(&mut sink, &mut current_path, &mut paused, &playback_info);
                    }

                    EngineCmd::SetVolume(v) => {
                        volume = v.clamp(0.0, 1.0);
                        if let Some(s) = sink.as_ref() {
                            s.set_volume(volume);
                        }
                    }

                    EngineCmd::SeekTo(target) => {
                        // Seeking rebuilds the sink and skips into the file.
                        let Some(path) = current_path.clone() else {
                            continue;
                        };
                        if sink.is_none() {
                            continue;
                        }
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }

                        match create_sink_at(&stream, &path, target, volume) {
                            Ok((new_sink, _)) => {
                                if !paused {
                                    new_sink.play();
                                }
                                sink = Some(new_sink);
                                if let Ok(mut info) = playback_info.lock() {
                                    info.elapsed = target;
                                }
                            }
                            Err(e) => {
                                sink = None;
                                current_path = None;
                                paused = true;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.elapsed = Duration::ZERO;
                                    info.playing = false;
                                }
                                warn!(generation, error = %e, "seek failed");
                                let _ = events.send(EngineEvent::Failed {
                                    generation,
                                    message: e.to_string(),
                                });
                            }
                        }
                    }

                    EngineCmd::Quit => {
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }
                        if let Ok(mut info) = playback_info.lock() {
                            info.playing = false;
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic check for the source running out.
                    let ended = sink.as_ref().map(|s| !paused && s.empty()).unwrap_or(false);
                    if ended {
                        do_stop(&mut sink, &mut current_path, &mut paused, &playback_info);
                        debug!(generation, "source finished");
                        let _ = events.send(EngineEvent::Finished { generation });
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
