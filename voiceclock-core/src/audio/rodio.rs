//! `RodioOutput` — clip playback through a rodio output stream.
//!
//! ## Threading
//!
//! `rodio::OutputStream` is `!Send` (it wraps a cpal stream with platform
//! thread affinity), so it is created *inside* a dedicated worker thread and
//! never crosses a thread boundary. Commands travel over a crossbeam channel;
//! `play` does a synchronous open+decode handshake so callers see failures,
//! then playback proceeds asynchronously on the worker.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, info, warn};

use crate::audio::AudioOutput;
use crate::error::{Result, VoiceClockError};

enum Command {
    Play {
        path: PathBuf,
        done: Sender<Result<()>>,
    },
    Stop,
}

/// Audio output backed by the system's default playback device.
pub struct RodioOutput {
    tx: Option<Sender<Command>>,
    worker: Option<JoinHandle<()>>,
}

impl RodioOutput {
    /// Open the default output device.
    ///
    /// Blocks until the worker thread confirms the stream is open (or fails).
    ///
    /// # Errors
    /// - `VoiceClockError::AudioBackend` if no output device can be opened.
    pub fn new() -> Result<Self> {
        let (tx, rx) = unbounded::<Command>();
        // Sync handshake: worker signals open success/failure back to new().
        let (open_tx, open_rx) = bounded::<Result<()>>(1);

        let worker = std::thread::Builder::new()
            .name("voiceclock-audio".into())
            .spawn(move || worker_loop(rx, open_tx))?;

        match open_rx.recv() {
            Ok(Ok(())) => {
                info!("audio output ready");
                Ok(Self {
                    tx: Some(tx),
                    worker: Some(worker),
                })
            }
            Ok(Err(e)) => Err(e),
            // Channel closed before a message was sent — worker panicked?
            Err(_) => Err(VoiceClockError::AudioWorkerGone),
        }
    }
}

impl AudioOutput for RodioOutput {
    fn play(&self, path: &Path) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(VoiceClockError::AudioWorkerGone)?;
        let (done_tx, done_rx) = bounded(1);
        tx.send(Command::Play {
            path: path.to_path_buf(),
            done: done_tx,
        })
        .map_err(|_| VoiceClockError::AudioWorkerGone)?;
        done_rx.recv().map_err(|_| VoiceClockError::AudioWorkerGone)?
    }

    fn stop(&self) {
        if let Some(tx) = self.tx.as_ref() {
            let _ = tx.send(Command::Stop);
        }
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop; stream drops on the
        // worker thread, releasing the device.
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(rx: Receiver<Command>, open_tx: Sender<Result<()>>) {
    let (stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = open_tx.send(Err(VoiceClockError::AudioBackend(e.to_string())));
            return;
        }
    };
    let _ = open_tx.send(Ok(()));

    // At most one clip plays at a time; a new play interrupts the old one.
    let mut current: Option<Sink> = None;

    while let Ok(cmd) = rx.recv() {
        match cmd {
            Command::Play { path, done } => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }
                let result = start_clip(&handle, &path).map(|sink| {
                    debug!("playing {}", path.display());
                    current = Some(sink);
                });
                let _ = done.send(result);
            }
            Command::Stop => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }
            }
        }
    }

    if let Some(sink) = current.take() {
        sink.stop();
    }
    drop(stream);
}

fn start_clip(handle: &OutputStreamHandle, path: &Path) -> Result<Sink> {
    let file = File::open(path).map_err(|e| {
        warn!("could not open {} ({e})", path.display());
        VoiceClockError::Playback {
            path: path.to_path_buf(),
        }
    })?;
    let source = Decoder::new(BufReader::new(file)).map_err(|e| {
        warn!("could not decode {} ({e})", path.display());
        VoiceClockError::Playback {
            path: path.to_path_buf(),
        }
    })?;
    let sink = Sink::try_new(handle).map_err(|e| VoiceClockError::AudioBackend(e.to_string()))?;
    sink.append(source);
    Ok(sink)
}
