//! Audio output abstraction.
//!
//! The `AudioOutput` trait is the engine's only view of the audio backend:
//! swap in [`rodio::RodioOutput`] (default) or any host-provided player
//! without touching the announcer.

#[cfg(feature = "audio-rodio")]
pub mod rodio;

use std::path::Path;

use crate::error::Result;

/// Plays prerecorded clips from disk.
///
/// `play` is fire-and-forget: it returns once the clip is accepted for
/// playback (decoded and queued), not when it finishes. Starting a new clip
/// interrupts the previous one.
pub trait AudioOutput: Send {
    /// Start playing the file at `path`.
    ///
    /// # Errors
    /// Fails if the file cannot be opened or decoded, or the backend has
    /// shut down. Never blocks for the duration of the clip.
    fn play(&self, path: &Path) -> Result<()>;

    /// Stop any in-flight playback. Idempotent.
    fn stop(&self);
}
