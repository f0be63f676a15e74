//! # voiceclock-core
//!
//! Reusable spoken-clock announcement engine.
//!
//! ## Architecture
//!
//! ```text
//! Tick source (60 s) → Announcer::check_and_announce
//!                           │ reads SettingsStore (language / interval / muted)
//!                           │ debounce: at most one play per (hour, minute)
//!                           ▼
//!                   assets::resolve_clip  (HH_MM.ogg → HH_MM.mp3)
//!                           │
//!                           ▼
//!                   AudioOutput::play  (fire-and-forget)
//! ```
//!
//! The engine only does work when ticked. The host owns the tick cadence and
//! supplies the concrete [`Clock`] and [`AudioOutput`].

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod announcer;
pub mod audio;
pub mod clock;
pub mod error;
pub mod settings;

// Convenience re-exports for downstream crates
pub use announcer::Announcer;
pub use audio::AudioOutput;
pub use clock::{Clock, SystemClock, WallTime};
pub use error::VoiceClockError;
pub use settings::{Settings, SettingsStore, SharedSettings};

#[cfg(feature = "audio-rodio")]
pub use audio::rodio::RodioOutput;
