//! `Announcer` — the scheduling/debounce engine.
//!
//! Polled once per minute by the host's tick source. Each tick it decides
//! whether the current minute matches the configured interval, deduplicates
//! against the last announced `(hour, minute)`, resolves the clip for the
//! current time and language, and hands the path to the audio port.
//!
//! A missing clip or a failed playback degrades to a silent tick — no error
//! here is fatal, and the engine never asks the tick source to stop.

pub mod assets;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::audio::AudioOutput;
use crate::clock::Clock;
use crate::settings::SharedSettings;

pub struct Announcer {
    settings: SharedSettings,
    clock: Box<dyn Clock>,
    audio: Box<dyn AudioOutput>,
    assets_dir: PathBuf,
    /// Last `(hour, minute)` actually played; `None` = never announced.
    last_played: Option<(u8, u8)>,
}

impl Announcer {
    pub fn new(
        settings: SharedSettings,
        clock: Box<dyn Clock>,
        audio: Box<dyn AudioOutput>,
        assets_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            settings,
            clock,
            audio,
            assets_dir: assets_dir.into(),
            last_played: None,
        }
    }

    /// One scheduler tick. Plays the announcement for the current time if
    /// the minute matches the interval and this `(hour, minute)` has not
    /// already been announced.
    ///
    /// Always returns `true`: the tick source must keep running even while
    /// muted, so un-muting never requires a restart.
    pub fn check_and_announce(&mut self) -> bool {
        let (interval, muted) = {
            let settings = self.settings.lock();
            (settings.interval_minutes(), settings.muted())
        };

        if muted {
            return true;
        }

        let now = self.clock.now();

        // interval=15 → :00 :15 :30 :45, interval=30 → :00 :30, interval=60 → :00.
        // interval=0 never matches rather than dividing by zero.
        if interval == 0 || u32::from(now.minute) % interval != 0 {
            return true;
        }

        // Debounce: the tick source can fire twice inside the same minute
        // boundary when it drifts slightly against wall-clock rollover.
        if self.last_played == Some((now.hour, now.minute)) {
            return true;
        }

        self.last_played = Some((now.hour, now.minute));
        self.resolve_and_play(now.hour, now.minute);
        true
    }

    /// Play the announcement for the current time immediately, bypassing
    /// both the interval check and the debounce. Manual-verification hook
    /// for the tray menu.
    pub fn force_announce(&mut self) {
        let now = self.clock.now();
        self.resolve_and_play(now.hour, now.minute);
    }

    /// Clear the debounce tracker so the next matching tick plays even if it
    /// lands on a minute that was already announced. Called after a live
    /// interval change so the new cadence takes effect immediately.
    pub fn reset_debounce(&mut self) {
        self.last_played = None;
    }

    /// Stop any in-flight playback. Part of the shutdown path.
    pub fn stop_playback(&self) {
        self.audio.stop();
    }

    fn resolve_and_play(&self, hour: u8, minute: u8) {
        let language = self.settings.lock().language().to_string();

        let Some(path) = assets::resolve_clip(&self.assets_dir, &language, hour, minute) else {
            warn!(
                "no clip {} ({language}) under {}",
                assets::clip_name(hour, minute),
                self.assets_dir.display()
            );
            return;
        };

        info!(
            "announcing {} ({language}): {}",
            assets::clip_name(hour, minute),
            path.display()
        );
        if let Err(e) = self.audio.play(&path) {
            // No retry: the next scheduled tick is the natural retry point.
            warn!("playback failed for {} ({e})", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::WallTime;
    use crate::error::Result;
    use crate::settings::{Settings, SettingsStore};
    use parking_lot::Mutex;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Scriptable clock: tests set the time, the announcer reads it.
    #[derive(Clone)]
    struct ScriptedClock(Arc<Mutex<WallTime>>);

    impl ScriptedClock {
        fn at(hour: u8, minute: u8) -> Self {
            Self(Arc::new(Mutex::new(WallTime::new(hour, minute))))
        }

        fn set(&self, hour: u8, minute: u8) {
            *self.0.lock() = WallTime::new(hour, minute);
        }
    }

    impl Clock for ScriptedClock {
        fn now(&self) -> WallTime {
            *self.0.lock()
        }
    }

    /// Records every play call instead of touching an audio device.
    #[derive(Clone, Default)]
    struct RecordingOutput {
        played: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl AudioOutput for RecordingOutput {
        fn play(&self, path: &Path) -> Result<()> {
            self.played.lock().push(path.to_path_buf());
            Ok(())
        }

        fn stop(&self) {}
    }

    fn shared(settings: Settings) -> SharedSettings {
        Arc::new(Mutex::new(SettingsStore::with_settings(
            "unused.json",
            settings,
        )))
    }

    fn write_clip(assets: &Path, language: &str, name: &str) {
        let dir = assets.join("audio").join(language);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), b"clip").unwrap();
    }

    fn announcer_with(
        settings: Settings,
        clock: ScriptedClock,
        assets: &Path,
    ) -> (Announcer, RecordingOutput) {
        let output = RecordingOutput::default();
        let announcer = Announcer::new(
            shared(settings),
            Box::new(clock),
            Box::new(output.clone()),
            assets,
        );
        (announcer, output)
    }

    #[test]
    fn plays_only_on_interval_minutes() {
        let dir = TempDir::new().unwrap();
        for name in ["09_00.ogg", "09_15.ogg", "09_30.ogg", "09_45.ogg"] {
            write_clip(dir.path(), "en", name);
        }

        for (interval, expected_plays) in [(15u32, 4usize), (30, 2), (60, 1)] {
            let clock = ScriptedClock::at(9, 0);
            let (mut announcer, output) = announcer_with(
                Settings {
                    interval,
                    ..Settings::default()
                },
                clock.clone(),
                dir.path(),
            );

            for minute in 0..60 {
                clock.set(9, minute);
                assert!(announcer.check_and_announce());
            }
            assert_eq!(
                output.played.lock().len(),
                expected_plays,
                "interval={interval}"
            );
        }
    }

    #[test]
    fn duplicate_tick_in_same_minute_plays_once() {
        let dir = TempDir::new().unwrap();
        write_clip(dir.path(), "en", "02_00.ogg");

        let clock = ScriptedClock::at(14, 0);
        let (mut announcer, output) =
            announcer_with(Settings::default(), clock, dir.path());

        announcer.check_and_announce();
        announcer.check_and_announce();
        assert_eq!(output.played.lock().len(), 1);
    }

    #[test]
    fn reset_debounce_allows_replay_of_same_minute() {
        let dir = TempDir::new().unwrap();
        write_clip(dir.path(), "en", "02_00.ogg");

        let clock = ScriptedClock::at(14, 0);
        let (mut announcer, output) =
            announcer_with(Settings::default(), clock, dir.path());

        announcer.check_and_announce();
        announcer.reset_debounce();
        announcer.check_and_announce();
        assert_eq!(output.played.lock().len(), 2);
    }

    #[test]
    fn muted_skips_playback_and_keeps_ticking() {
        let dir = TempDir::new().unwrap();
        write_clip(dir.path(), "en", "02_00.ogg");

        let clock = ScriptedClock::at(14, 0);
        let (mut announcer, output) = announcer_with(
            Settings {
                muted: true,
                ..Settings::default()
            },
            clock,
            dir.path(),
        );

        assert!(announcer.check_and_announce());
        assert!(output.played.lock().is_empty());
        // Debounce untouched while muted: un-muting in the same minute plays.
        announcer.settings.lock().set_muted(false, false);
        announcer.check_and_announce();
        assert_eq!(output.played.lock().len(), 1);
    }

    #[test]
    fn missing_clip_is_a_silent_tick() {
        let dir = TempDir::new().unwrap();

        let clock = ScriptedClock::at(14, 0);
        let (mut announcer, output) =
            announcer_with(Settings::default(), clock, dir.path());

        assert!(announcer.check_and_announce());
        assert!(output.played.lock().is_empty());
    }

    #[test]
    fn force_announce_bypasses_interval_and_debounce() {
        let dir = TempDir::new().unwrap();
        write_clip(dir.path(), "en", "02_07.ogg");

        // 14:07 never matches any supported interval
        let clock = ScriptedClock::at(14, 7);
        let (mut announcer, output) =
            announcer_with(Settings::default(), clock, dir.path());

        announcer.check_and_announce();
        assert!(output.played.lock().is_empty());

        announcer.force_announce();
        announcer.force_announce();
        assert_eq!(output.played.lock().len(), 2);
    }

    #[test]
    fn language_selects_asset_subdirectory() {
        let dir = TempDir::new().unwrap();
        write_clip(dir.path(), "bn", "02_00.ogg");

        let clock = ScriptedClock::at(14, 0);
        let (mut announcer, output) = announcer_with(
            Settings {
                language: "bn".into(),
                ..Settings::default()
            },
            clock,
            dir.path(),
        );

        announcer.check_and_announce();
        let played = output.played.lock();
        assert_eq!(played.len(), 1);
        assert!(played[0].to_string_lossy().contains("bn"));
    }

    #[test]
    fn zero_interval_never_matches() {
        let dir = TempDir::new().unwrap();
        write_clip(dir.path(), "en", "02_00.ogg");

        let clock = ScriptedClock::at(14, 0);
        let (mut announcer, output) = announcer_with(
            Settings {
                interval: 0,
                ..Settings::default()
            },
            clock,
            dir.path(),
        );

        assert!(announcer.check_and_announce());
        assert!(output.played.lock().is_empty());
    }

    #[test]
    fn playback_failure_does_not_propagate() {
        struct FailingOutput;

        impl AudioOutput for FailingOutput {
            fn play(&self, path: &Path) -> Result<()> {
                Err(crate::error::VoiceClockError::Playback {
                    path: path.to_path_buf(),
                })
            }

            fn stop(&self) {}
        }

        let dir = TempDir::new().unwrap();
        write_clip(dir.path(), "en", "02_00.ogg");

        let clock = ScriptedClock::at(14, 0);
        let mut announcer = Announcer::new(
            shared(Settings::default()),
            Box::new(clock),
            Box::new(FailingOutput),
            dir.path(),
        );

        assert!(announcer.check_and_announce());
        // Debounce recorded despite the failure — no retry this minute
        assert_eq!(announcer.last_played, Some((14, 0)));
    }
}
