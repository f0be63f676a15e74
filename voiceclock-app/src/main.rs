//! VoiceClock host binary.
//!
//! Wires the announcement engine to the system clock, the rodio audio
//! output, and a once-per-minute tick loop, then waits for Ctrl-C.
//! Tray and settings front-ends are separate surfaces that operate on the
//! same shared settings record and the engine's control hooks.

mod paths;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::info;
use voiceclock_core::{
    Announcer, RodioOutput, SettingsStore, SharedSettings, SystemClock, VoiceClockError,
};

/// Nominal scheduler cadence. The announcer debounces on (hour, minute), so
/// drift against wall-clock rollover is harmless.
const TICK_SECONDS: u64 = 60;

/// First check runs shortly after startup in case the app launches at XX:00
/// exactly.
const INITIAL_CHECK_DELAY_SECONDS: u64 = 1;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Tracing ───────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voiceclock=info,voiceclock_core=info".parse().unwrap()),
        )
        .init();

    info!("VoiceClock starting");

    let settings_path = paths::default_settings_path();
    let assets_dir = paths::assets_dir();
    let settings: SharedSettings = Arc::new(Mutex::new(SettingsStore::load(&settings_path)));
    {
        let s = settings.lock();
        info!(
            settings_path = %settings_path.display(),
            assets_dir = %assets_dir.display(),
            language = %s.language(),
            interval = s.interval_minutes(),
            muted = s.muted(),
            "settings loaded"
        );
    }

    // ── Scheduler setup ───────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));

    // The rodio output stream is !Send, so it is created inside the blocking
    // task and lives on the tick thread. A sync channel propagates any
    // open-device error back to main.
    let (open_tx, open_rx) = std::sync::mpsc::channel::<Result<(), VoiceClockError>>();
    let tick_settings = Arc::clone(&settings);
    let tick_running = Arc::clone(&running);
    let ticker = tokio::task::spawn_blocking(move || {
        let audio = match RodioOutput::new() {
            Ok(audio) => {
                let _ = open_tx.send(Ok(()));
                audio
            }
            Err(e) => {
                let _ = open_tx.send(Err(e));
                return;
            }
        };

        let mut announcer = Announcer::new(
            tick_settings,
            Box::new(SystemClock),
            Box::new(audio),
            assets_dir,
        );
        run_tick_loop(&mut announcer, &tick_running);

        // Shutdown: cut any in-flight clip; the output stream drops with the
        // announcer, releasing the device on this thread.
        announcer.stop_playback();
    });

    match open_rx.recv() {
        Ok(Ok(())) => info!("scheduler running, checking every {TICK_SECONDS} s"),
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => anyhow::bail!("tick thread died during startup"),
    }

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    running.store(false, Ordering::SeqCst);
    ticker.await?;
    info!("VoiceClock stopped");
    Ok(())
}

/// Drive the announcer at the nominal cadence, polling the running flag every
/// second so shutdown stays prompt.
fn run_tick_loop(announcer: &mut Announcer, running: &AtomicBool) {
    let mut until_next_check = INITIAL_CHECK_DELAY_SECONDS;
    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_secs(1));
        until_next_check = until_next_check.saturating_sub(1);
        if until_next_check == 0 {
            if !announcer.check_and_announce() {
                break;
            }
            until_next_check = TICK_SECONDS;
        }
    }
}
