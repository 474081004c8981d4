//! Background capture of the first trustworthy screen frame.
//!
//! Some hosts report an all-zero frame for a while (fullscreen, a taskbar
//! that has not settled yet, anti-fingerprinting plugins) and recover later.
//! The watcher polls until it sees a non-null frame, stores it as the backup
//! and stops. The backup is written once and never replaced.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::frame::{is_frame_null, read_current_frame, FrameSize};
use crate::host::ScreenMetrics;

/// Default delay between two checks.
pub const WATCH_INTERVAL: Duration = Duration::from_millis(2500);

/// Backup frame plus the schedule that fills it.
///
/// Only the watcher writes the backup. Readers go through [`OnceLock`] and
/// never take the schedule lock.
pub struct WatcherState {
    backup: OnceLock<FrameSize>,
    schedule: Mutex<Schedule>,
    checks: AtomicU64,
}

enum Schedule {
    Idle,
    Running(WatchHandle),
    Finished,
}

struct WatchHandle {
    stop: Sender<()>,
    thread: JoinHandle<()>,
}

impl Default for WatcherState {
    fn default() -> Self {
        Self::new()
    }
}

impl WatcherState {
    pub fn new() -> Self {
        Self {
            backup: OnceLock::new(),
            schedule: Mutex::new(Schedule::Idle),
            checks: AtomicU64::new(0),
        }
    }

    /// State that already holds `backup`, as if a capture had happened.
    ///
    /// Its schedule is finished, so it never polls.
    pub fn with_backup(backup: FrameSize) -> Self {
        let state = Self::new();
        let _ = state.backup.set(backup);
        *state.schedule() = Schedule::Finished;
        state
    }

    /// Process-wide state, created on first use.
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<WatcherState>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(WatcherState::new())))
    }

    /// The captured frame, if the watcher has seen one yet.
    pub fn backup(&self) -> Option<FrameSize> {
        self.backup.get().copied()
    }

    /// Whether a schedule is currently polling the host.
    pub fn is_watching(&self) -> bool {
        matches!(*self.schedule(), Schedule::Running(_))
    }

    /// Number of checks the schedule has run so far.
    pub fn checks(&self) -> u64 {
        self.checks.load(Ordering::SeqCst)
    }

    fn schedule(&self) -> MutexGuard<'_, Schedule> {
        self.schedule.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drops the running handle once the backup is in place.
    fn finish(&self) {
        let mut schedule = self.schedule();
        if matches!(*schedule, Schedule::Running(_)) {
            *schedule = Schedule::Finished;
        }
    }
}

/// Starts polling `metrics` every `interval` until a non-null frame shows up.
///
/// Idempotent: a state gets at most one schedule in its lifetime, so calling
/// this while running, after a capture, or after [`stop_watching`] does
/// nothing. The first check runs one interval after the call.
pub fn start_watching<M>(metrics: Arc<M>, state: &Arc<WatcherState>, interval: Duration)
where
    M: ScreenMetrics + ?Sized + 'static,
{
    let mut schedule = state.schedule();
    if !matches!(*schedule, Schedule::Idle) {
        return;
    }

    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let thread_state = Arc::clone(state);

    let spawned = std::thread::Builder::new()
        .name("screenframe-watch".to_string())
        .spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("Screen frame watcher stopped");
                    return;
                }
            }

            let check = thread_state.checks.fetch_add(1, Ordering::SeqCst) + 1;
            let frame = read_current_frame(&*metrics);
            if is_frame_null(&frame) {
                log::debug!("Screen frame check #{}: null frame {}", check, frame);
                continue;
            }

            if thread_state.backup.set(frame).is_ok() {
                log::info!("Captured screen frame backup {} after {} check(s)", frame, check);
            }
            thread_state.finish();
            return;
        });

    match spawned {
        Ok(thread) => {
            log::info!("Screen frame watcher started (interval={:?})", interval);
            *schedule = Schedule::Running(WatchHandle {
                stop: stop_tx,
                thread,
            });
        }
        Err(e) => {
            log::error!("Failed to spawn screen frame watcher: {}", e);
        }
    }
}

/// Cancels a running schedule and waits for its thread to exit.
///
/// The backup, if any, is kept. The state will not start watching again.
pub fn stop_watching(state: &WatcherState) {
    let handle = {
        let mut schedule = state.schedule();
        match std::mem::replace(&mut *schedule, Schedule::Finished) {
            Schedule::Running(handle) => Some(handle),
            Schedule::Idle => None,
            Schedule::Finished => None,
        }
    };

    if let Some(handle) = handle {
        let _ = handle.stop.send(());
        if handle.thread.join().is_err() {
            log::warn!("Screen frame watcher thread panicked");
        }
        log::info!("Screen frame watcher cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RawScreen;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    const FAST: Duration = Duration::from_millis(10);

    /// Returns a zeroed screen for the first `zero_reads` reads, then a
    /// screen with a 40px bottom taskbar.
    struct FlakyScreen {
        reads: AtomicUsize,
        zero_reads: usize,
    }

    impl FlakyScreen {
        fn new(zero_reads: usize) -> Self {
            Self {
                reads: AtomicUsize::new(0),
                zero_reads,
            }
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl ScreenMetrics for FlakyScreen {
        fn screen(&self) -> RawScreen {
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            if n < self.zero_reads {
                RawScreen::from_numbers(1920.0, 1080.0, 1920.0, 1080.0, 0.0, 0.0)
            } else {
                RawScreen::from_numbers(1920.0, 1080.0, 1920.0, 1040.0, 0.0, 0.0)
            }
        }
    }

    fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        condition()
    }

    #[test]
    fn captures_first_good_frame_and_stops() {
        let screen = Arc::new(FlakyScreen::new(3));
        let state = Arc::new(WatcherState::new());

        start_watching(Arc::clone(&screen), &state, FAST);
        assert!(wait_for(|| state.backup().is_some()));
        assert!(wait_for(|| !state.is_watching()));

        assert_eq!(state.backup(), Some(FrameSize::from_sides(0.0, 0.0, 40.0, 0.0)));
        assert_eq!(state.checks(), 4);

        let reads = screen.reads();
        std::thread::sleep(FAST * 10);
        assert_eq!(screen.reads(), reads);
        assert_eq!(state.checks(), 4);
    }

    #[test]
    fn start_is_idempotent() {
        let screen = Arc::new(FlakyScreen::new(usize::MAX));
        let state = Arc::new(WatcherState::new());

        start_watching(Arc::clone(&screen), &state, Duration::from_secs(3600));
        start_watching(Arc::clone(&screen), &state, FAST);
        assert!(state.is_watching());

        // The second call would have polled within a few milliseconds.
        std::thread::sleep(FAST * 5);
        assert_eq!(state.checks(), 0);

        stop_watching(&state);
        assert!(!state.is_watching());
    }

    #[test]
    fn keeps_polling_while_frame_is_null() {
        let screen = Arc::new(FlakyScreen::new(usize::MAX));
        let state = Arc::new(WatcherState::new());

        start_watching(Arc::clone(&screen), &state, FAST);
        assert!(wait_for(|| state.checks() >= 5));
        assert!(state.is_watching());
        assert_eq!(state.backup(), None);

        stop_watching(&state);
    }

    #[test]
    fn stop_prevents_further_checks_and_restart() {
        let screen = Arc::new(FlakyScreen::new(usize::MAX));
        let state = Arc::new(WatcherState::new());

        start_watching(Arc::clone(&screen), &state, FAST);
        assert!(wait_for(|| state.checks() >= 1));
        stop_watching(&state);

        let checks = state.checks();
        std::thread::sleep(FAST * 5);
        assert_eq!(state.checks(), checks);

        start_watching(Arc::clone(&screen), &state, FAST);
        assert!(!state.is_watching());
    }

    #[test]
    fn backup_survives_stop() {
        let screen = Arc::new(FlakyScreen::new(0));
        let state = Arc::new(WatcherState::new());

        start_watching(Arc::clone(&screen), &state, FAST);
        assert!(wait_for(|| state.backup().is_some()));
        stop_watching(&state);
        assert_eq!(state.backup(), Some(FrameSize::from_sides(0.0, 0.0, 40.0, 0.0)));
    }

    #[test]
    fn stop_without_start_is_harmless() {
        let state = WatcherState::new();
        stop_watching(&state);
        assert!(!state.is_watching());
        assert_eq!(state.backup(), None);
    }

    #[test]
    fn preloaded_backup_never_polls() {
        let screen = Arc::new(FlakyScreen::new(0));
        let state = Arc::new(WatcherState::with_backup(FrameSize::from_sides(1.0, 2.0, 3.0, 4.0)));
        start_watching(Arc::clone(&screen), &state, FAST);
        assert!(!state.is_watching());
        std::thread::sleep(FAST * 3);
        assert_eq!(screen.reads(), 0);
        assert_eq!(state.backup(), Some(FrameSize::from_sides(1.0, 2.0, 3.0, 4.0)));
    }

    #[test]
    fn shared_state_is_a_singleton() {
        assert!(Arc::ptr_eq(&WatcherState::shared(), &WatcherState::shared()));
    }
}
