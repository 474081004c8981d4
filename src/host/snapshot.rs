//! File-backed host that replays screen state from a JSON snapshot.
//!
//! The file is re-read on every query, so editing it while a watcher runs is
//! picked up on the next check. Flipping `fullscreen` in the file undoes an
//! earlier exit, so the host can enter fullscreen again. Layout:
//!
//! ```json
//! {
//!   "screen":   { "width": 1920, "height": 1080, "availWidth": 1920, "availHeight": 1040, "availTop": 0, "availLeft": 0 },
//!   "fullscreen": true,
//!   "windowed": { "width": 1920, "height": 1080, "availWidth": 1920, "availHeight": 1040, "availTop": 40, "availLeft": 0 }
//! }
//! ```
//!
//! `windowed` is the screen reported once fullscreen has been exited. Without
//! it, exiting fullscreen is unsupported.

use futures_util::future::{self, BoxFuture, FutureExt};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use super::{FullscreenControl, FullscreenError, RawScreen, ScreenMetrics};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub screen: RawScreen,
    #[serde(default)]
    pub fullscreen: bool,
    pub windowed: Option<RawScreen>,
}

pub struct SnapshotHost {
    path: PathBuf,
    exited: AtomicBool,
    /// `fullscreen` as of the last successful load.
    last_fullscreen: AtomicBool,
    load_failed: AtomicBool,
}

impl SnapshotHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exited: AtomicBool::new(false),
            last_fullscreen: AtomicBool::new(false),
            load_failed: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the snapshot, or an empty one when the file is missing or broken.
    ///
    /// An empty snapshot reads as an all-unknown frame, which is what a host
    /// without a screen would report.
    pub fn load(&self) -> Snapshot {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                self.report_failure(format_args!("Failed to read snapshot {:?}: {}", self.path, e));
                return Snapshot::default();
            }
        };
        let snapshot: Snapshot = match serde_json::from_str(&contents) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.report_failure(format_args!("Failed to parse snapshot {:?}: {}", self.path, e));
                return Snapshot::default();
            }
        };

        if self.load_failed.swap(false, Ordering::SeqCst) {
            log::info!("Snapshot {:?} is readable again", self.path);
        }
        if self.last_fullscreen.swap(snapshot.fullscreen, Ordering::SeqCst) != snapshot.fullscreen
            && self.exited.swap(false, Ordering::SeqCst)
        {
            log::debug!("Snapshot fullscreen flag changed, dropping earlier exit");
        }
        snapshot
    }

    /// Warns on the first failure in a row; repeats only show at debug level.
    fn report_failure(&self, message: std::fmt::Arguments<'_>) {
        if self.load_failed.swap(true, Ordering::SeqCst) {
            log::debug!("{}", message);
        } else {
            log::warn!("{}", message);
        }
    }
}

impl ScreenMetrics for SnapshotHost {
    fn screen(&self) -> RawScreen {
        let snapshot = self.load();
        match snapshot.windowed {
            Some(windowed) if self.exited.load(Ordering::SeqCst) => windowed,
            _ => snapshot.screen,
        }
    }
}

impl FullscreenControl for SnapshotHost {
    fn has_fullscreen_element(&self) -> bool {
        self.load().fullscreen && !self.exited.load(Ordering::SeqCst)
    }

    fn exit_fullscreen(&self) -> BoxFuture<'_, Result<(), FullscreenError>> {
        let outcome = if self.load().windowed.is_some() {
            self.exited.store(true, Ordering::SeqCst);
            Ok(())
        } else {
            Err(FullscreenError::Unsupported)
        };
        future::ready(outcome).boxed()
    }
}
