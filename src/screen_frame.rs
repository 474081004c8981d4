use std::sync::Arc;

use crate::config::FrameOptions;
use crate::frame::FrameSize;
use crate::host::{FullscreenControl, ScreenMetrics};
use crate::resolver::{get_available_frame, get_rounded_available_frame};
use crate::watcher::{start_watching, stop_watching, WatcherState};

/// Host, watcher state and options bundled behind the three public calls.
pub struct ScreenFrame<H: ?Sized> {
    host: Arc<H>,
    state: Arc<WatcherState>,
    options: FrameOptions,
}

impl<H> ScreenFrame<H>
where
    H: ScreenMetrics + FullscreenControl + 'static,
{
    /// Uses the process-wide watcher state and default options.
    pub fn new(host: H) -> Self {
        Self::with_state(Arc::new(host), WatcherState::shared(), FrameOptions::default())
    }
}

impl<H> ScreenFrame<H>
where
    H: ScreenMetrics + FullscreenControl + ?Sized + 'static,
{
    pub fn with_state(host: Arc<H>, state: Arc<WatcherState>, options: FrameOptions) -> Self {
        Self {
            host,
            state,
            options,
        }
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn state(&self) -> &Arc<WatcherState> {
        &self.state
    }

    pub fn options(&self) -> FrameOptions {
        self.options
    }

    /// Starts background capture of a backup frame. Does nothing if the
    /// state has already been watched.
    pub fn watch(&self) {
        start_watching(Arc::clone(&self.host), &self.state, self.options.watch_interval);
    }

    pub fn stop_watching(&self) {
        stop_watching(&self.state);
    }

    pub fn backup(&self) -> Option<FrameSize> {
        self.state.backup()
    }

    pub async fn available_frame(&self) -> FrameSize {
        get_available_frame(&*self.host, &self.state).await
    }

    pub async fn rounded_available_frame(&self) -> FrameSize {
        get_rounded_available_frame(&*self.host, &self.state, self.options.rounding_precision)
            .await
    }
}
