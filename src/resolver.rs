//! Fallback chain that turns a flaky live reading into a usable frame.

use crate::frame::{is_frame_null, read_current_frame, FrameSize};
use crate::host::{FullscreenControl, ScreenMetrics};
use crate::numeric::round;
use crate::watcher::WatcherState;

/// Default rounding base: sides snap to the nearest multiple of 10.
pub const ROUNDING_PRECISION: f64 = 10.0;

/// Returns the best frame the host can currently give.
///
/// In order: the live frame when it is not null, the watcher's backup, the
/// frame read after leaving programmatic fullscreen, and finally the null
/// live frame. Each step runs at most once.
pub async fn get_available_frame<H>(host: &H, state: &WatcherState) -> FrameSize
where
    H: ScreenMetrics + FullscreenControl + ?Sized,
{
    let frame = read_current_frame(host);
    if !is_frame_null(&frame) {
        return frame;
    }

    if let Some(backup) = state.backup() {
        log::debug!("Live screen frame is null, using backup {}", backup);
        return backup;
    }

    if host.has_fullscreen_element() {
        // Some hosts zero the frame while in programmatic fullscreen.
        log::debug!("Live screen frame is null in fullscreen, exiting fullscreen");
        if let Err(e) = host.exit_fullscreen().await {
            log::warn!("Could not exit fullscreen: {}", e);
        }
        return read_current_frame(host);
    }

    frame
}

/// [`get_available_frame`] with every known side rounded to `precision`.
///
/// Available screen size sometimes moves by a pixel for no visible reason
/// (1900x1440 then 1900x1439), so neighbouring readings are folded together.
pub async fn get_rounded_available_frame<H>(
    host: &H,
    state: &WatcherState,
    precision: f64,
) -> FrameSize
where
    H: ScreenMetrics + FullscreenControl + ?Sized,
{
    round_frame(get_available_frame(host, state).await, precision)
}

/// Rounds known sides; unknown sides stay unknown.
pub fn round_frame(frame: FrameSize, precision: f64) -> FrameSize {
    frame.map_known(|side| round(side, precision))
}
