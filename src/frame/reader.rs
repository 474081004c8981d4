use super::FrameSize;
use crate::host::{RawScreen, ScreenMetrics};
use crate::numeric::{finite, to_float};

/// Reads the current frame from the host.
pub fn read_current_frame<M: ScreenMetrics + ?Sized>(metrics: &M) -> FrameSize {
    frame_from_raw(&metrics.screen())
}

/// Derives frame insets from raw screen fields.
///
/// Unreadable fields become NaN, which spreads to every side computed from
/// them; those sides come back as `None`.
pub fn frame_from_raw(raw: &RawScreen) -> FrameSize {
    let avail_top = to_float(&raw.avail_top);
    let avail_left = to_float(&raw.avail_left);

    FrameSize::new(
        finite(avail_top),
        finite(to_float(&raw.width) - to_float(&raw.avail_width) - avail_left),
        finite(to_float(&raw.height) - to_float(&raw.avail_height) - avail_top),
        finite(avail_left),
    )
}

/// True when no side carries a usable value.
///
/// A measured zero counts the same as unknown: hosts that zero the frame for
/// no reason are far more common than windows genuinely flush to every edge.
pub fn is_frame_null(frame: &FrameSize) -> bool {
    frame.0.iter().all(|side| side.map_or(true, |v| v == 0.0))
}
