//! Available screen frame measurement.
//!
//! The frame is the inset between a display's full area and the area left to
//! application windows (taskbars, docks, menu bars), reported per side as
//! `(top, right, bottom, left)`. Hosts sometimes report it as all zeros, as
//! strings, or zero it while in programmatic fullscreen. This crate reads it
//! anyway:
//!
//! - [`watcher`] polls in the background until a trustworthy frame shows up
//!   and keeps it as a backup;
//! - [`resolver`] picks the live frame, the backup, or the frame after leaving
//!   fullscreen, in that order, and rounds away sub-pixel jitter.
//!
//! [`ScreenFrame`] bundles both behind `watch`, `available_frame` and
//! `rounded_available_frame`.

pub mod config;
pub mod frame;
pub mod host;
pub mod numeric;
pub mod resolver;
mod screen_frame;
pub mod watcher;

pub use config::FrameOptions;
pub use frame::{is_frame_null, read_current_frame, FrameSize, Side};
pub use host::{FullscreenControl, FullscreenError, RawScreen, ScreenMetrics};
pub use resolver::{get_available_frame, get_rounded_available_frame, ROUNDING_PRECISION};
pub use screen_frame::ScreenFrame;
pub use watcher::{start_watching, stop_watching, WatcherState, WATCH_INTERVAL};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
