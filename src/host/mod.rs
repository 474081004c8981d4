//! Seams to the host environment that owns the real screen.
//!
//! The measurement and fullscreen APIs live outside this crate. Hosts
//! implement [`ScreenMetrics`] and [`FullscreenControl`]; everything else is
//! written against those two traits.

pub mod snapshot;

pub use snapshot::SnapshotHost;

use async_channel::{Receiver, Sender};
use futures_util::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Raw screen fields exactly as the host reported them.
///
/// Values are kept untyped: some environments report dimensions as strings
/// or leave them null, and that has to survive until the frame is derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScreen {
    #[serde(default)]
    pub width: Value,
    #[serde(default)]
    pub height: Value,
    #[serde(default)]
    pub avail_width: Value,
    #[serde(default)]
    pub avail_height: Value,
    #[serde(default)]
    pub avail_top: Value,
    #[serde(default)]
    pub avail_left: Value,
}

impl RawScreen {
    /// Builds a well-typed screen from plain numbers.
    pub fn from_numbers(
        width: f64,
        height: f64,
        avail_width: f64,
        avail_height: f64,
        avail_top: f64,
        avail_left: f64,
    ) -> Self {
        Self {
            width: Value::from(width),
            height: Value::from(height),
            avail_width: Value::from(avail_width),
            avail_height: Value::from(avail_height),
            avail_top: Value::from(avail_top),
            avail_left: Value::from(avail_left),
        }
    }
}

/// Source of screen measurements.
pub trait ScreenMetrics: Send + Sync {
    fn screen(&self) -> RawScreen;
}

/// Programmatic fullscreen state of the host.
pub trait FullscreenControl: Send + Sync {
    /// Whether some element is currently in programmatic fullscreen.
    fn has_fullscreen_element(&self) -> bool;

    /// Leaves fullscreen. Resolves once the host reports completion.
    fn exit_fullscreen(&self) -> BoxFuture<'_, Result<(), FullscreenError>>;
}

/// Why leaving fullscreen did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullscreenError {
    /// The host has no way to exit fullscreen.
    Unsupported,
    /// The host refused or failed the request.
    Rejected(String),
    /// The completion signal was dropped before it fired.
    Abandoned,
}

impl fmt::Display for FullscreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FullscreenError::Unsupported => write!(f, "exiting fullscreen is not supported"),
            FullscreenError::Rejected(reason) => write!(f, "exit fullscreen rejected: {}", reason),
            FullscreenError::Abandoned => write!(f, "exit fullscreen completion was dropped"),
        }
    }
}

impl std::error::Error for FullscreenError {}

/// Completing half of [`exit_signal`]. Hand it to whatever callback the host
/// fires when the fullscreen transition ends.
#[derive(Debug, Clone)]
pub struct ExitNotifier {
    tx: Sender<Result<(), FullscreenError>>,
}

impl ExitNotifier {
    /// Reports the outcome. Only the first call has any effect.
    pub fn complete(&self, outcome: Result<(), FullscreenError>) {
        let _ = self.tx.try_send(outcome);
    }
}

/// Creates a one-shot completion pair for callback-driven hosts.
///
/// The returned future resolves with whatever the notifier reports, or with
/// [`FullscreenError::Abandoned`] if every notifier is dropped first.
pub fn exit_signal() -> (
    ExitNotifier,
    BoxFuture<'static, Result<(), FullscreenError>>,
) {
    let (tx, rx): (_, Receiver<Result<(), FullscreenError>>) = async_channel::bounded(1);
    let completion = async move { rx.recv().await.unwrap_or(Err(FullscreenError::Abandoned)) };
    (ExitNotifier { tx }, completion.boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_screen_reads_browser_field_names() {
        let raw: RawScreen = serde_json::from_value(json!({
            "width": 1920,
            "height": 1080,
            "availWidth": "1920",
            "availHeight": 1040,
            "availTop": 0,
        }))
        .unwrap();
        assert_eq!(raw.width, json!(1920));
        assert_eq!(raw.avail_width, json!("1920"));
        assert_eq!(raw.avail_left, Value::Null);
    }

    #[test]
    fn exit_signal_delivers_first_outcome() {
        let (notifier, completion) = exit_signal();
        let remote = notifier.clone();
        std::thread::spawn(move || {
            remote.complete(Ok(()));
            remote.complete(Err(FullscreenError::Unsupported));
        })
        .join()
        .unwrap();
        assert_eq!(pollster::block_on(completion), Ok(()));
        drop(notifier);
    }

    #[test]
    fn exit_signal_reports_abandoned_when_dropped() {
        let (notifier, completion) = exit_signal();
        drop(notifier);
        assert_eq!(
            pollster::block_on(completion),
            Err(FullscreenError::Abandoned)
        );
    }

    #[test]
    fn fullscreen_error_messages() {
        assert_eq!(
            FullscreenError::Rejected("denied".into()).to_string(),
            "exit fullscreen rejected: denied"
        );
    }
}
