//! Available screen frame: the per-side inset between the full display area
//! and the area left over for application windows.

pub mod reader;

pub use reader::{is_frame_null, read_current_frame};

use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of the screen frame, in CSS order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    fn index(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Right => 1,
            Side::Bottom => 2,
            Side::Left => 3,
        }
    }
}

/// Frame insets as `(top, right, bottom, left)`.
///
/// `None` marks a side whose value could not be measured. It is not the same
/// as a measured `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameSize(pub [Option<f64>; 4]);

impl FrameSize {
    pub fn new(
        top: Option<f64>,
        right: Option<f64>,
        bottom: Option<f64>,
        left: Option<f64>,
    ) -> Self {
        Self([top, right, bottom, left])
    }

    /// A frame where every side is known.
    pub fn from_sides(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self::new(Some(top), Some(right), Some(bottom), Some(left))
    }

    pub fn unknown() -> Self {
        Self([None; 4])
    }

    pub fn side(&self, side: Side) -> Option<f64> {
        self.0[side.index()]
    }

    pub fn top(&self) -> Option<f64> {
        self.side(Side::Top)
    }

    pub fn right(&self) -> Option<f64> {
        self.side(Side::Right)
    }

    pub fn bottom(&self) -> Option<f64> {
        self.side(Side::Bottom)
    }

    pub fn left(&self) -> Option<f64> {
        self.side(Side::Left)
    }

    /// Applies `f` to every known side, leaving unknown sides untouched.
    pub fn map_known(self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self(self.0.map(|side| side.map(&mut f)))
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, side) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match side {
                Some(v) => write!(f, "{}", v)?,
                None => write!(f, "null")?,
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides_are_positional() {
        let frame = FrameSize::new(Some(1.0), Some(2.0), None, Some(4.0));
        assert_eq!(frame.top(), Some(1.0));
        assert_eq!(frame.right(), Some(2.0));
        assert_eq!(frame.bottom(), None);
        assert_eq!(frame.left(), Some(4.0));
        let collected: Vec<_> = Side::ALL.iter().map(|&s| frame.side(s)).collect();
        assert_eq!(collected, frame.0.to_vec());
    }

    #[test]
    fn map_known_skips_unknown_sides() {
        let frame = FrameSize::new(Some(1.0), None, Some(3.0), None);
        let doubled = frame.map_known(|v| v * 2.0);
        assert_eq!(doubled, FrameSize::new(Some(2.0), None, Some(6.0), None));
    }

    #[test]
    fn serializes_as_json_array_with_nulls() {
        let frame = FrameSize::new(Some(0.0), Some(40.0), None, Some(-5.5));
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(json, "[0.0,40.0,null,-5.5]");
        let back: FrameSize = serde_json::from_str("[0,40,null,-5.5]").unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn display_matches_json_layout() {
        let frame = FrameSize::new(Some(0.0), None, Some(40.0), Some(0.0));
        assert_eq!(frame.to_string(), "[0, null, 40, 0]");
    }
}
