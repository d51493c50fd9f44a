use serde::{
  Deserialize,
  Serialize,
};

use crate::geometry::Rect;

/// Where the toolbar sits, relative to its anchor's top-left corner.
/// Coordinates only exist while the toolbar is open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ToolbarPosition {
  #[default]
  Closed,
  Open {
    top:  f64,
    left: f64,
  },
}

impl ToolbarPosition {
  /// Open above `selection`, horizontally centered on it. `lift` is
  /// subtracted from the top offset; pass zero to leave the lift to the
  /// rendering surface.
  pub fn above_selection(selection: Rect, relative: Rect, lift: f64) -> Self {
    ToolbarPosition::Open {
      top:  (selection.top - relative.top) - lift,
      left: selection.center_x() - relative.left,
    }
  }

  pub fn is_open(&self) -> bool {
    matches!(self, ToolbarPosition::Open { .. })
  }

  /// `(top, left)` while open.
  pub fn coords(&self) -> Option<(f64, f64)> {
    match *self {
      ToolbarPosition::Open { top, left } => Some((top, left)),
      ToolbarPosition::Closed => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  quickcheck::quickcheck! {
      fn left_is_centered_on_the_selection(offset: i32, width: u16, anchor: i32) -> bool {
          let anchor_left = anchor as f64;
          let selection = Rect::new(0.0, anchor_left + offset as f64, width as f64, 10.0);
          let relative = Rect::new(0.0, anchor_left, 500.0, 500.0);
          let expected = offset as f64 + width as f64 / 2.0;
          ToolbarPosition::above_selection(selection, relative, 0.0).coords()
              == Some((0.0, expected))
      }
  }

  #[test]
  fn positioned_anchor_scenario() {
    let selection = Rect::new(150.0, 140.0, 40.0, 20.0);
    let anchor = Rect::new(100.0, 100.0, 300.0, 300.0);
    assert_eq!(
      ToolbarPosition::above_selection(selection, anchor, 0.0),
      ToolbarPosition::Open {
        top:  50.0,
        left: 60.0,
      }
    );
  }

  #[test]
  fn lift_only_moves_the_top_edge() {
    let selection = Rect::new(150.0, 140.0, 40.0, 20.0);
    assert_eq!(
      ToolbarPosition::above_selection(selection, Rect::ZERO, 44.0).coords(),
      Some((106.0, 160.0))
    );
  }

  #[test]
  fn closed_has_no_coordinates() {
    assert!(!ToolbarPosition::Closed.is_open());
    assert_eq!(ToolbarPosition::Closed.coords(), None);
    assert_eq!(ToolbarPosition::default(), ToolbarPosition::Closed);
  }
}
