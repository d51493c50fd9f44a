use serde::{
  Deserialize,
  Serialize,
};

/// Rectangle in CSS pixels. Depending on where it came from, the origin is
/// the viewport or an anchor's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
  pub top:    f64,
  pub left:   f64,
  pub width:  f64,
  pub height: f64,
}

impl Rect {
  pub const ZERO: Self = Self {
    top:    0.0,
    left:   0.0,
    width:  0.0,
    height: 0.0,
  };

  pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
    Self {
      top,
      left,
      width,
      height,
    }
  }

  pub fn center_x(&self) -> f64 {
    self.left + self.width / 2.0
  }
}
