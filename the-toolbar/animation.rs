use std::time::Duration;

use serde::{
  Deserialize,
  Serialize,
};

/// Animation configuration presets for the toolbar
pub mod presets {
  use super::*;

  /// Toolbar pop-in (150ms, slight overshoot)
  pub const TOOLBAR: Transition = Transition {
    duration: Duration::from_millis(150),
    easing:   Easing::CubicBezier(0.3, 1.2, 0.2, 1.0),
  };
}

/// Easing functions for the toolbar transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
  /// Linear interpolation (no easing)
  Linear,
  /// Ease in (slow start)
  EaseIn,
  /// Ease out (slow end)
  EaseOut,
  /// Ease in and out (slow start and end)
  EaseInOut,
  /// Cubic ease out
  EaseOutCubic,
  /// CSS `cubic-bezier(x1, y1, x2, y2)`
  CubicBezier(f32, f32, f32, f32),
}

impl Easing {
  /// Apply the easing function to a linear time value (0.0 to 1.0)
  pub fn apply(self, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match self {
      Easing::Linear => t,
      Easing::EaseIn => t * t,
      Easing::EaseOut => t * (2.0 - t),
      Easing::EaseInOut => {
        if t < 0.5 {
          2.0 * t * t
        } else {
          -1.0 + (4.0 - 2.0 * t) * t
        }
      },
      Easing::EaseOutCubic => {
        let t = t - 1.0;
        t * t * t + 1.0
      },
      Easing::CubicBezier(x1, y1, x2, y2) => {
        let s = solve_bezier_x(t, x1, x2);
        bezier(s, y1, y2)
      },
    }
  }

  /// CSS timing function keyword or expression.
  pub fn to_css(self) -> String {
    match self {
      Easing::Linear => "linear".to_string(),
      Easing::EaseIn => "ease-in".to_string(),
      Easing::EaseOut => "ease-out".to_string(),
      Easing::EaseInOut => "ease-in-out".to_string(),
      Easing::EaseOutCubic => "cubic-bezier(.33,1,.68,1)".to_string(),
      Easing::CubicBezier(x1, y1, x2, y2) => {
        format!(
          "cubic-bezier({},{},{},{})",
          css_number(x1),
          css_number(y1),
          css_number(x2),
          css_number(y2)
        )
      },
    }
  }
}

/// One coordinate of a bezier curve anchored at 0 and 1.
fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
  let inv = 1.0 - s;
  3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
  let inv = 1.0 - s;
  3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Curve parameter whose x coordinate is `x`. Newton steps first, bisection
/// when the slope flattens out.
fn solve_bezier_x(x: f32, x1: f32, x2: f32) -> f32 {
  let mut s = x;
  for _ in 0..8 {
    let err = bezier(s, x1, x2) - x;
    if err.abs() < 1e-5 {
      return s;
    }
    let slope = bezier_slope(s, x1, x2);
    if slope.abs() < 1e-6 {
      break;
    }
    s -= err / slope;
  }

  let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
  s = x;
  for _ in 0..32 {
    let value = bezier(s, x1, x2);
    if (value - x).abs() < 1e-5 {
      break;
    }
    if value < x {
      lo = s;
    } else {
      hi = s;
    }
    s = (lo + hi) / 2.0;
  }
  s
}

/// Shortest CSS spelling: `0.3` becomes `.3`, `1.0` becomes `1`.
fn css_number(value: f32) -> String {
  let text = format!("{}", (value * 1000.0).round() / 1000.0);
  match text.strip_prefix("0.") {
    Some(rest) => format!(".{rest}"),
    None => {
      match text.strip_prefix("-0.") {
        Some(rest) => format!("-.{rest}"),
        None => text,
      }
    },
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
  pub duration: Duration,
  pub easing:   Easing,
}

impl Transition {
  /// CSS `transition` value for `property`.
  pub fn to_css(&self, property: &str) -> String {
    let secs = self.duration.as_secs_f64();
    format!("{property} {secs}s {}", self.easing.to_css())
  }
}
