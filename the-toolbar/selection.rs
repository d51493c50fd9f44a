//! Selection geometry supplied by the host text-editing environment.

use parking_lot::Mutex;

use crate::geometry::Rect;

pub trait SelectionQuery: Send + Sync + 'static {
  /// Bounding box of the current non-collapsed selection in viewport
  /// coordinates, or `None` when the selection is collapsed or absent.
  fn visible_selection_rect(&self) -> Option<Rect>;
}

impl<F> SelectionQuery for F
where
  F: Fn() -> Option<Rect> + Send + Sync + 'static,
{
  fn visible_selection_rect(&self) -> Option<Rect> {
    self()
  }
}

/// Selection geometry pushed by the host from its own event loop.
#[derive(Debug, Default)]
pub struct SelectionSlot {
  rect: Mutex<Option<Rect>>,
}

impl SelectionSlot {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&self, rect: Rect) {
    *self.rect.lock() = Some(rect);
  }

  pub fn clear(&self) {
    *self.rect.lock() = None;
  }
}

impl SelectionQuery for SelectionSlot {
  fn visible_selection_rect(&self) -> Option<Rect> {
    *self.rect.lock()
  }
}

/// Last selection rectangle seen. A missing reading never clears it, so a
/// toolbar reopened without a new selection keeps its anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectionCache {
  last: Option<Rect>,
}

impl SelectionCache {
  pub fn last(&self) -> Option<Rect> {
    self.last
  }

  pub fn resolve(&mut self, fresh: Option<Rect>) -> Option<Rect> {
    if let Some(rect) = fresh {
      self.last = Some(rect);
    }
    self.last
  }
}
