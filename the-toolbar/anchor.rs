use crate::{
  geometry::Rect,
  layout::LayoutQuery,
};

/// Walk up from `node` (inclusive) to the nearest positioned element.
/// Returns `None` when `node` is `None` or no element in the chain is
/// positioned.
pub fn resolve_anchor<L: LayoutQuery + ?Sized>(layout: &L, node: Option<L::Node>) -> Option<L::Node> {
  let mut current = node;
  while let Some(node) = current {
    if layout.position(node).is_positioned() {
      return Some(node);
    }
    current = layout.parent(node);
  }
  None
}

/// Rectangle the toolbar's coordinates are relative to: the anchor of the
/// toolbar's layout parent, or the document body when there is none.
pub fn relative_rect<L: LayoutQuery + ?Sized>(layout: &L, toolbar: Option<L::Node>) -> Rect {
  let parent = toolbar.and_then(|node| layout.parent(node));
  match resolve_anchor(layout, parent) {
    Some(anchor) => layout.bounding_rect(anchor),
    None => {
      log::trace!("no positioned ancestor for toolbar {toolbar:?}, using document body");
      layout.body_rect()
    },
  }
}
