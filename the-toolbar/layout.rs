//! Layout queries the toolbar needs from its host document.
//!
//! The controller never touches a real DOM. Hosts implement [`LayoutQuery`]
//! over whatever element tree they have; [`LayoutTree`] is a self-contained
//! implementation for hosts that lay out their own nodes.

use std::{
  fmt::Debug,
  str::FromStr,
};

use parking_lot::RwLock;
use serde::{
  Deserialize,
  Serialize,
};
use slotmap::{
  HopSlotMap,
  new_key_type,
};

use crate::geometry::Rect;

/// Computed value of the CSS `position` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPosition {
  #[default]
  Static,
  Relative,
  Absolute,
  Fixed,
  Sticky,
}

impl LayoutPosition {
  /// Positioned elements establish the coordinate origin for absolutely
  /// positioned descendants.
  pub fn is_positioned(self) -> bool {
    self != LayoutPosition::Static
  }

  pub fn as_str(self) -> &'static str {
    match self {
      LayoutPosition::Static => "static",
      LayoutPosition::Relative => "relative",
      LayoutPosition::Absolute => "absolute",
      LayoutPosition::Fixed => "fixed",
      LayoutPosition::Sticky => "sticky",
    }
  }
}

impl FromStr for LayoutPosition {
  type Err = std::convert::Infallible;

  /// Unknown keywords fall back to `static`, the property's initial value.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(match s.trim().to_ascii_lowercase().as_str() {
      "relative" => LayoutPosition::Relative,
      "absolute" => LayoutPosition::Absolute,
      "fixed" => LayoutPosition::Fixed,
      "sticky" | "-webkit-sticky" => LayoutPosition::Sticky,
      _ => LayoutPosition::Static,
    })
  }
}

pub trait LayoutQuery: Send + Sync + 'static {
  type Node: Copy + Eq + Debug + Send + Sync + 'static;

  fn parent(&self, node: Self::Node) -> Option<Self::Node>;

  fn position(&self, node: Self::Node) -> LayoutPosition;

  /// Bounding rectangle in viewport coordinates.
  fn bounding_rect(&self, node: Self::Node) -> Rect;

  /// Bounding rectangle of the document body in viewport coordinates.
  fn body_rect(&self) -> Rect;
}

/// Lets a host keep mutating its layout while the controller holds it.
impl<L: LayoutQuery> LayoutQuery for RwLock<L> {
  type Node = L::Node;

  fn parent(&self, node: Self::Node) -> Option<Self::Node> {
    self.read().parent(node)
  }

  fn position(&self, node: Self::Node) -> LayoutPosition {
    self.read().position(node)
  }

  fn bounding_rect(&self, node: Self::Node) -> Rect {
    self.read().bounding_rect(node)
  }

  fn body_rect(&self) -> Rect {
    self.read().body_rect()
  }
}

new_key_type! {
  pub struct NodeId;
}

#[derive(Debug, Clone)]
struct LayoutNode {
  parent:   Option<NodeId>,
  position: LayoutPosition,
  rect:     Rect,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
  nodes: HopSlotMap<NodeId, LayoutNode>,
  body:  Rect,
}

impl LayoutTree {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_body_rect(body: Rect) -> Self {
    Self {
      nodes: HopSlotMap::with_key(),
      body,
    }
  }

  pub fn insert_root(&mut self, position: LayoutPosition, rect: Rect) -> NodeId {
    self.nodes.insert(LayoutNode {
      parent: None,
      position,
      rect,
    })
  }

  /// Returns `None` if `parent` is not in the tree.
  pub fn insert_child(&mut self, parent: NodeId, position: LayoutPosition, rect: Rect) -> Option<NodeId> {
    if !self.nodes.contains_key(parent) {
      return None;
    }
    Some(self.nodes.insert(LayoutNode {
      parent: Some(parent),
      position,
      rect,
    }))
  }

  /// Removes `node`; its children become roots.
  pub fn remove(&mut self, node: NodeId) -> bool {
    if self.nodes.remove(node).is_none() {
      return false;
    }
    for (_, child) in self.nodes.iter_mut() {
      if child.parent == Some(node) {
        child.parent = None;
      }
    }
    true
  }

  pub fn set_position(&mut self, node: NodeId, position: LayoutPosition) -> bool {
    match self.nodes.get_mut(node) {
      Some(entry) => {
        entry.position = position;
        true
      },
      None => false,
    }
  }

  pub fn set_rect(&mut self, node: NodeId, rect: Rect) -> bool {
    match self.nodes.get_mut(node) {
      Some(entry) => {
        entry.rect = rect;
        true
      },
      None => false,
    }
  }

  pub fn set_body_rect(&mut self, body: Rect) {
    self.body = body;
  }

  pub fn contains(&self, node: NodeId) -> bool {
    self.nodes.contains_key(node)
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }
}

impl LayoutQuery for LayoutTree {
  type Node = NodeId;

  fn parent(&self, node: NodeId) -> Option<NodeId> {
    self.nodes.get(node).and_then(|entry| entry.parent)
  }

  fn position(&self, node: NodeId) -> LayoutPosition {
    self
      .nodes
      .get(node)
      .map(|entry| entry.position)
      .unwrap_or_default()
  }

  fn bounding_rect(&self, node: NodeId) -> Rect {
    self
      .nodes
      .get(node)
      .map(|entry| entry.rect)
      .unwrap_or_default()
  }

  fn body_rect(&self) -> Rect {
    self.body
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_css_keywords() {
    assert_eq!(LayoutPosition::from_str("relative"), Ok(LayoutPosition::Relative));
    assert_eq!(LayoutPosition::from_str(" Absolute "), Ok(LayoutPosition::Absolute));
    assert_eq!(LayoutPosition::from_str("-webkit-sticky"), Ok(LayoutPosition::Sticky));
    assert_eq!(LayoutPosition::from_str("static"), Ok(LayoutPosition::Static));
    assert_eq!(LayoutPosition::from_str("inherit"), Ok(LayoutPosition::Static));
    assert!(!LayoutPosition::Static.is_positioned());
    assert!(LayoutPosition::Fixed.is_positioned());
  }

  #[test]
  fn removing_a_node_detaches_its_children() {
    let mut tree = LayoutTree::new();
    let root = tree.insert_root(LayoutPosition::Relative, Rect::ZERO);
    let child = tree
      .insert_child(root, LayoutPosition::Static, Rect::ZERO)
      .unwrap();

    assert_eq!(tree.parent(child), Some(root));
    assert!(tree.remove(root));
    assert!(!tree.remove(root));
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.insert_child(root, LayoutPosition::Static, Rect::ZERO), None);
    assert_eq!(tree.len(), 1);
  }
}
