//! Render contract between the positioning controller and whatever draws the
//! toolbar.
//!
//! A surface receives the committed [`ToolbarPosition`], the theme and a
//! [`NodeRef`] it (or the host mounting its output) fills with the toolbar's
//! real layout node. The controller reads that node's ancestors to find the
//! coordinate origin.

use std::{
  fmt,
  sync::Arc,
};

use parking_lot::Mutex;
use serde::Serialize;

use crate::{
  animation::Transition,
  config::ToolbarConfig,
  position::ToolbarPosition,
  theme::Theme,
};

/// Shared slot for the toolbar's mounted layout node.
pub struct NodeRef<N> {
  node: Arc<Mutex<Option<N>>>,
}

impl<N> Clone for NodeRef<N> {
  fn clone(&self) -> Self {
    Self {
      node: self.node.clone(),
    }
  }
}

impl<N> Default for NodeRef<N> {
  fn default() -> Self {
    Self {
      node: Arc::new(Mutex::new(None)),
    }
  }
}

impl<N: fmt::Debug> fmt::Debug for NodeRef<N> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("NodeRef").field(&*self.node.lock()).finish()
  }
}

impl<N: Copy> NodeRef<N> {
  pub fn set(&self, node: N) {
    *self.node.lock() = Some(node);
  }

  pub fn clear(&self) {
    *self.node.lock() = None;
  }

  pub fn get(&self) -> Option<N> {
    *self.node.lock()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
  pub translate_x_percent: f64,
  pub translate_y_px:      f64,
  pub scale:               f64,
}

impl Transform {
  pub fn to_css(&self) -> String {
    if self.translate_y_px == 0.0 {
      format!("translate({}%) scale({})", self.translate_x_percent, self.scale)
    } else {
      format!(
        "translate({}%, {}px) scale({})",
        self.translate_x_percent, self.translate_y_px, self.scale
      )
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameStyle {
  pub top:        Option<f64>,
  pub left:       Option<f64>,
  pub transform:  Transform,
  pub transition: Option<Transition>,
}

impl FrameStyle {
  /// Inline CSS declaration list.
  pub fn to_css(&self) -> String {
    let mut decls = Vec::with_capacity(4);
    if let Some(top) = self.top {
      decls.push(format!("top: {top}px"));
    }
    if let Some(left) = self.left {
      decls.push(format!("left: {left}px"));
    }
    decls.push(format!("transform: {}", self.transform.to_css()));
    if let Some(transition) = &self.transition {
      decls.push(format!("transition: {}", transition.to_css("transform")));
    }
    decls.join("; ")
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolbarFrame {
  pub class:    String,
  pub style:    FrameStyle,
  pub children: Vec<ToolbarNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonNode {
  pub wrapper_class: String,
  pub class:         String,
  pub label:         String,
  pub command:       String,
  pub active:        bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ToolbarNode {
  Toolbar(ToolbarFrame),
  Button(ButtonNode),
}

impl ToolbarNode {
  pub fn as_toolbar(&self) -> Option<&ToolbarFrame> {
    match self {
      ToolbarNode::Toolbar(frame) => Some(frame),
      ToolbarNode::Button(_) => None,
    }
  }

  pub fn as_button(&self) -> Option<&ButtonNode> {
    match self {
      ToolbarNode::Button(button) => Some(button),
      ToolbarNode::Toolbar(_) => None,
    }
  }
}

pub struct SurfaceProps<'a, N> {
  pub position: ToolbarPosition,
  pub theme:    &'a Theme,
  pub config:   &'a ToolbarConfig,
  pub node_ref: &'a NodeRef<N>,
}

pub trait ToolbarSurface<N>: Send + Sync {
  fn render(&self, props: SurfaceProps<'_, N>, children: Vec<ToolbarNode>) -> ToolbarNode;
}

/// Scales the toolbar to nothing while closed; while open, centers it
/// horizontally on its coordinates, lifts it above the selection and eases
/// the scale in.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSurface;

impl<N> ToolbarSurface<N> for DefaultSurface {
  fn render(&self, props: SurfaceProps<'_, N>, children: Vec<ToolbarNode>) -> ToolbarNode {
    let style = match props.position {
      ToolbarPosition::Open { top, left } => {
        FrameStyle {
          top:        Some(top),
          left:       Some(left),
          transform:  Transform {
            translate_x_percent: -50.0,
            translate_y_px:      -props.config.render_lift(),
            scale:               1.0,
          },
          transition: Some(props.config.transition()),
        }
      },
      ToolbarPosition::Closed => {
        FrameStyle {
          top:        None,
          left:       None,
          transform:  Transform {
            translate_x_percent: -50.0,
            translate_y_px:      0.0,
            scale:               0.0,
          },
          transition: None,
        }
      },
    };

    ToolbarNode::Toolbar(ToolbarFrame {
      class: props.theme.toolbar_styles.toolbar.clone(),
      style,
      children,
    })
  }
}
