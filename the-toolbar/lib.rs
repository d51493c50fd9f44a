//! Floating inline toolbar for rich-text editors.
//!
//! The toolbar opens above the current text selection whenever the host's
//! store reports a non-collapsed selection, and closes otherwise. All access
//! to the host document goes through injected capabilities
//! ([`LayoutQuery`], [`SelectionQuery`], [`Scheduler`]), so the positioning
//! logic runs the same against a browser DOM, a native layout tree or test
//! fakes.

pub mod anchor;
pub mod animation;
pub mod buttons;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod position;
pub mod selection;
pub mod surface;
pub mod theme;

pub use anchor::{
  relative_rect,
  resolve_anchor,
};
pub use buttons::{
  ButtonProps,
  InlineStyleButton,
  InlineStyleState,
  ToolbarButton,
};
pub use config::{
  OffsetMode,
  ToolbarConfig,
};
pub use controller::{
  ToolbarBuilder,
  ToolbarController,
};
pub use error::{
  Result,
  ToolbarError,
};
pub use geometry::Rect;
pub use layout::{
  LayoutPosition,
  LayoutQuery,
  LayoutTree,
  NodeId,
};
pub use position::ToolbarPosition;
pub use selection::{
  SelectionQuery,
  SelectionSlot,
};
pub use surface::{
  DefaultSurface,
  NodeRef,
  SurfaceProps,
  ToolbarNode,
  ToolbarSurface,
};
pub use the_toolbar_event::{
  Scheduler,
  Store,
  TickQueue,
  TokioScheduler,
};
pub use theme::Theme;
