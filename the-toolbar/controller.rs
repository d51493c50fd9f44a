//! Positions the inline toolbar above the current selection.
//!
//! The controller subscribes to the store's `isVisible` flag. Every change is
//! handled one scheduler tick later, once the host has finished processing
//! the triggering event and the live selection geometry is accurate. The new
//! [`ToolbarPosition`] and the selection cache are then committed together.
//!
//! A mount owns exactly one store subscription and a liveness flag. Deferred
//! work captured before an unmount checks that flag and commits nothing.

use std::sync::{
  Arc,
  Weak,
  atomic::{
    AtomicBool,
    Ordering,
  },
};

use parking_lot::Mutex;
use the_toolbar_event::{
  GET_EDITOR_STATE,
  Handler,
  IS_VISIBLE,
  Item,
  SET_EDITOR_STATE,
  Scheduler,
  Store,
  SubscriptionId,
};

use crate::{
  anchor,
  buttons::{
    ButtonProps,
    ToolbarButton,
  },
  config::ToolbarConfig,
  error::{
    Result,
    ToolbarError,
  },
  geometry::Rect,
  layout::LayoutQuery,
  position::ToolbarPosition,
  selection::{
    SelectionCache,
    SelectionQuery,
  },
  surface::{
    DefaultSurface,
    NodeRef,
    SurfaceProps,
    ToolbarNode,
    ToolbarSurface,
  },
  theme::Theme,
};

pub type CommitHook = Arc<dyn Fn(ToolbarPosition) + Send + Sync>;

#[derive(Debug, Clone, Copy, Default)]
struct ToolbarState {
  is_visible: bool,
  position:   ToolbarPosition,
  selection:  SelectionCache,
  commits:    u64,
}

/// Everything a deferred recomputation needs, shared with store handlers.
struct Shared<L: LayoutQuery> {
  layout:      Arc<L>,
  selection:   Arc<dyn SelectionQuery>,
  node_ref:    NodeRef<L::Node>,
  config:      ToolbarConfig,
  state:       Mutex<ToolbarState>,
  commit_hook: Option<CommitHook>,
}

impl<L: LayoutQuery> Shared<L> {
  fn schedule(this: &Arc<Self>, scheduler: &dyn Scheduler, alive: Arc<AtomicBool>, is_visible: bool) {
    let shared: Weak<Self> = Arc::downgrade(this);
    scheduler.defer(Box::new(move || {
      if !alive.load(Ordering::Acquire) {
        log::debug!("toolbar unmounted before visibility change ({is_visible}) was applied");
        return;
      }
      if let Some(shared) = shared.upgrade() {
        shared.apply_visibility(is_visible, &alive);
      }
    }));
  }

  fn apply_visibility(&self, is_visible: bool, alive: &AtomicBool) {
    // Layout and selection are read before taking the state lock.
    let reading = is_visible.then(|| {
      let relative = anchor::relative_rect(&*self.layout, self.node_ref.get());
      (relative, self.selection.visible_selection_rect())
    });

    let position = {
      let mut state = self.state.lock();
      // `unmount` clears the flag under this lock.
      if !alive.load(Ordering::Acquire) {
        log::debug!("toolbar unmounted while visibility change ({is_visible}) was computed");
        return;
      }
      let position = match reading {
        Some((relative, fresh)) => {
          match state.selection.resolve(fresh) {
            Some(selection) => {
              ToolbarPosition::above_selection(selection, relative, self.config.store_lift())
            },
            None => {
              log::warn!("no selection to anchor the toolbar to, keeping it closed");
              ToolbarPosition::Closed
            },
          }
        },
        None => ToolbarPosition::Closed,
      };
      state.is_visible = is_visible;
      state.position = position;
      state.commits += 1;
      position
    };

    log::debug!("toolbar position committed: {position:?}");
    if let Some(hook) = &self.commit_hook {
      hook(position);
    }
  }
}

struct Mount {
  id:    SubscriptionId,
  alive: Arc<AtomicBool>,
}

pub struct ToolbarController<S, L: LayoutQuery> {
  store:     Arc<Store<S>>,
  shared:    Arc<Shared<L>>,
  scheduler: Arc<dyn Scheduler>,
  surface:   Arc<dyn ToolbarSurface<L::Node>>,
  structure: Vec<Arc<dyn ToolbarButton<S>>>,
  theme:     Theme,
  mount:     Option<Mount>,
}

impl<S, L: LayoutQuery> ToolbarController<S, L> {
  pub fn builder(
    store: Arc<Store<S>>,
    layout: Arc<L>,
    selection: Arc<dyn SelectionQuery>,
    scheduler: Arc<dyn Scheduler>,
  ) -> ToolbarBuilder<S, L> {
    ToolbarBuilder {
      store,
      layout,
      selection,
      scheduler,
      surface: None,
      structure: Vec::new(),
      theme: Theme::default(),
      config: ToolbarConfig::default(),
      commit_hook: None,
    }
  }

  pub fn is_mounted(&self) -> bool {
    self.mount.is_some()
  }

  /// Release the store subscription. Deferred recomputations still pending
  /// for this mount are dropped when they run. Returns false if the
  /// controller was not mounted.
  pub fn unmount(&mut self) -> bool {
    let Some(mount) = self.mount.take() else {
      return false;
    };
    {
      let mut state = self.shared.state.lock();
      mount.alive.store(false, Ordering::Release);
      *state = ToolbarState::default();
    }
    if !self.store.unsubscribe_from_item(IS_VISIBLE, mount.id) {
      log::warn!("toolbar subscription {:?} was already gone", mount.id);
    }
    true
  }

  /// Capture hook for the toolbar's mounted layout node.
  pub fn node_ref(&self) -> &NodeRef<L::Node> {
    &self.shared.node_ref
  }

  pub fn position(&self) -> ToolbarPosition {
    self.shared.state.lock().position
  }

  pub fn is_visible(&self) -> bool {
    self.shared.state.lock().is_visible
  }

  pub fn prev_selection(&self) -> Option<Rect> {
    self.shared.state.lock().selection.last()
  }

  /// Number of committed recomputations since mount.
  pub fn commits(&self) -> u64 {
    self.shared.state.lock().commits
  }

  pub fn config(&self) -> &ToolbarConfig {
    &self.shared.config
  }

  pub fn theme(&self) -> &Theme {
    &self.theme
  }

  /// Handle a visibility change as the store subscription would. Ignored
  /// while unmounted.
  pub fn on_visibility_changed(&self, is_visible: bool) {
    let Some(mount) = &self.mount else {
      log::debug!("ignoring visibility change ({is_visible}) on unmounted toolbar");
      return;
    };
    Shared::schedule(&self.shared, &*self.scheduler, mount.alive.clone(), is_visible);
  }

  /// Render the toolbar with one child per configured button. Store
  /// accessors are only required when there are buttons to hand them to.
  pub fn render(&self) -> Result<ToolbarNode> {
    let children = if self.structure.is_empty() {
      Vec::new()
    } else {
      let props = ButtonProps {
        theme:            &self.theme.button_styles,
        get_editor_state: self.store.getter(GET_EDITOR_STATE)?,
        set_editor_state: self.store.setter(SET_EDITOR_STATE)?,
      };
      self
        .structure
        .iter()
        .map(|button| button.render(&props))
        .collect()
    };

    let props = SurfaceProps {
      position: self.position(),
      theme:    &self.theme,
      config:   &self.shared.config,
      node_ref: &self.shared.node_ref,
    };
    Ok(self.surface.render(props, children))
  }
}

impl<S: 'static, L: LayoutQuery> ToolbarController<S, L> {
  /// Subscribe to the store's visibility flag. A controller holds at most
  /// one subscription at a time.
  pub fn mount(&mut self) -> Result<()> {
    if self.mount.is_some() {
      return Err(ToolbarError::AlreadyMounted);
    }

    *self.shared.state.lock() = ToolbarState::default();
    let alive = Arc::new(AtomicBool::new(true));
    let handler: Handler<S> = {
      let shared = Arc::downgrade(&self.shared);
      let scheduler = self.scheduler.clone();
      let alive = alive.clone();
      Arc::new(move |item: &Item<S>| {
        let Some(is_visible) = item.as_flag() else {
          log::warn!("`{IS_VISIBLE}` was set to a non-flag value: {item:?}");
          return;
        };
        if let Some(shared) = shared.upgrade() {
          Shared::schedule(&shared, &*scheduler, alive.clone(), is_visible);
        }
      })
    };

    let id = self.store.subscribe_to_item(IS_VISIBLE, handler);
    log::debug!("toolbar mounted with subscription {id:?}");
    self.mount = Some(Mount { id, alive });
    Ok(())
  }
}

impl<S, L: LayoutQuery> Drop for ToolbarController<S, L> {
  fn drop(&mut self) {
    self.unmount();
  }
}

pub struct ToolbarBuilder<S, L: LayoutQuery> {
  store:       Arc<Store<S>>,
  layout:      Arc<L>,
  selection:   Arc<dyn SelectionQuery>,
  scheduler:   Arc<dyn Scheduler>,
  surface:     Option<Arc<dyn ToolbarSurface<L::Node>>>,
  structure:   Vec<Arc<dyn ToolbarButton<S>>>,
  theme:       Theme,
  config:      ToolbarConfig,
  commit_hook: Option<CommitHook>,
}

impl<S, L: LayoutQuery> ToolbarBuilder<S, L> {
  pub fn theme(mut self, theme: Theme) -> Self {
    self.theme = theme;
    self
  }

  pub fn config(mut self, config: ToolbarConfig) -> Self {
    self.config = config;
    self
  }

  pub fn surface(mut self, surface: Arc<dyn ToolbarSurface<L::Node>>) -> Self {
    self.surface = Some(surface);
    self
  }

  pub fn button(mut self, button: Arc<dyn ToolbarButton<S>>) -> Self {
    self.structure.push(button);
    self
  }

  pub fn structure(mut self, structure: Vec<Arc<dyn ToolbarButton<S>>>) -> Self {
    self.structure = structure;
    self
  }

  /// Called after every committed recomputation, typically to schedule a
  /// re-render.
  pub fn with_commit_hook(mut self, hook: impl Fn(ToolbarPosition) + Send + Sync + 'static) -> Self {
    self.commit_hook = Some(Arc::new(hook));
    self
  }

  pub fn build(self) -> ToolbarController<S, L> {
    let surface = self
      .surface
      .unwrap_or_else(|| Arc::new(DefaultSurface) as Arc<dyn ToolbarSurface<L::Node>>);
    ToolbarController {
      store: self.store,
      shared: Arc::new(Shared {
        layout:      self.layout,
        selection:   self.selection,
        node_ref:    NodeRef::default(),
        config:      self.config,
        state:       Mutex::new(ToolbarState::default()),
        commit_hook: self.commit_hook,
      }),
      scheduler: self.scheduler,
      surface,
      structure: self.structure,
      theme: self.theme,
      mount: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use the_toolbar_event::TickQueue;

  use super::*;
  use crate::{
    layout::{
      LayoutPosition,
      LayoutTree,
    },
    selection::SelectionSlot,
  };

  fn controller(
    selection: Arc<SelectionSlot>,
    queue: Arc<TickQueue>,
  ) -> (Arc<Store<()>>, ToolbarController<(), LayoutTree>) {
    let mut tree = LayoutTree::new();
    let anchor = tree.insert_root(LayoutPosition::Relative, Rect::new(100.0, 100.0, 400.0, 400.0));
    let toolbar = tree
      .insert_child(anchor, LayoutPosition::Absolute, Rect::ZERO)
      .unwrap();
    let store = Arc::new(Store::new());
    let controller = ToolbarController::builder(store.clone(), Arc::new(tree), selection, queue).build();
    controller.node_ref().set(toolbar);
    (store, controller)
  }

  #[test]
  fn double_mount_is_rejected() {
    let (store, mut controller) = controller(Arc::new(SelectionSlot::new()), Arc::new(TickQueue::new()));
    controller.mount().unwrap();
    assert!(matches!(controller.mount(), Err(ToolbarError::AlreadyMounted)));
    assert_eq!(store.subscriber_count(IS_VISIBLE), 1);

    assert!(controller.unmount());
    assert!(!controller.unmount());
    assert_eq!(store.subscriber_count(IS_VISIBLE), 0);
  }

  #[test]
  fn dropping_the_controller_releases_its_subscription() {
    let (store, mut controller) = controller(Arc::new(SelectionSlot::new()), Arc::new(TickQueue::new()));
    controller.mount().unwrap();
    drop(controller);
    assert_eq!(store.subscriber_count(IS_VISIBLE), 0);
  }

  #[test]
  fn direct_visibility_change_is_deferred() {
    let selection = Arc::new(SelectionSlot::new());
    selection.set(Rect::new(150.0, 140.0, 40.0, 20.0));
    let queue = Arc::new(TickQueue::new());
    let (_store, mut controller) = controller(selection, queue.clone());

    controller.on_visibility_changed(true);
    assert_eq!(queue.pending(), 0);

    controller.mount().unwrap();
    controller.on_visibility_changed(true);
    assert_eq!(controller.position(), ToolbarPosition::Closed);
    assert_eq!(queue.run_tick(), 1);
    assert_eq!(controller.position(), ToolbarPosition::Open {
      top:  50.0,
      left: 60.0,
    });
    assert!(controller.is_visible());
  }

  #[test]
  fn non_flag_visibility_values_are_ignored() {
    let queue = Arc::new(TickQueue::new());
    let (store, mut controller) = controller(Arc::new(SelectionSlot::new()), queue.clone());
    controller.mount().unwrap();

    store.update_item(IS_VISIBLE, Item::Getter(Arc::new(|| ())));
    assert_eq!(queue.pending(), 0);
  }
}
