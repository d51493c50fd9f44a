//! Keyed publish/subscribe registry bridging editor state to its overlays.

use std::{
  fmt,
  sync::{
    Arc,
    atomic::{
      AtomicU64,
      Ordering,
    },
  },
};

use foldhash::fast::RandomState;
use hashbrown::HashMap;
use parking_lot::Mutex;
use smallvec::SmallVec;
use thiserror::Error;

/// Whether a non-collapsed selection is currently active.
pub const IS_VISIBLE: &str = "isVisible";
/// Accessor returning the current editor state.
pub const GET_EDITOR_STATE: &str = "getEditorState";
/// Accessor replacing the editor state.
pub const SET_EDITOR_STATE: &str = "setEditorState";

pub type Getter<S> = Arc<dyn Fn() -> S + Send + Sync>;
pub type Setter<S> = Arc<dyn Fn(S) + Send + Sync>;
pub type Handler<S> = Arc<dyn Fn(&Item<S>) + Send + Sync>;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
  #[error("store item `{key}` is not set")]
  Missing { key: &'static str },
  #[error("store item `{key}` is not a {expected}")]
  WrongKind {
    key:      &'static str,
    expected: &'static str,
  },
}

/// A value held by the store.
pub enum Item<S> {
  Flag(bool),
  Getter(Getter<S>),
  Setter(Setter<S>),
}

impl<S> Item<S> {
  pub fn as_flag(&self) -> Option<bool> {
    match self {
      Item::Flag(flag) => Some(*flag),
      _ => None,
    }
  }

  fn kind(&self) -> &'static str {
    match self {
      Item::Flag(_) => "flag",
      Item::Getter(_) => "getter",
      Item::Setter(_) => "setter",
    }
  }
}

impl<S> Clone for Item<S> {
  fn clone(&self) -> Self {
    match self {
      Item::Flag(flag) => Item::Flag(*flag),
      Item::Getter(getter) => Item::Getter(getter.clone()),
      Item::Setter(setter) => Item::Setter(setter.clone()),
    }
  }
}

impl<S> fmt::Debug for Item<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Item::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
      other => f.write_str(other.kind()),
    }
  }
}

/// Identifies one handler registered with [`Store::subscribe_to_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Subscribers<S> = SmallVec<[(SubscriptionId, Handler<S>); 2]>;

struct Registry<S> {
  items:       HashMap<&'static str, Item<S>, RandomState>,
  subscribers: HashMap<&'static str, Subscribers<S>, RandomState>,
}

pub struct Store<S> {
  registry: Mutex<Registry<S>>,
  next_id:  AtomicU64,
}

impl<S> Default for Store<S> {
  fn default() -> Self {
    Self::new()
  }
}

impl<S> Store<S> {
  pub fn new() -> Self {
    Self {
      registry: Mutex::new(Registry {
        items:       HashMap::default(),
        subscribers: HashMap::default(),
      }),
      next_id:  AtomicU64::new(1),
    }
  }

  pub fn subscribe_to_item(&self, key: &'static str, handler: Handler<S>) -> SubscriptionId {
    let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
    self
      .registry
      .lock()
      .subscribers
      .entry(key)
      .or_default()
      .push((id, handler));
    log::trace!("subscribed {id:?} to `{key}`");
    id
  }

  /// Returns false if `id` was not subscribed to `key`.
  pub fn unsubscribe_from_item(&self, key: &'static str, id: SubscriptionId) -> bool {
    let mut registry = self.registry.lock();
    let Some(subscribers) = registry.subscribers.get_mut(key) else {
      return false;
    };
    let before = subscribers.len();
    subscribers.retain(|(sub, _)| *sub != id);
    let removed = subscribers.len() != before;
    if subscribers.is_empty() {
      registry.subscribers.remove(key);
    }
    if removed {
      log::trace!("unsubscribed {id:?} from `{key}`");
    }
    removed
  }

  pub fn subscriber_count(&self, key: &str) -> usize {
    self
      .registry
      .lock()
      .subscribers
      .get(key)
      .map_or(0, |subscribers| subscribers.len())
  }

  pub fn get_item(&self, key: &str) -> Option<Item<S>> {
    self.registry.lock().items.get(key).cloned()
  }

  /// Store `item` under `key` and notify the key's subscribers in
  /// subscription order.
  pub fn update_item(&self, key: &'static str, item: Item<S>) {
    let handlers: Subscribers<S> = {
      let mut registry = self.registry.lock();
      registry.items.insert(key, item.clone());
      registry
        .subscribers
        .get(key)
        .cloned()
        .unwrap_or_default()
    };

    // The lock is released so handlers may subscribe or unsubscribe.
    for (_, handler) in handlers {
      handler(&item);
    }
  }

  pub fn flag(&self, key: &'static str) -> Result<bool> {
    match self.get_item(key) {
      Some(Item::Flag(flag)) => Ok(flag),
      Some(_) => Err(StoreError::WrongKind { key, expected: "flag" }),
      None => Err(StoreError::Missing { key }),
    }
  }

  pub fn getter(&self, key: &'static str) -> Result<Getter<S>> {
    match self.get_item(key) {
      Some(Item::Getter(getter)) => Ok(getter),
      Some(_) => {
        Err(StoreError::WrongKind {
          key,
          expected: "getter",
        })
      },
      None => Err(StoreError::Missing { key }),
    }
  }

  pub fn setter(&self, key: &'static str) -> Result<Setter<S>> {
    match self.get_item(key) {
      Some(Item::Setter(setter)) => Ok(setter),
      Some(_) => {
        Err(StoreError::WrongKind {
          key,
          expected: "setter",
        })
      },
      None => Err(StoreError::Missing { key }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn recorder(store: &Store<u32>, key: &'static str) -> (SubscriptionId, Arc<Mutex<Vec<bool>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let id = store.subscribe_to_item(
      key,
      Arc::new(move |item: &Item<u32>| {
        if let Some(flag) = item.as_flag() {
          sink.lock().push(flag);
        }
      }),
    );
    (id, seen)
  }

  #[test]
  fn notifies_subscribers_of_the_updated_key_only() {
    let store = Store::new();
    let (_, visible) = recorder(&store, IS_VISIBLE);
    let (_, other) = recorder(&store, "other");

    store.update_item(IS_VISIBLE, Item::Flag(true));
    store.update_item(IS_VISIBLE, Item::Flag(false));

    assert_eq!(*visible.lock(), vec![true, false]);
    assert!(other.lock().is_empty());
    assert_eq!(store.flag(IS_VISIBLE), Ok(false));
  }

  #[test]
  fn unsubscribed_handler_is_not_called() {
    let store = Store::new();
    let (id, seen) = recorder(&store, IS_VISIBLE);

    assert!(store.unsubscribe_from_item(IS_VISIBLE, id));
    assert!(!store.unsubscribe_from_item(IS_VISIBLE, id));
    assert_eq!(store.subscriber_count(IS_VISIBLE), 0);

    store.update_item(IS_VISIBLE, Item::Flag(true));
    assert!(seen.lock().is_empty());
  }

  #[test]
  fn handler_may_unsubscribe_itself() {
    let store = Arc::new(Store::<u32>::new());
    let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
    let calls = Arc::new(AtomicU64::new(0));

    let id = {
      let store_ref = Arc::downgrade(&store);
      let slot = slot.clone();
      let calls = calls.clone();
      store.subscribe_to_item(
        IS_VISIBLE,
        Arc::new(move |_: &Item<u32>| {
          calls.fetch_add(1, Ordering::SeqCst);
          if let (Some(store), Some(id)) = (store_ref.upgrade(), *slot.lock()) {
            store.unsubscribe_from_item(IS_VISIBLE, id);
          }
        }),
      )
    };
    *slot.lock() = Some(id);

    store.update_item(IS_VISIBLE, Item::Flag(true));
    store.update_item(IS_VISIBLE, Item::Flag(false));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn typed_accessors_report_missing_and_wrong_kind() {
    let store = Store::<u32>::new();
    assert_eq!(
      store.getter(GET_EDITOR_STATE).err(),
      Some(StoreError::Missing {
        key: GET_EDITOR_STATE,
      })
    );

    store.update_item(GET_EDITOR_STATE, Item::Flag(true));
    assert_eq!(
      store.getter(GET_EDITOR_STATE).err(),
      Some(StoreError::WrongKind {
        key:      GET_EDITOR_STATE,
        expected: "getter",
      })
    );

    store.update_item(GET_EDITOR_STATE, Item::Getter(Arc::new(|| 7)));
    let getter = store.getter(GET_EDITOR_STATE).unwrap();
    assert_eq!(getter(), 7);
  }
}
