//! Host-side plumbing shared between an editor and its floating toolbar: a
//! keyed publish/subscribe store and a one-tick deferral scheduler.

pub mod store;
pub mod tick;

pub use store::{
  GET_EDITOR_STATE,
  Getter,
  Handler,
  IS_VISIBLE,
  Item,
  SET_EDITOR_STATE,
  Setter,
  Store,
  StoreError,
  SubscriptionId,
};
pub use tick::{
  Scheduler,
  Task,
  TickQueue,
  TokioScheduler,
};
