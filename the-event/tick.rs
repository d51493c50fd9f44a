//! Utilities for deferring work until the current event-loop turn completes

use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::runtime::Handle;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Defers a task by one scheduler tick. Implementations must never run the
/// task synchronously from inside `defer`.
pub trait Scheduler: Send + Sync + 'static {
  fn defer(&self, task: Task);
}

/// Deterministic single-threaded tick loop. The host calls
/// [`TickQueue::run_tick`] once per turn of its event loop.
#[derive(Default)]
pub struct TickQueue {
  pending: Mutex<VecDeque<Task>>,
}

impl TickQueue {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn pending(&self) -> usize {
    self.pending.lock().len()
  }

  /// Run every task queued before this call. Tasks deferred while the tick
  /// runs are left for the next tick. Returns the number of tasks run.
  pub fn run_tick(&self) -> usize {
    let batch = std::mem::take(&mut *self.pending.lock());
    let count = batch.len();
    for task in batch {
      task();
    }
    count
  }

  /// Keep ticking until the queue is drained, up to `max_ticks`.
  pub fn run_until_idle(&self, max_ticks: usize) -> usize {
    let mut total = 0;
    for _ in 0..max_ticks {
      let ran = self.run_tick();
      if ran == 0 {
        break;
      }
      total += ran;
    }
    total
  }
}

impl Scheduler for TickQueue {
  fn defer(&self, task: Task) {
    self.pending.lock().push_back(task);
  }
}

/// Zero-delay deferral on a tokio runtime: the spawned task yields once
/// before running so the triggering turn finishes first.
#[derive(Clone)]
pub struct TokioScheduler {
  handle: Handle,
}

impl TokioScheduler {
  pub fn new(handle: Handle) -> Self {
    Self { handle }
  }

  /// Only available inside a runtime, so unrelated unit tests don't have to
  /// spawn one.
  pub fn current() -> Option<Self> {
    Handle::try_current().ok().map(Self::new)
  }
}

impl Scheduler for TokioScheduler {
  fn defer(&self, task: Task) {
    self.handle.spawn(async move {
      tokio::task::yield_now().await;
      task();
    });
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{
      AtomicUsize,
      Ordering,
    },
  };

  use super::*;

  #[test]
  fn deferred_task_waits_for_the_next_tick() {
    let queue = TickQueue::new();
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = hits.clone();
    queue.defer(Box::new(move || {
      counter.fetch_add(1, Ordering::SeqCst);
    }));

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(queue.pending(), 1);
    assert_eq!(queue.run_tick(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(queue.run_tick(), 0);
  }

  #[test]
  fn tasks_deferred_during_a_tick_run_on_the_following_one() {
    let queue = Arc::new(TickQueue::new());
    let order = Arc::new(Mutex::new(Vec::new()));

    let inner_queue = queue.clone();
    let inner_order = order.clone();
    queue.defer(Box::new(move || {
      inner_order.lock().push("outer");
      let nested = inner_order.clone();
      inner_queue.defer(Box::new(move || nested.lock().push("nested")));
    }));

    assert_eq!(queue.run_tick(), 1);
    assert_eq!(*order.lock(), vec!["outer"]);
    assert_eq!(queue.run_until_idle(8), 1);
    assert_eq!(*order.lock(), vec!["outer", "nested"]);
  }

  #[test]
  fn tokio_scheduler_is_unavailable_outside_a_runtime() {
    assert!(TokioScheduler::current().is_none());
  }

  #[tokio::test]
  async fn tokio_scheduler_runs_after_the_current_turn() {
    let scheduler = TokioScheduler::current().expect("inside runtime");
    let (tx, rx) = tokio::sync::oneshot::channel();
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = hits.clone();
    scheduler.defer(Box::new(move || {
      counter.fetch_add(1, Ordering::SeqCst);
      let _ = tx.send(());
    }));
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    rx.await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }
}
