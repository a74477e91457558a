//! Cooperative Task Tree
//!
//! A [`Task`] is a unit of timed behavior advanced once per frame. Tasks nest
//! (children run concurrently with their parent) and chain (a finished task
//! hands off to its successor). Nothing blocks: waiting is expressed as
//! elapsed-time accumulation checked on the next update.
//!
//! ```text
//!   root ──┬── child A ──▶ A.next ──▶ ...
//!          └── child B
//! ```
//!
//! The owner of a task must re-bind its handle to whatever [`Task::update`]
//! returns, since a finished task is replaced by its successor. [`TaskRunner`]
//! does that bookkeeping.

use std::fmt;

pub mod easing;
pub mod repeat;

pub use easing::EasingMove;
pub use repeat::{Container, Repeat, Wait};

// =============================================================================
// BEHAVIOR
// =============================================================================

/// Elapsed time of one task, in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TaskClock {
    elapsed_ms: f64,
}

impl TaskClock {
    /// Time accumulated since the task started (or since the last `consume`).
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed_ms
    }

    /// Remove `ms` from the accumulator. Used by periodic behaviors.
    #[inline]
    pub fn consume(&mut self, ms: f64) {
        self.elapsed_ms -= ms;
    }

    fn advance(&mut self, ms: f64) {
        self.elapsed_ms += ms;
    }
}

/// Outcome of one process step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// Keep running next frame
    Running,
    /// Completion edge reached; the task calls `done()`
    Finished,
}

/// The per-frame process step of a task.
pub trait Behavior {
    /// Inspect the clock, act, and report whether the task is complete.
    ///
    /// Called only while the task is running, once per update.
    fn process(&mut self, clock: &mut TaskClock) -> Progress;

    /// Short name for logs.
    fn name(&self) -> &'static str {
        "task"
    }
}

// =============================================================================
// TASK
// =============================================================================

/// Continuation returned by [`Task::update`].
#[derive(Debug)]
pub enum TaskStatus {
    /// Still running, or still hosting live children. Keep the same task.
    Continue,
    /// Finished; replace the held task with this successor.
    Advance(Task),
    /// Finished with nothing left to run. Drop the task.
    Done,
}

/// A node in the task tree.
pub struct Task {
    clock: TaskClock,
    running: bool,
    children: Vec<Task>,
    next: Option<Box<Task>>,
    finish_callbacks: Vec<Box<dyn FnMut()>>,
    behavior: Box<dyn Behavior>,
}

impl Task {
    /// Create a running task around a behavior.
    pub fn new(behavior: impl Behavior + 'static) -> Self {
        Self {
            clock: TaskClock::default(),
            running: true,
            children: Vec::new(),
            next: None,
            finish_callbacks: Vec::new(),
            behavior: Box::new(behavior),
        }
    }

    /// A task that never finishes on its own and only hosts children.
    pub fn container() -> Self {
        Self::new(Container)
    }

    /// Advance by one frame.
    ///
    /// 1. accumulate `elapsed_ms`
    /// 2. run the process step if still running
    /// 3. update children, substituting successors and dropping finished ones
    /// 4. report the continuation
    pub fn update(&mut self, elapsed_ms: f64) -> TaskStatus {
        self.clock.advance(elapsed_ms);

        if self.running && self.behavior.process(&mut self.clock) == Progress::Finished {
            self.done();
        }

        let children = std::mem::take(&mut self.children);
        self.children = children
            .into_iter()
            .filter_map(|mut child| match child.update(elapsed_ms) {
                TaskStatus::Continue => Some(child),
                TaskStatus::Advance(next) => Some(next),
                TaskStatus::Done => None,
            })
            .collect();

        if self.running || !self.children.is_empty() {
            return TaskStatus::Continue;
        }

        match self.next.take() {
            Some(next) => {
                #[cfg(feature = "debug-tracing")]
                tracing::trace!(
                    from = self.behavior.name(),
                    to = next.behavior.name(),
                    "task advance"
                );
                TaskStatus::Advance(*next)
            }
            None => TaskStatus::Done,
        }
    }

    /// Mark the task finished and fire its finish callbacks.
    ///
    /// Calling this twice fires the callbacks twice.
    pub fn done(&mut self) {
        self.running = false;
        for callback in &mut self.finish_callbacks {
            callback();
        }
    }

    /// Register a concurrently running child.
    pub fn add(&mut self, task: Task) -> &mut Self {
        self.children.push(task);
        self
    }

    /// Append a successor at the end of the chain.
    pub fn add_next(&mut self, task: Task) -> &mut Self {
        match &mut self.next {
            Some(next) => {
                next.add_next(task);
            }
            None => self.next = Some(Box::new(task)),
        }
        self
    }

    /// Register a side effect fired when the task finishes.
    pub fn on_finish(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.finish_callbacks.push(Box::new(callback));
        self
    }

    /// Builder form of [`Task::add`].
    pub fn with_child(mut self, task: Task) -> Self {
        self.add(task);
        self
    }

    /// Builder form of [`Task::add_next`].
    pub fn then(mut self, task: Task) -> Self {
        self.add_next(task);
        self
    }

    /// Builder form of [`Task::on_finish`].
    pub fn finally(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_finish(callback);
        self
    }

    /// Whether the process step still executes.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Elapsed time on this task's clock.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Number of live children.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Length of the successor chain after this task.
    pub fn chain_len(&self) -> usize {
        let mut len = 0;
        let mut cursor = self.next.as_deref();
        while let Some(task) = cursor {
            len += 1;
            cursor = task.next.as_deref();
        }
        len
    }

    /// Behavior name, for logs.
    pub fn name(&self) -> &'static str {
        self.behavior.name()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.behavior.name())
            .field("elapsed_ms", &self.clock.elapsed())
            .field("running", &self.running)
            .field("children", &self.children)
            .field("chain_len", &self.chain_len())
            .finish()
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Owner slot for the head of a task tree.
#[derive(Debug, Default)]
pub struct TaskRunner {
    head: Option<Task>,
}

impl TaskRunner {
    /// Empty runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the head with an arbitrary task.
    pub fn set_root(&mut self, task: Task) {
        self.head = Some(task);
    }

    /// Run a task alongside everything already running.
    ///
    /// An empty runner gets a container root first.
    pub fn spawn(&mut self, task: Task) {
        self.head.get_or_insert_with(Task::container).add(task);
    }

    /// Advance the tree and re-bind the head to its continuation.
    pub fn update(&mut self, elapsed_ms: f64) {
        let Some(head) = self.head.as_mut() else {
            return;
        };
        match head.update(elapsed_ms) {
            TaskStatus::Continue => {}
            TaskStatus::Advance(next) => self.head = Some(next),
            TaskStatus::Done => self.head = None,
        }
    }

    /// Drop every task.
    pub fn clear(&mut self) {
        self.head = None;
    }

    /// Current head, if any.
    pub fn head(&self) -> Option<&Task> {
        self.head.as_ref()
    }

    /// Whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

// =============================================================================
// TESTS
// =============================================================================
