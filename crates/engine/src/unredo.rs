//! Undo/redo transaction log.
//!
//! Every undoable operation is recorded as a pair of operations: one that
//! reverts it and one that performs it again. Several pairs recorded for one
//! user action are grouped by placing a mark after them, and undo/redo always
//! replay a whole group.
//!
//! Replayed operations usually go through the same code paths that recorded
//! them, so they call [`UnRedo::append`] again. While a replay is running the
//! log is *active* and drops those records.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use gridmodel_core::{ModelError, Result};
use log::{debug, trace, warn};

pub use gridmodel_config::settings::DEFAULT_MAX_UNREDO;

/// Signature of a replayable operation. It receives the log so that it can
/// record itself; those records are dropped during replay.
pub type CommandFn<T, A> = fn(&mut T, &mut UnRedo<T, A>, &[A]) -> Result<()>;

/// A named callable with a fixed number of arguments.
pub struct Command<T, A> {
    pub name: &'static str,
    pub arity: usize,
    pub run: CommandFn<T, A>,
}

impl<T, A> Command<T, A> {
    pub const fn new(name: &'static str, arity: usize, run: CommandFn<T, A>) -> Self {
        Self { name, arity, run }
    }

    /// Pair this command with its arguments.
    pub fn with_args(&self, args: Vec<A>) -> Operation<T, A> {
        Operation { command: *self, args }
    }
}

impl<T, A> Clone for Command<T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A> Copy for Command<T, A> {}

impl<T, A> fmt::Debug for Command<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// A command together with the arguments to call it with.
pub struct Operation<T, A> {
    pub command: Command<T, A>,
    pub args: Vec<A>,
}

impl<T, A> Operation<T, A> {
    fn validate(&self) -> Result<()> {
        if self.args.len() != self.command.arity {
            return Err(ModelError::MalformedUnRedoOperand {
                command: self.command.name,
                expected: self.command.arity,
                got: self.args.len(),
            });
        }
        Ok(())
    }

    pub fn invoke(&self, target: &mut T, log: &mut UnRedo<T, A>) -> Result<()> {
        (self.command.run)(target, log, &self.args)
    }
}

impl<T, A: fmt::Debug> fmt::Debug for Operation<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.command.name, self.args)
    }
}

struct Step<T, A> {
    undo: Operation<T, A>,
    redo: Operation<T, A>,
}

enum Entry<T, A> {
    Mark,
    Step(Rc<Step<T, A>>),
}

impl<T, A> Entry<T, A> {
    fn is_mark(&self) -> bool {
        matches!(self, Entry::Mark)
    }
}

pub struct UnRedo<T, A> {
    undo_stack: Vec<Entry<T, A>>,
    redo_stack: Vec<Entry<T, A>>,
    active: bool,
    max_len: usize,
}

impl<T, A> Default for UnRedo<T, A> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNREDO)
    }
}

impl<T, A> fmt::Debug for UnRedo<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnRedo")
            .field("undo_len", &self.undo_stack.len())
            .field("redo_len", &self.redo_stack.len())
            .field("active", &self.active)
            .field("max_len", &self.max_len)
            .finish()
    }
}

/// Keeps the log active for the lifetime of a replay and clears the flag
/// when dropped, including on early return.
struct Replay<'a, T, A> {
    log: &'a mut UnRedo<T, A>,
}

impl<'a, T, A> Replay<'a, T, A> {
    fn begin(log: &'a mut UnRedo<T, A>) -> Self {
        log.active = true;
        Self { log }
    }
}

impl<T, A> Deref for Replay<'_, T, A> {
    type Target = UnRedo<T, A>;

    fn deref(&self) -> &UnRedo<T, A> {
        &*self.log
    }
}

impl<T, A> DerefMut for Replay<'_, T, A> {
    fn deref_mut(&mut self) -> &mut UnRedo<T, A> {
        &mut *self.log
    }
}

impl<T, A> Drop for Replay<'_, T, A> {
    fn drop(&mut self) {
        self.log.active = false;
    }
}

impl<T, A> UnRedo<T, A> {
    /// Empty log whose stacks are discarded once either grows past `max_len`.
    pub fn new(max_len: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            active: false,
            max_len,
        }
    }

    /// Close the current group. No-op if the log is empty or already marked.
    pub fn mark(&mut self) {
        if matches!(self.undo_stack.last(), Some(Entry::Step(_))) {
            self.undo_stack.push(Entry::Mark);
        }
    }

    /// Record an operation as its `(undo, redo)` pair.
    ///
    /// Both operands are checked first. If either stack has outgrown the
    /// maximum, all history is discarded before recording. Nothing is recorded
    /// while a replay is running.
    pub fn append(&mut self, undo: Operation<T, A>, redo: Operation<T, A>) -> Result<()> {
        undo.validate()?;
        redo.validate()?;

        if self.undo_stack.len() > self.max_len || self.redo_stack.len() > self.max_len {
            warn!(
                "undo history exceeded {} entries (undo {}, redo {}), discarding it",
                self.max_len,
                self.undo_stack.len(),
                self.redo_stack.len()
            );
            self.undo_stack.clear();
            self.redo_stack.clear();
        }

        if self.active {
            trace!("replaying, not recording {}", undo.command.name);
            return Ok(());
        }

        trace!("recorded {} / {}", undo.command.name, redo.command.name);
        self.undo_stack.push(Entry::Step(Rc::new(Step { undo, redo })));
        Ok(())
    }

    /// Revert the most recent group.
    pub fn undo(&mut self, target: &mut T) -> Result<()> {
        let mut log = Replay::begin(self);

        while log.undo_stack.last().is_some_and(Entry::is_mark) {
            log.undo_stack.pop();
        }
        if log.redo_stack.last().is_some_and(|e| !e.is_mark()) {
            log.redo_stack.push(Entry::Mark);
        }

        let mut replayed = 0;
        while let Some(Entry::Step(step)) = log.undo_stack.pop() {
            log.redo_stack.push(Entry::Step(Rc::clone(&step)));
            step.undo.invoke(target, &mut log)?;
            replayed += 1;
        }

        debug!("undo replayed {replayed} operation(s)");
        Ok(())
    }

    /// Perform the most recently undone group again.
    pub fn redo(&mut self, target: &mut T) -> Result<()> {
        let mut log = Replay::begin(self);

        while log.redo_stack.last().is_some_and(Entry::is_mark) {
            log.redo_stack.pop();
        }
        if log.undo_stack.last().is_some_and(|e| !e.is_mark()) {
            log.undo_stack.push(Entry::Mark);
        }

        let mut replayed = 0;
        while let Some(Entry::Step(step)) = log.redo_stack.pop() {
            log.undo_stack.push(Entry::Step(Rc::clone(&step)));
            step.redo.invoke(target, &mut log)?;
            replayed += 1;
        }

        debug!("redo replayed {replayed} operation(s)");
        Ok(())
    }

    /// Forget all history.
    pub fn reset(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.active = false;
        debug!("undo history reset");
    }

    /// True while an undo or redo is being replayed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.iter().any(|e| !e.is_mark())
    }

    pub fn can_redo(&self) -> bool {
        self.redo_stack.iter().any(|e| !e.is_mark())
    }

    /// Entries on the undo stack, marks included.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Entries on the redo stack, marks included.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}
