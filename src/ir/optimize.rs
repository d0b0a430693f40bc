//! Rewrites of a [`Command`] stream which remove state changes that can't affect the drawing.
//!
//! The input must be balanced (see [`check_balance`](super::check_balance)), which
//! [`lowering`](super::lowering) always guarantees.  Unbalanced input is a caller bug: the
//! optimizer won't panic on it, but the output is unspecified.

use serde::Deserialize;

use super::{Command, Types};

/// Which rewrites [`optimize`] should apply.  Every rewrite is independent of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct OptimizeOpts {
    /// Remove any push/pop bracket which contains nothing (after its own empty brackets have been
    /// removed)
    pub skip_redundant_state: bool,
    /// Remove a push at the very start of the stream if its pop is the very last command.  Useful
    /// when whoever replays the commands already provides an equivalent scope.
    pub skip_initial_save_state: bool,
}

impl OptimizeOpts {
    /// Apply every rewrite
    pub fn all() -> Self {
        Self {
            skip_redundant_state: true,
            skip_initial_save_state: true,
        }
    }
}

/// Apply the rewrites enabled in `opts` to a balanced [`Command`] stream.  Retained commands keep
/// their relative order.
///
/// `skip_redundant_state` is idempotent, but `skip_initial_save_state` is not: it strips one
/// outer bracket per call, so a stream wrapped in two brackets (e.g. a root with a single child
/// group) loses the second one if it is optimized again.  Optimize each stream once.
pub fn optimize<T: Types>(commands: Vec<Command<T>>, opts: &OptimizeOpts) -> Vec<Command<T>> {
    let num_commands = commands.len();
    let mut commands = commands;
    if opts.skip_redundant_state {
        commands = skip_redundant_state(commands);
    }
    if opts.skip_initial_save_state {
        commands = skip_initial_save_state(commands);
    }
    log::trace!(
        "optimized {} commands down to {}",
        num_commands,
        commands.len()
    );
    commands
}

/// Removes every bracket which is empty once all the empty brackets inside it have been removed.
/// Brackets are closed innermost first, so a single pass removes whole nests of empty brackets.
fn skip_redundant_state<T: Types>(commands: Vec<Command<T>>) -> Vec<Command<T>> {
    let mut filtered = Vec::with_capacity(commands.len());
    // Index in `filtered` of each push which hasn't been popped yet
    let mut open_pushes = Vec::<usize>::new();
    for cmd in commands {
        if cmd.is_push() {
            open_pushes.push(filtered.len());
        } else if cmd.is_pop() {
            if let Some(push_idx) = open_pushes.pop() {
                if push_idx + 1 == filtered.len() {
                    // Nothing survived between the push and this pop
                    filtered.pop();
                    continue;
                }
            }
        }
        filtered.push(cmd);
    }
    filtered
}

/// Removes the first command if it's a [`Command::PushState`] whose matching pop is the last
/// command.
fn skip_initial_save_state<T: Types>(mut commands: Vec<Command<T>>) -> Vec<Command<T>> {
    if matches!(commands.first(), Some(Command::PushState))
        && matching_pop(&commands, 0) == Some(commands.len() - 1)
    {
        commands.pop();
        commands.remove(0);
    }
    commands
}

/// Returns the index of the pop which closes the bracket opened at `push_idx`
fn matching_pop<T: Types>(commands: &[Command<T>], push_idx: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, cmd) in commands.iter().enumerate().skip(push_idx) {
        if cmd.is_push() {
            depth += 1;
        } else if cmd.is_pop() {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}
