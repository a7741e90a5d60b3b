#![warn(missing_docs)]
//! Core primitives shared across the workspace.

use serde::{Deserialize, Serialize};

/// Fixed tick type (60 TPS => ~16.7 ms per tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any session timeline.
    pub const ZERO: Self = Self(0);

    /// Seconds covered by a single tick.
    pub const SECONDS: f32 = 1.0 / 60.0;

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Stable identity of a task record.
///
/// Ids are handed out monotonically and never reused, so a reference held
/// across a removal stays distinguishable from every record that comes after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

/// Logical meaning of an interactive surface on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Append the pending input text as a new task.
    Add,
    /// Remove the tail task.
    DeleteLast,
    /// A task row; meaning depends on the interaction mode.
    Task,
    /// Flip a task's done flag.
    Checkbox,
    /// Arm delete mode.
    ModeToggle,
}

impl Role {
    /// Whether hovering this role should show a pointer affordance.
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            Role::Add | Role::DeleteLast | Role::Task | Role::Checkbox | Role::ModeToggle
        )
    }

    /// Stable label used in logs and event payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Add => "add",
            Role::DeleteLast => "delete_last",
            Role::Task => "task",
            Role::Checkbox => "checkbox",
            Role::ModeToggle => "mode_toggle",
        }
    }
}
