//! Normal/Delete interaction mode.

use crate::store::Discard;
use tracing::debug;

/// Session-global interaction mode.
///
/// While `Delete` is armed, clicking a task row removes that specific record;
/// there is no cancel affordance, so the only way back to `Normal` is a
/// successful deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Task clicks are inert; the tail-delete control removes the last row.
    #[default]
    Normal,
    /// Task clicks remove the clicked record.
    Delete,
}

/// Two-state controller gating what a task click means.
#[derive(Debug, Default)]
pub struct ModeController {
    mode: InteractionMode,
}

impl ModeController {
    /// Create a controller in `Normal` mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Whether delete mode is armed.
    pub fn is_delete(&self) -> bool {
        self.mode == InteractionMode::Delete
    }

    /// Arm delete mode. Requires at least one removable record; arming an
    /// already-armed controller is rejected by the caller, not here.
    pub fn request_arm(&mut self, active_tasks: usize) -> Result<(), Discard> {
        if active_tasks == 0 {
            debug!("delete mode refused: no tasks to remove");
            return Err(Discard::EmptyListMode);
        }
        self.mode = InteractionMode::Delete;
        Ok(())
    }

    /// A record was successfully removed; disarm if armed. Returns whether a
    /// transition back to `Normal` happened.
    pub fn notify_removed(&mut self) -> bool {
        if self.mode == InteractionMode::Delete {
            self.mode = InteractionMode::Normal;
            true
        } else {
            false
        }
    }
}
