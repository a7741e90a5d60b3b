//! Hover state machine and activation dispatch.

use crate::handle::InteractiveHandle;
use crate::resolver::ResolvedHit;
use tracing::{debug, trace};

/// Cursor affordance derived from the active handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    /// Nothing interactive under the pointer.
    #[default]
    Default,
    /// The pointer is over an interactive surface.
    Pointer,
}

/// Hover edges produced by one tick update.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverChange {
    /// Handle the pointer left this tick.
    pub left: Option<InteractiveHandle>,
    /// Handle the pointer entered this tick.
    pub entered: Option<InteractiveHandle>,
}

impl HoverChange {
    /// Whether this tick changed the hovered handle at all.
    pub fn is_transition(&self) -> bool {
        self.left.is_some() || self.entered.is_some()
    }
}

/// Tracks the active handle between ticks and turns resolver output into
/// enter/leave edges and activations.
///
/// At most one handle is active at a time. Hover edges fire only when the
/// active handle changes; holding still over the same target produces no
/// callbacks. Activation never consults the hover snapshot: the caller
/// passes the resolve result captured at signal time, so a click landing
/// right after a mutation sees the post-mutation graph.
#[derive(Debug, Default)]
pub struct Dispatcher {
    previous: Option<InteractiveHandle>,
    cursor: CursorStyle,
}

impl Dispatcher {
    /// Create a dispatcher with no active handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-tick hover update.
    pub fn hover(&mut self, resolved: Option<ResolvedHit>) -> HoverChange {
        let current = resolved.map(|hit| hit.handle);

        // The cursor is a pure function of the current handle; recompute it
        // every tick whether or not hover changed.
        self.cursor = match current {
            Some(handle) if handle.role.is_interactive() => CursorStyle::Pointer,
            _ => CursorStyle::Default,
        };

        let changed = current.map(|h| h.node) != self.previous.map(|h| h.node);
        if !changed {
            return HoverChange::default();
        }

        let change = HoverChange {
            left: self.previous,
            entered: current,
        };
        if let Some(handle) = change.left {
            trace!(role = handle.role.as_str(), "hover leave");
        }
        if let Some(handle) = change.entered {
            trace!(role = handle.role.as_str(), "hover enter");
        }
        self.previous = current;
        change
    }

    /// Process one activation signal. Returns the handle to act on, at most
    /// once per signal; nothing under the pointer means no activation.
    pub fn activate(&mut self, resolved: Option<ResolvedHit>) -> Option<InteractiveHandle> {
        match resolved {
            Some(hit) => {
                debug!(role = hit.handle.role.as_str(), "activation");
                Some(hit.handle)
            }
            None => None,
        }
    }

    /// Currently hovered handle, if any.
    pub fn active(&self) -> Option<InteractiveHandle> {
        self.previous
    }

    /// Current cursor affordance.
    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }
}
