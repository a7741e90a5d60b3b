//! Interactive handles: role tags bound to scene nodes.
//!
//! Handlers are not closures. A handle carries a role tag plus the task it
//! refers to, and the board interprets the tag at dispatch time; stable ids
//! mean a handle captured before a mutation can only ever resolve to its own
//! record or to nothing.

use std::collections::HashMap;
use taskscreen_core::{Role, TaskId};
use taskscreen_scene::NodeId;

/// A hit-testable node's logical role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractiveHandle {
    /// Node the handle is bound to.
    pub node: NodeId,
    /// What interacting with this node means.
    pub role: Role,
    /// Record the handle refers to, for record-specific roles.
    pub target: Option<TaskId>,
}

/// Role registry keyed by scene node.
#[derive(Debug, Default)]
pub struct HandleMap {
    handles: HashMap<NodeId, InteractiveHandle>,
}

impl HandleMap {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a role to `node`, replacing any previous binding.
    pub fn bind(&mut self, node: NodeId, role: Role, target: Option<TaskId>) {
        self.handles
            .insert(node, InteractiveHandle { node, role, target });
    }

    /// Remove the binding for `node`, if any.
    pub fn unbind(&mut self, node: NodeId) {
        self.handles.remove(&node);
    }

    /// Look up the handle bound to `node`.
    pub fn get(&self, node: NodeId) -> Option<InteractiveHandle> {
        self.handles.get(&node).copied()
    }

    /// Number of bound handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no handles are bound.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
