//! Parented node arena with ray queries.

use crate::primitive::{Label, Surface};
use glam::Vec3;
use std::collections::HashMap;
use thiserror::Error;

/// Handle to a scene node. Ids are assigned in spawn order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Errors raised by structural graph operations.
///
/// These indicate misuse by the caller (a stale or foreign handle), not user
/// input; interaction-level no-ops never surface here.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Operation referenced a node that is not in the graph.
    #[error("unknown scene node {0:?}")]
    UnknownNode(NodeId),
    /// `detach` was asked to separate two nodes that are not parent and child.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Claimed parent.
        parent: NodeId,
        /// Claimed child.
        child: NodeId,
    },
    /// `attach` would have made a node an ancestor of itself.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },
}

/// What a node contributes visually.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure grouping node; no extent of its own.
    Group,
    /// Colored quad facing +Z.
    Surface(Surface),
    /// Text run, hit-testable via its measured extent.
    Label(Label),
}

/// A single scene node: local transform, content, and links.
#[derive(Debug, Clone)]
pub struct Node {
    /// This node's id.
    pub id: NodeId,
    /// Parent link; `None` for root nodes.
    pub parent: Option<NodeId>,
    /// Children in attach order.
    pub children: Vec<NodeId>,
    /// Position relative to the parent (world axes; the graph carries no
    /// rotation).
    pub position: Vec3,
    /// Uniform scale applied to this node and its subtree.
    pub scale: f32,
    /// Visual content.
    pub kind: NodeKind,
}

/// Result of a ray query.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Node the ray struck.
    pub node: NodeId,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Hit point in world space.
    pub point: Vec3,
}

/// Distances closer than this are treated as a tie and broken by node id.
const TIE_EPSILON: f32 = 1e-6;

/// Rays closer to parallel with a quad plane than this never hit it.
const PARALLEL_EPSILON: f32 = 1e-4;

/// The retained scene graph.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, Node>,
    next_id: u64,
}

impl SceneGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node and return its handle.
    pub fn spawn(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                id,
                parent: None,
                children: Vec::new(),
                position: Vec3::ZERO,
                scale: 1.0,
                kind,
            },
        );
        id
    }

    /// Spawn a node directly under `parent` at a local position.
    pub fn spawn_in(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        position: Vec3,
    ) -> Result<NodeId, SceneError> {
        let id = self.spawn(kind);
        self.attach(parent, id)?;
        self.place(id, position)?;
        Ok(id)
    }

    /// Make `child` a child of `parent`, re-parenting if necessary.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if !self.nodes.contains_key(&child) {
            return Err(SceneError::UnknownNode(child));
        }
        // Reject attaching a node beneath its own subtree.
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(SceneError::WouldCycle { parent, child });
            }
            cursor = self.parent(node);
        }

        if let Some(old_parent) = self.nodes[&child].parent {
            if let Some(old) = self.nodes.get_mut(&old_parent) {
                old.children.retain(|&c| c != child);
            }
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Sever the parent/child link; the child becomes a root node.
    pub fn detach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let is_child = self
            .nodes
            .get(&child)
            .ok_or(SceneError::UnknownNode(child))?
            .parent
            == Some(parent);
        if !is_child {
            return Err(SceneError::NotAChild { parent, child });
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = None;
        }
        Ok(())
    }

    /// Remove a node and its whole subtree. Unknown ids are a no-op.
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                pending.extend(node.children);
            }
        }
    }

    /// Set a node's position relative to its parent.
    pub fn place(&mut self, id: NodeId, position: Vec3) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::UnknownNode(id))?;
        node.position = position;
        Ok(())
    }

    /// Set a node's uniform scale.
    pub fn set_scale(&mut self, id: NodeId, scale: f32) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::UnknownNode(id))?;
        node.scale = scale;
        Ok(())
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Mutably borrow the surface carried by `id`, if it is one.
    pub fn surface_mut(&mut self, id: NodeId) -> Option<&mut Surface> {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(NodeKind::Surface(surface)) => Some(surface),
            _ => None,
        }
    }

    /// Mutably borrow the label carried by `id`, if it is one.
    pub fn label_mut(&mut self, id: NodeId) -> Option<&mut Label> {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(NodeKind::Label(label)) => Some(label),
            _ => None,
        }
    }

    /// Parent of `id`, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Whether `id` is in the graph.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// World-space position of `id` (sum of the parent chain).
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        let mut position = Vec3::ZERO;
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            let node = self.nodes.get(&node)?;
            position += node.position;
            cursor = node.parent;
        }
        Some(position)
    }

    /// World-space uniform scale of `id` (product of the parent chain).
    pub fn world_scale(&self, id: NodeId) -> Option<f32> {
        let mut scale = 1.0;
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            let node = self.nodes.get(&node)?;
            scale *= node.scale;
            cursor = node.parent;
        }
        Some(scale)
    }

    /// Nearest hit along the ray among `candidates`, or `None`.
    ///
    /// Equal distances (coplanar quads) are broken toward the lower node id,
    /// which is spawn order, so an unchanged scene always resolves the same
    /// way on repeated queries.
    pub fn cast_ray(&self, origin: Vec3, dir: Vec3, candidates: &[NodeId]) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for &id in candidates {
            let Some(hit) = self.raycast_node(id, origin, dir) else {
                continue;
            };
            best = match best {
                None => Some(hit),
                Some(current) => {
                    let closer = hit.distance + TIE_EPSILON < current.distance;
                    let tied = (hit.distance - current.distance).abs() <= TIE_EPSILON;
                    if closer || (tied && hit.node < current.node) {
                        Some(hit)
                    } else {
                        Some(current)
                    }
                }
            };
        }
        best
    }

    /// Ray test against a single node's quad extent. Quads face +Z, so this
    /// is a plane test at the node's world Z followed by a rectangle check.
    fn raycast_node(&self, id: NodeId, origin: Vec3, dir: Vec3) -> Option<RayHit> {
        let node = self.nodes.get(&id)?;
        let extent = match &node.kind {
            NodeKind::Group => return None,
            NodeKind::Surface(surface) => {
                if !surface.visible {
                    return None;
                }
                surface.size
            }
            NodeKind::Label(label) => {
                if !label.visible {
                    return None;
                }
                label.measure()
            }
        };

        let center = self.world_position(id)?;
        let scale = self.world_scale(id)?;
        let half_width = extent.0 * 0.5 * scale;
        let half_height = extent.1 * 0.5 * scale;
        if half_width <= 0.0 || half_height <= 0.0 {
            return None;
        }

        if dir.z.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (center.z - origin.z) / dir.z;
        if t < 0.0 {
            return None;
        }

        let point = origin + dir * t;
        if (point.x - center.x).abs() <= half_width && (point.y - center.y).abs() <= half_height {
            Some(RayHit {
                node: id,
                distance: t,
                point,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{Label, Surface};

    fn quad(scene: &mut SceneGraph, size: (f32, f32), position: Vec3) -> NodeId {
        let id = scene.spawn(NodeKind::Surface(Surface::new(size.0, size.1)));
        scene.place(id, position).unwrap();
        id
    }

    #[test]
    fn world_position_accumulates_parent_chain() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn(NodeKind::Group);
        scene.place(root, Vec3::new(1.0, 2.0, 0.0)).unwrap();
        let child = scene
            .spawn_in(root, NodeKind::Group, Vec3::new(0.5, -1.0, 0.25))
            .unwrap();

        assert_eq!(
            scene.world_position(child),
            Some(Vec3::new(1.5, 1.0, 0.25))
        );
    }

    #[test]
    fn world_scale_multiplies_down_the_chain() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn(NodeKind::Group);
        scene.set_scale(root, 0.5).unwrap();
        let child = scene.spawn_in(root, NodeKind::Group, Vec3::ZERO).unwrap();
        scene.set_scale(child, 0.5).unwrap();

        assert_eq!(scene.world_scale(child), Some(0.25));
    }

    #[test]
    fn attach_rejects_cycles() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn(NodeKind::Group);
        let b = scene.spawn(NodeKind::Group);
        scene.attach(a, b).unwrap();

        assert!(matches!(
            scene.attach(b, a),
            Err(SceneError::WouldCycle { .. })
        ));
        assert!(matches!(
            scene.attach(a, a),
            Err(SceneError::WouldCycle { .. })
        ));
    }

    #[test]
    fn detach_requires_the_actual_parent() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn(NodeKind::Group);
        let b = scene.spawn(NodeKind::Group);
        let c = scene.spawn_in(a, NodeKind::Group, Vec3::ZERO).unwrap();

        assert!(matches!(
            scene.detach(b, c),
            Err(SceneError::NotAChild { .. })
        ));
        scene.detach(a, c).unwrap();
        assert_eq!(scene.parent(c), None);
    }

    #[test]
    fn remove_takes_the_subtree_and_is_idempotent() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn(NodeKind::Group);
        let child = scene.spawn_in(root, NodeKind::Group, Vec3::ZERO).unwrap();
        let grandchild = scene.spawn_in(child, NodeKind::Group, Vec3::ZERO).unwrap();

        scene.remove(child);
        assert!(scene.contains(root));
        assert!(!scene.contains(child));
        assert!(!scene.contains(grandchild));
        assert!(scene.node(root).unwrap().children.is_empty());

        scene.remove(child);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn cast_ray_returns_the_nearest_quad() {
        let mut scene = SceneGraph::new();
        let far = quad(&mut scene, (2.0, 2.0), Vec3::new(0.0, 0.0, 0.0));
        let near = quad(&mut scene, (2.0, 2.0), Vec3::new(0.0, 0.0, 1.0));

        let hit = scene
            .cast_ray(Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 0.0, -1.0), &[far, near])
            .expect("ray should hit");
        assert_eq!(hit.node, near);
        assert!((hit.distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn coplanar_tie_breaks_by_node_id_regardless_of_order() {
        let mut scene = SceneGraph::new();
        let first = quad(&mut scene, (2.0, 2.0), Vec3::ZERO);
        let second = quad(&mut scene, (2.0, 2.0), Vec3::ZERO);

        let origin = Vec3::new(0.0, 0.0, 4.0);
        let dir = Vec3::new(0.0, 0.0, -1.0);
        for _ in 0..3 {
            let a = scene.cast_ray(origin, dir, &[first, second]).unwrap();
            let b = scene.cast_ray(origin, dir, &[second, first]).unwrap();
            assert_eq!(a.node, first);
            assert_eq!(b.node, first);
        }
    }

    #[test]
    fn scale_shrinks_the_hit_extent() {
        let mut scene = SceneGraph::new();
        let id = quad(&mut scene, (2.0, 2.0), Vec3::ZERO);

        let origin = Vec3::new(0.9, 0.0, 4.0);
        let dir = Vec3::new(0.0, 0.0, -1.0);
        assert!(scene.cast_ray(origin, dir, &[id]).is_some());

        scene.set_scale(id, 0.5).unwrap();
        assert!(scene.cast_ray(origin, dir, &[id]).is_none());

        scene.set_scale(id, 0.0).unwrap();
        let center = Vec3::new(0.0, 0.0, 4.0);
        assert!(scene.cast_ray(center, dir, &[id]).is_none());
    }

    #[test]
    fn quads_behind_the_origin_never_hit() {
        let mut scene = SceneGraph::new();
        let id = quad(&mut scene, (2.0, 2.0), Vec3::new(0.0, 0.0, 8.0));

        let hit = scene.cast_ray(Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 0.0, -1.0), &[id]);
        assert!(hit.is_none());
    }

    #[test]
    fn labels_hit_via_measured_extent() {
        let mut scene = SceneGraph::new();
        let mut label = Label::new("TODO").with_font_size(0.5);
        label.sync();
        let (width, _) = label.measure();
        let id = scene.spawn(NodeKind::Label(label));

        let dir = Vec3::new(0.0, 0.0, -1.0);
        let inside = Vec3::new(width * 0.45, 0.0, 4.0);
        let outside = Vec3::new(width * 0.55, 0.0, 4.0);
        assert!(scene.cast_ray(inside, dir, &[id]).is_some());
        assert!(scene.cast_ray(outside, dir, &[id]).is_none());
    }

    #[test]
    fn invisible_surfaces_are_not_hit() {
        let mut scene = SceneGraph::new();
        let id = quad(&mut scene, (2.0, 2.0), Vec3::ZERO);
        scene.surface_mut(id).unwrap().visible = false;

        let hit = scene.cast_ray(Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 0.0, -1.0), &[id]);
        assert!(hit.is_none());
    }
}
