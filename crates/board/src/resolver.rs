//! Hit resolution: nearest primitive along the pointer ray, then its role.

use crate::handle::{HandleMap, InteractiveHandle};
use glam::Vec2;
use taskscreen_scene::{Camera, NodeId, SceneGraph};

/// Upper bound on the ownership-chain walk from a hit primitive to a
/// role-bearing ancestor. Board composites are at most a row group deep, so
/// this is generous.
pub const MAX_ROLE_DEPTH: usize = 8;

/// A resolved pointer hit.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedHit {
    /// Primitive the ray actually struck.
    pub node: NodeId,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Role-bearing handle found on the primitive or one of its ancestors.
    pub handle: InteractiveHandle,
}

/// Resolves pointer rays against an explicit candidate set.
///
/// The candidate list is an allow-list: decorative primitives (the screen
/// panel, the header) are never in it, so they cannot intercept clicks meant
/// for the controls in front of them.
#[derive(Debug, Default)]
pub struct HitResolver {
    candidates: Vec<NodeId>,
}

impl HitResolver {
    /// Create a resolver with an empty candidate set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candidate set. The board calls this after every store
    /// mutation so the hit-testable set mirrors the live rows.
    pub fn rebuild(&mut self, candidates: Vec<NodeId>) {
        self.candidates = candidates;
    }

    /// Current candidate set.
    pub fn candidates(&self) -> &[NodeId] {
        &self.candidates
    }

    /// Resolve a pointer position to the nearest role-bearing hit.
    ///
    /// The struck primitive may itself carry no role (a label drawn on a
    /// button); the ownership chain is walked upward until a bound ancestor
    /// is found. A hit whose chain exhausts without a role resolves to
    /// `None`, same as no hit at all.
    pub fn resolve(
        &self,
        scene: &SceneGraph,
        camera: &Camera,
        ndc: Vec2,
        handles: &HandleMap,
    ) -> Option<ResolvedHit> {
        let (origin, dir) = camera.screen_ray(ndc);
        let hit = scene.cast_ray(origin, dir, &self.candidates)?;

        let mut cursor = Some(hit.node);
        for _ in 0..MAX_ROLE_DEPTH {
            let node = cursor?;
            if let Some(handle) = handles.get(node) {
                return Some(ResolvedHit {
                    node: hit.node,
                    distance: hit.distance,
                    handle,
                });
            }
            cursor = scene.parent(node);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use taskscreen_core::Role;
    use taskscreen_scene::{Label, NodeKind, Surface};

    /// Camera straight down the -Z axis so NDC (0, 0) points at the origin.
    fn head_on_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO)
    }

    fn button_with_label(scene: &mut SceneGraph) -> (NodeId, NodeId) {
        let button = scene.spawn(NodeKind::Surface(Surface::new(1.0, 0.5)));
        let mut label = Label::new("Add").with_font_size(0.2);
        label.sync();
        let text = scene
            .spawn_in(button, NodeKind::Label(label), Vec3::new(0.0, 0.0, 0.001))
            .unwrap();
        (button, text)
    }

    #[test]
    fn label_hits_resolve_to_the_parent_role() {
        let mut scene = SceneGraph::new();
        let (button, text) = button_with_label(&mut scene);

        let mut handles = HandleMap::new();
        handles.bind(button, Role::Add, None);

        let mut resolver = HitResolver::new();
        resolver.rebuild(vec![button, text]);

        let hit = resolver
            .resolve(&scene, &head_on_camera(), Vec2::ZERO, &handles)
            .expect("label should resolve");
        // The label sits in front, so it is the struck primitive...
        assert_eq!(hit.node, text);
        // ...but the role comes from the button that owns it.
        assert_eq!(hit.handle.role, Role::Add);
        assert_eq!(hit.handle.node, button);
    }

    #[test]
    fn chain_exhaustion_resolves_to_none() {
        let mut scene = SceneGraph::new();
        let (button, text) = button_with_label(&mut scene);

        let handles = HandleMap::new();
        let mut resolver = HitResolver::new();
        resolver.rebuild(vec![button, text]);

        let hit = resolver.resolve(&scene, &head_on_camera(), Vec2::ZERO, &handles);
        assert!(hit.is_none());
    }

    #[test]
    fn nearest_candidate_wins() {
        let mut scene = SceneGraph::new();
        let behind = scene.spawn(NodeKind::Surface(Surface::new(2.0, 2.0)));
        let front = scene.spawn(NodeKind::Surface(Surface::new(2.0, 2.0)));
        scene.place(front, Vec3::new(0.0, 0.0, 1.0)).unwrap();

        let mut handles = HandleMap::new();
        handles.bind(behind, Role::DeleteLast, None);
        handles.bind(front, Role::Add, None);

        let mut resolver = HitResolver::new();
        resolver.rebuild(vec![behind, front]);

        let hit = resolver
            .resolve(&scene, &head_on_camera(), Vec2::ZERO, &handles)
            .unwrap();
        assert_eq!(hit.handle.role, Role::Add);
    }

    #[test]
    fn coplanar_hits_resolve_identically_every_frame() {
        let mut scene = SceneGraph::new();
        let first = scene.spawn(NodeKind::Surface(Surface::new(2.0, 2.0)));
        let second = scene.spawn(NodeKind::Surface(Surface::new(2.0, 2.0)));

        let mut handles = HandleMap::new();
        handles.bind(first, Role::Add, None);
        handles.bind(second, Role::DeleteLast, None);

        let mut resolver = HitResolver::new();
        resolver.rebuild(vec![second, first]);

        let camera = head_on_camera();
        let baseline = resolver
            .resolve(&scene, &camera, Vec2::ZERO, &handles)
            .unwrap();
        for _ in 0..5 {
            let hit = resolver
                .resolve(&scene, &camera, Vec2::ZERO, &handles)
                .unwrap();
            assert_eq!(hit.handle.node, baseline.handle.node);
        }
        assert_eq!(baseline.handle.node, first);
    }

    #[test]
    fn rays_outside_every_candidate_miss() {
        let mut scene = SceneGraph::new();
        let (button, text) = button_with_label(&mut scene);

        let mut handles = HandleMap::new();
        handles.bind(button, Role::Add, None);

        let mut resolver = HitResolver::new();
        resolver.rebuild(vec![button, text]);

        let hit = resolver.resolve(&scene, &head_on_camera(), Vec2::new(0.9, 0.9), &handles);
        assert!(hit.is_none());
    }
}
