//! Tween engine: eased, absolute property interpolation stepped per tick.
//!
//! Every step writes the interpolated value directly (never a delta), and the
//! final step writes the end value exactly. Starting a new tween for the same
//! node/property supersedes the old one, so transitions can be restarted
//! mid-flight and still land on a consistent final state.

use crate::graph::{NodeId, SceneGraph};
use glam::Vec3;
use tracing::debug;

/// Handle to a running tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u64);

/// Easing curves used by board transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// No easing.
    Linear,
    /// Fast start, decelerating (cubic).
    #[default]
    EaseOut,
}

impl Easing {
    /// Map linear progress in `[0, 1]` to eased progress.
    pub fn evaluate(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// The property a tween drives, with absolute endpoints.
#[derive(Debug, Clone, Copy)]
pub enum TweenTarget {
    /// Local position.
    Position {
        /// Start value.
        from: Vec3,
        /// End value.
        to: Vec3,
    },
    /// Uniform scale.
    Scale {
        /// Start value.
        from: f32,
        /// End value.
        to: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetKind {
    Position,
    Scale,
}

impl TweenTarget {
    fn kind(&self) -> TargetKind {
        match self {
            TweenTarget::Position { .. } => TargetKind::Position,
            TweenTarget::Scale { .. } => TargetKind::Scale,
        }
    }
}

#[derive(Debug)]
struct ActiveTween {
    id: TweenId,
    node: NodeId,
    target: TweenTarget,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

/// All in-flight tweens.
#[derive(Debug, Default)]
pub struct Tweens {
    active: Vec<ActiveTween>,
    next_id: u64,
}

impl Tweens {
    /// Create an empty tween set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a tween on `node`. An existing tween for the same
    /// property is superseded.
    pub fn animate(
        &mut self,
        node: NodeId,
        target: TweenTarget,
        duration: f32,
        easing: Easing,
    ) -> TweenId {
        self.active
            .retain(|tween| !(tween.node == node && tween.target.kind() == target.kind()));
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.active.push(ActiveTween {
            id,
            node,
            target,
            duration,
            elapsed: 0.0,
            easing,
        });
        id
    }

    /// Step all tweens by `dt` seconds, applying values to the scene.
    ///
    /// Returns the ids of tweens that reached their end value this tick.
    /// Tweens whose node has left the scene are dropped without completing.
    pub fn tick(&mut self, dt: f32, scene: &mut SceneGraph) -> Vec<TweenId> {
        let mut completed = Vec::new();
        let mut dropped = Vec::new();
        for tween in &mut self.active {
            tween.elapsed += dt;
            let t = if tween.duration <= 0.0 {
                1.0
            } else {
                (tween.elapsed / tween.duration).clamp(0.0, 1.0)
            };
            let eased = tween.easing.evaluate(t);

            let applied = match tween.target {
                TweenTarget::Position { from, to } => {
                    let value = if t >= 1.0 { to } else { from.lerp(to, eased) };
                    scene.place(tween.node, value).is_ok()
                }
                TweenTarget::Scale { from, to } => {
                    let value = if t >= 1.0 { to } else { from + (to - from) * eased };
                    scene.set_scale(tween.node, value).is_ok()
                }
            };

            if !applied {
                debug!(node = ?tween.node, "dropping tween for a despawned node");
                dropped.push(tween.id);
            } else if t >= 1.0 {
                completed.push(tween.id);
            }
        }
        self.active
            .retain(|tween| !completed.contains(&tween.id) && !dropped.contains(&tween.id));
        completed
    }

    /// Whether any tween is driving `node`.
    pub fn is_animating(&self, node: NodeId) -> bool {
        self.active.iter().any(|tween| tween.node == node)
    }

    /// Number of in-flight tweens.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no tween is in flight.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
