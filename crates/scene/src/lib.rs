#![warn(missing_docs)]
//! Retained scene graph for the task board.
//!
//! Nodes form a parented graph of quads, text labels, and grouping nodes in
//! world space. The graph answers ray queries (which primitive does a pointer
//! ray strike first), and a small tween engine interpolates node properties
//! over time for entrance/exit transitions and layout changes.
//!
//! Rendering proper lives elsewhere; this crate models exactly what layout
//! and hit-testing need: positions, extents, and colors.
//!
//! # Example
//!
//! ```rust
//! use taskscreen_scene::{Camera, NodeKind, SceneGraph, Surface};
//! use glam::Vec3;
//!
//! let mut scene = SceneGraph::new();
//! let quad = scene.spawn(NodeKind::Surface(Surface::new(2.0, 1.0)));
//! scene.place(quad, Vec3::ZERO).unwrap();
//!
//! let camera = Camera::default();
//! let (origin, dir) = camera.screen_ray(glam::Vec2::ZERO);
//! let hit = scene.cast_ray(origin, dir, &[quad]);
//! assert!(hit.is_some());
//! ```

pub mod camera;
pub mod graph;
pub mod primitive;
pub mod tween;

pub use camera::Camera;
pub use graph::{Node, NodeId, NodeKind, RayHit, SceneError, SceneGraph};
pub use primitive::{Label, Surface};
pub use tween::{Easing, TweenId, TweenTarget, Tweens};
