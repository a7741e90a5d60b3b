//! Board facade: assembles the virtual screen and owns the interaction loop.

use crate::dispatcher::{CursorStyle, Dispatcher, HoverChange};
use crate::handle::{HandleMap, InteractiveHandle};
use crate::mode::{InteractionMode, ModeController};
use crate::pointer::PointerTracker;
use crate::resolver::{HitResolver, ResolvedHit};
use crate::store::{Discard, Layout, TaskRecord, TaskStore, TaskVisuals};
use glam::Vec3;
use taskscreen_core::{Role, TaskId};
use taskscreen_scene::{
    Camera, Easing, Label, NodeId, NodeKind, SceneError, SceneGraph, Surface, TweenId,
    TweenTarget, Tweens,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Extent of the virtual screen panel (width, height).
const SCREEN_SIZE: (f32, f32) = (3.0, 4.0);
/// Extent of a control button.
const BUTTON_SIZE: (f32, f32) = (0.9, 0.36);
/// Extent of a task row background.
const ROW_SIZE: (f32, f32) = (2.6, 0.45);
/// Side length of the done checkbox.
const CHECKBOX_SIZE: f32 = 0.26;

/// Colors for every board element.
#[derive(Debug, Clone)]
pub struct Palette {
    /// Screen panel background.
    pub panel: [f32; 4],
    /// Header text.
    pub header_text: [f32; 4],
    /// Pending-input readout text.
    pub input_text: [f32; 4],
    /// Control button background.
    pub button: [f32; 4],
    /// Hovered control tint.
    pub button_hover: [f32; 4],
    /// Control button label.
    pub button_text: [f32; 4],
    /// Task row background.
    pub row: [f32; 4],
    /// Hovered task row tint.
    pub row_hover: [f32; 4],
    /// Task row tint while delete mode is armed.
    pub row_armed: [f32; 4],
    /// Task row label.
    pub row_text: [f32; 4],
    /// Task row label once the task is done.
    pub row_text_done: [f32; 4],
    /// Unchecked checkbox.
    pub checkbox: [f32; 4],
    /// Checked checkbox.
    pub checkbox_done: [f32; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            panel: [1.0, 1.0, 1.0, 1.0],
            header_text: [0.12, 0.12, 0.12, 1.0],
            input_text: [0.35, 0.35, 0.35, 1.0],
            button: [0.8, 0.8, 0.8, 1.0],
            button_hover: [1.0, 1.0, 0.6, 1.0],
            button_text: [0.12, 0.12, 0.12, 1.0],
            row: [0.92, 0.92, 0.92, 1.0],
            row_hover: [0.85, 0.9, 1.0, 1.0],
            row_armed: [1.0, 0.6, 0.6, 1.0],
            row_text: [0.12, 0.12, 0.12, 1.0],
            row_text_done: [0.55, 0.55, 0.55, 1.0],
            checkbox: [0.75, 0.75, 0.75, 1.0],
            checkbox_done: [0.35, 0.8, 0.4, 1.0],
        }
    }
}

/// Geometry and timing knobs for a board.
#[derive(Debug, Clone)]
pub struct BoardParams {
    /// Viewport size in pixels.
    pub viewport: (u32, u32),
    /// Task row layout.
    pub layout: Layout,
    /// Entrance transition length in seconds.
    pub enter_duration: f32,
    /// Exit transition length in seconds.
    pub exit_duration: f32,
    /// Reflow glide length in seconds.
    pub reflow_duration: f32,
    /// Colors.
    pub palette: Palette,
}

impl Default for BoardParams {
    fn default() -> Self {
        Self {
            viewport: (1280, 720),
            layout: Layout::default(),
            enter_duration: 0.25,
            exit_duration: 0.2,
            reflow_duration: 0.15,
            palette: Palette::default(),
        }
    }
}

/// Observable interaction event, drained by the caller each tick.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// A record entered the list.
    TaskAdded {
        /// New record id.
        id: TaskId,
        /// Record text.
        text: String,
    },
    /// A record's exit transition started.
    TaskRemovalStarted {
        /// Record id.
        id: TaskId,
    },
    /// A record's exit settled and it left the list.
    TaskRemoved {
        /// Record id.
        id: TaskId,
    },
    /// A record's done flag flipped.
    DoneToggled {
        /// Record id.
        id: TaskId,
        /// New flag value.
        done: bool,
    },
    /// The pointer entered an interactive surface.
    HoverEntered {
        /// Role of the entered surface.
        role: Role,
    },
    /// The pointer left an interactive surface.
    HoverLeft {
        /// Role of the left surface.
        role: Role,
    },
    /// Delete mode armed.
    DeleteModeArmed,
    /// Delete mode released by a successful removal.
    DeleteModeDisarmed,
    /// An operation was absorbed as a no-op.
    Discarded {
        /// Stable reason label.
        reason: &'static str,
    },
}

impl BoardEvent {
    /// Stable kind label for logs and event records.
    pub fn kind(&self) -> &'static str {
        match self {
            BoardEvent::TaskAdded { .. } => "task_added",
            BoardEvent::TaskRemovalStarted { .. } => "task_removal_started",
            BoardEvent::TaskRemoved { .. } => "task_removed",
            BoardEvent::DoneToggled { .. } => "done_toggled",
            BoardEvent::HoverEntered { .. } => "hover_entered",
            BoardEvent::HoverLeft { .. } => "hover_left",
            BoardEvent::DeleteModeArmed => "delete_mode_armed",
            BoardEvent::DeleteModeDisarmed => "delete_mode_disarmed",
            BoardEvent::Discarded { .. } => "discarded",
        }
    }

    /// Human-readable payload for logs and event records.
    pub fn payload(&self) -> String {
        match self {
            BoardEvent::TaskAdded { id, text } => format!("#{} {}", id.0, text),
            BoardEvent::TaskRemovalStarted { id } | BoardEvent::TaskRemoved { id } => {
                format!("#{}", id.0)
            }
            BoardEvent::DoneToggled { id, done } => format!("#{} done={}", id.0, done),
            BoardEvent::HoverEntered { role } | BoardEvent::HoverLeft { role } => {
                role.as_str().to_string()
            }
            BoardEvent::DeleteModeArmed | BoardEvent::DeleteModeDisarmed => String::new(),
            BoardEvent::Discarded { reason } => (*reason).to_string(),
        }
    }
}

/// Fixed nodes created at assembly time.
#[derive(Debug, Clone, Copy)]
struct Controls {
    screen: NodeId,
    add_button: NodeId,
    add_label: NodeId,
    delete_button: NodeId,
    delete_label: NodeId,
    mode_button: NodeId,
    mode_label: NodeId,
    input_readout: NodeId,
}

/// The assembled task board.
///
/// Owns the scene graph, the interaction pipeline, and the task store, and
/// advances them all from a single per-tick entry point. Pointer moves and
/// activations may arrive between ticks; hover is re-resolved each tick and
/// activations re-resolve at signal time against the current graph.
pub struct Board {
    scene: SceneGraph,
    camera: Camera,
    pointer: PointerTracker,
    resolver: HitResolver,
    dispatcher: Dispatcher,
    handles: HandleMap,
    store: TaskStore,
    mode: ModeController,
    tweens: Tweens,
    params: BoardParams,
    controls: Controls,
    pending_text: String,
    exit_tweens: HashMap<TweenId, TaskId>,
    events: Vec<BoardEvent>,
}

impl Board {
    /// Assemble a board with an empty task list.
    pub fn new(params: BoardParams) -> Result<Self, SceneError> {
        let mut scene = SceneGraph::new();
        let mut camera = Camera::default();
        camera.set_aspect(params.viewport.0, params.viewport.1);

        let eps = params.layout.depth_epsilon;
        let palette = &params.palette;

        let screen = scene.spawn(NodeKind::Group);
        scene.spawn_in(
            screen,
            NodeKind::Surface(
                Surface::new(SCREEN_SIZE.0, SCREEN_SIZE.1).with_color(palette.panel),
            ),
            Vec3::ZERO,
        )?;
        spawn_label(
            &mut scene,
            screen,
            "TODO",
            0.4,
            palette.header_text,
            Vec3::new(0.0, 1.6, eps),
        )?;
        let input_readout = spawn_label(
            &mut scene,
            screen,
            "",
            0.22,
            palette.input_text,
            Vec3::new(0.0, 1.2, eps),
        )?;

        let button_y = -1.6;
        let (add_button, add_label) = spawn_button(
            &mut scene,
            screen,
            "Add",
            Vec3::new(-0.98, button_y, eps),
            palette,
            eps,
        )?;
        let (delete_button, delete_label) = spawn_button(
            &mut scene,
            screen,
            "Delete",
            Vec3::new(0.0, button_y, eps),
            palette,
            eps,
        )?;
        let (mode_button, mode_label) = spawn_button(
            &mut scene,
            screen,
            "Del Mode",
            Vec3::new(0.98, button_y, eps),
            palette,
            eps,
        )?;

        let mut handles = HandleMap::new();
        handles.bind(add_button, Role::Add, None);
        handles.bind(delete_button, Role::DeleteLast, None);
        handles.bind(mode_button, Role::ModeToggle, None);

        let controls = Controls {
            screen,
            add_button,
            add_label,
            delete_button,
            delete_label,
            mode_button,
            mode_label,
            input_readout,
        };

        let mut board = Self {
            scene,
            camera,
            pointer: PointerTracker::new(params.viewport),
            resolver: HitResolver::new(),
            dispatcher: Dispatcher::new(),
            handles,
            store: TaskStore::new(),
            mode: ModeController::new(),
            tweens: Tweens::new(),
            params,
            controls,
            pending_text: String::new(),
            exit_tweens: HashMap::new(),
            events: Vec::new(),
        };
        board.rebuild_candidates();
        info!("board assembled");
        Ok(board)
    }

    // === Input ===

    /// Update the viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.pointer.set_viewport(width, height);
        self.camera.set_aspect(width, height);
    }

    /// Record a pointer move in viewport pixels.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.pointer_moved(x, y);
    }

    /// Replace the pending input text (the external text field's contents).
    pub fn set_pending_text(&mut self, text: impl Into<String>) {
        self.pending_text = text.into();
        if let Some(label) = self.scene.label_mut(self.controls.input_readout) {
            label.set_text(self.pending_text.clone());
            label.sync();
        }
    }

    /// Process one activation signal (a discrete click/tap).
    ///
    /// The hit is re-resolved here, at signal time, so back-to-back clicks
    /// act on the post-mutation scene rather than a stale hover snapshot.
    pub fn activate(&mut self) {
        let resolved = self.resolve_now();
        let Some(handle) = self.dispatcher.activate(resolved) else {
            return;
        };
        match handle.role {
            Role::Add => self.add_task(),
            Role::DeleteLast => self.remove_tail(),
            Role::ModeToggle => self.toggle_delete_mode(),
            Role::Task => self.task_clicked(handle.target),
            Role::Checkbox => self.checkbox_clicked(handle.target),
        }
    }

    /// Advance one frame: re-resolve hover, then step transitions.
    pub fn tick(&mut self, dt: f32) {
        let resolved = self.resolve_now();
        let change = self.dispatcher.hover(resolved);
        if change.is_transition() {
            self.apply_hover(change);
        }

        let completed = self.tweens.tick(dt, &mut self.scene);
        for tween in completed {
            if let Some(id) = self.exit_tweens.remove(&tween) {
                self.finalize_removal(id);
            }
        }
    }

    // === Accessors ===

    /// The scene graph.
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// The camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Current viewport size in pixels.
    pub fn viewport(&self) -> (u32, u32) {
        self.pointer.viewport()
    }

    /// Current cursor affordance.
    pub fn cursor(&self) -> CursorStyle {
        self.dispatcher.cursor()
    }

    /// Current interaction mode.
    pub fn mode(&self) -> InteractionMode {
        self.mode.mode()
    }

    /// The task store.
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// All task records in list order.
    pub fn tasks(&self) -> &[TaskRecord] {
        self.store.records()
    }

    /// Pending input text.
    pub fn pending_text(&self) -> &str {
        &self.pending_text
    }

    /// Whether all transitions have settled.
    pub fn is_settled(&self) -> bool {
        self.tweens.is_empty() && self.exit_tweens.is_empty()
    }

    /// Scene node of a fixed control, for session tooling and tests.
    pub fn control_node(&self, role: Role) -> Option<NodeId> {
        match role {
            Role::Add => Some(self.controls.add_button),
            Role::DeleteLast => Some(self.controls.delete_button),
            Role::ModeToggle => Some(self.controls.mode_button),
            Role::Task | Role::Checkbox => None,
        }
    }

    /// Drain events accumulated since the last call.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    // === Dispatch targets ===

    fn resolve_now(&self) -> Option<ResolvedHit> {
        let ndc = self.pointer.ndc()?;
        self.resolver
            .resolve(&self.scene, &self.camera, ndc, &self.handles)
    }

    fn add_task(&mut self) {
        let text = self.pending_text.trim().to_string();
        if text.is_empty() {
            self.discard(Discard::EmptyInput);
            return;
        }

        let slot = self.params.layout.slot(self.store.len());
        let visuals = match self.spawn_task_visuals(&text, slot) {
            Ok(visuals) => visuals,
            Err(err) => {
                warn!("failed to assemble a task row: {err}");
                return;
            }
        };
        let id = match self.store.append(&text, visuals) {
            Ok(id) => id,
            Err(reason) => {
                self.scene.remove(visuals.row);
                self.discard(reason);
                return;
            }
        };

        self.handles.bind(visuals.background, Role::Task, Some(id));
        self.handles.bind(visuals.checkbox, Role::Checkbox, Some(id));
        if self.mode.is_delete() {
            if let Some(surface) = self.scene.surface_mut(visuals.background) {
                surface.tint = Some(self.params.palette.row_armed);
            }
        }
        self.rebuild_candidates();
        self.tweens.animate(
            visuals.row,
            TweenTarget::Scale { from: 0.0, to: 1.0 },
            self.params.enter_duration,
            Easing::EaseOut,
        );
        self.set_pending_text("");
        info!(task = id.0, "task added");
        self.events.push(BoardEvent::TaskAdded { id, text });
    }

    fn remove_tail(&mut self) {
        let Some(id) = self.store.tail().map(|record| record.id) else {
            self.discard(Discard::ListUnderflow);
            return;
        };
        self.begin_removal(id);
    }

    fn task_clicked(&mut self, target: Option<TaskId>) {
        if !self.mode.is_delete() {
            debug!("task click ignored outside delete mode");
            return;
        }
        let Some(id) = target else { return };
        self.begin_removal(id);
    }

    fn checkbox_clicked(&mut self, target: Option<TaskId>) {
        let Some(id) = target else { return };
        match self.store.toggle_done(id) {
            Ok(done) => {
                self.restyle_done(id, done);
                self.events.push(BoardEvent::DoneToggled { id, done });
            }
            Err(reason) => self.discard(reason),
        }
    }

    fn toggle_delete_mode(&mut self) {
        if self.mode.is_delete() {
            debug!("delete-mode toggle ignored while armed");
            return;
        }
        match self.mode.request_arm(self.store.active_len()) {
            Ok(()) => {
                self.restyle_mode(true);
                info!("delete mode armed");
                self.events.push(BoardEvent::DeleteModeArmed);
            }
            Err(reason) => self.discard(reason),
        }
    }

    // === Internals ===

    fn begin_removal(&mut self, id: TaskId) -> bool {
        let visuals = match self.store.begin_remove(id) {
            Ok(record) => record.visuals,
            Err(reason) => {
                self.discard(reason);
                return false;
            }
        };

        // The row leaves the hit-testable set immediately; its exit may start
        // from a partial entrance scale.
        self.handles.unbind(visuals.background);
        self.handles.unbind(visuals.checkbox);
        self.rebuild_candidates();

        let from = self
            .scene
            .node(visuals.row)
            .map(|node| node.scale)
            .unwrap_or(1.0);
        let tween = self.tweens.animate(
            visuals.row,
            TweenTarget::Scale { from, to: 0.0 },
            self.params.exit_duration,
            Easing::EaseOut,
        );
        self.exit_tweens.insert(tween, id);
        self.events.push(BoardEvent::TaskRemovalStarted { id });

        // A successful deletion is what releases delete mode.
        if self.mode.notify_removed() {
            self.restyle_mode(false);
            self.events.push(BoardEvent::DeleteModeDisarmed);
        }
        true
    }

    fn finalize_removal(&mut self, id: TaskId) {
        let Some(record) = self.store.finalize_remove(id) else {
            return;
        };
        let row = record.visuals.row;
        if let Err(err) = self.scene.detach(self.controls.screen, row) {
            debug!("row already detached: {err}");
        }
        self.scene.remove(row);
        self.rebuild_candidates();

        // Survivors glide to their recomputed slots.
        for (task, slot) in self.store.reflow(&self.params.layout) {
            let Some(record) = self.store.get(task) else {
                continue;
            };
            let row = record.visuals.row;
            let Some(current) = self.scene.node(row).map(|node| node.position) else {
                continue;
            };
            if (current - slot).length_squared() > f32::EPSILON {
                self.tweens.animate(
                    row,
                    TweenTarget::Position {
                        from: current,
                        to: slot,
                    },
                    self.params.reflow_duration,
                    Easing::EaseOut,
                );
            }
        }
        info!(task = id.0, "task removed");
        self.events.push(BoardEvent::TaskRemoved { id });
    }

    fn spawn_task_visuals(
        &mut self,
        text: &str,
        slot: Vec3,
    ) -> Result<TaskVisuals, SceneError> {
        let eps = self.params.layout.depth_epsilon;
        let palette = self.params.palette.clone();

        let row = self
            .scene
            .spawn_in(self.controls.screen, NodeKind::Group, slot)?;
        // Entrance transitions grow the row from nothing.
        self.scene.set_scale(row, 0.0)?;
        // Checkbox and label hang off the background so hits on either walk
        // up to a role-bearing node.
        let background = self.scene.spawn_in(
            row,
            NodeKind::Surface(Surface::new(ROW_SIZE.0, ROW_SIZE.1).with_color(palette.row)),
            Vec3::ZERO,
        )?;
        let checkbox = self.scene.spawn_in(
            background,
            NodeKind::Surface(
                Surface::new(CHECKBOX_SIZE, CHECKBOX_SIZE).with_color(palette.checkbox),
            ),
            Vec3::new(-1.05, 0.0, eps),
        )?;
        let label = spawn_label(
            &mut self.scene,
            background,
            text,
            0.2,
            palette.row_text,
            Vec3::new(0.15, 0.0, eps),
        )?;
        Ok(TaskVisuals {
            row,
            background,
            label,
            checkbox,
        })
    }

    fn apply_hover(&mut self, change: HoverChange) {
        if let Some(handle) = change.left {
            let tint = self.resting_tint(handle);
            if let Some(surface) = self.scene.surface_mut(handle.node) {
                surface.tint = tint;
            }
            self.events.push(BoardEvent::HoverLeft { role: handle.role });
        }
        if let Some(handle) = change.entered {
            let tint = Some(self.hover_tint(handle));
            if let Some(surface) = self.scene.surface_mut(handle.node) {
                surface.tint = tint;
            }
            self.events
                .push(BoardEvent::HoverEntered { role: handle.role });
        }
    }

    /// Tint a surface returns to when the pointer leaves it.
    fn resting_tint(&self, handle: InteractiveHandle) -> Option<[f32; 4]> {
        match handle.role {
            Role::Task | Role::ModeToggle if self.mode.is_delete() => {
                Some(self.params.palette.row_armed)
            }
            _ => None,
        }
    }

    fn hover_tint(&self, handle: InteractiveHandle) -> [f32; 4] {
        match handle.role {
            Role::Task => self.params.palette.row_hover,
            _ => self.params.palette.button_hover,
        }
    }

    fn restyle_mode(&mut self, armed: bool) {
        let armed_tint = armed.then_some(self.params.palette.row_armed);
        let rows: Vec<NodeId> = self
            .store
            .active()
            .map(|record| record.visuals.background)
            .collect();
        for node in rows {
            if let Some(surface) = self.scene.surface_mut(node) {
                surface.tint = armed_tint;
            }
        }
        if let Some(surface) = self.scene.surface_mut(self.controls.mode_button) {
            surface.tint = armed_tint;
        }
    }

    fn restyle_done(&mut self, id: TaskId, done: bool) {
        let Some(visuals) = self.store.get(id).map(|record| record.visuals) else {
            return;
        };
        let palette = self.params.palette.clone();
        if let Some(surface) = self.scene.surface_mut(visuals.checkbox) {
            surface.color = if done {
                palette.checkbox_done
            } else {
                palette.checkbox
            };
        }
        if let Some(label) = self.scene.label_mut(visuals.label) {
            label.color = if done {
                palette.row_text_done
            } else {
                palette.row_text
            };
        }
    }

    fn rebuild_candidates(&mut self) {
        let mut candidates = vec![
            self.controls.add_button,
            self.controls.add_label,
            self.controls.delete_button,
            self.controls.delete_label,
            self.controls.mode_button,
            self.controls.mode_label,
        ];
        for record in self.store.active() {
            candidates.push(record.visuals.background);
            candidates.push(record.visuals.label);
            candidates.push(record.visuals.checkbox);
        }
        self.resolver.rebuild(candidates);
    }

    fn discard(&mut self, reason: Discard) {
        debug!(reason = reason.reason(), "operation absorbed");
        self.events.push(BoardEvent::Discarded {
            reason: reason.reason(),
        });
    }
}

fn spawn_label(
    scene: &mut SceneGraph,
    parent: NodeId,
    text: &str,
    font_size: f32,
    color: [f32; 4],
    position: Vec3,
) -> Result<NodeId, SceneError> {
    let mut label = Label::new(text).with_font_size(font_size).with_color(color);
    label.sync();
    scene.spawn_in(parent, NodeKind::Label(label), position)
}

fn spawn_button(
    scene: &mut SceneGraph,
    parent: NodeId,
    text: &str,
    position: Vec3,
    palette: &Palette,
    eps: f32,
) -> Result<(NodeId, NodeId), SceneError> {
    let button = scene.spawn_in(
        parent,
        NodeKind::Surface(Surface::new(BUTTON_SIZE.0, BUTTON_SIZE.1).with_color(palette.button)),
        position,
    )?;
    let label = spawn_label(
        scene,
        button,
        text,
        0.18,
        palette.button_text,
        Vec3::new(0.0, 0.0, eps),
    )?;
    Ok((button, label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembly_registers_controls_and_no_tasks() {
        let board = Board::new(BoardParams::default()).expect("board assembles");
        assert!(board.tasks().is_empty());
        assert_eq!(board.mode(), InteractionMode::Normal);
        assert!(board.control_node(Role::Add).is_some());
        assert!(board.control_node(Role::DeleteLast).is_some());
        assert!(board.control_node(Role::ModeToggle).is_some());
        // Buttons plus their labels are hit-testable; decoration is not.
        assert_eq!(board.resolver.candidates().len(), 6);
    }

    #[test]
    fn event_labels_are_stable() {
        let added = BoardEvent::TaskAdded {
            id: TaskId(3),
            text: "Buy milk".into(),
        };
        assert_eq!(added.kind(), "task_added");
        assert_eq!(added.payload(), "#3 Buy milk");

        let discarded = BoardEvent::Discarded {
            reason: Discard::EmptyInput.reason(),
        };
        assert_eq!(discarded.payload(), "empty_input");
    }
}
