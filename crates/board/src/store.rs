//! Ordered task list with reflow and stable record identity.

use glam::Vec3;
use taskscreen_core::TaskId;
use taskscreen_scene::NodeId;
use tracing::debug;

/// Why a board operation was absorbed as a no-op.
///
/// None of these are fatal and none propagate; they exist so logs and tests
/// can observe the action simply not occurring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    /// Add activation with blank or whitespace-only text.
    EmptyInput,
    /// Tail-delete activation with no removable records.
    ListUnderflow,
    /// Operation referenced a record that is no longer present.
    StaleTask,
    /// Delete mode requested while the list is empty.
    EmptyListMode,
}

impl Discard {
    /// Stable label used in logs and event payloads.
    pub fn reason(self) -> &'static str {
        match self {
            Discard::EmptyInput => "empty_input",
            Discard::ListUnderflow => "list_underflow",
            Discard::StaleTask => "stale_task",
            Discard::EmptyListMode => "empty_list_mode",
        }
    }
}

/// Scene nodes owned by one task row, destroyed together with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskVisuals {
    /// Row group; the other nodes are positioned relative to it.
    pub row: NodeId,
    /// Row background quad (carries the `Task` role).
    pub background: NodeId,
    /// Task text.
    pub label: NodeId,
    /// Done checkbox (carries the `Checkbox` role).
    pub checkbox: NodeId,
}

/// One TODO entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    /// Stable identity, never reused.
    pub id: TaskId,
    text: String,
    /// Completion flag.
    pub done: bool,
    /// Dense position in the list; reassigned on every mutation.
    pub index: usize,
    /// Whether the exit transition is running; exiting records are no longer
    /// interactive and cannot be removed twice.
    pub exiting: bool,
    /// Scene nodes representing this record.
    pub visuals: TaskVisuals,
}

impl TaskRecord {
    /// Display text, fixed at creation.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Row layout: fixed top anchor, fixed per-row spacing, per-row depth lift.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    /// Y of row 0, relative to the screen group.
    pub top: f32,
    /// Vertical distance between consecutive rows.
    pub spacing: f32,
    /// Per-index depth step keeping coplanar rows apart. Carries no meaning
    /// beyond preventing flicker between nearly-coplanar quads.
    pub depth_epsilon: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            top: 0.9,
            spacing: 0.55,
            depth_epsilon: 0.001,
        }
    }
}

impl Layout {
    /// Target position of the row at `index`, relative to the screen group.
    ///
    /// Depth is a pure function of the current index, strictly increasing
    /// toward the viewer, re-derived on every reflow.
    pub fn slot(&self, index: usize) -> Vec3 {
        Vec3::new(
            0.0,
            self.top - self.spacing * index as f32,
            self.depth_epsilon * (index as f32 + 1.0),
        )
    }
}

/// Ordered collection of task records.
#[derive(Debug, Default)]
pub struct TaskStore {
    records: Vec<TaskRecord>,
    next_id: u64,
}

impl TaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the tail. Blank text (after trimming) is rejected.
    pub fn append(&mut self, text: &str, visuals: TaskVisuals) -> Result<TaskId, Discard> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("discarding append: empty input");
            return Err(Discard::EmptyInput);
        }
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let index = self.records.len();
        self.records.push(TaskRecord {
            id,
            text: trimmed.to_string(),
            done: false,
            index,
            exiting: false,
            visuals,
        });
        Ok(id)
    }

    /// Tail record eligible for a tail delete (not already exiting).
    pub fn tail(&self) -> Option<&TaskRecord> {
        self.records.iter().rev().find(|record| !record.exiting)
    }

    /// Mark `id` as exiting. Stale or already-exiting ids are rejected, which
    /// makes a double activation on the same record a clean no-op.
    pub fn begin_remove(&mut self, id: TaskId) -> Result<&TaskRecord, Discard> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == id && !record.exiting)
            .ok_or(Discard::StaleTask)?;
        record.exiting = true;
        Ok(record)
    }

    /// Drop `id` once its exit transition has settled, re-indexing survivors.
    /// Unknown ids are a no-op.
    pub fn finalize_remove(&mut self, id: TaskId) -> Option<TaskRecord> {
        let position = self.records.iter().position(|record| record.id == id)?;
        let record = self.records.remove(position);
        self.reindex();
        Some(record)
    }

    /// Flip a record's done flag, returning the new value.
    pub fn toggle_done(&mut self, id: TaskId) -> Result<bool, Discard> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == id && !record.exiting)
            .ok_or(Discard::StaleTask)?;
        record.done = !record.done;
        Ok(record.done)
    }

    /// Deterministic layout pass: every record's target position, derived
    /// from its current index.
    pub fn reflow(&self, layout: &Layout) -> Vec<(TaskId, Vec3)> {
        self.records
            .iter()
            .map(|record| (record.id, layout.slot(record.index)))
            .collect()
    }

    /// Look up a record by id.
    pub fn get(&self, id: TaskId) -> Option<&TaskRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// All records in list order, exiting ones included.
    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    /// Records that are still interactive (not exiting), in list order.
    pub fn active(&self) -> impl Iterator<Item = &TaskRecord> {
        self.records.iter().filter(|record| !record.exiting)
    }

    /// Count of records that are still interactive.
    pub fn active_len(&self) -> usize {
        self.active().count()
    }

    /// Total record count, exiting ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn reindex(&mut self) {
        for (index, record) in self.records.iter_mut().enumerate() {
            record.index = index;
        }
    }
}
