//! Scripted pointer sessions: JSON steps replayed at a fixed tick rate.
//!
//! Each step fires its actions when it begins (in move, text, click order)
//! and then dwells for `duration` seconds before the next step starts.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct ScriptFile {
    steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ScriptStep {
    duration: f32,
    #[serde(default)]
    move_to: Option<[f32; 2]>,
    /// Named pointer target, resolved against the live board:
    /// `add`, `delete`, `mode`, `task:N`, `checkbox:N`.
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    click: bool,
}

/// One pointer/input action due this tick.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptAction {
    /// Move the pointer to explicit pixel coordinates.
    MoveTo(f32, f32),
    /// Move the pointer to a named board target.
    MoveToTarget(String),
    /// Replace the pending input text.
    SetText(String),
    /// Fire an activation signal.
    Click,
}

/// Replays a parsed script step by step.
pub struct ScriptPlayer {
    steps: Vec<ScriptStep>,
    index: usize,
    time_in_step: f32,
    entered: bool,
}

/// Built-in demo: add four tasks, toggle a checkbox, delete the tail, then
/// remove one specific task through delete mode.
const DEMO_SCRIPT: &str = r#"{
  "steps": [
    { "duration": 0.5 },
    { "duration": 0.4, "text": "Finish homework" },
    { "duration": 0.6, "target": "add", "click": true },
    { "duration": 0.4, "text": "Buy groceries" },
    { "duration": 0.6, "target": "add", "click": true },
    { "duration": 0.4, "text": "Clean room" },
    { "duration": 0.6, "target": "add", "click": true },
    { "duration": 0.4, "text": "Call mom" },
    { "duration": 0.6, "target": "add", "click": true },
    { "duration": 0.6, "target": "checkbox:0", "click": true },
    { "duration": 0.6, "target": "delete", "click": true },
    { "duration": 0.6, "target": "mode", "click": true },
    { "duration": 0.6, "target": "task:1", "click": true },
    { "duration": 1.0, "move_to": [10.0, 10.0] }
  ]
}"#;

impl ScriptPlayer {
    /// Load a script from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a script from JSON text.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: ScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("pointer script contains no steps");
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            time_in_step: 0.0,
            entered: false,
        })
    }

    /// The built-in demo session.
    pub fn demo() -> Result<Self> {
        Self::from_json(DEMO_SCRIPT)
    }

    /// Advance playback by `dt` seconds, returning the actions that fire.
    pub fn advance(&mut self, dt: f32) -> Vec<ScriptAction> {
        let mut actions = Vec::new();
        if self.index >= self.steps.len() {
            return actions;
        }

        if !self.entered {
            self.emit(self.index, &mut actions);
            self.entered = true;
        }

        self.time_in_step += dt;
        while self.index < self.steps.len() && self.time_in_step >= self.steps[self.index].duration
        {
            self.time_in_step -= self.steps[self.index].duration;
            self.index += 1;
            if self.index < self.steps.len() {
                self.emit(self.index, &mut actions);
            }
        }
        actions
    }

    /// Whether every step has played out.
    pub fn finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    fn emit(&self, index: usize, actions: &mut Vec<ScriptAction>) {
        let step = &self.steps[index];
        if let Some([x, y]) = step.move_to {
            actions.push(ScriptAction::MoveTo(x, y));
        }
        if let Some(target) = &step.target {
            actions.push(ScriptAction::MoveToTarget(target.clone()));
        }
        if let Some(text) = &step.text {
            actions.push(ScriptAction::SetText(text.clone()));
        }
        if step.click {
            actions.push(ScriptAction::Click);
        }
    }
}
