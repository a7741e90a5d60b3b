//! Headless session loop: replays a pointer script against a board.

use crate::script::{ScriptAction, ScriptPlayer};
use anyhow::{Context, Result};
use std::path::PathBuf;
use taskscreen_board::{pointer, Board};
use taskscreen_core::{Role, SimTick};
use taskscreen_testkit::{EventRecord, JsonlSink};
use tracing::{debug, info, warn};

pub struct SessionOptions {
    /// Hard cap on session length, in ticks.
    pub max_ticks: u64,
    /// Where to write the JSONL event log, if anywhere.
    pub event_log: Option<PathBuf>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_ticks: 3600,
            event_log: None,
        }
    }
}

#[derive(Debug)]
pub struct SessionSummary {
    pub ticks_run: u64,
    pub events: usize,
    pub tasks_remaining: usize,
}

/// Run the script to completion (or the tick cap), draining board events
/// into the log each tick. Ends once the script has played out and every
/// transition has settled.
pub fn run(
    board: &mut Board,
    player: &mut ScriptPlayer,
    options: &SessionOptions,
) -> Result<SessionSummary> {
    let mut sink = match &options.event_log {
        Some(path) => Some(
            JsonlSink::create(path)
                .with_context(|| format!("creating event log {}", path.display()))?,
        ),
        None => None,
    };

    let dt = SimTick::SECONDS;
    let mut tick = SimTick::ZERO;
    let mut ticks_run = 0;
    let mut events = 0;

    for _ in 0..options.max_ticks {
        for action in player.advance(dt) {
            apply_action(board, action);
        }
        board.tick(dt);

        for event in board.drain_events() {
            debug!(kind = event.kind(), payload = %event.payload(), "board event");
            if let Some(sink) = sink.as_mut() {
                sink.write(&EventRecord {
                    tick,
                    kind: event.kind(),
                    payload: &event.payload(),
                })?;
            }
            events += 1;
        }

        ticks_run += 1;
        tick = tick.advance(1);
        if player.finished() && board.is_settled() {
            break;
        }
    }

    let summary = SessionSummary {
        ticks_run,
        events,
        tasks_remaining: board.store().active_len(),
    };
    info!(
        ticks = summary.ticks_run,
        events = summary.events,
        tasks = summary.tasks_remaining,
        "session finished"
    );
    Ok(summary)
}

fn apply_action(board: &mut Board, action: ScriptAction) {
    match action {
        ScriptAction::MoveTo(x, y) => board.pointer_moved(x, y),
        ScriptAction::MoveToTarget(name) => match resolve_target(board, &name) {
            Some((x, y)) => board.pointer_moved(x, y),
            None => warn!("script target {name:?} did not resolve"),
        },
        ScriptAction::SetText(text) => board.set_pending_text(text),
        ScriptAction::Click => board.activate(),
    }
}

/// Map a script target name to pixel coordinates via the camera.
fn resolve_target(board: &Board, name: &str) -> Option<(f32, f32)> {
    let node = match name {
        "add" => board.control_node(Role::Add),
        "delete" => board.control_node(Role::DeleteLast),
        "mode" => board.control_node(Role::ModeToggle),
        _ => {
            let (kind, index) = name.split_once(':')?;
            let index: usize = index.parse().ok()?;
            let record = board.tasks().get(index)?;
            match kind {
                "task" => Some(record.visuals.background),
                "checkbox" => Some(record.visuals.checkbox),
                _ => None,
            }
        }
    }?;
    let world = board.scene().world_position(node)?;
    let ndc = board.camera().project_point(world)?;
    Some(pointer::to_pixel(ndc, board.viewport()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskscreen_board::BoardParams;

    fn demo_summary(event_log: Option<PathBuf>) -> SessionSummary {
        let mut board = Board::new(BoardParams::default()).expect("board assembles");
        let mut player = ScriptPlayer::demo().expect("demo parses");
        let options = SessionOptions {
            max_ticks: 3600,
            event_log,
        };
        run(&mut board, &mut player, &options).expect("session runs")
    }

    #[test]
    fn demo_session_ends_with_two_tasks() {
        let summary = demo_summary(None);
        // Four adds, one tail delete, one delete-mode removal.
        assert_eq!(summary.tasks_remaining, 2);
        assert!(summary.ticks_run < 3600, "session should end early");
    }

    #[test]
    fn demo_session_writes_a_complete_event_log() {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("taskscreen-session-{timestamp}.jsonl"));

        demo_summary(Some(path.clone()));

        let contents = std::fs::read_to_string(&path).expect("log readable");
        let count = |kind: &str| {
            contents
                .lines()
                .filter(|line| line.contains(&format!("\"kind\":\"{kind}\"")))
                .count()
        };
        assert_eq!(count("task_added"), 4);
        assert_eq!(count("done_toggled"), 1);
        assert_eq!(count("task_removed"), 2);
        assert_eq!(count("delete_mode_armed"), 1);
        assert_eq!(count("delete_mode_disarmed"), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let mut board = Board::new(BoardParams::default()).expect("board assembles");
        apply_action(&mut board, ScriptAction::MoveToTarget("task:42".into()));
        apply_action(&mut board, ScriptAction::MoveToTarget("bogus".into()));
        apply_action(&mut board, ScriptAction::Click);
        board.tick(SimTick::SECONDS);
        assert!(board.tasks().is_empty());
    }
}
