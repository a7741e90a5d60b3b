//! End-to-end interaction scenarios driven through synthetic pointer input.
//!
//! Every scenario steers the real pipeline: pixels in, projected through the
//! camera, resolved against the scene graph, dispatched against the store.

use taskscreen_board::{
    pointer, Board, BoardEvent, BoardParams, CursorStyle, InteractionMode,
};
use taskscreen_core::Role;
use taskscreen_scene::NodeId;

const DT: f32 = 1.0 / 60.0;

fn board() -> Board {
    Board::new(BoardParams::default()).expect("board assembles")
}

/// Aim the pointer at a node's center by projecting it to pixels.
fn point_at(board: &mut Board, node: NodeId) {
    let world = board
        .scene()
        .world_position(node)
        .expect("node should exist");
    let ndc = board
        .camera()
        .project_point(world)
        .expect("node should be in front of the camera");
    let (x, y) = pointer::to_pixel(ndc, board.viewport());
    board.pointer_moved(x, y);
}

/// Park the pointer where nothing is hit-testable.
fn point_nowhere(board: &mut Board) {
    board.pointer_moved(1.0, 1.0);
}

/// Tick until all transitions settle.
fn settle(board: &mut Board) {
    for _ in 0..240 {
        board.tick(DT);
        if board.is_settled() {
            break;
        }
    }
    assert!(board.is_settled(), "transitions should settle");
}

fn click(board: &mut Board, node: NodeId) {
    point_at(board, node);
    board.activate();
}

fn add_task(board: &mut Board, text: &str) {
    board.set_pending_text(text);
    let add = board.control_node(Role::Add).expect("add control");
    click(board, add);
    settle(board);
}

fn count_kind(events: &[BoardEvent], kind: &str) -> usize {
    events.iter().filter(|event| event.kind() == kind).count()
}

#[test]
fn add_four_then_remove_last_keeps_order_and_depths() {
    let mut board = board();
    for text in ["Finish homework", "Buy groceries", "Clean room", "Call mom"] {
        add_task(&mut board, text);
    }
    assert_eq!(board.tasks().len(), 4);

    let delete = board.control_node(Role::DeleteLast).expect("delete control");
    click(&mut board, delete);
    point_nowhere(&mut board);
    settle(&mut board);

    let texts: Vec<&str> = board.tasks().iter().map(|task| task.text()).collect();
    assert_eq!(texts, vec!["Finish homework", "Buy groceries", "Clean room"]);
    let indices: Vec<usize> = board.tasks().iter().map(|task| task.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);

    // Every surviving row sits at a distinct depth.
    let mut depths: Vec<f32> = board
        .tasks()
        .iter()
        .map(|task| {
            board
                .scene()
                .world_position(task.visuals.row)
                .expect("row exists")
                .z
        })
        .collect();
    let before = depths.clone();
    depths.sort_by(f32::total_cmp);
    depths.dedup();
    assert_eq!(depths.len(), before.len());
}

#[test]
fn blank_input_never_creates_a_task() {
    let mut board = board();
    for text in ["", "   "] {
        board.set_pending_text(text);
        let add = board.control_node(Role::Add).expect("add control");
        click(&mut board, add);
    }
    settle(&mut board);

    assert!(board.tasks().is_empty());
    let events = board.drain_events();
    assert_eq!(count_kind(&events, "discarded"), 2);
    assert_eq!(count_kind(&events, "task_added"), 0);
    // Failed adds do not clear the field.
    assert_eq!(board.pending_text(), "   ");
}

#[test]
fn successful_add_clears_the_pending_field() {
    let mut board = board();
    add_task(&mut board, "  Buy milk  ");

    assert_eq!(board.pending_text(), "");
    assert_eq!(board.tasks()[0].text(), "Buy milk");
}

#[test]
fn tail_delete_on_an_empty_list_is_absorbed() {
    let mut board = board();
    let delete = board.control_node(Role::DeleteLast).expect("delete control");
    click(&mut board, delete);
    settle(&mut board);

    let events = board.drain_events();
    assert!(events
        .iter()
        .any(|event| matches!(event, BoardEvent::Discarded { reason } if *reason == "list_underflow")));
    assert!(board.tasks().is_empty());
}

#[test]
fn hover_edges_fire_once_per_transition() {
    let mut board = board();
    let add = board.control_node(Role::Add).expect("add control");
    board.drain_events();

    point_at(&mut board, add);
    for _ in 0..5 {
        board.tick(DT);
    }
    let events = board.drain_events();
    assert_eq!(count_kind(&events, "hover_entered"), 1);
    assert_eq!(count_kind(&events, "hover_left"), 0);
    assert_eq!(board.cursor(), CursorStyle::Pointer);

    point_nowhere(&mut board);
    for _ in 0..5 {
        board.tick(DT);
    }
    let events = board.drain_events();
    assert_eq!(count_kind(&events, "hover_left"), 1);
    assert_eq!(board.cursor(), CursorStyle::Default);
}

#[test]
fn delete_mode_retints_then_removes_the_clicked_record() {
    let mut board = board();
    add_task(&mut board, "Finish homework");
    add_task(&mut board, "Buy groceries");
    board.drain_events();

    let mode = board.control_node(Role::ModeToggle).expect("mode control");
    click(&mut board, mode);
    assert_eq!(board.mode(), InteractionMode::Delete);

    let armed = BoardParams::default().palette.row_armed;
    for task in board.tasks() {
        let node = board.scene().node(task.visuals.background).expect("row bg");
        match &node.kind {
            taskscreen_scene::NodeKind::Surface(surface) => {
                assert_eq!(surface.tint, Some(armed));
            }
            _ => panic!("row background should be a surface"),
        }
    }

    // Click the FIRST task, not the tail.
    let first = board.tasks()[0].clone();
    click(&mut board, first.visuals.background);
    point_nowhere(&mut board);
    settle(&mut board);

    assert_eq!(board.mode(), InteractionMode::Normal);
    assert_eq!(board.tasks().len(), 1);
    assert_eq!(board.tasks()[0].text(), "Buy groceries");
    assert_eq!(board.tasks()[0].index, 0);

    // Survivor slid up to the top slot and its armed tint is gone.
    let expected = BoardParams::default().layout.slot(0);
    let position = board
        .scene()
        .node(board.tasks()[0].visuals.row)
        .expect("row exists")
        .position;
    assert!((position - expected).length() < 1e-5);
    let node = board
        .scene()
        .node(board.tasks()[0].visuals.background)
        .expect("row bg");
    match &node.kind {
        taskscreen_scene::NodeKind::Surface(surface) => assert_eq!(surface.tint, None),
        _ => panic!("row background should be a surface"),
    }
}

#[test]
fn delete_mode_needs_a_non_empty_list() {
    let mut board = board();
    let mode = board.control_node(Role::ModeToggle).expect("mode control");
    click(&mut board, mode);

    assert_eq!(board.mode(), InteractionMode::Normal);
    let events = board.drain_events();
    assert!(events
        .iter()
        .any(|event| matches!(event, BoardEvent::Discarded { reason } if *reason == "empty_list_mode")));
}

#[test]
fn double_activation_removes_exactly_one_record() {
    let mut board = board();
    add_task(&mut board, "Call mom");
    let mode = board.control_node(Role::ModeToggle).expect("mode control");
    click(&mut board, mode);
    board.drain_events();

    let row = board.tasks()[0].visuals.background;
    point_at(&mut board, row);
    // Two activation signals with no tick in between: the second re-resolves
    // against the already-mutated graph and must fall through.
    board.activate();
    board.activate();
    point_nowhere(&mut board);
    settle(&mut board);

    let events = board.drain_events();
    assert_eq!(count_kind(&events, "task_removal_started"), 1);
    assert_eq!(count_kind(&events, "task_removed"), 1);
    assert!(board.tasks().is_empty());
}

#[test]
fn checkbox_click_toggles_done_synchronously() {
    let mut board = board();
    add_task(&mut board, "Clean room");
    board.drain_events();

    let checkbox = board.tasks()[0].visuals.checkbox;
    click(&mut board, checkbox);
    assert!(board.tasks()[0].done);

    click(&mut board, checkbox);
    assert!(!board.tasks()[0].done);

    let events = board.drain_events();
    assert_eq!(count_kind(&events, "done_toggled"), 2);
}

#[test]
fn removal_mid_entrance_still_settles_clean() {
    let mut board = board();
    board.set_pending_text("Buy groceries");
    let add = board.control_node(Role::Add).expect("add control");
    click(&mut board, add);

    // Two ticks in: the entrance transition is still running.
    board.tick(DT);
    board.tick(DT);
    assert!(!board.is_settled());

    let delete = board.control_node(Role::DeleteLast).expect("delete control");
    click(&mut board, delete);
    point_nowhere(&mut board);
    settle(&mut board);

    assert!(board.tasks().is_empty());
}

#[test]
fn pointer_off_the_board_keeps_the_default_cursor() {
    let mut board = board();
    point_nowhere(&mut board);
    board.tick(DT);
    assert_eq!(board.cursor(), CursorStyle::Default);
}
