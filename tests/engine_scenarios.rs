use eframe::egui::{Vec2, vec2};

use effort_map::config::{EngineConfig, LayoutKind};
use effort_map::engine::{DragOutcome, MapEngine, Viewport};
use effort_map::model::{Link, Node, ProjectModel, Status};

fn chain(b_status: Status) -> ProjectModel {
    ProjectModel::new(
        vec![
            Node::new("a", "A").with_estimates(100.0, 10.0),
            Node::new("b", "B").with_estimates(50.0, 5.0).with_status(b_status),
            Node::new("c", "C").with_estimates(25.0, 2.5),
        ],
        vec![Link::new("l1", "a", "b"), Link::new("l2", "b", "c")],
    )
}

/// Root with two branches; `p` carries a small subtree.
fn branching() -> ProjectModel {
    ProjectModel::new(
        vec![
            Node::new("root", "Root").with_estimates(10.0, 1.0),
            Node::new("p", "P").with_estimates(40.0, 4.0),
            Node::new("p1", "P1").with_estimates(20.0, 2.0),
            Node::new("p2", "P2").with_estimates(5.0, 1.0),
            Node::new("q", "Q").with_estimates(30.0, 3.0),
            Node::new("q1", "Q1").with_estimates(60.0, 6.0),
        ],
        vec![
            Link::new("l1", "root", "p"),
            Link::new("l2", "p", "p1"),
            Link::new("l3", "p", "p2"),
            Link::new("l4", "root", "q"),
            Link::new("l5", "q", "q1"),
        ],
    )
}

fn engine(kind: LayoutKind) -> MapEngine {
    let mut config = EngineConfig::default();
    config.layout.strategy = kind;
    MapEngine::new(config)
}

fn position(engine: &MapEngine, id: &str) -> Vec2 {
    engine.scene().node(id).unwrap().position
}

fn close(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-3
}

#[test]
fn chain_totals_roll_up_to_the_root() {
    let model = chain(Status::Committed);
    let mut engine = engine(LayoutKind::Radial);
    let scene = engine.recompute(&model, Viewport::default());

    assert_eq!(scene.node("c").unwrap().totals.cost, 25.0);
    assert_eq!(scene.node("b").unwrap().totals.cost, 75.0);
    assert_eq!(scene.node("a").unwrap().totals.cost, 175.0);
    assert_eq!(scene.node("a").unwrap().totals.time, 17.5);
    assert_eq!(scene.root.as_deref(), Some("a"));
}

#[test]
fn shelved_middle_node_cuts_its_branch() {
    let model = chain(Status::Shelved);
    let mut engine = engine(LayoutKind::Radial);
    let scene = engine.recompute(&model, Viewport::default());

    let b = scene.node("b").unwrap();
    assert_eq!(b.totals.cost, 0.0);
    assert_eq!(b.totals.time, 0.0);
    assert_eq!(scene.node("a").unwrap().totals.cost, 100.0);
    assert_eq!(scene.node("c").unwrap().totals.cost, 25.0);

    assert!(!scene.node("a").unwrap().in_shelved_branch);
    assert!(b.in_shelved_branch);
    assert!(scene.node("c").unwrap().in_shelved_branch);
}

#[test]
fn cycles_produce_finite_scene() {
    let model = ProjectModel::new(
        vec![
            Node::new("a", "A").with_estimates(3.0, 1.0),
            Node::new("b", "B").with_estimates(2.0, 1.0),
            Node::new("c", "C").with_estimates(1.0, 1.0),
        ],
        vec![
            Link::new("l1", "a", "b"),
            Link::new("l2", "b", "c"),
            Link::new("l3", "c", "a"),
            Link::new("l4", "b", "b"),
        ],
    );

    for kind in [LayoutKind::Radial, LayoutKind::Force] {
        let mut engine = engine(kind);
        let scene = engine.recompute(&model, Viewport::default());

        assert_eq!(scene.nodes.len(), 3);
        for node in &scene.nodes {
            assert!(node.totals.cost.is_finite());
            assert!(node.position.x.is_finite() && node.position.y.is_finite());
            assert!(node.size.radius > 0.0);
        }
    }
}

#[test]
fn layout_is_deterministic_for_both_strategies() {
    let model = branching();

    for kind in [LayoutKind::Radial, LayoutKind::Force] {
        let mut first = engine(kind);
        let mut second = engine(kind);
        first.recompute(&model, Viewport::default());
        second.recompute(&model, Viewport::default());
        let again = first.recompute(&model, Viewport::default()).clone();

        for node in &model.nodes {
            assert_eq!(position(&first, &node.id), position(&second, &node.id), "{kind:?}");
            assert_eq!(again.node(&node.id).unwrap().position, position(&second, &node.id));
        }
    }
}

#[test]
fn dragging_moves_the_subtree_rigidly_and_locks_it() {
    let mut model = branching();
    let mut engine = engine(LayoutKind::Radial);
    engine.recompute(&model, Viewport::default());

    let before = engine.positions().clone();
    let grab = before.get("p").unwrap();
    let delta = vec2(120.0, -45.0);

    assert!(engine.begin_drag(&model, "p", grab));
    assert!(engine.update_drag(&mut model, grab + delta));
    assert!(engine.is_dragging());

    for id in ["p", "p1", "p2"] {
        assert!(close(engine.positions().get(id).unwrap(), before.get(id).unwrap() + delta));
        assert!(model.node(id).unwrap().position_locked);
    }
    for id in ["root", "q", "q1"] {
        assert_eq!(engine.positions().get(id), before.get(id));
        assert!(!model.node(id).unwrap().position_locked);
    }

    match engine.end_drag() {
        DragOutcome::Moved { node, mut moved } => {
            moved.sort();
            assert_eq!(node, "p");
            assert_eq!(moved, vec!["p", "p1", "p2"]);
        }
        other => panic!("expected a move, got {other:?}"),
    }
    assert!(!engine.refresh_pending());
}

#[test]
fn refresh_during_a_drag_leaves_other_nodes_alone() {
    for kind in [LayoutKind::Radial, LayoutKind::Force] {
        let mut model = branching();
        let mut engine = engine(kind);
        engine.recompute(&model, Viewport::default());

        let before = engine.scene().clone();
        let grab = position(&engine, "p");
        let delta = vec2(-80.0, 150.0);

        engine.begin_drag(&model, "p", grab);
        assert!(engine.update_drag(&mut model, grab + delta));
        engine.request_refresh();
        assert!(!engine.refresh_if_pending(&model, Viewport::default()), "{kind:?}");

        for id in ["root", "q", "q1"] {
            let expected = before.node(id).unwrap().position;
            assert_eq!(position(&engine, id), expected, "{kind:?} {id}");
            assert_eq!(engine.positions().get(id), Some(expected), "{kind:?} {id}");
        }
        for id in ["p", "p1", "p2"] {
            let node = engine.scene().node(id).unwrap();
            assert!(close(node.position, before.node(id).unwrap().position + delta), "{kind:?} {id}");
            assert_eq!(engine.positions().get(id), Some(node.position));
            assert!(node.locked);
        }

        let link = engine.scene().links.iter().find(|link| link.id == "l1").unwrap();
        assert_eq!(link.path.start(), position(&engine, "root").to_pos2());
        assert_eq!(link.path.end(), position(&engine, "p").to_pos2());

        engine.end_drag();
        assert!(engine.refresh_if_pending(&model, Viewport::default()));
    }
}

#[test]
fn radial_pass_after_a_drag_keeps_undragged_nodes_in_place() {
    let mut model = branching();
    let mut engine = engine(LayoutKind::Radial);
    engine.recompute(&model, Viewport::default());
    let before = engine.positions().clone();

    let grab = before.get("p").unwrap();
    engine.begin_drag(&model, "p", grab);
    engine.update_drag(&mut model, grab + vec2(200.0, 90.0));
    engine.end_drag();
    engine.recompute(&model, Viewport::default());

    for id in ["root", "q", "q1"] {
        assert_eq!(engine.positions().get(id), before.get(id), "{id}");
    }
}

#[test]
fn press_without_movement_is_a_click() {
    let mut model = branching();
    let mut engine = engine(LayoutKind::Radial);
    engine.recompute(&model, Viewport::default());
    let grab = engine.positions().get("q").unwrap();

    assert!(engine.begin_drag(&model, "q", grab));
    assert!(!engine.update_drag(&mut model, grab + vec2(2.0, -3.0)));

    assert_eq!(engine.end_drag(), DragOutcome::Click { node: "q".to_owned() });
    assert!(model.nodes.iter().all(|node| !node.position_locked));
    assert_eq!(engine.end_drag(), DragOutcome::Idle);
}

#[test]
fn locked_nodes_survive_later_layouts_and_edits() {
    let mut model = branching();
    let mut engine = engine(LayoutKind::Radial);
    engine.recompute(&model, Viewport::default());

    let grab = engine.positions().get("p").unwrap();
    engine.begin_drag(&model, "p", grab);
    engine.update_drag(&mut model, grab + vec2(300.0, 200.0));
    engine.end_drag();

    let pinned = ["p", "p1", "p2"].map(|id| (id, model.node(id).unwrap().locked_position().unwrap()));

    model.add_child("q", "Q2").unwrap();
    model.delete_node("q1").unwrap();
    for kind in [LayoutKind::Radial, LayoutKind::Force] {
        engine.set_layout_kind(kind);
        engine.recompute(&model, Viewport::new(900.0, 700.0));

        for (id, expected) in pinned {
            assert_eq!(position(&engine, id), expected, "{kind:?}");
            assert!(engine.scene().node(id).unwrap().locked);
        }
    }
}

#[test]
fn link_geometry_follows_the_curve_threshold() {
    let model = branching();
    let mut engine = engine(LayoutKind::Radial);
    let scene = engine.recompute(&model, Viewport::default());

    assert_eq!(scene.links.len(), model.links.len());
    for link in &scene.links {
        let start = scene.node(&link.from).unwrap().position;
        let end = scene.node(&link.to).unwrap().position;
        let distance = (end - start).length();

        assert_eq!(link.path.start(), start.to_pos2());
        assert_eq!(link.path.end(), end.to_pos2());
        assert_eq!(link.path.is_curved(), distance > 140.0, "{}", link.id);
    }
}

#[test]
fn dangling_links_are_left_out_of_the_scene() {
    let mut model = chain(Status::Committed);
    model.links.push(Link::new("ghost", "a", "missing"));

    let mut engine = engine(LayoutKind::Radial);
    let scene = engine.recompute(&model, Viewport::default());

    assert_eq!(scene.links.len(), 2);
    assert!(scene.links.iter().all(|link| link.id != "ghost"));
    assert_eq!(scene.node("a").unwrap().totals.cost, 175.0);
}

#[test]
fn root_sits_at_the_viewport_center() {
    let model = chain(Status::Committed);
    let mut engine = engine(LayoutKind::Radial);
    let viewport = Viewport::new(1000.0, 600.0);
    engine.recompute(&model, viewport);

    assert_eq!(position(&engine, "a"), viewport.center());
}

#[test]
fn pending_refresh_runs_once() {
    let model = chain(Status::Committed);
    let mut engine = engine(LayoutKind::Radial);

    assert!(engine.refresh_if_pending(&model, Viewport::default()));
    assert!(!engine.refresh_if_pending(&model, Viewport::default()));

    engine.request_refresh();
    engine.request_refresh();
    assert!(engine.refresh_if_pending(&model, Viewport::default()));
    assert!(!engine.refresh_pending());
}

#[test]
fn deleted_nodes_leave_the_position_cache() {
    let mut model = chain(Status::Committed);
    let mut engine = engine(LayoutKind::Radial);
    engine.recompute(&model, Viewport::default());
    assert!(engine.positions().get("c").is_some());

    model.delete_node("c").unwrap();
    engine.recompute(&model, Viewport::default());

    assert!(engine.positions().get("c").is_none());
    assert!(engine.scene().node("c").is_none());
}
