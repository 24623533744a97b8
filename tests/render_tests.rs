mod common;

use common::{draw, fixed_node};
use kintree::{app::AppState, config::AppConfig, model::NodeId, snapshot, ui};
use ratatui::{backend::TestBackend, Terminal};

#[test]
fn test_render_parent_and_child() {
    let mut app = AppState::new(AppConfig::default());
    app.tree.replace_all(vec![
        fixed_node("root", "Ada", None, 0, (0.0, 0.0)),
        fixed_node("kid", "Byron", Some("root"), 1, (0.0, 100.0)),
    ]);
    app.forget_missing_nodes();

    let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
    terminal.draw(|frame| ui::render(frame, &mut app)).unwrap();
    insta::assert_snapshot!(terminal.backend(), @r#"
    "╭─────────────────×╮                    "
    "│       Ada        │                    "
    "╰─────────●────────╯                    "
    "          │                             "
    "          │                             "
    "          │                             "
    "╭─────────────────×╮                    "
    "│      Byron       │                    "
    "╰─────────●────────╯                    "
    "kintree | [new] | 2 nodes | 100%        "
    "#);
}

#[test]
fn test_zoom_scales_boxes() {
    let mut app = AppState::new(AppConfig::default());
    app.viewport.zoom(1.0);
    let buffer = draw(&mut app, 80, 24);

    let top: String = (0..40).map(|x| buffer[(x, 0)].symbol()).collect();
    assert_eq!(top, format!("╭{}×╮", "─".repeat(37)));
    let label: String = (0..40).map(|x| buffer[(x, 2)].symbol()).collect();
    assert!(label.contains("Root"));
    assert_eq!(buffer[(20, 5)].symbol(), "●");
}

#[test]
fn test_far_away_nodes_render_without_blowing_up() {
    let mut app = AppState::new(AppConfig::default());
    let text = r##"[
        {"id": "r", "name": "Ada", "parent": null, "level": 0, "color": "#4f46e5", "x": 0, "y": 0},
        {"id": "k", "name": "Far", "parent": "r", "level": 1, "color": "#059669", "x": 1e12, "y": 100}
    ]"##;
    snapshot::load_into(&mut app.tree, text).unwrap();
    let buffer = draw(&mut app, 80, 24);

    assert_eq!(buffer[(0, 0)].symbol(), "╭");
    assert_eq!(buffer[(10, 2)].symbol(), "●");
    assert_ne!(buffer[(10, 3)].symbol(), " ");
    assert!(app.layout.get(&NodeId::from("k")).is_some());

    // A lone root far away leaves the canvas empty.
    snapshot::load_into(&mut app.tree, r#"[{"id": "r", "x": 1e12, "y": -1e12}]"#).unwrap();
    let buffer = draw(&mut app, 80, 24);
    let canvas: String = (0..23)
        .flat_map(|y| (0..80).map(move |x| (x, y)))
        .map(|(x, y)| buffer[(x, y)].symbol().to_string())
        .collect();
    assert!(canvas.chars().all(|c| c == ' '));
}
