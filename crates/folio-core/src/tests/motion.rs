use super::render;
use crate::config::FolioConfig;
use crate::dom::{self, Node};
use crate::editorial::{self, TABLE_WRAP_CLASS};
use crate::motion::parallax::layers_from_config;
use crate::motion::reveal::{self, REVEAL_ATTR, VISIBLE_CLASS};
use crate::motion::{
    LayerTransform, LoopState, ParallaxController, ParallaxLayer, ParallaxOptions, RevealController,
    RevealOptions, RevealState,
};
use crate::sections;
use serde_json::json;

fn targets() -> (Vec<Node>, usize) {
    let mut nodes = render("Intro.\n\n## A\n\npara\n\n### B\n\n- x\n- y\n");
    sections::organize(&mut nodes);
    let count = reveal::collect_targets(&mut nodes);
    (nodes, count)
}

#[test]
fn collects_headings_and_body_blocks() {
    let (nodes, count) = targets();
    assert_eq!(count, 4);
    let marked: Vec<&str> = dom::find_all_in(&nodes, &|e| e.attr(REVEAL_ATTR).is_some())
        .into_iter()
        .map(|e| e.tag.as_str())
        .collect();
    assert_eq!(marked, ["h2", "p", "h3", "ul"]);
}

#[test]
fn tables_reveal_through_their_wrapper() {
    let mut nodes = render("## A\n\n| k | v |\n|---|---|\n| 1 | 2 |\n\nafter\n");
    sections::organize(&mut nodes);
    editorial::wrap_tables(&mut nodes);
    assert_eq!(reveal::collect_targets(&mut nodes), 3);

    let marked: Vec<(&str, bool)> = dom::find_all_in(&nodes, &|e| e.attr(REVEAL_ATTR).is_some())
        .into_iter()
        .map(|e| (e.tag.as_str(), e.has_class(TABLE_WRAP_CLASS)))
        .collect();
    assert_eq!(marked, [("h2", false), ("div", true), ("p", false)]);
}

#[test]
fn collecting_twice_keeps_keys() {
    let (mut nodes, count) = targets();
    let before = nodes.clone();
    assert_eq!(reveal::collect_targets(&mut nodes), count);
    assert_eq!(nodes, before);
}

#[test]
fn without_animation_everything_shows_at_once() {
    let mut reveals = RevealController::new(3, RevealOptions::default());
    let shown = reveals.sync(false, 800.0, &|_| Some(5000.0));
    assert_eq!(shown, [0, 1, 2]);
    assert!(reveals.all_visible());
    assert!(reveals.observed().is_empty());
}

#[test]
fn above_the_fold_shows_and_the_rest_waits() {
    let mut reveals = RevealController::new(4, RevealOptions::default());
    let tops = [Some(100.0), Some(899.0), Some(950.0), None];
    let shown = reveals.sync(true, 1000.0, &|k| tops[k]);
    assert_eq!(shown, [0, 1]);
    assert_eq!(reveals.observed(), [2, 3]);

    assert!(!reveals.intersect(2, 0.05));
    assert!(reveals.intersect(2, 0.12));
    assert!(!reveals.intersect(2, 1.0));
    assert!(!reveals.intersect(0, 1.0));
    assert!(!reveals.intersect(99, 1.0));
    assert_eq!(reveals.state(2), Some(RevealState::Visible));
    assert_eq!(reveals.observed(), [3]);

    // Turning animation off later releases whatever is still waiting.
    assert_eq!(reveals.sync(false, 1000.0, &|_| None), [3]);
    assert!(reveals.all_visible());
}

#[test]
fn visibility_is_written_to_markup() {
    let (mut nodes, count) = targets();
    let mut reveals = RevealController::new(count, RevealOptions::default());
    let tops = [Some(0.0), Some(10.0), Some(2000.0), Some(2000.0)];
    reveals.sync(true, 1000.0, &|k| tops[k]);
    reveal::apply_visibility(&mut nodes, &reveals);
    let visible = dom::find_all_in(&nodes, &|e| e.has_class(VISIBLE_CLASS));
    assert_eq!(visible.len(), 2);
}

#[test]
fn reveal_options_from_config() {
    let cfg = FolioConfig::with_overrides(&json!({ "reveal": { "fold": 0.5 } }));
    let options = RevealOptions::from_config(&cfg);
    assert_eq!(options.fold, 0.5);
    assert_eq!(options.threshold, 0.12);
    assert_eq!(options.root_margin(), "0px 0px -12% 0px");
}

fn controller() -> ParallaxController {
    let layers = layers_from_config(&FolioConfig::default()).unwrap();
    ParallaxController::new(layers, ParallaxOptions::default())
}

#[test]
fn start_while_running_schedules_nothing() {
    let mut p = controller();
    assert!(p.start());
    assert!(!p.start());
    assert_eq!(p.state(), LoopState::Running);
}

#[test]
fn motion_off_halts_loop_and_clears_transforms() {
    let mut p = controller();
    assert!(p.sync(true));
    p.pointer_move(800.0, 0.0, 800.0, 600.0);
    assert!(p.tick());
    assert!(p.transforms().iter().all(Option::is_some));

    assert!(!p.sync(false));
    assert!(p.is_hidden());
    assert_eq!(p.state(), LoopState::Stopping);
    assert!(p.transforms().iter().all(Option::is_none));

    // The pending frame lands and ends the loop without painting.
    assert!(!p.tick());
    assert_eq!(p.state(), LoopState::Idle);
    assert!(p.transforms().iter().all(Option::is_none));
    assert!(!p.tick());

    p.stop();
    assert_eq!(p.state(), LoopState::Idle);
}

#[test]
fn restart_before_pending_frame_reuses_it() {
    let mut p = controller();
    assert!(p.start());
    p.stop();
    assert!(!p.start());
    assert_eq!(p.state(), LoopState::Running);
    assert!(p.tick());
}

#[test]
fn frames_ease_toward_targets() {
    let mut p = ParallaxController::new(
        vec![ParallaxLayer {
            sx: 18.0,
            sy: 12.0,
            ss: -0.1,
        }],
        ParallaxOptions::default(),
    );
    p.init_scroll(100.0);
    p.pointer_move(1000.0, 500.0, 1000.0, 1000.0);
    p.scroll_to(200.0);
    p.start();
    p.tick();

    let t = p.transforms()[0].unwrap();
    assert!((t.x - 0.075 * 18.0).abs() < 1e-9);
    // Pointer y is centered; scroll moved 6% of the way from 100 to 200.
    assert!((t.y - 106.0 * -0.1).abs() < 1e-9);

    p.pointer_leave();
    for _ in 0..400 {
        p.tick();
    }
    assert!(p.transforms()[0].unwrap().x.abs() < 1e-6);
}

#[test]
fn transform_css_uses_two_decimals() {
    let t = LayerTransform { x: 1.349, y: -0.004 };
    assert_eq!(t.to_css(), "translate3d(1.35px, -0.00px, 0)");
}

#[test]
fn loop_needs_a_layer() {
    let mut p = ParallaxController::new(Vec::new(), ParallaxOptions::default());
    assert!(!p.start());
    assert!(!p.sync(true));
    assert_eq!(p.state(), LoopState::Idle);
}

#[test]
fn malformed_layers_are_a_config_error() {
    let cfg = FolioConfig::with_overrides(&json!({ "parallax": { "layers": "wobbly" } }));
    assert!(layers_from_config(&cfg).is_err());

    let cfg = FolioConfig::with_overrides(&json!({ "parallax": { "layers": [{ "sx": 2 }] } }));
    assert_eq!(
        layers_from_config(&cfg).unwrap(),
        [ParallaxLayer {
            sx: 2.0,
            sy: 0.0,
            ss: 0.0
        }]
    );
}
