use crate::config::FolioConfig;
use crate::Error;
use serde_json::json;

#[test]
fn defaults_cover_every_knob() {
    let cfg = FolioConfig::default();
    assert_eq!(cfg.get_str("storage.themeKey"), Some("theme"));
    assert_eq!(cfg.get_f64("reveal.threshold"), Some(0.12));
    assert_eq!(cfg.get_f64("diagram.padding"), Some(80.0));
    assert_eq!(cfg.get_u64("chart.animationMs"), Some(420));
    assert_eq!(cfg.get_u64("deepLink.delayMs"), Some(50));
    assert_eq!(cfg.get("parallax.layers").and_then(|v| v.as_array()).map(Vec::len), Some(3));
    assert_eq!(cfg.get_str("document.url"), None);
}

#[test]
fn overrides_merge_deeply() {
    let cfg = FolioConfig::from_json_str(r#"{ "reveal": { "fold": 0.5 }, "extra": true }"#).unwrap();
    assert_eq!(cfg.get_f64("reveal.fold"), Some(0.5));
    assert_eq!(cfg.get_f64("reveal.threshold"), Some(0.12));
    assert_eq!(cfg.get("extra"), Some(&json!(true)));
}

#[test]
fn non_object_json_is_rejected() {
    assert!(matches!(
        FolioConfig::from_json_str("[1, 2]"),
        Err(Error::InvalidConfig { .. })
    ));
    assert!(matches!(
        FolioConfig::from_json_str("{ nope"),
        Err(Error::ConfigJson(_))
    ));
}

#[test]
fn wrong_types_fall_back() {
    let cfg = FolioConfig::with_overrides(&json!({ "reveal": { "fold": "high" } }));
    assert_eq!(cfg.f64_or("reveal.fold", 0.9), 0.9);
    assert_eq!(cfg.str_or("storage.missing", "x"), "x");
}

#[test]
fn set_value_creates_intermediate_objects() {
    let mut cfg = FolioConfig::from_value(json!({}));
    cfg.set_value("a.b.c", json!(1));
    cfg.set_value("a.x", json!("y"));
    assert_eq!(cfg.as_value(), &json!({ "a": { "b": { "c": 1 }, "x": "y" } }));

    cfg.set_value("a.b.c.d", json!(2));
    assert_eq!(cfg.get_u64("a.b.c.d"), Some(2));
}
