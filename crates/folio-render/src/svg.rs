use folio_core::dom::Element;

pub(crate) const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Number formatting for SVG attributes: no `-0`, and tiny float noise snaps to integers.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

pub(crate) fn svg_root(class: &str, view_box: &str) -> Element {
    Element::new("svg")
        .with_attr("xmlns", SVG_NS)
        .with_class(class)
        .with_attr("viewBox", view_box)
        .with_attr("preserveAspectRatio", "xMidYMid meet")
}

pub(crate) fn text_el(class: &str, x: f64, y: f64, text: &str) -> Element {
    Element::new("text")
        .with_class(class)
        .with_attr("x", fmt(x))
        .with_attr("y", fmt(y))
        .with_text(text)
}
