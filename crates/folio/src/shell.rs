//! Standalone HTML document around a booted page.

use crate::page::Page;
use folio_core::motion::reveal::HERO_CLASS;
use serde::Serialize;

const STYLE: &str = r#"
:root{--ink:#0f1419;--muted:rgba(15,20,25,.7);--faint:rgba(15,20,25,.12);--bg:#fbfaf7;--teal:#85cbda;--teal2:#8ad8c0;--good:#c6f459;--warn:#9cb7eb;--bad:#f39a8e}
[data-theme="dark"]{--ink:#eef3f6;--muted:rgba(238,243,246,.72);--faint:rgba(238,243,246,.14);--bg:#0d1216;--teal:#9ad7e4;--teal2:#9fe3cd;--good:#d2f77a;--warn:#b0c6f0;--bad:#f6ada3}
body{margin:0;background:var(--bg);color:var(--ink);font:17px/1.6 Inter,ui-sans-serif,system-ui,sans-serif}
#content{display:grid;grid-template-columns:1fr min(68ch,100% - 2rem) 1fr}
#content>*,.section-body>*,.paper-section>*{grid-column:2}
.paper-section,.section-body{display:grid;grid-template-columns:inherit;grid-column:1/-1}
.lane-wide{grid-column:1/-1;max-width:1100px;justify-self:center;width:100%}
.lane-full{grid-column:1/-1}
.section-body.collapsed{display:none}
.progress{position:fixed;top:0;left:0;height:3px;background:var(--teal)}
.parallax{position:fixed;inset:0;pointer-events:none;z-index:-1}
.reveal-ready [data-reveal]:not(.is-in){opacity:0;transform:translateY(12px)}
[data-reveal]{transition:opacity .5s,transform .5s}
.flow-edge.is-active{stroke-width:2.4}
.table-wrap{overflow-x:auto}
"#;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct BootState<'a> {
    theme: &'a str,
    motion: &'a str,
    collapsed: Vec<&'a str>,
    charts: Vec<&'a str>,
    diagrams: Vec<&'a str>,
    deep_link_delay_ms: u64,
}

fn escape(text: &str) -> String {
    htmlize::escape_text(text).into_owned()
}

fn escape_attr(text: &str) -> String {
    htmlize::escape_attribute(text).into_owned()
}

/// Page title: the hero title, else the first heading, else a generic label.
pub fn document_title(page: &Page) -> String {
    let hero_title = page.find(&|e| e.has_class("hero-title"));
    let heading = hero_title.or_else(|| page.find(&|e| e.tag == "h1" || e.tag == "h2"));
    let text = heading
        .map(|h| folio_core::markup::heading_label(h).trim().to_string())
        .unwrap_or_default();
    if text.is_empty() {
        "Whitepaper".to_string()
    } else {
        text
    }
}

fn boot_state_json(page: &Page) -> String {
    let store = page.store();
    let state = BootState {
        theme: store.theme().as_str(),
        motion: store.motion().as_str(),
        collapsed: store.collapsed_ids().iter().map(String::as_str).collect(),
        charts: page.charts().ids().collect(),
        diagrams: page.diagrams().iter().map(|d| d.key()).collect(),
        deep_link_delay_ms: page.config().get_u64("deepLink.delayMs").unwrap_or(50),
    };
    match serde_json::to_string(&state) {
        Ok(json) => json.replace("</", "<\\/"),
        Err(err) => {
            tracing::warn!(error = %err, "failed to encode boot state");
            "{}".to_string()
        }
    }
}

fn parallax_layers(page: &Page) -> String {
    let mut out = String::new();
    let hidden = page.parallax().is_hidden();
    out.push_str(&format!(
        r#"<div class="parallax" id="parallax" aria-hidden="true"{}>"#,
        if hidden { r#" style="opacity:0""# } else { "" }
    ));
    for (i, (layer, transform)) in page
        .parallax()
        .layers()
        .iter()
        .zip(page.parallax().transforms())
        .enumerate()
    {
        let style = transform
            .as_ref()
            .map(|t| format!(r#" style="transform:{}""#, t.to_css()))
            .unwrap_or_default();
        out.push_str(&format!(
            r#"<div class="parallax-layer layer-{i}" data-sx="{}" data-sy="{}" data-ss="{}"{style}></div>"#,
            layer.sx, layer.sy, layer.ss
        ));
    }
    out.push_str("</div>");
    out
}

/// Full HTML document: controls, progress bar, parallax layers, content and boot state.
pub fn render_document(page: &Page) -> String {
    let store = page.store();
    let has_hero = page.find(&|e| e.has_class(HERO_CLASS)).is_some();
    let root_class = if store.animations_enabled() {
        " class=\"reveal-ready\""
    } else {
        ""
    };
    let theme_label = if store.theme().is_dark() {
        "Theme: Dark"
    } else {
        "Theme: Light"
    };
    let motion_label = if store.motion().is_on() {
        "Motion: On"
    } else {
        "Motion: Off"
    };

    let mut out = String::new();
    out.push_str("<!doctype html>\n");
    out.push_str(&format!(
        r#"<html lang="en" data-theme="{}" data-motion="{}"{root_class}>"#,
        store.theme().as_str(),
        store.motion().as_str()
    ));
    out.push_str(r#"<head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1">"#);
    out.push_str(&format!("<title>{}</title>", escape(&document_title(page))));
    out.push_str(&format!("<style>{STYLE}</style></head>"));
    out.push_str("<body>");
    out.push_str(&format!(
        r#"<div class="progress" id="progress" style="width:{}%"></div>"#,
        percent(page.progress())
    ));
    out.push_str(&parallax_layers(page));
    out.push_str(&format!(
        r#"<nav class="topbar"><button type="button" data-toggle="theme" aria-label="{label}" title="{label}"></button>"#,
        label = escape_attr(theme_label)
    ));
    out.push_str(&format!(
        r#"<button type="button" data-toggle="motion" aria-pressed="{}">{}</button></nav>"#,
        store.motion().is_on(),
        escape(motion_label)
    ));
    out.push_str(&format!(
        r#"<main id="content"{}>"#,
        if has_hero { r#" class="has-hero""# } else { "" }
    ));
    out.push_str(&page.html());
    out.push_str("</main>");
    out.push_str(&format!(
        r#"<script type="application/json" id="folio-state">{}</script>"#,
        boot_state_json(page)
    ));
    out.push_str("</body></html>\n");
    out
}

fn percent(v: f64) -> String {
    let v = (v * 100.0).round() / 100.0;
    if v == 0.0 { "0".to_string() } else { v.to_string() }
}
