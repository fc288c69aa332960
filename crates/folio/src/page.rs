//! The interactive document: boot pipeline and command dispatcher.
//!
//! A [`Page`] owns the element tree and every controller built over it. Hosts feed it
//! [`Command`]s and perform the returned [`Effect`]s; nothing else mutates the tree after boot.

use crate::command::{Command, Effect, chain_to, resolve_click};
use crate::host::{Clipboard, Host, Viewport};
use folio_core::dom::{self, Element, Node};
use folio_core::motion::parallax::layers_from_config;
use folio_core::motion::{
    ParallaxController, ParallaxOptions, RevealController, RevealOptions, reveal,
};
use folio_core::sections::{self, Outline};
use folio_core::{
    Aspect, DetectorRegistry, FolioConfig, MarkupRenderer, StorageKeys, ThemeMotionStore, Widget,
    editorial,
};
use folio_render::{ChartRegistry, Diagram, LayoutOptions, Palette};
use std::cell::Cell;
use std::rc::Rc;
use url::Url;

pub const COPY_LABEL: &str = "Copy";
pub const COPY_RESET_MS: u64 = 900;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Core(#[from] folio_core::Error),
    #[error(transparent)]
    Render(#[from] folio_render::Error),
    #[error("unknown diagram: {key}")]
    UnknownDiagram { key: String },
    #[error("unknown widget: {id}")]
    UnknownWidget { id: String },
    #[error("invalid document url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, PageError>;

/// Converts an arbitrary string into a conservative DOM `id` token, so several diagrams can share
/// one document without marker id collisions.
pub fn sanitize_dom_id(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "f-untitled".to_string();
    }

    let mut out = String::with_capacity(raw.len() + 2);
    for ch in raw.chars() {
        let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
        out.push(if ok { ch } else { '-' });
    }
    if !out.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        out.insert_str(0, "f-");
    }
    while out.contains("--") {
        out = out.replace("--", "-");
    }
    let out = out.trim_matches('-');
    if out.is_empty() || out == "f" {
        return "f-untitled".to_string();
    }
    out.to_string()
}

pub struct Page {
    config: FolioConfig,
    nodes: Vec<Node>,
    outline: Outline,
    store: ThemeMotionStore,
    changed: Rc<Cell<Aspect>>,
    diagrams: Vec<Diagram>,
    widgets: Vec<Widget>,
    charts: ChartRegistry,
    copy_texts: Vec<String>,
    reveal: RevealController,
    parallax: ParallaxController,
    clipboard: Box<dyn Clipboard>,
    viewport: Box<dyn Viewport>,
    location: Option<Url>,
    progress: f64,
    boot_effects: Vec<Effect>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("sections", &self.outline.len())
            .field("diagrams", &self.diagrams.len())
            .field("widgets", &self.widgets.len())
            .field("charts", &self.charts.len())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Runs every structural pass in order and starts the controllers.
    pub fn boot(markdown: &str, host: Host, config: FolioConfig) -> Result<Self> {
        let Host {
            storage,
            clipboard,
            viewport,
            prefers_reduced_motion,
            location,
        } = host;

        let location = match location {
            Some(url) => Some(url),
            None => match config.get_str("document.url") {
                Some(raw) => Some(Url::parse(raw).map_err(|source| PageError::InvalidUrl {
                    url: raw.to_string(),
                    source,
                })?),
                None => None,
            },
        };

        let mut store = ThemeMotionStore::load(
            storage,
            StorageKeys::from_config(&config),
            prefers_reduced_motion,
        );
        let changed = Rc::new(Cell::new(Aspect::empty()));
        let sink = Rc::clone(&changed);
        store.subscribe(Aspect::THEME | Aspect::MOTION, move |aspect, _| {
            sink.set(sink.get() | aspect);
        });

        let mut nodes = MarkupRenderer::new().render(markdown);
        editorial::build_hero(&mut nodes);
        sections::organize(&mut nodes);
        let mut outline = Outline::build(&nodes);
        let collapsed = store.collapsed_ids().clone();
        sections::apply_collapsed(&mut nodes, &mut outline, &collapsed);

        let palette = Palette::from_config(store.theme(), &config);
        let diagrams = detect_diagrams(&mut nodes, &LayoutOptions::from_config(&config), &palette);
        editorial::transform_key_lists(&mut nodes);

        let widgets = folio_core::widgets::inject_widgets(&mut nodes);
        let mut charts = ChartRegistry::from_config(&config);
        charts.restyle(&palette, store.motion());
        for w in &widgets {
            if let Some(data) = w.chart() {
                charts.register(w.id, data.clone());
            }
        }

        let copy_texts = editorial::add_copy_buttons(&mut nodes);
        editorial::wrap_tables(&mut nodes);
        editorial::apply_lanes(&mut nodes);

        let targets = reveal::collect_targets(&mut nodes);
        let reveal = RevealController::new(targets, RevealOptions::from_config(&config));

        let layers = layers_from_config(&config).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring parallax layers");
            Vec::new()
        });
        let mut parallax = ParallaxController::new(layers, ParallaxOptions::from_config(&config));
        parallax.init_scroll(viewport.scroll_y());

        let mut page = Self {
            config,
            nodes,
            outline,
            store,
            changed,
            diagrams,
            widgets,
            charts,
            copy_texts,
            reveal,
            parallax,
            clipboard,
            viewport,
            location,
            progress: 0.0,
            boot_effects: Vec::new(),
        };
        page.paint_charts();

        let mut effects = vec![
            Effect::SetTheme(page.store.theme()),
            Effect::SetMotion(page.store.motion()),
        ];
        effects.extend(page.sync_reveals());
        if page.parallax.sync(page.store.motion().is_on()) {
            effects.push(Effect::RequestFrame);
        }
        if let Some(fragment) = page.boot_fragment() {
            effects.push(Effect::Defer {
                delay_ms: page.config.get_u64("deepLink.delayMs").unwrap_or(50),
                command: Command::Navigate { fragment },
            });
        }
        page.boot_effects = effects;

        tracing::debug!(
            sections = page.outline.len(),
            diagrams = page.diagrams.len(),
            widgets = page.widgets.len(),
            reveal_targets = targets,
            "booted page"
        );
        Ok(page)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn html(&self) -> String {
        dom::to_html(&self.nodes)
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn store(&self) -> &ThemeMotionStore {
        &self.store
    }

    pub fn diagrams(&self) -> &[Diagram] {
        &self.diagrams
    }

    pub fn diagram(&self, key: &str) -> Option<&Diagram> {
        self.diagrams.iter().find(|d| d.key() == key)
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    pub fn parallax(&self) -> &ParallaxController {
        &self.parallax
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn location(&self) -> Option<&Url> {
        self.location.as_ref()
    }

    /// Effects the host must perform once after boot.
    pub fn boot_effects(&self) -> &[Effect] {
        &self.boot_effects
    }

    pub fn palette(&self) -> Palette {
        Palette::from_config(self.store.theme(), &self.config)
    }

    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        dom::find_in(&self.nodes, pred)
    }

    /// Resolves a click on the first element matching `pred` and dispatches it. A click that
    /// maps to no command yields no effects.
    pub fn click(&mut self, pred: &dyn Fn(&Element) -> bool) -> Result<Vec<Effect>> {
        let command = chain_to(&self.nodes, pred).and_then(|chain| resolve_click(&chain));
        match command {
            Some(command) => self.dispatch(command),
            None => Ok(Vec::new()),
        }
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Vec<Effect>> {
        tracing::trace!(?command, "dispatch");
        let mut effects = match command {
            Command::ToggleTheme => {
                self.store.toggle_theme();
                Vec::new()
            }
            Command::ToggleMotion => {
                self.store.toggle_motion();
                Vec::new()
            }
            Command::ToggleSection { id } => self.toggle_section(&id)?,
            Command::CopyHeadingLink { slug } => self.copy_heading_link(&slug),
            Command::CopyCode { key } => self.copy_code(key),
            Command::ResetCopyLabel { key } => {
                self.set_copy_label(key, COPY_LABEL);
                Vec::new()
            }
            Command::JumpTo { anchor } => {
                let mut effects = self.open_for(&anchor);
                effects.push(Effect::ScrollIntoView {
                    target: anchor.clone(),
                    smooth: true,
                });
                effects.push(Effect::ReplaceFragment { fragment: anchor });
                effects
            }
            Command::Navigate { fragment } => self.navigate(&fragment),
            Command::SelectNode { diagram, node } => {
                self.select_node(&diagram, node.as_deref())?;
                Vec::new()
            }
            Command::SetControl {
                widget,
                control,
                value,
            } => {
                self.set_control(&widget, &control, value.as_input())?;
                Vec::new()
            }
            Command::PointerMove { x, y } => {
                let (w, h) = self.viewport.size();
                self.parallax.pointer_move(x, y, w, h);
                Vec::new()
            }
            Command::PointerLeave => {
                self.parallax.pointer_leave();
                Vec::new()
            }
            Command::Scroll {
                top,
                scroll_height,
                client_height,
            } => {
                self.parallax.scroll_to(top);
                self.progress = editorial::reading_progress(top, scroll_height, client_height);
                vec![Effect::Progress {
                    percent: self.progress,
                }]
            }
            Command::Frame => {
                if self.parallax.tick() {
                    vec![Effect::RequestFrame]
                } else {
                    Vec::new()
                }
            }
            Command::Intersect { key, ratio } => {
                if self.reveal.intersect(key, ratio) {
                    reveal::apply_visibility(&mut self.nodes, &self.reveal);
                    vec![Effect::Unobserve { key }]
                } else {
                    Vec::new()
                }
            }
        };
        effects.extend(self.fan_out());
        Ok(effects)
    }

    /// Applies theme/motion changes recorded by the store subscription.
    fn fan_out(&mut self) -> Vec<Effect> {
        let aspect = self.changed.replace(Aspect::empty());
        if aspect.is_empty() {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if aspect.contains(Aspect::THEME) {
            effects.push(Effect::SetTheme(self.store.theme()));
        }
        if aspect.contains(Aspect::MOTION) {
            effects.push(Effect::SetMotion(self.store.motion()));
            if self.parallax.sync(self.store.motion().is_on()) {
                effects.push(Effect::RequestFrame);
            }
            effects.extend(self.sync_reveals());
        }
        self.restyle();
        effects
    }

    /// Repaints charts and diagrams for the current theme and motion.
    fn restyle(&mut self) {
        let palette = self.palette();
        self.charts.restyle(&palette, self.store.motion());
        self.paint_charts();
        for diagram in &self.diagrams {
            if let Some(root) = diagram_root(&mut self.nodes, diagram.key()) {
                diagram.restyle(root, &palette);
            }
        }
    }

    fn paint_charts(&mut self) {
        let ids: Vec<String> = self.charts.ids().map(str::to_string).collect();
        for id in ids {
            let Some(svg) = self.charts.render(&id) else {
                continue;
            };
            if let Some(slot) = dom::find_in_mut(&mut self.nodes, &|e| {
                e.has_class("chart-wrap") && e.attr("data-chart") == Some(id.as_str())
            }) {
                slot.children = vec![svg.into()];
            }
        }
    }

    fn sync_reveals(&mut self) -> Vec<Effect> {
        let animate = self.store.animations_enabled();
        let (_, height) = self.viewport.size();
        let viewport = &self.viewport;
        let shown = self
            .reveal
            .sync(animate, height, &|key| viewport.top_of(key));
        if !shown.is_empty() {
            reveal::apply_visibility(&mut self.nodes, &self.reveal);
        }
        let mut effects = vec![Effect::RevealReady(animate)];
        let observed = self.reveal.observed();
        if !animate {
            effects.push(Effect::Disconnect);
        } else if !observed.is_empty() {
            let options = self.reveal.options();
            effects.push(Effect::Observe {
                keys: observed,
                threshold: options.threshold,
                root_margin: options.root_margin(),
            });
        }
        effects
    }

    fn boot_fragment(&self) -> Option<String> {
        self.location
            .as_ref()
            .and_then(Url::fragment)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
    }

    fn chart_ids_in(&self, section_id: &str) -> Vec<String> {
        sections::section(&self.nodes, section_id)
            .map(|s| {
                s.find_all(&|e| e.has_class("chart-wrap"))
                    .into_iter()
                    .filter_map(|e| e.attr("data-chart").map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn resize_charts_in(&mut self, section_id: &str) -> Vec<Effect> {
        self.chart_ids_in(section_id)
            .into_iter()
            .filter(|id| self.charts.resize(id))
            .map(|id| Effect::ResizeChart { id })
            .collect()
    }

    fn toggle_section(&mut self, id: &str) -> Result<Vec<Effect>> {
        let collapsed = sections::toggle(&mut self.nodes, &mut self.outline, &mut self.store, id)?;
        if collapsed {
            Ok(Vec::new())
        } else {
            Ok(self.resize_charts_in(id))
        }
    }

    /// Opens the section owning `anchor` if it is collapsed.
    fn open_for(&mut self, anchor: &str) -> Vec<Effect> {
        match sections::expand_for_heading(&mut self.nodes, &mut self.outline, &mut self.store, anchor)
        {
            Some(opened) => self.resize_charts_in(&opened),
            None => Vec::new(),
        }
    }

    fn navigate(&mut self, fragment: &str) -> Vec<Effect> {
        let target = fragment.trim_start_matches('#');
        let exists = dom::find_in(&self.nodes, &|e| e.attr("id") == Some(target)).is_some();
        if !exists {
            tracing::debug!(fragment = target, "fragment names no element");
            return Vec::new();
        }
        let mut effects = self.open_for(target);
        effects.push(Effect::ScrollIntoView {
            target: target.to_string(),
            smooth: false,
        });
        effects
    }

    fn heading_url(&self, slug: &str) -> String {
        match &self.location {
            Some(base) => {
                let mut url = base.clone();
                url.set_fragment(Some(slug));
                url.to_string()
            }
            None => format!("#{slug}"),
        }
    }

    fn copy_heading_link(&mut self, slug: &str) -> Vec<Effect> {
        let url = self.heading_url(slug);
        if let Err(err) = self.clipboard.write_text(&url) {
            tracing::debug!(error = %err, "heading link not copied");
        }
        vec![Effect::ReplaceFragment {
            fragment: slug.to_string(),
        }]
    }

    fn copy_code(&mut self, key: usize) -> Vec<Effect> {
        let Some(text) = self.copy_texts.get(key) else {
            tracing::debug!(key, "copy for unknown code block ignored");
            return Vec::new();
        };
        let label = match self.clipboard.write_text(text) {
            Ok(()) => "Copied",
            Err(err) => {
                tracing::debug!(error = %err, "code block not copied");
                "Failed"
            }
        };
        self.set_copy_label(key, label);
        vec![Effect::Defer {
            delay_ms: COPY_RESET_MS,
            command: Command::ResetCopyLabel { key },
        }]
    }

    fn set_copy_label(&mut self, key: usize, label: &str) {
        let key = key.to_string();
        if let Some(button) = dom::find_in_mut(&mut self.nodes, &|e| {
            e.tag == "button" && e.attr("data-copy") == Some(key.as_str())
        }) {
            button.set_text(label);
        }
    }

    fn select_node(&mut self, key: &str, node: Option<&str>) -> Result<()> {
        let palette = self.palette();
        let Some(diagram) = self.diagrams.iter_mut().find(|d| d.key() == key) else {
            return Err(PageError::UnknownDiagram { key: key.to_string() });
        };
        if !diagram.select(node) {
            return Ok(());
        }
        if let Some(root) = diagram_root(&mut self.nodes, key) {
            diagram.restyle(root, &palette);
            diagram.refresh_inspector(root);
        }
        Ok(())
    }

    fn set_control(&mut self, id: &str, control: &str, input: folio_core::ControlInput<'_>) -> Result<()> {
        let Some(widget) = self.widgets.iter_mut().find(|w| w.id == id) else {
            return Err(PageError::UnknownWidget { id: id.to_string() });
        };
        if !widget.set_control(control, input)? {
            return Ok(());
        }
        if let Some(data) = widget.chart() {
            self.charts.update_data(id, data.clone())?;
        }
        let chart = self.charts.render(id).map(Node::from);
        let children = widget.render_children(chart);
        if let Some(mount) = dom::find_in_mut(&mut self.nodes, &|e| {
            e.has_class(folio_core::widgets::WIDGET_CLASS) && e.attr("data-widget") == Some(id)
        }) {
            mount.children = children;
        }
        Ok(())
    }
}

fn diagram_root<'a>(nodes: &'a mut [Node], key: &str) -> Option<&'a mut Element> {
    dom::find_in_mut(nodes, &|e| e.attr("data-diagram") == Some(key))
}

/// Replaces every recognized diagram payload with its rendered diagram.
fn detect_diagrams(nodes: &mut [Node], options: &LayoutOptions, palette: &Palette) -> Vec<Diagram> {
    let registry = DetectorRegistry::builtin();
    let mut diagrams = Vec::new();
    dom::walk_in_mut(nodes, &mut |el| {
        if el.tag != "pre" {
            return;
        }
        let Some(code) = el.find(&|e| e.tag == "code") else {
            return;
        };
        let Some(spec) = registry.detect(&code.text_content()) else {
            return;
        };
        let key = sanitize_dom_id(&format!("{}-{}", spec.id, diagrams.len()));
        let diagram = Diagram::new(key, spec.clone(), options);
        *el = diagram.to_element(palette);
        diagrams.push(diagram);
    });
    tracing::debug!(diagrams = diagrams.len(), "detected diagrams");
    diagrams
}
