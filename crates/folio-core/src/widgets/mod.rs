//! Calculator widgets: controls bound to a formula, readouts, and an optional chart.

pub mod control;
pub mod formula;
pub mod inject;
pub mod table;

use crate::dom::{Element, Node};
use crate::flow::Tone;
use control::{Control, Select, SelectOption, Slider};
use formula::{LockSchedule, format_multiplier, format_number};
use serde::Serialize;

pub use inject::inject_widgets;

pub const WIDGET_CLASS: &str = "widget";
pub const GRID_CLASS: &str = "widget-grid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Bar,
    Doughnut,
}

/// Data behind one chart. Colors are expressed as tones and resolved against a palette at
/// paint time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// One tone per value; a shorter list repeats its last entry.
    pub tones: Vec<Tone>,
    pub suggested_max: Option<f64>,
}

impl ChartData {
    pub fn tone_at(&self, index: usize) -> Tone {
        self.tones
            .get(index)
            .or_else(|| self.tones.last())
            .copied()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readout {
    /// Stable `data-output` role.
    pub role: &'static str,
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRow {
    pub metric: String,
    pub earlier: String,
    pub later: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    pub anchor: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    FeedbackWeight,
    SybilComparator,
    RevenueSplit,
    LockMultiplier(LockSchedule),
    VotingPower(LockSchedule),
    SuccessMetrics {
        rows: Vec<MetricRow>,
        columns: [String; 2],
    },
    RoadmapTimeline(Vec<Phase>),
}

/// Raw value delivered by a control event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlInput<'a> {
    Number(f64),
    /// Text from a numeric input or a select option value.
    Text(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub formula: Option<&'static str>,
    pub note: Option<&'static str>,
    kind: WidgetKind,
    controls: Vec<Control>,
    readouts: Vec<Readout>,
    chart: Option<ChartData>,
}

impl Widget {
    fn build(
        id: &'static str,
        title: &'static str,
        subtitle: &'static str,
        kind: WidgetKind,
        controls: Vec<Control>,
    ) -> Self {
        let mut widget = Self {
            id,
            title,
            subtitle,
            formula: None,
            note: None,
            kind,
            controls,
            readouts: Vec::new(),
            chart: None,
        };
        widget.recompute();
        widget
    }

    fn with_formula(mut self, formula: &'static str) -> Self {
        self.formula = Some(formula);
        self
    }

    fn with_note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }

    pub fn feedback_weight() -> Self {
        Self::build(
            "feedback-weight",
            "Feedback Weight Calculator",
            "Explore the stake-weighted feedback formula described in Layer 1.",
            WidgetKind::FeedbackWeight,
            vec![
                Control::Slider(Slider::new("stake", "Staked EVA (s)", 0.0, 5000.0, 1.0, 200.0)),
                Control::Slider(
                    Slider::new("rep", "Reputation multiplier (r)", 0.05, 2.0, 0.01, 1.0).multiplier(),
                ),
            ],
        )
        .with_formula("w = √s × r")
    }

    pub fn sybil_comparator() -> Self {
        Self::build(
            "sybil-comparator",
            "Sybil Comparator",
            "Compare influence from many small accounts vs one larger account (including a reputation multiplier).",
            WidgetKind::SybilComparator,
            vec![
                Control::Slider(Slider::new("accounts", "Accounts (N)", 1.0, 300.0, 1.0, 100.0)),
                Control::Slider(Slider::new(
                    "stake_each",
                    "Stake per account (s_a)",
                    0.0,
                    200.0,
                    1.0,
                    2.0,
                )),
                Control::Slider(
                    Slider::new("rep_each", "Rep multiplier per account (r_a)", 0.05, 1.0, 0.01, 0.1)
                        .multiplier(),
                ),
                Control::Slider(Slider::new(
                    "stake_one",
                    "Single-account stake (s_o)",
                    0.0,
                    2000.0,
                    1.0,
                    200.0,
                )),
                Control::Slider(
                    Slider::new("rep_one", "Single-account rep (r_o)", 0.05, 2.0, 0.01, 1.0).multiplier(),
                ),
            ],
        )
        .with_formula("W_many = N × √s_a × r_a    W_one = √s_o × r_o")
    }

    pub fn revenue_split() -> Self {
        Self::build(
            "revenue-split",
            "Revenue Split Simulator",
            "Drag total platform revenue to see the protocol split and deflationary burn.",
            WidgetKind::RevenueSplit,
            vec![Control::Slider(Slider::new(
                "total",
                "Total revenue (EVA)",
                0.0,
                200_000.0,
                100.0,
                50_000.0,
            ))],
        )
        .with_formula("Publishers 60%  Validators 25%  Burn 7.5%  Stakers 7.5%")
        .with_note("Assumes the paper's 15% Burn/Stake pool split 50/50.")
    }

    pub fn lock_multiplier(schedule: LockSchedule) -> Self {
        Self::build(
            "lock-multiplier",
            "Lock Multiplier Explorer",
            "Use the table's multipliers to see how lock duration scales staking power.",
            WidgetKind::LockMultiplier(schedule),
            vec![Control::Slider(Slider::new(
                "stake",
                "Stake (EVA)",
                0.0,
                5000.0,
                10.0,
                500.0,
            ))],
        )
    }

    pub fn voting_power(schedule: LockSchedule) -> Self {
        let options = schedule
            .points()
            .iter()
            .map(|p| SelectOption {
                value: p.days.to_string(),
                label: format!("{} days ({})", p.days, format_multiplier(Some(p.multiplier), 2)),
            })
            .collect::<Vec<_>>();
        let last = options.len().saturating_sub(1);
        Self::build(
            "voting-power",
            "Governance Voting Power",
            "Interactive version of the paper's voting power formula.",
            WidgetKind::VotingPower(schedule),
            vec![
                Control::Slider(Slider::new("stake", "Staked EVA (s)", 0.0, 10_000.0, 10.0, 2000.0)),
                Control::Slider(
                    Slider::new("rep", "Reputation multiplier (r)", 0.05, 2.0, 0.01, 1.0).multiplier(),
                ),
                Control::Select(Select::new("duration", "Lock duration (m)", options, last)),
            ],
        )
        .with_formula("v = s × m × r")
    }

    /// `None` when there are no complete rows.
    pub fn success_metrics(rows: Vec<MetricRow>, columns: [String; 2]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let options = rows
            .iter()
            .map(|r| SelectOption {
                value: r.metric.clone(),
                label: r.metric.clone(),
            })
            .collect();
        Some(Self::build(
            "success-metrics",
            "Success Metrics Chart",
            "Pick a metric to compare the two milestones.",
            WidgetKind::SuccessMetrics { rows, columns },
            vec![Control::Select(Select::new("metric", "Metric", options, 0))],
        ))
    }

    /// `None` when there are no phases to jump to.
    pub fn roadmap_timeline(phases: Vec<Phase>) -> Option<Self> {
        if phases.is_empty() {
            return None;
        }
        Some(Self::build(
            "roadmap-timeline",
            "Roadmap Timeline",
            "Jump between phases.",
            WidgetKind::RoadmapTimeline(phases),
            Vec::new(),
        ))
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, key: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.key() == key)
    }

    pub fn readouts(&self) -> &[Readout] {
        &self.readouts
    }

    pub fn readout(&self, role: &str) -> Option<&str> {
        self.readouts
            .iter()
            .find(|r| r.role == role)
            .map(|r| r.value.as_str())
    }

    pub fn chart(&self) -> Option<&ChartData> {
        self.chart.as_ref()
    }

    /// Applies a control event and recomputes synchronously.
    ///
    /// Sliders always report a change (their value is clamped or reset, never rejected);
    /// selects report whether the value named an option.
    pub fn set_control(&mut self, key: &str, input: ControlInput<'_>) -> crate::Result<bool> {
        let widget = self.id;
        let Some(control) = self.controls.iter_mut().find(|c| c.key() == key) else {
            return Err(crate::Error::UnknownControl {
                widget: widget.to_string(),
                control: key.to_string(),
            });
        };
        let changed = match (control, input) {
            (Control::Slider(slider), ControlInput::Number(v)) => {
                slider.set(v);
                true
            }
            (Control::Slider(slider), ControlInput::Text(text)) => {
                slider.set(text.trim().parse::<f64>().unwrap_or(f64::NAN));
                true
            }
            (Control::Select(select), ControlInput::Text(value)) => select.select(value),
            (Control::Select(_), ControlInput::Number(_)) => {
                return Err(crate::Error::ControlInput {
                    widget: widget.to_string(),
                    control: key.to_string(),
                    expected: "a number",
                });
            }
        };
        if changed {
            self.recompute();
        }
        Ok(changed)
    }

    fn slider(&self, key: &str) -> f64 {
        self.controls
            .iter()
            .find_map(|c| match c {
                Control::Slider(s) if s.key == key => Some(s.get()),
                _ => None,
            })
            .unwrap_or(f64::NAN)
    }

    fn select_mut(&mut self, key: &str) -> Option<&mut Select> {
        self.controls.iter_mut().find_map(|c| match c {
            Control::Select(s) if s.key == key => Some(s),
            _ => None,
        })
    }

    pub fn recompute(&mut self) {
        let mut select_display: Option<(&'static str, String)> = None;
        let (readouts, chart) = match &self.kind {
            WidgetKind::FeedbackWeight => {
                let w = formula::feedback_weight(self.slider("stake"), self.slider("rep"));
                (vec![readout("weight", "weight", format_number(w, 3))], None)
            }
            WidgetKind::SybilComparator => {
                let cmp = formula::sybil_comparison(
                    self.slider("accounts"),
                    self.slider("stake_each"),
                    self.slider("rep_each"),
                    self.slider("stake_one"),
                    self.slider("rep_one"),
                );
                (
                    vec![
                        readout("many", "many", format_number(cmp.many, 3)),
                        readout("one", "one", format_number(cmp.one, 3)),
                        readout("ratio", "ratio", format_multiplier(cmp.ratio, 2)),
                    ],
                    Some(ChartData {
                        kind: ChartKind::Bar,
                        labels: vec!["Many accounts".into(), "Single account".into()],
                        values: vec![cmp.many, cmp.one],
                        tones: vec![Tone::Teal2, Tone::Teal],
                        suggested_max: None,
                    }),
                )
            }
            WidgetKind::RevenueSplit => {
                let split = formula::revenue_split(self.slider("total"));
                (
                    vec![
                        readout("publishers", "publishers", format_number(split.publishers, 0)),
                        readout("validators", "validators", format_number(split.validators, 0)),
                        readout("burn", "burn", format_number(split.burn, 0)),
                        readout("stakers", "stakers", format_number(split.stakers, 0)),
                    ],
                    Some(ChartData {
                        kind: ChartKind::Doughnut,
                        labels: ["Publishers", "Validators", "Burn", "Stakers"]
                            .map(String::from)
                            .to_vec(),
                        values: split.as_array().to_vec(),
                        tones: vec![Tone::Teal2, Tone::Teal, Tone::Warn, Tone::Good],
                        suggested_max: None,
                    }),
                )
            }
            WidgetKind::LockMultiplier(schedule) => {
                let values = schedule.staking_power(self.slider("stake"));
                let max = values.iter().copied().fold(f64::NAN, f64::max);
                (
                    vec![readout("lock_max", "power at max lock", format_number(max, 0))],
                    Some(ChartData {
                        kind: ChartKind::Bar,
                        labels: day_labels(schedule),
                        values,
                        tones: vec![Tone::Teal],
                        suggested_max: None,
                    }),
                )
            }
            WidgetKind::VotingPower(schedule) => {
                let stake = self.slider("stake");
                let rep = self.slider("rep");
                let selected_days = self
                    .controls
                    .iter()
                    .find_map(|c| match c {
                        Control::Select(s) if s.key == "duration" => s.selected_value(),
                        _ => None,
                    })
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or_default();
                let multiplier = schedule.multiplier_for(selected_days);
                let values = schedule
                    .points()
                    .iter()
                    .map(|p| formula::voting_power(stake, p.multiplier, rep))
                    .collect();
                let tones = schedule
                    .points()
                    .iter()
                    .map(|p| {
                        if p.days == selected_days {
                            Tone::Teal2
                        } else {
                            Tone::Teal
                        }
                    })
                    .collect();
                let power = formula::voting_power(stake, multiplier, rep);
                select_display = Some(("duration", format_multiplier(Some(multiplier), 2)));
                (
                    vec![readout("voting_power", "voting power", format_number(power, 2))],
                    Some(ChartData {
                        kind: ChartKind::Bar,
                        labels: day_labels(schedule),
                        values,
                        tones,
                        suggested_max: None,
                    }),
                )
            }
            WidgetKind::SuccessMetrics { rows, columns } => {
                let selected = self
                    .controls
                    .iter()
                    .find_map(|c| match c {
                        Control::Select(s) if s.key == "metric" => s.selected_value(),
                        _ => None,
                    })
                    .unwrap_or_default();
                let row = rows
                    .iter()
                    .find(|r| r.metric == selected)
                    .or_else(|| rows.first());
                let (readouts, chart, display) = match row {
                    Some(row) => {
                        let growth = formula::metric_growth(&row.earlier, &row.later);
                        (
                            vec![readout("growth", "growth", format_multiplier(growth.growth, 2))],
                            Some(ChartData {
                                kind: ChartKind::Bar,
                                labels: columns.to_vec(),
                                values: vec![growth.earlier, growth.later],
                                tones: vec![Tone::Teal, Tone::Teal2],
                                suggested_max: growth.percent.then_some(100.0),
                            }),
                            if growth.percent { "%" } else { "" },
                        )
                    }
                    None => (Vec::new(), None, ""),
                };
                select_display = Some(("metric", display.to_string()));
                (readouts, chart)
            }
            WidgetKind::RoadmapTimeline(_) => (Vec::new(), None),
        };
        self.readouts = readouts;
        self.chart = chart;
        if let Some((key, display)) = select_display {
            if let Some(select) = self.select_mut(key) {
                select.display = display;
            }
        }
    }

    /// Children of the widget mount; `chart` is placed in the chart slot when the widget has one.
    pub fn render_children(&self, chart: Option<Node>) -> Vec<Node> {
        let mut out: Vec<Node> = vec![
            Element::new("h4").with_class("widget-title").with_text(self.title).into(),
            Element::new("p").with_class("widget-sub").with_text(self.subtitle).into(),
        ];
        if let Some(formula) = self.formula {
            out.push(Element::new("div").with_class("widget-formula").with_text(formula).into());
        }

        if let WidgetKind::RoadmapTimeline(phases) = &self.kind {
            let mut strip = Element::new("div").with_class("timeline");
            for phase in phases {
                strip.push(
                    Element::new("button")
                        .with_class("phase-btn")
                        .with_attr("type", "button")
                        .with_attr("data-jump", phase.anchor.as_str())
                        .with_text(phase.label.as_str()),
                );
            }
            out.push(strip.into());
            return out;
        }

        let mut controls = Element::new("div").with_class("controls");
        for control in &self.controls {
            controls.push(control.to_element());
        }
        if self.chart.is_some() {
            let mut wrap = Element::new("div")
                .with_class("chart-wrap")
                .with_attr("data-chart", self.id);
            if let Some(chart) = chart {
                wrap.push(chart);
            }
            controls.push(wrap);
        }
        if !self.readouts.is_empty() {
            let mut row = Element::new("div").with_class("row");
            for r in &self.readouts {
                row.push(
                    Element::new("div")
                        .with_class("chip")
                        .with_text(format!("{} ", r.label))
                        .with_child(
                            Element::new("strong")
                                .with_attr("data-output", r.role)
                                .with_attr("role", "status")
                                .with_text(r.value.as_str()),
                        ),
                );
            }
            controls.push(row);
        }
        if let Some(note) = self.note {
            controls.push(Element::new("div").with_class("note").with_text(note));
        }
        out.push(controls.into());
        out
    }

    pub fn to_element(&self, chart: Option<Node>) -> Element {
        Element::new("section")
            .with_class(WIDGET_CLASS)
            .with_attr("data-widget", self.id)
            .with_children(self.render_children(chart))
    }
}

fn readout(role: &'static str, label: &'static str, value: String) -> Readout {
    Readout { role, label, value }
}

fn day_labels(schedule: &LockSchedule) -> Vec<String> {
    schedule
        .points()
        .iter()
        .map(|p| format!("{}d", p.days))
        .collect()
}
