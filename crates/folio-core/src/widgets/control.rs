use super::formula::{format_multiplier, format_number};
use crate::dom::Element;

/// How a slider renders its current value next to the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Grouped integer (`50,000`).
    Integer,
    /// Two decimals with an `x` suffix (`1.25x`).
    Multiplier,
}

impl ValueFormat {
    pub fn format(self, value: f64) -> String {
        match self {
            ValueFormat::Integer => format_number(value, 0),
            ValueFormat::Multiplier => format_multiplier(Some(value), 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub format: ValueFormat,
    /// Decimals shown in the numeric input.
    pub digits: usize,
    value: f64,
    initial: f64,
}

impl Slider {
    pub fn new(key: &'static str, label: &'static str, min: f64, max: f64, step: f64, value: f64) -> Self {
        let mut slider = Self {
            key,
            label,
            min,
            max,
            step,
            format: ValueFormat::Integer,
            digits: 0,
            value,
            initial: value,
        };
        slider.value = slider.clamp(value);
        slider
    }

    pub fn multiplier(mut self) -> Self {
        self.format = ValueFormat::Multiplier;
        self.digits = 2;
        self
    }

    fn clamp(&self, value: f64) -> f64 {
        if self.min.is_finite() && self.max.is_finite() {
            value.max(self.min).min(self.max)
        } else {
            value
        }
    }

    /// Accepts any input: non-finite values fall back to the initial value, the rest are
    /// clamped to `[min, max]`. Returns the value now held.
    pub fn set(&mut self, value: f64) -> f64 {
        let raw = if value.is_finite() { value } else { self.initial };
        self.value = self.clamp(raw);
        self.value
    }

    pub fn get(&self) -> f64 {
        self.value
    }

    pub fn display(&self) -> String {
        self.format.format(self.value)
    }

    pub fn to_element(&self) -> Element {
        let attrs = |el: Element| {
            el.with_attr("min", self.min.to_string())
                .with_attr("max", self.max.to_string())
                .with_attr("step", self.step.to_string())
                .with_attr("data-control", self.key)
        };
        let range = attrs(Element::new("input").with_attr("type", "range"))
            .with_attr("value", self.value.to_string())
            .with_attr("aria-label", self.label);
        let number = attrs(Element::new("input").with_class("num").with_attr("type", "number"))
            .with_attr("value", format!("{:.*}", self.digits, self.value))
            .with_attr("aria-label", self.label);

        control_shell(self.label, &self.display())
            .with_attr("data-control", self.key)
            .with_child(Element::new("div").with_class("row").with_child(range).with_child(number))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub key: &'static str,
    pub label: &'static str,
    pub options: Vec<SelectOption>,
    selected: usize,
    /// Text shown next to the label; owned by the widget that recomputes it.
    pub display: String,
}

impl Select {
    pub fn new(key: &'static str, label: &'static str, options: Vec<SelectOption>, selected: usize) -> Self {
        let selected = selected.min(options.len().saturating_sub(1));
        Self {
            key,
            label,
            options,
            selected,
            display: String::new(),
        }
    }

    /// Selects the option with `value`. Unknown values leave the selection unchanged.
    pub fn select(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.options.get(self.selected).map(|o| o.value.as_str())
    }

    pub fn to_element(&self) -> Element {
        let mut select = Element::new("select")
            .with_class("num")
            .with_attr("data-control", self.key)
            .with_attr("aria-label", self.label);
        for (idx, option) in self.options.iter().enumerate() {
            let mut el = Element::new("option")
                .with_attr("value", option.value.as_str())
                .with_text(option.label.as_str());
            if idx == self.selected {
                el.set_attr("selected", "");
            }
            select.push(el);
        }
        control_shell(self.label, &self.display)
            .with_attr("data-control", self.key)
            .with_child(Element::new("div").with_class("row").with_child(select))
    }
}

fn control_shell(label: &str, value: &str) -> Element {
    let head = Element::new("div")
        .with_class("control-head")
        .with_child(Element::new("div").with_text(label))
        .with_child(Element::new("div").with_class("control-val").with_text(value));
    Element::new("div").with_class("control").with_child(head)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Slider(Slider),
    Select(Select),
}

impl Control {
    pub fn key(&self) -> &'static str {
        match self {
            Control::Slider(s) => s.key,
            Control::Select(s) => s.key,
        }
    }

    pub fn to_element(&self) -> Element {
        match self {
            Control::Slider(s) => s.to_element(),
            Control::Select(s) => s.to_element(),
        }
    }
}
