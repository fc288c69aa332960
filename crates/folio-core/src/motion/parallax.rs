//! Smoothed pointer/scroll motion for decorative background layers.
//!
//! The controller owns a three-state frame loop. The host delivers one [`ParallaxController::tick`]
//! per requested animation frame and never cancels a pending frame; a stop request is honored
//! by that pending tick, which moves the loop back to idle.

use crate::config::FolioConfig;
use serde::{Deserialize, Serialize};

/// Per-layer strengths: pointer x, pointer y, and scroll.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParallaxLayer {
    #[serde(default)]
    pub sx: f64,
    #[serde(default)]
    pub sy: f64,
    #[serde(default)]
    pub ss: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerTransform {
    pub x: f64,
    pub y: f64,
}

impl LayerTransform {
    pub fn to_css(self) -> String {
        format!("translate3d({:.2}px, {:.2}px, 0)", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Idle,
    Running,
    /// A stop was requested while a frame is still pending.
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Offsets {
    x: f64,
    y: f64,
    scroll: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxOptions {
    pub pointer_ease: f64,
    pub scroll_ease: f64,
}

impl Default for ParallaxOptions {
    fn default() -> Self {
        Self {
            pointer_ease: 0.075,
            scroll_ease: 0.06,
        }
    }
}

impl ParallaxOptions {
    pub fn from_config(config: &FolioConfig) -> Self {
        let d = Self::default();
        Self {
            pointer_ease: config.f64_or("parallax.pointerEase", d.pointer_ease),
            scroll_ease: config.f64_or("parallax.scrollEase", d.scroll_ease),
        }
    }
}

/// Layers configured under `parallax.layers`; malformed entries are an error.
pub fn layers_from_config(config: &FolioConfig) -> crate::Result<Vec<ParallaxLayer>> {
    match config.get("parallax.layers") {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|err| crate::Error::InvalidConfig {
            path: "parallax.layers".to_string(),
            message: err.to_string(),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct ParallaxController {
    layers: Vec<ParallaxLayer>,
    transforms: Vec<Option<LayerTransform>>,
    options: ParallaxOptions,
    target: Offsets,
    current: Offsets,
    state: LoopState,
    hidden: bool,
}

impl ParallaxController {
    pub fn new(layers: Vec<ParallaxLayer>, options: ParallaxOptions) -> Self {
        let transforms = vec![None; layers.len()];
        Self {
            layers,
            transforms,
            options,
            target: Offsets::default(),
            current: Offsets::default(),
            state: LoopState::Idle,
            hidden: false,
        }
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Whether the decorative root should be hidden (opacity 0).
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Current transform per layer; `None` means no transform is applied.
    pub fn transforms(&self) -> &[Option<LayerTransform>] {
        &self.transforms
    }

    /// Starting scroll position: both target and current, so the first frame does not jump.
    pub fn init_scroll(&mut self, scroll_y: f64) {
        self.target.scroll = scroll_y;
        self.current.scroll = scroll_y;
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, viewport_width: f64, viewport_height: f64) {
        let w = if viewport_width > 0.0 { viewport_width } else { 1.0 };
        let h = if viewport_height > 0.0 { viewport_height } else { 1.0 };
        self.target.x = (x / w - 0.5) * 2.0;
        self.target.y = (y / h - 0.5) * 2.0;
    }

    pub fn pointer_leave(&mut self) {
        self.target.x = 0.0;
        self.target.y = 0.0;
    }

    pub fn scroll_to(&mut self, scroll_y: f64) {
        self.target.scroll = scroll_y;
    }

    /// Returns whether the host must request a frame. Starting while running (or while a
    /// stopping frame is still pending) schedules nothing new.
    pub fn start(&mut self) -> bool {
        if self.layers.is_empty() {
            return false;
        }
        match self.state {
            LoopState::Idle => {
                self.state = LoopState::Running;
                true
            }
            LoopState::Stopping => {
                self.state = LoopState::Running;
                false
            }
            LoopState::Running => false,
        }
    }

    /// Stops the loop and clears every transform. Safe to call in any state.
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Stopping;
        }
        self.transforms.iter_mut().for_each(|t| *t = None);
    }

    /// Applies the motion preference. Returns whether the host must request a frame.
    pub fn sync(&mut self, motion_on: bool) -> bool {
        if !motion_on {
            self.stop();
            self.hidden = true;
            return false;
        }
        self.hidden = false;
        self.start()
    }

    /// One animation frame. Returns whether another frame should be requested.
    pub fn tick(&mut self) -> bool {
        match self.state {
            LoopState::Idle => false,
            LoopState::Stopping => {
                self.state = LoopState::Idle;
                false
            }
            LoopState::Running => {
                let pe = self.options.pointer_ease;
                self.current.x += (self.target.x - self.current.x) * pe;
                self.current.y += (self.target.y - self.current.y) * pe;
                self.current.scroll +=
                    (self.target.scroll - self.current.scroll) * self.options.scroll_ease;

                let cur = self.current;
                for (layer, slot) in self.layers.iter().zip(self.transforms.iter_mut()) {
                    *slot = Some(LayerTransform {
                        x: cur.x * layer.sx,
                        y: cur.y * layer.sy + cur.scroll * layer.ss,
                    });
                }
                true
            }
        }
    }
}
