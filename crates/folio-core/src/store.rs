//! Theme, motion and collapsed-section state persisted through a host [`Storage`].

use crate::config::FolioConfig;
use bitflags::bitflags;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Motion {
    #[default]
    On,
    Off,
}

impl Motion {
    pub fn as_str(self) -> &'static str {
        match self {
            Motion::On => "on",
            Motion::Off => "off",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "on" => Some(Motion::On),
            "off" => Some(Motion::Off),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Motion::On => Motion::Off,
            Motion::Off => Motion::On,
        }
    }

    pub fn is_on(self) -> bool {
        self == Motion::On
    }
}

/// Host key/value persistence (browser local storage or an in-memory stand-in).
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: IndexMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub theme: String,
    pub motion: String,
    pub collapsed: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::from_config(&FolioConfig::default())
    }
}

impl StorageKeys {
    pub fn from_config(config: &FolioConfig) -> Self {
        Self {
            theme: config.str_or("storage.themeKey", "theme").to_string(),
            motion: config.str_or("storage.motionKey", "motion").to_string(),
            collapsed: config
                .str_or("storage.collapsedKey", "collapsed-section-ids")
                .to_string(),
        }
    }
}

bitflags! {
    /// Which part of the persisted state changed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Aspect: u8 {
        const THEME = 1 << 0;
        const MOTION = 1 << 1;
        const COLLAPSED = 1 << 2;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PersistedState {
    pub theme: Theme,
    pub motion: Motion,
    pub collapsed: BTreeSet<String>,
}

impl PersistedState {
    /// Reads every key once. Missing or malformed values fall back to defaults; a saved motion
    /// value wins over the platform preference.
    pub fn load(storage: &dyn Storage, keys: &StorageKeys, prefers_reduced_motion: bool) -> Self {
        let theme = match storage.get(&keys.theme) {
            None => Theme::default(),
            Some(raw) => Theme::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(key = %keys.theme, value = %raw, "ignoring unrecognized theme");
                Theme::default()
            }),
        };

        let default_motion = if prefers_reduced_motion {
            Motion::Off
        } else {
            Motion::On
        };
        let motion = match storage.get(&keys.motion) {
            None => default_motion,
            Some(raw) => Motion::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(key = %keys.motion, value = %raw, "ignoring unrecognized motion setting");
                default_motion
            }),
        };

        let collapsed = match storage.get(&keys.collapsed) {
            None => BTreeSet::new(),
            Some(raw) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(ids) => ids
                    .into_iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
                Err(err) => {
                    tracing::warn!(key = %keys.collapsed, error = %err, "ignoring malformed collapsed-section list");
                    BTreeSet::new()
                }
            },
        };

        Self {
            theme,
            motion,
            collapsed,
        }
    }
}

type Callback = Box<dyn FnMut(Aspect, &PersistedState)>;

struct Listener {
    interest: Aspect,
    callback: Callback,
}

/// Single owner of the persisted UI state. Every write is saved immediately and then fanned out
/// to the listeners whose interest intersects the changed aspect.
pub struct ThemeMotionStore {
    storage: Box<dyn Storage>,
    keys: StorageKeys,
    state: PersistedState,
    prefers_reduced_motion: bool,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for ThemeMotionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeMotionStore")
            .field("keys", &self.keys)
            .field("state", &self.state)
            .field("prefers_reduced_motion", &self.prefers_reduced_motion)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ThemeMotionStore {
    pub fn load(storage: Box<dyn Storage>, keys: StorageKeys, prefers_reduced_motion: bool) -> Self {
        let state = PersistedState::load(storage.as_ref(), &keys, prefers_reduced_motion);
        tracing::debug!(
            theme = state.theme.as_str(),
            motion = state.motion.as_str(),
            collapsed = state.collapsed.len(),
            "loaded persisted state"
        );
        Self {
            storage,
            keys,
            state,
            prefers_reduced_motion,
            listeners: Vec::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStorage::new()), StorageKeys::default(), false)
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn motion(&self) -> Motion {
        self.state.motion
    }

    pub fn prefers_reduced_motion(&self) -> bool {
        self.prefers_reduced_motion
    }

    /// Motion is on and the platform does not ask for reduced motion.
    pub fn animations_enabled(&self) -> bool {
        self.state.motion.is_on() && !self.prefers_reduced_motion
    }

    pub fn is_collapsed(&self, section_id: &str) -> bool {
        self.state.collapsed.contains(section_id)
    }

    pub fn collapsed_ids(&self) -> &BTreeSet<String> {
        &self.state.collapsed
    }

    pub fn subscribe(
        &mut self,
        interest: Aspect,
        callback: impl FnMut(Aspect, &PersistedState) + 'static,
    ) {
        self.listeners.push(Listener {
            interest,
            callback: Box::new(callback),
        });
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
        self.persist(Aspect::THEME);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.state.theme.flipped();
        self.set_theme(next);
        next
    }

    pub fn set_motion(&mut self, motion: Motion) {
        self.state.motion = motion;
        self.persist(Aspect::MOTION);
    }

    pub fn toggle_motion(&mut self) -> Motion {
        let next = self.state.motion.flipped();
        self.set_motion(next);
        next
    }

    /// Records a section's collapsed flag. Returns whether the stored set changed.
    pub fn set_collapsed(&mut self, section_id: &str, collapsed: bool) -> bool {
        let changed = if collapsed {
            self.state.collapsed.insert(section_id.to_string())
        } else {
            self.state.collapsed.remove(section_id)
        };
        if changed {
            self.persist(Aspect::COLLAPSED);
        }
        changed
    }

    fn persist(&mut self, aspect: Aspect) {
        if aspect.contains(Aspect::THEME) {
            self.storage.set(&self.keys.theme, self.state.theme.as_str());
        }
        if aspect.contains(Aspect::MOTION) {
            self.storage
                .set(&self.keys.motion, self.state.motion.as_str());
        }
        if aspect.contains(Aspect::COLLAPSED) {
            let ids: Vec<&String> = self.state.collapsed.iter().collect();
            match serde_json::to_string(&ids) {
                Ok(json) => self.storage.set(&self.keys.collapsed, &json),
                Err(err) => tracing::warn!(error = %err, "failed to encode collapsed sections"),
            }
        }
        self.notify(aspect);
    }

    fn notify(&mut self, aspect: Aspect) {
        let state = &self.state;
        for listener in self.listeners.iter_mut() {
            if listener.interest.intersects(aspect) {
                (listener.callback)(aspect, state);
            }
        }
    }
}
