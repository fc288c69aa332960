use serde_json::{Map, Value, json};

/// Layered JSON configuration addressed by dotted paths (`reveal.fold`, `storage.themeKey`).
#[derive(Debug, Clone, PartialEq)]
pub struct FolioConfig(Value);

impl Default for FolioConfig {
    fn default() -> Self {
        Self(default_value())
    }
}

fn default_value() -> Value {
    json!({
        "storage": {
            "themeKey": "theme",
            "motionKey": "motion",
            "collapsedKey": "collapsed-section-ids"
        },
        "reveal": {
            "fold": 0.9,
            "threshold": 0.12,
            "rootMarginBottom": -0.12
        },
        "parallax": {
            "pointerEase": 0.075,
            "scrollEase": 0.06,
            "layers": [
                { "sx": 18.0, "sy": 12.0, "ss": -0.04 },
                { "sx": -28.0, "sy": -18.0, "ss": -0.08 },
                { "sx": 40.0, "sy": 26.0, "ss": -0.12 }
            ]
        },
        "diagram": {
            "padding": 80.0
        },
        "chart": {
            "animationMs": 420
        },
        "deepLink": {
            "delayMs": 50
        },
        "document": {
            "url": null
        }
    })
}

impl FolioConfig {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Defaults with `overrides` merged on top.
    pub fn with_overrides(overrides: &Value) -> Self {
        let mut cfg = Self::default();
        cfg.deep_merge(overrides);
        cfg
    }

    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        let overrides: Value = serde_json::from_str(text)?;
        if !overrides.is_object() {
            return Err(crate::Error::InvalidConfig {
                path: String::new(),
                message: "expected a JSON object at the top level".to_string(),
            });
        }
        Ok(Self::with_overrides(&overrides))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64().filter(|v| v.is_finite())
    }

    pub fn get_u64(&self, dotted_path: &str) -> Option<u64> {
        self.get(dotted_path)?.as_u64()
    }

    /// Reads a number, falling back to `default` (with a warning) when the key holds something else.
    pub fn f64_or(&self, dotted_path: &str, default: f64) -> f64 {
        match self.get(dotted_path) {
            None | Some(Value::Null) => default,
            Some(v) => match v.as_f64().filter(|v| v.is_finite()) {
                Some(v) => v,
                None => {
                    tracing::warn!(path = dotted_path, value = %v, "config value is not a number; using default");
                    default
                }
            },
        }
    }

    pub fn str_or<'a>(&'a self, dotted_path: &str, default: &'a str) -> &'a str {
        match self.get_str(dotted_path) {
            Some(s) if !s.trim().is_empty() => s,
            _ => default,
        }
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // Configs are objects; coerce anything else so this API never panics on user input.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
