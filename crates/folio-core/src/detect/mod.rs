//! Maps the raw text of a code block to a diagram template.

mod builtin;

use crate::flow::FlowSpec;

/// Content signature tested against the trimmed code text.
#[derive(Debug, Clone)]
pub enum Signature {
    Contains(&'static str),
    StartsWith(&'static str),
    All(Vec<Signature>),
}

impl Signature {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Signature::Contains(needle) => text.contains(needle),
            Signature::StartsWith(prefix) => text.starts_with(prefix),
            Signature::All(parts) => parts.iter().all(|p| p.matches(text)),
        }
    }

    pub fn contains_all(needles: &[&'static str]) -> Self {
        Signature::All(needles.iter().map(|n| Signature::Contains(n)).collect())
    }
}

#[derive(Debug, Clone)]
pub struct Detector {
    pub signature: Signature,
    pub spec: FlowSpec,
}

impl Detector {
    pub fn id(&self) -> &str {
        &self.spec.id
    }
}

/// Ordered detectors; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct DetectorRegistry {
    detectors: Vec<Detector>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, detector: Detector) {
        self.detectors.push(detector);
    }

    pub fn add_spec(&mut self, signature: Signature, spec: FlowSpec) {
        self.add(Detector { signature, spec });
    }

    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    pub fn detect(&self, raw: &str) -> Option<&FlowSpec> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        self.detectors
            .iter()
            .find(|d| d.signature.matches(text))
            .map(|d| &d.spec)
    }

    /// The six whitepaper payloads, in priority order.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        reg.add_spec(
            Signature::Contains("Publishers (Human or AI)"),
            builtin::solution(),
        );
        reg.add_spec(
            Signature::contains_all(&["CONSUMPTION LAYER", "BASE L2"]),
            builtin::architecture(),
        );
        reg.add_spec(
            Signature::contains_all(&["CLAIM VERIFICATION", "Article Published"]),
            builtin::claim_verification(),
        );
        reg.add_spec(
            Signature::contains_all(&["Users pay $EVA", "Treasury"]),
            builtin::revenue(),
        );
        reg.add_spec(
            Signature::All(vec![
                Signature::StartsWith("More users"),
                Signature::Contains("cycle repeats"),
            ]),
            builtin::flywheel(),
        );
        reg.add_spec(
            Signature::contains_all(&["Register (ERC-8004)", "Reputation Updates"]),
            builtin::publisher_flow(),
        );
        reg
    }
}
