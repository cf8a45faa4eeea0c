//! Pipeline provenance: the ordered DAG steps that produced a dataset.

use serde::{Deserialize, Serialize};

/// One pipeline step. Index records sometimes omit the name; such steps
/// never match a membership test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceStep {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
}

impl ProvenanceStep {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), origin: None }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

/// Ordered list of pipeline steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Provenance {
    pub steps: Vec<ProvenanceStep>,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: ProvenanceStep) {
        self.steps.push(step);
    }

    /// Named steps, in pipeline order.
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|s| s.name.as_deref())
    }

    pub fn contains_step(&self, name: &str) -> bool {
        self.step_names().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Provenance {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self { steps: iter.into_iter().map(ProvenanceStep::named).collect() }
    }
}
