//! Vitessce hints: categorical labels describing a dataset's modality.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One label from the fixed hint vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hint {
    IsImage,
    Rna,
    Atac,
    Sprm,
    Codex,
    Anndata,
    JsonBased,
    Spatial,
    IsSupport,
    SegmentationMask,
    Geomx,
    Xenium,
    Epic,
}

impl Hint {
    /// The whole vocabulary, in declaration order.
    pub const ALL: [Hint; 13] = [
        Hint::IsImage,
        Hint::Rna,
        Hint::Atac,
        Hint::Sprm,
        Hint::Codex,
        Hint::Anndata,
        Hint::JsonBased,
        Hint::Spatial,
        Hint::IsSupport,
        Hint::SegmentationMask,
        Hint::Geomx,
        Hint::Xenium,
        Hint::Epic,
    ];

    /// Wire label as it appears in `vitessce-hints`.
    pub fn as_str(self) -> &'static str {
        match self {
            Hint::IsImage => "is_image",
            Hint::Rna => "rna",
            Hint::Atac => "atac",
            Hint::Sprm => "sprm",
            Hint::Codex => "codex",
            Hint::Anndata => "anndata",
            Hint::JsonBased => "json_based",
            Hint::Spatial => "spatial",
            Hint::IsSupport => "is_support",
            Hint::SegmentationMask => "segmentation_mask",
            Hint::Geomx => "geomx",
            Hint::Xenium => "xenium",
            Hint::Epic => "epic",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a label outside the vocabulary. `HintSet::parse` never
/// surfaces it; it only exists for callers that want strict parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hint '{0}'")]
pub struct UnknownHint(pub String);

impl FromStr for Hint {
    type Err = UnknownHint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hint::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| UnknownHint(s.to_string()))
    }
}

/// A set of hints, stored as a bitset so membership is O(1).
///
/// Unknown labels are dropped on parse: new hints added upstream must not
/// break resolution of datasets that also carry known ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct HintSet(u16);

impl HintSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Parse raw hint strings. Total; unknown strings are ignored.
    pub fn parse<I>(raw: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        raw.into_iter()
            .filter_map(|s| s.as_ref().parse::<Hint>().ok())
            .collect()
    }

    pub fn has(&self, hint: Hint) -> bool {
        self.0 & hint.bit() != 0
    }

    /// True when every hint in `hints` is present.
    pub fn has_all(&self, hints: &[Hint]) -> bool {
        hints.iter().all(|h| self.has(*h))
    }

    /// True when `hint` is the one and only member.
    pub fn is_only(&self, hint: Hint) -> bool {
        self.0 == hint.bit()
    }

    pub fn insert(&mut self, hint: Hint) {
        self.0 |= hint.bit();
    }

    pub fn with(mut self, hint: Hint) -> Self {
        self.insert(hint);
        self
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Hint> + '_ {
        Hint::ALL.into_iter().filter(|h| self.has(*h))
    }
}

impl FromIterator<Hint> for HintSet {
    fn from_iter<T: IntoIterator<Item = Hint>>(iter: T) -> Self {
        let mut set = HintSet::empty();
        for hint in iter {
            set.insert(hint);
        }
        set
    }
}

impl<const N: usize> From<[Hint; N]> for HintSet {
    fn from(hints: [Hint; N]) -> Self {
        hints.into_iter().collect()
    }
}

impl From<Vec<String>> for HintSet {
    fn from(raw: Vec<String>) -> Self {
        HintSet::parse(raw)
    }
}

impl From<HintSet> for Vec<String> {
    fn from(set: HintSet) -> Self {
        set.iter().map(|h| h.as_str().to_string()).collect()
    }
}

impl fmt::Display for HintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.iter().map(Hint::as_str).collect();
        write!(f, "[{}]", labels.join(", "))
    }
}
