//! Decoration layers.
//!
//! Decorations are visual attributes anchored to character ranges, layered over the
//! highlighter's styling without modifying it. Each source owns a layer that it replaces
//! wholesale: the lint overlay recomputes its layer on every pass and the jump flash clears its
//! layer in one go, without matching ranges.

use crate::delta::TextDelta;
use crate::lint::LintSeverity;
use std::collections::BTreeMap;
use std::ops::Range;

/// A source/layer identifier for decorations.
///
/// Layers are composed in ascending id order, on top of the highlighter output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationLayerId(pub u32);

impl DecorationLayerId {
    /// Lint underlines.
    pub const LINT: Self = Self(1);
    /// Transient jump-to-line flash.
    pub const FLASH: Self = Self(2);

    /// Create a new layer id.
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// What a decoration draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DecorationKind {
    /// Squiggly underline colored by severity.
    Underline(LintSeverity),
    /// Background highlight of a jump target.
    Flash,
}

/// A single decoration item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decoration {
    /// Anchor range in character offsets.
    pub range: Range<usize>,
    /// What to draw.
    pub kind: DecorationKind,
    /// Optional tooltip text (the lint message).
    pub tooltip: Option<String>,
}

impl Decoration {
    /// An underline decoration.
    pub fn underline(range: Range<usize>, severity: LintSeverity, tooltip: Option<String>) -> Self {
        Self {
            range,
            kind: DecorationKind::Underline(severity),
            tooltip,
        }
    }

    /// A flash decoration.
    pub fn flash(range: Range<usize>) -> Self {
        Self {
            range,
            kind: DecorationKind::Flash,
            tooltip: None,
        }
    }
}

/// Decorations grouped by layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationLayers {
    layers: BTreeMap<DecorationLayerId, Vec<Decoration>>,
}

impl DecorationLayers {
    /// Create an empty set of layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a layer wholesale. Decorations are stored sorted by range.
    pub fn replace(&mut self, layer: DecorationLayerId, mut decorations: Vec<Decoration>) {
        if decorations.is_empty() {
            self.layers.remove(&layer);
            return;
        }
        decorations.sort_by_key(|d| (d.range.start, d.range.end));
        self.layers.insert(layer, decorations);
    }

    /// Clear a layer.
    pub fn clear(&mut self, layer: DecorationLayerId) {
        self.layers.remove(&layer);
    }

    /// Decorations of one layer.
    pub fn layer(&self, layer: DecorationLayerId) -> &[Decoration] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate layers in composition order.
    pub fn iter(&self) -> impl Iterator<Item = (DecorationLayerId, &[Decoration])> {
        self.layers.iter().map(|(id, d)| (*id, d.as_slice()))
    }

    /// Total number of decorations across layers.
    pub fn len(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    /// Returns `true` if no layer holds decorations.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Carry every decoration across an edit. Decorations whose text was deleted are dropped;
    /// point decorations (empty ranges) are kept.
    pub fn apply_delta(&mut self, delta: &TextDelta) {
        for decorations in self.layers.values_mut() {
            decorations.retain_mut(|d| {
                let was_point = d.range.is_empty();
                let (start, end) = delta.map_range(d.range.start, d.range.end);
                d.range = start..end;
                start < end || was_point
            });
        }
        self.layers.retain(|_, d| !d.is_empty());
    }
}
