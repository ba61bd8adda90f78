use std::collections::BTreeMap;

use serde::Serialize;

/// Presentation-only generation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DepthTier {
    A,
    B,
    C,
}

impl DepthTier {
    pub fn for_depth(depth: usize) -> Self {
        match depth {
            0 => DepthTier::A,
            1 => DepthTier::B,
            _ => DepthTier::C,
        }
    }

    pub fn index(self) -> usize {
        match self {
            DepthTier::A => 0,
            DepthTier::B => 1,
            DepthTier::C => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeFrame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeFrame {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Bottom-up layout of one family unit in unit-local coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitLayout {
    pub width: f32,
    pub height: f32,
    pub frames: BTreeMap<String, NodeFrame>,
    pub variants: BTreeMap<String, DepthTier>,
}

impl UnitLayout {
    pub(crate) fn absorb(&mut self, other: UnitLayout, dx: f32, dy: f32) {
        for (id, frame) in other.frames {
            self.frames.insert(id, frame.translated(dx, dy));
        }
        self.variants.extend(other.variants);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreeSize {
    pub width: f32,
    pub height: f32,
}

/// Finished layout of the visible subtree, centered in a square canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    /// Unpadded composition size.
    pub width: f32,
    pub height: f32,
    pub tree_size: TreeSize,
    pub frames: BTreeMap<String, NodeFrame>,
    pub variants: BTreeMap<String, DepthTier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Segment {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connectors {
    pub spouse_bars: Vec<Segment>,
    pub stems: Vec<Segment>,
    pub rails: Vec<Segment>,
    pub drops: Vec<Segment>,
}

impl Connectors {
    pub fn len(&self) -> usize {
        self.spouse_bars.len() + self.stems.len() + self.rails.len() + self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.spouse_bars
            .iter()
            .chain(&self.stems)
            .chain(&self.rails)
            .chain(&self.drops)
    }
}
