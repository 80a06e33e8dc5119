//! Level geometry as handed over by the map loader.
//!
//! A [`MapModel`] is built once per level and never mutated afterwards.
//! Everything is addressed by index: linedefs and segments point at
//! vertexes, subsectors own a contiguous range of segments, and nodes point
//! at other nodes or at subsectors through [`NodeRef`].

mod builder;
mod node;

pub use builder::GridMapBuilder;
pub use node::{is_subsector, to_subsector_index, Node, NodeRef, SUBSECTOR_FLAG};

use std::ops::Range;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::bsp::{ordered_leaves, Order};
use crate::{BoundingBox, Corruption, Lump, MapError};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn point(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// A wall of the map outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDef {
    pub start_vertex: usize,
    pub end_vertex: usize,
}

/// A wall fragment owned by exactly one subsector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start_vertex: usize,
    pub end_vertex: usize,
}

/// A convex leaf region, owning `segs[first_seg .. first_seg + seg_count]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsector {
    pub first_seg: usize,
    pub seg_count: u32,
}

impl Subsector {
    /// `None` if the end of the range does not fit in a `usize`.
    #[inline]
    pub fn seg_range(&self) -> Option<Range<usize>> {
        let end = self.first_seg.checked_add(self.seg_count as usize)?;
        Some(self.first_seg..end)
    }
}

/// One loaded level.
///
/// The BSP root is stored last in `nodes`. Bounds are computed once in
/// [`MapModel::new`] for the renderer's centering and scaling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapModel {
    pub vertexes: Vec<Vertex>,
    pub line_defs: Vec<LineDef>,
    pub segs: Vec<Segment>,
    pub ssectors: Vec<Subsector>,
    pub nodes: Vec<Node>,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl MapModel {
    /// Assembles a level from parsed lumps and computes its bounds.
    pub fn new(
        vertexes: Vec<Vertex>,
        line_defs: Vec<LineDef>,
        segs: Vec<Segment>,
        ssectors: Vec<Subsector>,
        nodes: Vec<Node>,
    ) -> Self {
        let mut map = MapModel {
            vertexes,
            line_defs,
            segs,
            ssectors,
            nodes,
            ..Default::default()
        };
        map.calc_bounds();
        map
    }

    fn calc_bounds(&mut self) {
        let Some(first) = self.vertexes.first() else {
            return;
        };
        let (mut x_min, mut x_max, mut y_min, mut y_max) = (first.x, first.x, first.y, first.y);
        for vertex in &self.vertexes[1..] {
            x_min = x_min.min(vertex.x);
            x_max = x_max.max(vertex.x);
            y_min = y_min.min(vertex.y);
            y_max = y_max.max(vertex.y);
        }
        self.x_min = x_min;
        self.x_max = x_max;
        self.y_min = y_min;
        self.y_max = y_max;
    }

    /// The precomputed map extent.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.y_max, self.y_min, self.x_min, self.x_max)
    }

    /// Index of the root node (the last one).
    pub fn root(&self) -> Result<usize, MapError> {
        self.nodes.len().checked_sub(1).ok_or(MapError::EmptyTree)
    }

    pub fn vertex(&self, index: usize, owner: Lump) -> Result<&Vertex, MapError> {
        self.vertexes
            .get(index)
            .ok_or_else(|| MapError::bad_reference(owner, Lump::Vertexes, index, self.vertexes.len()))
    }

    /// Checks every stored index and range of the model.
    ///
    /// Loaders should call this once before handing the map to a driver; the
    /// traversal functions still check what they touch on every call.
    pub fn validate(&self) -> Result<(), MapError> {
        for line in &self.line_defs {
            self.vertex(line.start_vertex, Lump::LineDefs)?;
            self.vertex(line.end_vertex, Lump::LineDefs)?;
        }
        for seg in &self.segs {
            self.vertex(seg.start_vertex, Lump::Segs)?;
            self.vertex(seg.end_vertex, Lump::Segs)?;
        }
        self.validate_seg_ranges()?;

        for node in &self.nodes {
            for child in [node.left_child, node.right_child] {
                match child {
                    NodeRef::Node(index) if index >= self.nodes.len() => {
                        return Err(MapError::bad_reference(
                            Lump::Nodes,
                            Lump::Nodes,
                            index,
                            self.nodes.len(),
                        ));
                    }
                    NodeRef::Leaf(index) if index >= self.ssectors.len() => {
                        return Err(MapError::bad_reference(
                            Lump::Nodes,
                            Lump::SSectors,
                            index,
                            self.ssectors.len(),
                        ));
                    }
                    _ => {}
                }
            }
        }

        // Structural walk from the root catches cycles, shared subtrees and shared leaves.
        if let Ok(root) = self.root() {
            ordered_leaves(&self.nodes, root, Point2::origin(), Order::FrontToBack)?;
        }
        Ok(())
    }

    /// The segment range stored for subsector `index`, checked against `segs`.
    pub(crate) fn stored_seg_range(&self, index: usize) -> Result<Range<usize>, MapError> {
        let ssector = self.ssectors.get(index).ok_or(MapError::OutOfRange {
            what: Lump::SSectors,
            index,
            len: self.ssectors.len(),
        })?;
        match ssector.seg_range() {
            Some(range) if range.end <= self.segs.len() => Ok(range),
            _ => Err(Corruption::SegmentRange {
                subsector: index,
                first: ssector.first_seg,
                end: ssector.first_seg.saturating_add(ssector.seg_count as usize),
                len: self.segs.len(),
            }
            .into()),
        }
    }

    fn validate_seg_ranges(&self) -> Result<(), MapError> {
        let mut ranges: Vec<(usize, Range<usize>)> = Vec::with_capacity(self.ssectors.len());
        for index in 0..self.ssectors.len() {
            let range = self.stored_seg_range(index)?;
            if !range.is_empty() {
                ranges.push((index, range));
            }
        }

        ranges.sort_by_key(|(_, range)| range.start);
        for pair in ranges.windows(2) {
            let (prev, prev_range) = &pair[0];
            let (next, next_range) = &pair[1];
            if prev_range.end > next_range.start {
                return Err(Corruption::OverlappingSegments {
                    subsector: *next,
                    other: *prev,
                }
                .into());
            }
        }
        Ok(())
    }
}
