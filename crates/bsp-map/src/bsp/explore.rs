//! Step-by-step traversal for visualizing the BSP walk.
//!
//! An [`Exploration`] holds the pending stack of a traversal and advances
//! one node per [`Exploration::step`] call. The caller decides when to call
//! it (typically from an animation tick after a pacing delay) and cancels it
//! simply by dropping it.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::map::{MapModel, NodeRef};
use crate::{BoundingBox, Corruption, Line, Lump, MapError, Side};

/// How much of the tree an exploration covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExploreKind {
    /// Follow only the side containing the point; ends at its leaf.
    #[default]
    Descend,
    /// Full front-to-back walk over every leaf.
    Walk,
}

/// What a node looks like at the moment it is expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitMarkers {
    pub node: usize,
    /// Side of the partition the explored point is on.
    pub side: Side,
    pub left_box: BoundingBox,
    pub right_box: BoundingBox,
    pub partition: Line,
}

/// Outcome of one exploration step.
#[derive(Debug, Clone, PartialEq)]
pub enum ExploreStep {
    /// A node was expanded.
    Split(SplitMarkers),
    /// A leaf was reached.
    Leaf(usize),
    /// Nothing left to visit.
    Finished,
}

#[derive(Debug, Clone)]
pub struct Exploration {
    kind: ExploreKind,
    point: Point2<f64>,
    pending: Vec<NodeRef>,
    expanded: Vec<bool>,
    leaves: Vec<usize>,
}

impl Exploration {
    /// Starts at the root of `map` for the given point.
    pub fn new(map: &MapModel, point: Point2<f64>, kind: ExploreKind) -> Result<Self, MapError> {
        let root = map.root()?;
        Ok(Self {
            kind,
            point,
            pending: vec![NodeRef::Node(root)],
            expanded: vec![false; map.nodes.len()],
            leaves: Vec::new(),
        })
    }

    #[inline]
    pub fn kind(&self) -> ExploreKind {
        self.kind
    }

    /// The point this exploration classifies against.
    #[inline]
    pub fn point(&self) -> Point2<f64> {
        self.point
    }

    /// Leaves reached so far, in visit order.
    #[inline]
    pub fn leaves(&self) -> &[usize] {
        &self.leaves
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advances by one node or leaf.
    ///
    /// On error the state is left as it was before the call.
    pub fn step(&mut self, map: &MapModel) -> Result<ExploreStep, MapError> {
        let Some(&next) = self.pending.last() else {
            return Ok(ExploreStep::Finished);
        };

        match next {
            NodeRef::Leaf(subsector) => {
                if subsector >= map.ssectors.len() {
                    return Err(MapError::bad_reference(
                        Lump::Nodes,
                        Lump::SSectors,
                        subsector,
                        map.ssectors.len(),
                    ));
                }
                if self.leaves.contains(&subsector) {
                    return Err(Corruption::SharedLeaf { subsector }.into());
                }
                self.pending.pop();
                self.leaves.push(subsector);
                log::trace!("exploration reached subsector {subsector}");
                Ok(ExploreStep::Leaf(subsector))
            }
            NodeRef::Node(index) => {
                let node = map.nodes.get(index).ok_or_else(|| {
                    MapError::bad_reference(Lump::Nodes, Lump::Nodes, index, map.nodes.len())
                })?;
                let seen = self.expanded.get(index).copied().unwrap_or(true);
                if seen {
                    return Err(Corruption::Cycle { node: index }.into());
                }

                self.pending.pop();
                self.expanded[index] = true;

                let side = node.side_of(self.point);
                let (near, far) = node.children_from(side);
                if self.kind == ExploreKind::Walk {
                    self.pending.push(far);
                }
                self.pending.push(near);

                log::trace!("exploration expanded node {index}, point on {side:?} side");
                Ok(ExploreStep::Split(SplitMarkers {
                    node: index,
                    side,
                    left_box: node.left_box,
                    right_box: node.right_box,
                    partition: node.partition().line(),
                }))
            }
        }
    }
}
