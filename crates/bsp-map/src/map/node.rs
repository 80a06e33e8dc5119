//! BSP nodes and child references.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::{BoundingBox, Partition, Side};

/// Flag bit marking a raw 16-bit child reference as a subsector.
pub const SUBSECTOR_FLAG: u16 = 0x8000;

/// Returns true if a raw child reference points at a subsector.
#[inline]
pub fn is_subsector(raw: u16) -> bool {
    raw & SUBSECTOR_FLAG != 0
}

/// Strips the subsector flag from a raw child reference.
#[inline]
pub fn to_subsector_index(raw: u16) -> usize {
    (raw & !SUBSECTOR_FLAG) as usize
}

/// A child of a BSP node: either another node or a leaf subsector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRef {
    Node(usize),
    Leaf(usize),
}

impl NodeRef {
    /// Decodes the 16-bit form used by WAD node lumps.
    pub fn from_raw(raw: u16) -> Self {
        if is_subsector(raw) {
            NodeRef::Leaf(to_subsector_index(raw))
        } else {
            NodeRef::Node(raw as usize)
        }
    }

    /// Encodes back into the 16-bit form.
    ///
    /// Returns `None` if the index does not fit in 15 bits.
    pub fn to_raw(self) -> Option<u16> {
        match self {
            NodeRef::Node(index) if index < SUBSECTOR_FLAG as usize => Some(index as u16),
            NodeRef::Leaf(index) if index < SUBSECTOR_FLAG as usize => {
                Some(index as u16 | SUBSECTOR_FLAG)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn is_leaf(self) -> bool {
        matches!(self, NodeRef::Leaf(_))
    }
}

/// An interior node of the BSP tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub x_partition: f64,
    pub y_partition: f64,
    pub change_x_partition: f64,
    pub change_y_partition: f64,
    pub left_child: NodeRef,
    pub right_child: NodeRef,
    pub left_box: BoundingBox,
    pub right_box: BoundingBox,
}

impl Node {
    /// The splitting line of this node.
    #[inline]
    pub fn partition(&self) -> Partition {
        Partition::new(
            Point2::new(self.x_partition, self.y_partition),
            Vector2::new(self.change_x_partition, self.change_y_partition),
        )
    }

    /// Which side of this node's partition `point` is on.
    #[inline]
    pub fn side_of(&self, point: Point2<f64>) -> Side {
        self.partition().side_of(point)
    }

    #[inline]
    pub fn child(&self, side: Side) -> NodeRef {
        match side {
            Side::Left => self.left_child,
            Side::Right => self.right_child,
        }
    }

    #[inline]
    pub fn bbox(&self, side: Side) -> &BoundingBox {
        match side {
            Side::Left => &self.left_box,
            Side::Right => &self.right_box,
        }
    }

    /// Both children, the one on `side` first.
    #[inline]
    pub fn children_from(&self, side: Side) -> (NodeRef, NodeRef) {
        (self.child(side), self.child(side.opposite()))
    }
}
