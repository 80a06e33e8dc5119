//! Point location and ordered leaf walks over a node array.

use nalgebra::Point2;

use crate::map::{MapModel, Node, NodeRef};
use crate::{Corruption, Lump, MapError};

use super::visitor::LeafVisitor;

/// Order in which the two children of a node are walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Side containing the point first (nearest leaves first).
    #[default]
    FrontToBack,
    /// Far side first (painter's order).
    BackToFront,
}

fn node_at(nodes: &[Node], index: usize) -> Result<&Node, MapError> {
    nodes
        .get(index)
        .ok_or_else(|| MapError::bad_reference(Lump::Nodes, Lump::Nodes, index, nodes.len()))
}

/// Descends from `root` along the side containing `point` and returns the
/// subsector it lands in.
///
/// Only the near child is followed at each node, so this costs O(depth).
/// A walk longer than the node count means the references loop and is
/// reported as [`Corruption::Cycle`].
pub fn locate_leaf(nodes: &[Node], root: usize, point: Point2<f64>) -> Result<usize, MapError> {
    if nodes.is_empty() {
        return Err(MapError::EmptyTree);
    }

    let mut index = root;
    for _ in 0..nodes.len() {
        let node = node_at(nodes, index)?;
        match node.child(node.side_of(point)) {
            NodeRef::Leaf(subsector) => return Ok(subsector),
            NodeRef::Node(next) => index = next,
        }
    }
    Err(Corruption::Cycle { node: index }.into())
}

/// Computes every subsector reachable from `root` in the given order
/// relative to `point`.
///
/// The walk uses an explicit stack and marks each node as it is expanded;
/// reaching a node twice is reported as [`Corruption::Cycle`], and a
/// subsector reached twice as [`Corruption::SharedLeaf`]. The whole order is
/// computed before returning, so callers never see a partial walk.
pub fn ordered_leaves(
    nodes: &[Node],
    root: usize,
    point: Point2<f64>,
    order: Order,
) -> Result<Vec<usize>, MapError> {
    if nodes.is_empty() {
        return Err(MapError::EmptyTree);
    }

    let mut expanded = vec![false; nodes.len()];
    let mut pending = vec![NodeRef::Node(root)];
    let mut leaves = Vec::with_capacity(nodes.len() + 1);

    while let Some(next) = pending.pop() {
        match next {
            NodeRef::Leaf(subsector) => leaves.push(subsector),
            NodeRef::Node(index) => {
                let node = node_at(nodes, index)?;
                if std::mem::replace(&mut expanded[index], true) {
                    return Err(Corruption::Cycle { node: index }.into());
                }

                let (near, far) = node.children_from(node.side_of(point));
                let (first, second) = match order {
                    Order::FrontToBack => (near, far),
                    Order::BackToFront => (far, near),
                };
                // stack: push second so first is popped next
                pending.push(second);
                pending.push(first);
            }
        }
    }

    // each subsector hangs under exactly one parent
    let mut sorted = leaves.clone();
    sorted.sort_unstable();
    if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(Corruption::SharedLeaf { subsector: pair[0] }.into());
    }

    Ok(leaves)
}

/// Walks every leaf front-to-back relative to `point`, calling `visitor`
/// with each subsector index.
///
/// Nothing is visited if the tree turns out to be corrupt.
pub fn traverse_ordered<V: LeafVisitor>(
    nodes: &[Node],
    root: usize,
    point: Point2<f64>,
    visitor: &mut V,
) -> Result<(), MapError> {
    for subsector in ordered_leaves(nodes, root, point, Order::FrontToBack)? {
        visitor.visit(subsector);
    }
    Ok(())
}

/// Walks every leaf back-to-front relative to `point`.
pub fn traverse_back_to_front<V: LeafVisitor>(
    nodes: &[Node],
    root: usize,
    point: Point2<f64>,
    visitor: &mut V,
) -> Result<(), MapError> {
    for subsector in ordered_leaves(nodes, root, point, Order::BackToFront)? {
        visitor.visit(subsector);
    }
    Ok(())
}

impl MapModel {
    fn check_subsector(&self, subsector: usize) -> Result<usize, MapError> {
        if subsector < self.ssectors.len() {
            Ok(subsector)
        } else {
            Err(MapError::bad_reference(
                Lump::Nodes,
                Lump::SSectors,
                subsector,
                self.ssectors.len(),
            ))
        }
    }

    /// The subsector containing `point`, starting from the root node.
    pub fn locate_leaf(&self, point: Point2<f64>) -> Result<usize, MapError> {
        let root = self.root()?;
        let subsector = locate_leaf(&self.nodes, root, point)?;
        self.check_subsector(subsector)
    }

    /// Every subsector in the given order relative to `point`.
    pub fn ordered_leaves(&self, point: Point2<f64>, order: Order) -> Result<Vec<usize>, MapError> {
        let root = self.root()?;
        let leaves = ordered_leaves(&self.nodes, root, point, order)?;
        for &subsector in &leaves {
            self.check_subsector(subsector)?;
        }
        Ok(leaves)
    }

    /// Front-to-back walk from the root.
    pub fn traverse_ordered<V: LeafVisitor>(
        &self,
        point: Point2<f64>,
        visitor: &mut V,
    ) -> Result<(), MapError> {
        for subsector in self.ordered_leaves(point, Order::FrontToBack)? {
            visitor.visit(subsector);
        }
        Ok(())
    }

    /// Back-to-front walk from the root.
    pub fn traverse_back_to_front<V: LeafVisitor>(
        &self,
        point: Point2<f64>,
        visitor: &mut V,
    ) -> Result<(), MapError> {
        for subsector in self.ordered_leaves(point, Order::BackToFront)? {
            visitor.visit(subsector);
        }
        Ok(())
    }
}
